//! Data module - CSV loading and collision queries

mod dashboard;
mod loader;
mod queries;
mod record;

pub use dashboard::{DashboardViews, ViewParams};
pub use loader::{Dataset, DatasetLoader};
pub use queries::QueryError;
pub use record::{
    Centroid, GeoPoint, Hour, MinuteBin, RawRow, StreetRanking, VictimCategory,
    MAX_INJURED_SLIDER,
};

#[cfg(test)]
pub(crate) use loader::test_support as loader_test_support;
