//! Dashboard Views Module
//! Computes every view for one set of user parameters.

use super::loader::Dataset;
use super::queries::{CollisionQueries, HourView, InjuryView, QueryError};
use super::record::{Hour, MinuteBin, RawRow, StreetRanking, VictimCategory};

/// Control values supplied by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewParams {
    pub min_injured: u32,
    pub hour: Hour,
    pub category: VictimCategory,
    /// Number of raw rows to include, or `None` to skip the raw table.
    pub raw_rows: Option<usize>,
}

/// All views derived from one [`Dataset`] and one [`ViewParams`].
///
/// A view fails on its own when a column it needs is absent; the others
/// are still computed.
#[derive(Debug)]
pub struct DashboardViews {
    pub params: ViewParams,
    pub injuries: Result<InjuryView, QueryError>,
    pub hour: Result<HourView, QueryError>,
    /// Present whenever the hour view is.
    pub histogram: Option<Vec<MinuteBin>>,
    pub streets: Result<Vec<StreetRanking>, QueryError>,
    pub raw: Option<Result<Vec<RawRow>, QueryError>>,
}

impl DashboardViews {
    pub fn compute(dataset: &Dataset, params: ViewParams) -> Self {
        let injuries = CollisionQueries::filter_by_injuries(dataset, params.min_injured);
        let hour = CollisionQueries::filter_by_hour(dataset, params.hour);
        let histogram = hour
            .as_ref()
            .ok()
            .map(|view| CollisionQueries::histogram_by_minute(&view.points, params.hour));
        let streets = CollisionQueries::top_streets(dataset, params.category);
        let raw = params
            .raw_rows
            .map(|limit| CollisionQueries::raw_rows(dataset, params.hour, limit));

        log::debug!(
            "Computed views for min_injured={} hour={} category={}",
            params.min_injured,
            params.hour.get(),
            params.category
        );

        Self {
            params,
            injuries,
            hour,
            histogram,
            streets,
            raw,
        }
    }
}
