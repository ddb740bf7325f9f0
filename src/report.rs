//! Headless report: every dashboard view serialized as JSON.

use crate::data::{
    Centroid, DashboardViews, Dataset, GeoPoint, Hour, MinuteBin, QueryError, RawRow,
    StreetRanking, VictimCategory, ViewParams,
};
use crate::charts::{DENSITY_MAP_ZOOM, INJURY_MAP_ZOOM};
use serde::Serialize;

/// A view that was either computed or could not be for this dataset.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ViewOutcome<T> {
    Ready { view: T },
    Unavailable { reason: String },
}

impl<T> From<Result<T, QueryError>> for ViewOutcome<T> {
    fn from(result: Result<T, QueryError>) -> Self {
        match result {
            Ok(view) => ViewOutcome::Ready { view },
            Err(e) => ViewOutcome::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MapReport {
    pub point_count: usize,
    pub centroid: Option<Centroid>,
    pub zoom: u8,
    pub points: Vec<GeoPoint>,
}

#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub min_injured: u32,
    pub hour: Hour,
    pub category: VictimCategory,
    pub injuries: ViewOutcome<MapReport>,
    pub density: ViewOutcome<MapReport>,
    pub minute_histogram: ViewOutcome<Vec<MinuteBin>>,
    pub top_streets: ViewOutcome<Vec<StreetRanking>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_rows: Option<ViewOutcome<Vec<RawRow>>>,
}

impl DashboardReport {
    pub fn build(dataset: &Dataset, params: ViewParams) -> Self {
        let views = DashboardViews::compute(dataset, params);

        let minute_histogram = match views.histogram {
            Some(bins) => ViewOutcome::Ready { view: bins },
            None => ViewOutcome::Unavailable {
                reason: "hour view unavailable".to_string(),
            },
        };

        Self {
            rows_read: dataset.rows_read(),
            rows_kept: dataset.height(),
            min_injured: params.min_injured,
            hour: params.hour,
            category: params.category,
            injuries: views
                .injuries
                .map(|v| MapReport {
                    point_count: v.points.len(),
                    centroid: v.centroid,
                    zoom: INJURY_MAP_ZOOM,
                    points: v.points,
                })
                .into(),
            density: views
                .hour
                .map(|v| MapReport {
                    point_count: v.points.len(),
                    centroid: v.centroid,
                    zoom: DENSITY_MAP_ZOOM,
                    points: v.points,
                })
                .into(),
            minute_histogram,
            top_streets: views.streets.into(),
            raw_rows: views.raw.map(ViewOutcome::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader_test_support::collision_csv;
    use crate::data::DatasetLoader;

    #[test]
    fn serializes_every_view() {
        let file = collision_csv(&[
            "01/05/2019,14:05,40.7,-74.0,2,2,0,0,Main St",
            "01/05/2019,9:15,40.8,-73.9,1,0,1,0,Broadway",
        ]);
        let ds = DatasetLoader::read(file.path(), 10).unwrap();
        let params = ViewParams {
            min_injured: 1,
            hour: Hour::new(14).unwrap(),
            category: VictimCategory::Pedestrians,
            raw_rows: None,
        };

        let report = DashboardReport::build(&ds, params);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["rows_kept"], 2);
        assert_eq!(json["hour"], 14);
        assert_eq!(json["category"], "Pedestrians");
        assert_eq!(json["injuries"]["status"], "ready");
        assert_eq!(json["injuries"]["view"]["point_count"], 2);
        assert_eq!(json["density"]["view"]["point_count"], 1);
        assert_eq!(json["density"]["view"]["zoom"], 11);
        assert_eq!(json["minute_histogram"]["view"].as_array().unwrap().len(), 60);
        assert_eq!(json["top_streets"]["view"][0]["street_name"], "Main St");
        assert!(json.get("raw_rows").is_none());
    }

    #[test]
    fn empty_hour_reports_null_centroid() {
        let file = collision_csv(&["01/05/2019,14:05,40.7,-74.0,2,2,0,0,Main St"]);
        let ds = DatasetLoader::read(file.path(), 10).unwrap();
        let params = ViewParams {
            hour: Hour::new(3).unwrap(),
            ..ViewParams::default()
        };

        let json = serde_json::to_value(DashboardReport::build(&ds, params)).unwrap();
        assert!(json["density"]["view"]["centroid"].is_null());
        assert_eq!(json["density"]["view"]["point_count"], 0);
    }
}
