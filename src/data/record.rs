//! Collision Record Module
//! Canonical column names, parameter types and the plain view types handed
//! to the presentation layer.

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use strum::{Display, EnumIter};
use thiserror::Error;

/// Column names after load-time lowercasing.
pub mod columns {
    pub const LATITUDE: &str = "latitude";
    pub const LONGITUDE: &str = "longitude";
    pub const ACCIDENT_DATE: &str = "accident date";
    pub const ACCIDENT_TIME: &str = "accident time";
    pub const PERSONS_INJURED: &str = "number of persons injured";
    pub const PEDESTRIANS_INJURED: &str = "number of pedestrians injured";
    pub const CYCLISTS_INJURED: &str = "number of cyclist injured";
    pub const MOTORISTS_INJURED: &str = "number of motorist injured";
    pub const ON_STREET_NAME: &str = "on street name";
}

/// Upper bound of the injury slider, taken from the observed data range.
/// The filter itself accepts any threshold.
pub const MAX_INJURED_SLIDER: u32 = 27;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Hour {0} is outside 0..=23")]
pub struct HourOutOfRange(pub u32);

/// Hour of day, always in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Hour(u8);

impl Hour {
    pub fn new(hour: u32) -> Result<Self, HourOutOfRange> {
        u8::try_from(hour)
            .ok()
            .filter(|h| *h < 24)
            .map(Self)
            .ok_or(HourOutOfRange(hour))
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// The hour following this one, wrapping at midnight (23 -> 0).
    pub fn next(self) -> Self {
        Self((self.0 + 1) % 24)
    }
}

/// Victim category for the street ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, Serialize)]
pub enum VictimCategory {
    #[default]
    Pedestrians,
    Cyclists,
    Motorists,
}

impl VictimCategory {
    /// Injury-count column backing this category.
    pub fn column(self) -> &'static str {
        match self {
            VictimCategory::Pedestrians => columns::PEDESTRIANS_INJURED,
            VictimCategory::Cyclists => columns::CYCLISTS_INJURED,
            VictimCategory::Motorists => columns::MOTORISTS_INJURED,
        }
    }
}

/// Narrow projection consumed by point and density overlays.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Viewport anchor for a map overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Centroid {
    pub latitude: f64,
    pub longitude: f64,
}

impl Centroid {
    /// Mean position of `points`, or `None` for an empty set.
    pub fn of_points(points: &[GeoPoint]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (lat_sum, lon_sum) = points
            .iter()
            .fold((0.0, 0.0), |(la, lo), p| (la + p.latitude, lo + p.longitude));
        Some(Self {
            latitude: lat_sum / n,
            longitude: lon_sum / n,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MinuteBin {
    pub minute: u32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreetRanking {
    pub street_name: String,
    pub injured_count: i64,
}

/// One row of the raw data table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub latitude: f64,
    pub longitude: f64,
    pub persons_injured: Option<i64>,
    pub street_name: Option<String>,
}

/// Parse an accident time such as `"0:15"`, `"14:05"` or `"14:05:30"`.
pub fn parse_accident_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

/// Parse an accident date in `MM/DD/YYYY` or ISO form.
pub fn parse_accident_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // Some exports append a midnight timestamp to the date.
    let s = s.split(['T', ' ']).next().unwrap_or(s);
    NaiveDate::parse_from_str(s, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use strum::IntoEnumIterator;

    #[test]
    fn hour_accepts_day_range() {
        assert_eq!(Hour::new(0).unwrap().get(), 0);
        assert_eq!(Hour::new(23).unwrap().get(), 23);
    }

    #[test]
    fn hour_rejects_out_of_range() {
        assert_eq!(Hour::new(24), Err(HourOutOfRange(24)));
        assert_eq!(Hour::new(25), Err(HourOutOfRange(25)));
        assert_eq!(Hour::new(300), Err(HourOutOfRange(300)));
    }

    #[test]
    fn next_hour_wraps_at_midnight() {
        assert_eq!(Hour::new(23).unwrap().next(), Hour::new(0).unwrap());
        assert_eq!(Hour::new(9).unwrap().next().get(), 10);
    }

    #[test]
    fn categories_map_to_distinct_columns() {
        let cols: Vec<&str> = VictimCategory::iter().map(VictimCategory::column).collect();
        assert_eq!(
            cols,
            vec![
                columns::PEDESTRIANS_INJURED,
                columns::CYCLISTS_INJURED,
                columns::MOTORISTS_INJURED,
            ]
        );
        assert_eq!(VictimCategory::Cyclists.to_string(), "Cyclists");
    }

    #[test]
    fn parses_short_and_long_times() {
        let t = parse_accident_time("0:15").unwrap();
        assert_eq!((t.hour(), t.minute()), (0, 15));
        let t = parse_accident_time("14:05:30").unwrap();
        assert_eq!((t.hour(), t.minute()), (14, 5));
        assert!(parse_accident_time("noon").is_none());
        assert!(parse_accident_time("").is_none());
    }

    #[test]
    fn parses_us_and_iso_dates() {
        let expected = NaiveDate::from_ymd_opt(2019, 1, 5).unwrap();
        assert_eq!(parse_accident_date("01/05/2019"), Some(expected));
        assert_eq!(parse_accident_date("2019-01-05"), Some(expected));
        assert_eq!(parse_accident_date("2019-01-05T00:00:00.000"), Some(expected));
        assert!(parse_accident_date("yesterday").is_none());
    }

    #[test]
    fn centroid_of_empty_set_is_none() {
        assert!(Centroid::of_points(&[]).is_none());
    }

    #[test]
    fn centroid_is_mean_position() {
        let points = vec![
            GeoPoint {
                date: None,
                time: None,
                latitude: 40.0,
                longitude: -74.0,
            },
            GeoPoint {
                date: None,
                time: None,
                latitude: 41.0,
                longitude: -73.0,
            },
        ];
        let c = Centroid::of_points(&points).unwrap();
        assert!((c.latitude - 40.5).abs() < 1e-12);
        assert!((c.longitude - -73.5).abs() < 1e-12);
    }
}
