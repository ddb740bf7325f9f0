//! Collision Query Module
//! Derives the dashboard views from an immutable [`Dataset`]. Every view is
//! computed independently from the base table; none feeds into another
//! except the minute histogram, which takes the hour view's points.

use super::loader::Dataset;
use super::record::{
    columns, parse_accident_date, parse_accident_time, Centroid, GeoPoint, Hour, MinuteBin,
    RawRow, StreetRanking, VictimCategory,
};
use chrono::{NaiveDate, NaiveTime, Timelike};
use polars::prelude::*;
use thiserror::Error;

/// Number of entries in the street ranking.
pub const TOP_STREETS: usize = 5;

/// Bins in the per-minute histogram.
pub const MINUTES_PER_HOUR: usize = 60;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column '{0}' is not available in this dataset")]
    ColumnUnavailable(&'static str),
}

/// Points at or above an injury threshold, anchored on the full dataset.
#[derive(Debug, Clone, serde::Serialize)]
pub struct InjuryView {
    pub min_injured: u32,
    pub points: Vec<GeoPoint>,
    /// Mean position of the whole dataset, so the map does not move as the
    /// threshold changes.
    pub centroid: Option<Centroid>,
}

/// Points in one hour of the day, anchored on those points.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HourView {
    pub hour: Hour,
    pub points: Vec<GeoPoint>,
    /// `None` when no collision falls in the hour.
    pub centroid: Option<Centroid>,
}

/// Stateless query functions over a [`Dataset`].
pub struct CollisionQueries;

impl CollisionQueries {
    /// Collisions with at least `min_injured` persons injured. Rows with a
    /// missing count never match.
    pub fn filter_by_injuries(
        dataset: &Dataset,
        min_injured: u32,
    ) -> Result<InjuryView, QueryError> {
        Self::require(dataset, columns::PERSONS_INJURED)?;

        let filtered = dataset
            .frame()
            .clone()
            .lazy()
            .filter(
                col(columns::PERSONS_INJURED)
                    .cast(DataType::Int64)
                    .gt_eq(lit(i64::from(min_injured))),
            )
            .collect()?;

        Ok(InjuryView {
            min_injured,
            points: Self::project_points(&filtered)?,
            centroid: Self::dataset_centroid(dataset)?,
        })
    }

    /// Collisions whose accident time falls in `hour`.
    pub fn filter_by_hour(dataset: &Dataset, hour: Hour) -> Result<HourView, QueryError> {
        let filtered = Self::hour_frame(dataset, hour)?;
        let points = Self::project_points(&filtered)?;
        let centroid = Centroid::of_points(&points);

        Ok(HourView {
            hour,
            points,
            centroid,
        })
    }

    /// Per-minute counts for points in `hour`, always 60 dense bins.
    ///
    /// Points are re-tested with `hour <= h < hour + 1` rather than trusting
    /// the caller's filter.
    pub fn histogram_by_minute(points: &[GeoPoint], hour: Hour) -> Vec<MinuteBin> {
        let lower = hour.get();
        let upper = lower + 1;
        let mut counts = [0usize; MINUTES_PER_HOUR];

        for time in points.iter().filter_map(|p| p.time) {
            if lower <= time.hour() && time.hour() < upper {
                counts[time.minute() as usize] += 1;
            }
        }

        counts
            .iter()
            .enumerate()
            .map(|(minute, &count)| MinuteBin {
                minute: minute as u32,
                count,
            })
            .collect()
    }

    /// Streets with the most injured victims of `category`, highest first.
    /// Always ranks the full dataset.
    pub fn top_streets(
        dataset: &Dataset,
        category: VictimCategory,
    ) -> Result<Vec<StreetRanking>, QueryError> {
        let count_col = category.column();
        Self::require(dataset, count_col)?;
        Self::require(dataset, columns::ON_STREET_NAME)?;

        let ranked = dataset
            .frame()
            .clone()
            .lazy()
            .select([
                col(columns::ON_STREET_NAME).cast(DataType::String),
                col(count_col).cast(DataType::Int64),
            ])
            .filter(
                col(count_col)
                    .gt_eq(lit(1i64))
                    .and(col(columns::ON_STREET_NAME).is_not_null()),
            )
            .sort(
                [count_col],
                SortMultipleOptions::default()
                    .with_order_descending(true)
                    .with_maintain_order(true),
            )
            .limit(TOP_STREETS as IdxSize)
            .collect()?;

        let streets = ranked.column(columns::ON_STREET_NAME)?;
        let streets = streets.as_materialized_series().str()?;
        let counts = ranked.column(count_col)?.i64()?;

        Ok(streets
            .into_iter()
            .zip(counts.into_iter())
            .filter_map(|(street, count)| {
                Some(StreetRanking {
                    street_name: street?.trim().to_string(),
                    injured_count: count?,
                })
            })
            .collect())
    }

    /// First `limit` rows of the hour view as display rows.
    pub fn raw_rows(
        dataset: &Dataset,
        hour: Hour,
        limit: usize,
    ) -> Result<Vec<RawRow>, QueryError> {
        let filtered = Self::hour_frame(dataset, hour)?.head(Some(limit));

        let points = Self::project_points(&filtered)?;
        let injured = Self::optional_i64(&filtered, columns::PERSONS_INJURED)?;
        let streets = Self::optional_strings(&filtered, columns::ON_STREET_NAME)?;

        Ok(points
            .into_iter()
            .enumerate()
            .map(|(i, p)| RawRow {
                date: p.date,
                time: p.time,
                latitude: p.latitude,
                longitude: p.longitude,
                persons_injured: injured.as_ref().and_then(|v| v[i]),
                street_name: streets.as_ref().and_then(|v| v[i].clone()),
            })
            .collect())
    }

    /// Mean latitude and longitude of the whole dataset.
    pub fn dataset_centroid(dataset: &Dataset) -> Result<Option<Centroid>, QueryError> {
        let df = dataset.frame();
        let latitude = df.column(columns::LATITUDE)?.f64()?.mean();
        let longitude = df.column(columns::LONGITUDE)?.f64()?.mean();

        Ok(latitude
            .zip(longitude)
            .map(|(latitude, longitude)| Centroid {
                latitude,
                longitude,
            }))
    }

    /// Rows whose parsed accident time has exactly the given hour.
    fn hour_frame(dataset: &Dataset, hour: Hour) -> Result<DataFrame, QueryError> {
        Self::require(dataset, columns::ACCIDENT_TIME)?;

        let df = dataset.frame();
        let times = Self::optional_times(df)?.unwrap_or_default();
        let mask: Vec<bool> = times
            .iter()
            .map(|t| t.is_some_and(|t| t.hour() == hour.get()))
            .collect();
        let mask = BooleanChunked::from_slice("hour_mask".into(), &mask);

        Ok(df.filter(&mask)?)
    }

    fn require(dataset: &Dataset, column: &'static str) -> Result<(), QueryError> {
        if dataset.has_column(column) {
            Ok(())
        } else {
            Err(QueryError::ColumnUnavailable(column))
        }
    }

    /// Project a frame to [`GeoPoint`]s. Date and time are optional columns.
    fn project_points(df: &DataFrame) -> Result<Vec<GeoPoint>, QueryError> {
        let lat = df.column(columns::LATITUDE)?.f64()?;
        let lon = df.column(columns::LONGITUDE)?.f64()?;
        let dates = Self::optional_dates(df)?;
        let times = Self::optional_times(df)?;

        Ok(lat
            .into_iter()
            .zip(lon.into_iter())
            .enumerate()
            .filter_map(|(i, (la, lo))| {
                Some(GeoPoint {
                    date: dates.as_ref().and_then(|d| d[i]),
                    time: times.as_ref().and_then(|t| t[i]),
                    latitude: la?,
                    longitude: lo?,
                })
            })
            .collect())
    }

    fn optional_strings(
        df: &DataFrame,
        name: &str,
    ) -> Result<Option<Vec<Option<String>>>, QueryError> {
        let Some(idx) = df.get_column_index(name) else {
            return Ok(None);
        };
        let as_str = df.get_columns()[idx].cast(&DataType::String)?;
        let ca = as_str.as_materialized_series().str()?;
        Ok(Some(
            ca.into_iter()
                .map(|v| v.map(|s| s.trim().to_string()))
                .collect(),
        ))
    }

    fn optional_i64(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<i64>>>, QueryError> {
        let Some(idx) = df.get_column_index(name) else {
            return Ok(None);
        };
        let as_int = df.get_columns()[idx].cast(&DataType::Int64)?;
        Ok(Some(as_int.i64()?.into_iter().collect()))
    }

    fn optional_times(df: &DataFrame) -> Result<Option<Vec<Option<NaiveTime>>>, QueryError> {
        Ok(Self::optional_strings(df, columns::ACCIDENT_TIME)?.map(|values| {
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_accident_time))
                .collect()
        }))
    }

    fn optional_dates(df: &DataFrame) -> Result<Option<Vec<Option<NaiveDate>>>, QueryError> {
        Ok(Self::optional_strings(df, columns::ACCIDENT_DATE)?.map(|values| {
            values
                .iter()
                .map(|v| v.as_deref().and_then(parse_accident_date))
                .collect()
        }))
    }
}
