//! CSV Data Loader Module
//! Reads the collision CSV with Polars, normalizes column names and drops
//! rows without usable coordinates. Results are memoized per row limit.

use super::record::columns;
use polars::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Data source not found: {0}")]
    SourceMissing(PathBuf),
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Required column '{0}' is missing")]
    MissingColumn(&'static str),
}

/// Immutable collision table. Every row has a non-null, non-zero latitude
/// and longitude.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    rows_read: usize,
}

impl Dataset {
    /// Build a dataset from an already-read frame, applying the same
    /// normalization as [`DatasetLoader::read`].
    pub fn from_frame(mut df: DataFrame) -> Result<Self, LoaderError> {
        let rows_read = df.height();

        let lowercase: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_lowercase())
            .collect();
        df.set_column_names(lowercase)?;

        for required in [columns::LATITUDE, columns::LONGITUDE] {
            if df.get_column_index(required).is_none() {
                return Err(LoaderError::MissingColumn(required));
            }
        }

        // Non-strict casts turn malformed coordinates into nulls, which the
        // filter then drops along with the zero sentinel.
        let df = df
            .lazy()
            .with_columns([
                col(columns::LATITUDE).cast(DataType::Float64),
                col(columns::LONGITUDE).cast(DataType::Float64),
            ])
            .filter(
                col(columns::LATITUDE)
                    .is_not_null()
                    .and(col(columns::LONGITUDE).is_not_null())
                    .and(col(columns::LATITUDE).neq(lit(0.0)))
                    .and(col(columns::LONGITUDE).neq(lit(0.0))),
            )
            .collect()?;

        Ok(Self { df, rows_read })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Number of rows kept after coordinate filtering.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of rows read from the source before filtering.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_index(name).is_some()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Loads the collision CSV at a fixed path, caching one [`Dataset`] per
/// distinct row limit.
pub struct DatasetLoader {
    source: PathBuf,
    cache: HashMap<usize, Arc<Dataset>>,
}

impl DatasetLoader {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            cache: HashMap::new(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Return the dataset for `row_limit`, reading the source on first use.
    pub fn load(&mut self, row_limit: usize) -> Result<Arc<Dataset>, LoaderError> {
        if let Some(dataset) = self.cached(row_limit) {
            return Ok(dataset);
        }
        let dataset = Self::read(&self.source, row_limit)?;
        Ok(self.insert(row_limit, dataset))
    }

    pub fn cached(&self, row_limit: usize) -> Option<Arc<Dataset>> {
        let hit = self.cache.get(&row_limit).cloned();
        if hit.is_some() {
            log::debug!("Dataset cache hit for row limit {}", row_limit);
        }
        hit
    }

    /// Store a dataset read elsewhere (e.g. on a loader thread). An existing
    /// entry wins so callers always observe the first load.
    pub fn insert(&mut self, row_limit: usize, dataset: Dataset) -> Arc<Dataset> {
        self.cache
            .entry(row_limit)
            .or_insert_with(|| Arc::new(dataset))
            .clone()
    }

    /// Read at most `row_limit` rows from `path` without touching any cache.
    pub fn read(path: &Path, row_limit: usize) -> Result<Dataset, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::SourceMissing(path.to_path_buf()));
        }

        log::info!(
            "Reading up to {} rows from {}",
            row_limit,
            path.display()
        );

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_n_rows(Some(row_limit))
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        let dataset = Dataset::from_frame(df)?;

        log::info!(
            "Loaded {} of {} rows with valid coordinates",
            dataset.height(),
            dataset.rows_read()
        );
        log::debug!("Columns: {:?}", dataset.column_names());

        Ok(dataset)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn drops_zero_and_missing_coordinates() {
        let file = collision_csv(&[
            "01/05/2019,14:05,40.7,-74.0,2,2,0,0,Main St",
            "01/05/2019,14:10,0,0,1,1,0,0,Zero Ave",
            "01/05/2019,14:15,,,1,0,1,0,Blank Rd",
            "01/05/2019,14:20,40.8,-73.9,0,0,0,0,Broadway",
        ]);
        let dataset = DatasetLoader::read(file.path(), 10).unwrap();

        assert_eq!(dataset.rows_read(), 4);
        assert_eq!(dataset.height(), 2);

        let lat = dataset.frame().column(columns::LATITUDE).unwrap().f64().unwrap();
        let lon = dataset.frame().column(columns::LONGITUDE).unwrap().f64().unwrap();
        for (la, lo) in lat.into_iter().zip(lon.into_iter()) {
            let (la, lo) = (la.unwrap(), lo.unwrap());
            assert!(la != 0.0 && lo != 0.0);
        }
    }

    #[test]
    fn unparseable_coordinates_are_dropped() {
        let file = collision_csv(&[
            "01/05/2019,14:05,40.7,-74.0,2,2,0,0,Main St",
            "01/05/2019,14:10,north,-74.0,1,1,0,0,Bad Lat",
        ]);
        let dataset = DatasetLoader::read(file.path(), 10).unwrap();
        assert_eq!(dataset.height(), 1);
    }

    #[test]
    fn lowercases_column_names() {
        let file = collision_csv(&["01/05/2019,14:05,40.7,-74.0,2,2,0,0,Main St"]);
        let dataset = DatasetLoader::read(file.path(), 10).unwrap();

        for name in dataset.column_names() {
            assert_eq!(name, name.to_lowercase());
        }
        assert!(dataset.has_column(columns::PERSONS_INJURED));
        assert!(dataset.has_column(columns::ON_STREET_NAME));
    }

    #[test]
    fn respects_row_limit_in_source_order() {
        let file = collision_csv(&[
            "01/05/2019,14:05,40.7,-74.0,2,2,0,0,Main St",
            "01/05/2019,14:10,40.8,-74.0,1,1,0,0,Second St",
            "01/05/2019,14:15,40.9,-74.0,1,0,1,0,Third St",
        ]);
        let dataset = DatasetLoader::read(file.path(), 2).unwrap();
        assert_eq!(dataset.rows_read(), 2);

        let lat = dataset.frame().column(columns::LATITUDE).unwrap().f64().unwrap();
        let lats: Vec<f64> = lat.into_iter().flatten().collect();
        assert_eq!(lats, vec![40.7, 40.8]);
    }

    #[test]
    fn memoizes_per_row_limit() {
        let file = collision_csv(&[
            "01/05/2019,14:05,40.7,-74.0,2,2,0,0,Main St",
            "01/05/2019,14:10,40.8,-74.0,1,1,0,0,Second St",
        ]);
        let mut loader = DatasetLoader::new(file.path());

        let first = loader.load(10).unwrap();
        let second = loader.load(10).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let smaller = loader.load(1).unwrap();
        assert!(!Arc::ptr_eq(&first, &smaller));
        assert_eq!(smaller.height(), 1);
    }

    #[test]
    fn repeated_reads_are_identical() {
        let file = collision_csv(&[
            "01/05/2019,14:05,40.7,-74.0,2,2,0,0,Main St",
            "01/05/2019,14:10,0,0,1,1,0,0,Zero Ave",
        ]);
        let a = DatasetLoader::read(file.path(), 10).unwrap();
        let b = DatasetLoader::read(file.path(), 10).unwrap();
        assert!(a.frame().equals_missing(b.frame()));
    }

    #[test]
    fn missing_source_is_an_error() {
        let err = DatasetLoader::read(Path::new("/nonexistent/collisions.csv"), 10).unwrap_err();
        assert!(matches!(err, LoaderError::SourceMissing(_)));
    }

    #[test]
    fn missing_coordinate_column_is_an_error() {
        let file = csv_with_header("ACCIDENT TIME,LATITUDE", &["14:05,40.7"]);
        let err = DatasetLoader::read(file.path(), 10).unwrap_err();
        assert!(matches!(err, LoaderError::MissingColumn(columns::LONGITUDE)));
    }

    #[test]
    fn optional_columns_may_be_absent() {
        let file = csv_with_header("Latitude,Longitude", &["40.7,-74.0"]);
        let dataset = DatasetLoader::read(file.path(), 10).unwrap();
        assert_eq!(dataset.height(), 1);
        assert!(!dataset.has_column(columns::ACCIDENT_TIME));
    }
}
