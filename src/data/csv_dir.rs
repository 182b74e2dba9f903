//! Series stored as `<dir>/<event>_<detector>.csv`.

use std::path::{Path, PathBuf};

use crate::data::SeriesSource;
use crate::domain::ObservedSeries;
use crate::error::AppError;
use crate::io::read_series_csv;

#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, event: &str, detector: &str) -> PathBuf {
        self.dir.join(format!("{event}_{detector}.csv"))
    }
}

impl SeriesSource for CsvDirSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self, event: &str, detector: &str) -> Result<ObservedSeries, AppError> {
        let path = self.path_for(event, detector);
        if !path.is_file() {
            return Err(AppError::data_unavailable(format!(
                "no series for {event}/{detector} at '{}'",
                path.display()
            )));
        }
        read_series_csv(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::write_series_csv;

    #[test]
    fn loads_by_event_and_detector() {
        let dir = tempfile::tempdir().unwrap();
        let t: Vec<f64> = (0..16).map(|i| i as f64 / 1024.0).collect();
        let h: Vec<f64> = (0..16).map(|i| (i as f64).sin()).collect();
        let series = ObservedSeries::new(t, h).unwrap();

        let source = CsvDirSource::new(dir.path());
        write_series_csv(&source.path_for("GW150914", "H1"), &series).unwrap();

        let loaded = source.load("GW150914", "H1").unwrap();
        assert_eq!(loaded.len(), 16);

        let err = source.load("GW150914", "L1").unwrap_err();
        assert!(matches!(err, AppError::DataUnavailable(_)));
    }
}
