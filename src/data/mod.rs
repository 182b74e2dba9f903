//! Observed-series acquisition.
//!
//! All sources implement [`SeriesSource`]; the pipeline never knows which one
//! it is talking to. The source is chosen from CLI flags.
//!
//! - `csv_dir`: pre-whitened series exported by an external preprocessing step
//! - `synthetic`: baseline-mode injections in seeded Gaussian noise
//! - `catalog`: the fixed event list used by `batch`

pub mod catalog;
pub mod csv_dir;
pub mod synthetic;

pub use catalog::*;
pub use csv_dir::*;
pub use synthetic::*;

use crate::domain::ObservedSeries;
use crate::error::AppError;

/// Loads the observed series of one (event, detector) pair.
///
/// Missing or malformed data is reported as `AppError::DataUnavailable`.
pub trait SeriesSource: Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    fn load(&self, event: &str, detector: &str) -> Result<ObservedSeries, AppError>;
}
