//! Mathematical utilities: onset taper, least squares, log-space sums, spectra.

pub mod logspace;
pub mod ols;
pub mod spectral;
pub mod taper;

pub use logspace::*;
pub use ols::*;
pub use spectral::*;
pub use taper::*;
