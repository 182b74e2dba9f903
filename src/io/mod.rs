//! Input/output helpers.
//!
//! - series CSV read/write (`series`)
//! - ringdown window selection (`window`)
//! - result record JSON (`record`)
//! - batch summary CSV (`summary`)
//! - point-fit export (`export`)

pub mod export;
pub mod record;
pub mod series;
pub mod summary;
pub mod window;

pub use export::*;
pub use record::*;
pub use series::*;
pub use summary::*;
pub use window::*;
