//! Ringdown model implementations.
//!
//! Models are implemented as small, pure functions and immutable structs so
//! that sampling/fitting code can stay generic:
//!
//! - `spectrum`: fitted (frequency, decay time) per mode and remnant
//! - `template`: damped-sinusoid templates with a smooth onset
//! - `deviation`: fractional shifts of the fitted spectrum
//! - `params`: named parameter vectors
//! - `variant`: baseline / extended waveform families

pub mod deviation;
pub mod params;
pub mod spectrum;
pub mod template;
pub mod variant;

pub use params::*;
pub use spectrum::{frequency_and_decay, frequency_and_decay_checked};
pub use template::{time_axis, TemplateBuilder};
pub use variant::*;
