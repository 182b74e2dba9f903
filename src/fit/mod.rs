//! Inference over ringdown models.
//!
//! Responsibilities:
//!
//! - map unit-cube samples to bounded parameter vectors (`prior`)
//! - score parameter vectors against one observed series (`likelihood`)
//! - integrate the evidence by nested sampling (`nested`)
//! - find a bounded best-fit point (`fitter`)
//! - turn two evidences into a decision (`bayes`)

pub mod bayes;
pub mod fitter;
pub mod likelihood;
pub mod nested;
pub mod prior;

pub use bayes::*;
pub use fitter::*;
pub use likelihood::*;
pub use nested::*;
pub use prior::*;
