//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - physical inputs (`Mode`, `RemnantState`) and derived mode parameters
//! - template parameters (`ModeParams`, `TemplateParams`)
//! - evidence outputs (`EvidenceResult`, `ComparisonRecord`)
//! - the run configuration (`AnalysisConfig` and its parts)

pub mod types;

pub use types::*;
