//! Models Module - Data Structures & Configuration
//!
//! Single source of truth for verdicts, feature vectors, errors and config.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
