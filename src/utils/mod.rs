//! Utils Module - Constants & URL Helpers

pub mod constants;
pub mod url_parts;

pub use constants::*;
pub use url_parts::*;
