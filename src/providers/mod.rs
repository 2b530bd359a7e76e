//! Providers Module - Collaborator Boundaries
//!
//! Read access to the page document and the transport to the renderer.

pub mod document;
pub mod relay;

pub use document::*;
pub use relay::*;
