//! Core Module - Classification Engine
//!
//! Feature extraction, weighted scoring, the safe-domain short-circuit and
//! the per-page session that ties them to the renderer.

pub mod classifier;
pub mod features;
pub mod modal;
pub mod readiness;
pub mod risk_score;
pub mod session;
pub mod whitelist;

pub use classifier::*;
pub use features::*;
pub use modal::*;
pub use readiness::*;
pub use risk_score::*;
pub use session::*;
pub use whitelist::*;
