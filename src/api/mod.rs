//! Page Sentry Relay API Module
//! REST surface of the renderer side: prediction exchange and page classification

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod types;

pub use middleware::start_cleanup_task;
pub use routes::create_router;
pub use types::*;
