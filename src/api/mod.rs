//! HTTP boundary for menu analysis

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use models::{AnalyzeMenuRequest, ApiError};
pub use routes::build_router;
