//! tapmatch: menu scanning and drink recommendation service
//!
//! Users scan or photograph drink menus; an external AI vision/text service
//! extracts structured drink listings (with a keyword fallback when the
//! upstream is unavailable), and a multi-factor scorer ranks the candidates
//! against the user's stored preference profile.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod extraction;
pub mod menu;
pub mod metrics;
pub mod store;

pub use config::AppConfig;
pub use error::{AnalysisError, Result};
