//! Menu matching and scoring engine
//!
//! The core pipeline: candidate extraction (AI upstream or keyword
//! fallback), multi-factor scoring against a preference profile, and
//! threshold bucketing into matches and suggestions.

pub mod extract;
pub mod models;
pub mod rank;
pub mod score;
pub mod service;

pub use extract::extract_drinks;
pub use models::{
    AnalysisResult, AnalyticsEvent, Drink, DrinkType, Location, LocationInfo, LocationType, Menu,
    MenuMatches, Profile, ScoredDrink,
};
pub use rank::{rank, RankThresholds};
pub use score::{match_score, ScoringContext};
pub use service::{MenuAnalysis, MenuAnalysisService};
