//! Persistence collaborator interface
//!
//! The service issues point lookups by exact field match and writes through
//! this trait; the backing technology is a deployment concern. The bundled
//! in-memory implementation backs tests and local runs.

pub mod memory;

use crate::error::Result;
use crate::menu::models::{AnalysisResult, AnalyticsEvent, Location, LocationInfo, Menu, Profile};
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::InMemoryStore;

/// Record store for profiles, locations, menus, and analytics events
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Point lookup of a user's preference profile
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Create or replace a user's profile
    async fn put_profile(&self, profile: Profile) -> Result<()>;

    /// Look up a location by exact (name, type); create it when absent
    ///
    /// Idempotent: calling twice with the same identity returns the same
    /// location record.
    async fn resolve_location(&self, info: &LocationInfo) -> Result<Location>;

    /// The single active menu for a location, if any
    async fn find_active_menu(&self, location_id: Uuid) -> Result<Option<Menu>>;

    /// Write a fresh snapshot as the active menu for a location
    ///
    /// Atomic upsert: any currently active menu is deactivated (its
    /// validity window closed) and the new one inserted active, so exactly
    /// one active menu exists per location after every call.
    async fn replace_active_menu(&self, location_id: Uuid, analysis: AnalysisResult)
        -> Result<Menu>;

    /// Fire-and-forget analytics record
    async fn record_event(&self, event: AnalyticsEvent) -> Result<()>;
}
