//! In-memory store implementation

use super::MenuStore;
use crate::error::Result;
use crate::menu::models::{AnalysisResult, AnalyticsEvent, Location, LocationInfo, Menu, Profile};
use crate::metrics::METRICS;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Default)]
struct StoreInner {
    profiles: HashMap<Uuid, Profile>,
    locations: Vec<Location>,
    menus: Vec<Menu>,
    events: Vec<AnalyticsEvent>,
}

/// In-memory record store
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<StoreInner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded analytics events (test support)
    pub async fn event_count(&self) -> usize {
        self.inner.read().await.events.len()
    }

    /// All menus for a location, active and retired (test support)
    pub async fn menus_for_location(&self, location_id: Uuid) -> Vec<Menu> {
        self.inner
            .read()
            .await
            .menus
            .iter()
            .filter(|m| m.location_id == location_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MenuStore for InMemoryStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let inner = self.inner.read().await;
        Ok(inner.profiles.get(&user_id).cloned())
    }

    async fn put_profile(&self, profile: Profile) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.profiles.insert(profile.user_id, profile);
        Ok(())
    }

    async fn resolve_location(&self, info: &LocationInfo) -> Result<Location> {
        let mut inner = self.inner.write().await;

        if let Some(existing) = inner
            .locations
            .iter()
            .find(|l| l.name == info.name && l.location_type == info.location_type)
        {
            debug!(location = %existing.name, "resolved existing location");
            return Ok(existing.clone());
        }

        let location = Location {
            id: Uuid::new_v4(),
            name: info.name.clone(),
            location_type: info.location_type,
            address: info.address.clone(),
            city: info.city.clone(),
            state: info.state.clone(),
            created_at: Utc::now(),
        };
        info!(location = %location.name, "created location");
        inner.locations.push(location.clone());
        Ok(location)
    }

    async fn find_active_menu(&self, location_id: Uuid) -> Result<Option<Menu>> {
        let inner = self.inner.read().await;
        Ok(inner
            .menus
            .iter()
            .find(|m| m.location_id == location_id && m.is_active)
            .cloned())
    }

    async fn replace_active_menu(
        &self,
        location_id: Uuid,
        analysis: AnalysisResult,
    ) -> Result<Menu> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        // Deactivate and insert under the same write lock
        for menu in inner
            .menus
            .iter_mut()
            .filter(|m| m.location_id == location_id && m.is_active)
        {
            menu.is_active = false;
            menu.valid_to = Some(now);
        }

        let menu = Menu {
            id: Uuid::new_v4(),
            location_id,
            analysis,
            is_active: true,
            valid_from: now,
            valid_to: None,
        };
        inner.menus.push(menu.clone());
        METRICS.menu_snapshots.inc();
        info!(%location_id, menu_id = %menu.id, "active menu replaced");
        Ok(menu)
    }

    async fn record_event(&self, event: AnalyticsEvent) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.events.push(event);
        METRICS.analytics_events.inc();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::models::{Drink, DrinkType, LocationType};

    fn taproom(name: &str) -> LocationInfo {
        LocationInfo {
            name: name.to_string(),
            location_type: LocationType::Taproom,
            address: None,
            city: None,
            state: None,
        }
    }

    #[tokio::test]
    async fn test_resolve_location_is_idempotent() {
        let store = InMemoryStore::new();

        let first = store.resolve_location(&taproom("Hop House")).await.unwrap();
        let second = store.resolve_location(&taproom("Hop House")).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_same_name_different_type_is_distinct() {
        let store = InMemoryStore::new();

        let taproom_loc = store.resolve_location(&taproom("Corner")).await.unwrap();
        let bar = LocationInfo {
            location_type: LocationType::Bar,
            ..taproom("Corner")
        };
        let bar_loc = store.resolve_location(&bar).await.unwrap();
        assert_ne!(taproom_loc.id, bar_loc.id);
    }

    #[tokio::test]
    async fn test_exactly_one_active_menu_after_replace() {
        let store = InMemoryStore::new();
        let location = store.resolve_location(&taproom("Hop House")).await.unwrap();

        let first_snapshot =
            AnalysisResult::from_drinks(vec![Drink::candidate("Old IPA", DrinkType::Beer)]);
        let second_snapshot =
            AnalysisResult::from_drinks(vec![Drink::candidate("New IPA", DrinkType::Beer)]);

        store
            .replace_active_menu(location.id, first_snapshot)
            .await
            .unwrap();
        store
            .replace_active_menu(location.id, second_snapshot)
            .await
            .unwrap();

        let menus = store.menus_for_location(location.id).await;
        assert_eq!(menus.len(), 2);

        let active: Vec<_> = menus.iter().filter(|m| m.is_active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].analysis.drinks[0].name, "New IPA");

        // The retired menu has a closed validity window
        let retired = menus.iter().find(|m| !m.is_active).unwrap();
        assert!(retired.valid_to.is_some());
    }

    #[tokio::test]
    async fn test_find_active_menu_none_initially() {
        let store = InMemoryStore::new();
        let location = store.resolve_location(&taproom("Quiet Bar")).await.unwrap();
        assert!(store.find_active_menu(location.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();

        assert!(store.get_profile(user_id).await.unwrap().is_none());

        let mut profile = Profile::new(user_id);
        profile.budget = Some(12.0);
        store.put_profile(profile).await.unwrap();

        let loaded = store.get_profile(user_id).await.unwrap().unwrap();
        assert_eq!(loaded.budget, Some(12.0));
    }

    #[tokio::test]
    async fn test_record_event() {
        let store = InMemoryStore::new();
        let event = AnalyticsEvent::new(Uuid::new_v4(), "menu", "analyze");
        store.record_event(event).await.unwrap();
        assert_eq!(store.event_count().await, 1);
    }
}
