//! TTL cache mapping menu text to a prior extraction result

use crate::menu::models::AnalysisResult;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info};

/// Default time-to-live for a cached analysis: 24 hours
pub const DEFAULT_TTL_SECS: u64 = 24 * 60 * 60;

/// A cached analysis with its validity window
#[derive(Debug, Clone)]
struct CacheEntry {
    analysis: AnalysisResult,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// Analysis cache keyed by exact menu text
///
/// Expired entries are purged lazily on `get` (under the same lock as the
/// lookup, so concurrent gets never observe a half-removed entry) and in
/// bulk by the periodic sweeper.
pub struct AnalysisCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: ChronoDuration,
}

impl AnalysisCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::seconds(
                DEFAULT_TTL_SECS as i64,
            )),
        }
    }

    /// Look up a cached analysis by exact menu text
    ///
    /// An expired entry is deleted as a side effect and treated as a miss.
    pub fn get(&self, menu_text: &str) -> Option<AnalysisResult> {
        let mut entries = self.entries.lock().unwrap();

        match entries.get(menu_text) {
            Some(entry) if Utc::now() < entry.expires_at => {
                debug!(key = %fingerprint(menu_text), "analysis cache hit");
                Some(entry.analysis.clone())
            }
            Some(_) => {
                entries.remove(menu_text);
                debug!(key = %fingerprint(menu_text), "expired analysis purged");
                None
            }
            None => None,
        }
    }

    /// Store an analysis with expiry at now + TTL
    pub fn put(&self, menu_text: &str, analysis: AnalysisResult) {
        let now = Utc::now();
        let entry = CacheEntry {
            analysis,
            created_at: now,
            expires_at: now + self.ttl,
        };

        let mut entries = self.entries.lock().unwrap();
        entries.insert(menu_text.to_string(), entry);
        debug!(key = %fingerprint(menu_text), "analysis cached");
    }

    /// Creation timestamp of a valid entry, if present
    pub fn created_at(&self, menu_text: &str) -> Option<DateTime<Utc>> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(menu_text)
            .filter(|entry| Utc::now() < entry.expires_at)
            .map(|entry| entry.created_at)
    }

    /// Delete every entry whose expiry has passed
    pub fn clear_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        before - entries.len()
    }

    pub fn stats(&self) -> CacheStats {
        let now = Utc::now();
        let entries = self.entries.lock().unwrap();
        let valid = entries.values().filter(|e| now < e.expires_at).count();
        CacheStats {
            total_entries: entries.len(),
            valid_entries: valid,
            expired_entries: entries.len() - valid,
        }
    }
}

/// Run `clear_expired` at a fixed interval until the shutdown signal fires
///
/// Owned by the process: main creates the watch channel and flips it during
/// graceful shutdown.
pub async fn run_sweeper(
    cache: std::sync::Arc<AnalysisCache>,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // The first tick fires immediately; skip it so startup stays quiet
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let purged = cache.clear_expired();
                if purged > 0 {
                    info!(purged, "cache sweep removed expired analyses");
                }
            }
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    info!("cache sweeper shutting down");
                    return;
                }
            }
        }
    }
}

/// Short sha256 fingerprint of menu text, safe for log lines
pub fn fingerprint(menu_text: &str) -> String {
    let digest = Sha256::digest(menu_text.as_bytes());
    let hex = format!("{:x}", digest);
    hex[..16].to_string()
}
