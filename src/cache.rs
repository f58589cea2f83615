//! In-memory caching using moka
//!
//! Rooms are cached for the room detail endpoint with a short TTL and
//! invalidated on edit. Quotes and bookings always read the database, so a
//! stale entry can never be charged. Reservations and daily rates are never
//! cached.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::models::Room;

/// Application cache holding room rows
#[derive(Clone)]
pub struct AppCache {
    /// Rooms (id -> Room)
    pub rooms: Cache<Uuid, Arc<Room>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Rooms: 200 entries, 10 min TTL, 5 min idle
            rooms: Cache::builder()
                .max_capacity(200)
                .time_to_live(Duration::from_secs(10 * 60))
                .time_to_idle(Duration::from_secs(5 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            rooms_size: self.rooms.entry_count(),
        }
    }

    /// Invalidate a single room after its pricing changed
    pub async fn invalidate_room(&self, room_id: Uuid) {
        self.rooms.invalidate(&room_id).await;
        info!("Cache invalidated for room: {}", room_id);
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub rooms_size: u64,
}

/// Start background cache warmer
///
/// Warms the room cache on startup and refreshes every 5 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    let mut interval = interval(Duration::from_secs(5 * 60));
    loop {
        // First tick completes immediately.
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Load every room into the cache
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::list_rooms(db).await {
        Ok(rooms) => {
            for room in rooms {
                cache.rooms.insert(room.id, Arc::new(room)).await;
            }
        }
        Err(e) => warn!("Failed to warm room cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> Room {
        Room {
            id: Uuid::new_v4(),
            name: "Sea View".into(),
            price: None,
            base_price: None,
            beds24_room_id: Some("12345".into()),
            capacity: 3,
        }
    }

    #[tokio::test]
    async fn test_invalidate_room_removes_entry() {
        let cache = AppCache::new();
        let room = room();
        let id = room.id;
        cache.rooms.insert(id, Arc::new(room)).await;
        assert!(cache.rooms.get(&id).await.is_some());

        cache.invalidate_room(id).await;
        assert!(cache.rooms.get(&id).await.is_none());
    }
}
