//! Bounded in-memory session store backed by `moka`.
//!
//! Records are evicted when their cookie expiry passes or when the cache is
//! full, so abandoned visitor sessions do not pile up on the heap.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use tower_sessions::cookie::time::OffsetDateTime;
use tower_sessions::session::{Id, Record};
use tower_sessions::{SessionStore, session_store};

/// Most sessions held at once; least recently used go first.
pub const SESSION_CAPACITY: u64 = 100_000;

/// Evicts each record at its own `expiry_date`.
struct RecordExpiry;

impl RecordExpiry {
    fn remaining(record: &Record) -> Duration {
        Duration::try_from(record.expiry_date - OffsetDateTime::now_utc()).unwrap_or(Duration::ZERO)
    }
}

impl Expiry<Id, Record> for RecordExpiry {
    fn expire_after_create(&self, _id: &Id, record: &Record, _created_at: Instant) -> Option<Duration> {
        Some(Self::remaining(record))
    }

    fn expire_after_update(
        &self,
        _id: &Id,
        record: &Record,
        _updated_at: Instant,
        _current: Option<Duration>,
    ) -> Option<Duration> {
        Some(Self::remaining(record))
    }
}

/// Session store for [`tower_sessions`] with a capacity bound and
/// per-record expiry.
#[derive(Clone, Debug)]
pub struct MokaSessionStore {
    cache: Cache<Id, Record>,
}

impl MokaSessionStore {
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(capacity)
                .expire_after(RecordExpiry)
                .build(),
        }
    }
}

impl Default for MokaSessionStore {
    fn default() -> Self {
        Self::new(SESSION_CAPACITY)
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.cache.contains_key(&record.id) {
            record.id = Id::default();
        }
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        self.cache.insert(record.id, record.clone()).await;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        Ok(self
            .cache
            .get(session_id)
            .await
            .filter(|record| record.expiry_date > OffsetDateTime::now_utc()))
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        self.cache.invalidate(session_id).await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_sessions::cookie::time::Duration as CookieDuration;

    use super::*;

    fn record(expires_in: CookieDuration) -> Record {
        Record {
            id: Id::default(),
            data: Default::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_create_then_load() {
        let store = MokaSessionStore::default();
        let mut session = record(CookieDuration::minutes(30));
        store.create(&mut session).await.unwrap();
        assert_eq!(store.load(&session.id).await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_save_replaces_record() {
        let store = MokaSessionStore::default();
        let mut session = record(CookieDuration::minutes(30));
        store.create(&mut session).await.unwrap();

        session.data.insert("locale".to_owned(), serde_json::json!("en"));
        store.save(&session).await.unwrap();
        let loaded = store.load(&session.id).await.unwrap().unwrap();
        assert_eq!(loaded.data.get("locale"), Some(&serde_json::json!("en")));
    }

    #[tokio::test]
    async fn test_expired_record_is_not_loaded() {
        let store = MokaSessionStore::default();
        let session = record(CookieDuration::seconds(-1));
        store.save(&session).await.unwrap();
        assert_eq!(store.load(&session.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MokaSessionStore::default();
        let mut session = record(CookieDuration::minutes(30));
        store.create(&mut session).await.unwrap();
        store.delete(&session.id).await.unwrap();
        assert_eq!(store.load(&session.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let store = MokaSessionStore::new(10);
        for _ in 0..50 {
            store.save(&record(CookieDuration::minutes(30))).await.unwrap();
        }
        store.cache.run_pending_tasks().await;
        assert!(store.cache.entry_count() <= 10);
    }
}
