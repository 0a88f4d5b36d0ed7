//! The per-category event cache.
//!
//! Holds only the most recently completed turn's event list for each
//! category. Every detect pass overwrites the category's entry wholesale
//! (with an empty list on baseline passes), so readers either see the
//! previous turn's complete list or the new one, never a partial mix.

use std::collections::BTreeMap;

use chronicle_types::{EntityCategory, TurnEvent};
use tokio::sync::RwLock;

/// Latest turn event lists, one slot per category.
#[derive(Default)]
pub struct EventCache {
    inner: RwLock<BTreeMap<EntityCategory, Vec<TurnEvent>>>,
}

impl EventCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached list for a category.
    pub async fn store(&self, category: EntityCategory, events: Vec<TurnEvent>) {
        self.inner.write().await.insert(category, events);
    }

    /// The latest cached list for a category, empty before the first
    /// detect pass.
    pub async fn latest(&self, category: EntityCategory) -> Vec<TurnEvent> {
        self.inner
            .read()
            .await
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronicle_types::CharacterId;

    #[tokio::test]
    async fn store_overwrites_wholesale() {
        let cache = EventCache::new();
        assert!(cache.latest(EntityCategory::Character).await.is_empty());

        let first = vec![TurnEvent::CharacterDied {
            character_id: CharacterId::new(1),
            death_reason: None,
        }];
        cache.store(EntityCategory::Character, first).await;
        assert_eq!(cache.latest(EntityCategory::Character).await.len(), 1);

        cache.store(EntityCategory::Character, Vec::new()).await;
        assert!(cache.latest(EntityCategory::Character).await.is_empty());
        // Other categories are untouched.
        assert!(cache.latest(EntityCategory::Unit).await.is_empty());
    }
}
