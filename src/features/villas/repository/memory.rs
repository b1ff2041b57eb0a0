use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ChangeTracker, VillaFilter, VillaRepository, VillaStore};
use crate::core::error::{AppError, Result};
use crate::features::villas::models::{NewVilla, Villa};

#[derive(Debug, Default)]
struct MemoryState {
    villas: BTreeMap<i32, Villa>,
    last_id: i32,
}

/// Process-local store, used for tests and `STORAGE_BACKEND=memory`
#[derive(Debug, Clone, Default)]
pub struct InMemoryVillaStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryVillaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VillaStore for InMemoryVillaStore {
    fn scope(&self) -> Box<dyn VillaRepository> {
        Box::new(InMemoryVillaRepository {
            state: Arc::clone(&self.state),
            tracker: ChangeTracker::default(),
        })
    }
}

pub struct InMemoryVillaRepository {
    state: Arc<RwLock<MemoryState>>,
    tracker: ChangeTracker,
}

#[async_trait]
impl VillaRepository for InMemoryVillaRepository {
    async fn get_all(&mut self) -> Result<Vec<Villa>> {
        let state = self.state.read().await;
        Ok(state.villas.values().cloned().collect())
    }

    async fn get(&mut self, filter: &VillaFilter, tracked: bool) -> Result<Option<Villa>> {
        let villa = {
            let state = self.state.read().await;
            match filter {
                VillaFilter::Id(id) => state.villas.get(id).cloned(),
                _ => state.villas.values().find(|v| filter.matches(v)).cloned(),
            }
        };

        if tracked {
            if let Some(ref v) = villa {
                self.tracker.attach(v);
            }
        }
        Ok(villa)
    }

    async fn create(&mut self, villa: NewVilla) -> Result<Villa> {
        let mut state = self.state.write().await;
        state.last_id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| AppError::Internal("villa id space exhausted".to_string()))?;
        let villa = villa.into_villa(state.last_id, Utc::now());
        state.villas.insert(villa.id, villa.clone());
        Ok(villa)
    }

    async fn update(&mut self, villa: Villa) -> Result<()> {
        self.tracker.stage_update(villa)
    }

    async fn remove(&mut self, villa: Villa) -> Result<()> {
        self.state.write().await.villas.remove(&villa.id);
        self.tracker.detach(villa.id);
        Ok(())
    }

    async fn save(&mut self) -> Result<()> {
        let pending = self.tracker.take_pending();
        if pending.is_empty() {
            return Ok(());
        }

        let mut state = self.state.write().await;
        for mut villa in pending {
            let created_at = state.villas.get(&villa.id).map(|v| v.created_at);
            match created_at {
                Some(created_at) => {
                    villa.created_at = created_at;
                    villa.updated_at = Utc::now();
                    state.villas.insert(villa.id, villa);
                }
                None => {
                    tracing::warn!("Update skipped, villa {} does not exist", villa.id);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::Fake;
    use tokio_test::assert_ok;

    fn new_villa(name: &str) -> NewVilla {
        NewVilla {
            name: name.to_string(),
            details: None,
            rate: 120.0,
            occupancy: (1..8).fake::<i32>(),
            square_footage: (100..900).fake::<i32>(),
            image_url: String::new(),
            amenity: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = InMemoryVillaStore::new();
        let mut repo = store.scope();

        let first = assert_ok!(repo.create(new_villa("Pool View")).await);
        let second = assert_ok!(repo.create(new_villa("Beach View")).await);
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let all = assert_ok!(repo.get_all().await);
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_remove() {
        let store = InMemoryVillaStore::new();
        let mut repo = store.scope();

        let first = repo.create(new_villa("Pool View")).await.unwrap();
        repo.remove(first).await.unwrap();
        let second = repo.create(new_villa("Beach View")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_update_is_invisible_until_save() {
        let store = InMemoryVillaStore::new();
        let created = store.scope().create(new_villa("Pool View")).await.unwrap();

        let mut repo = store.scope();
        let mut changed = created.clone();
        changed.occupancy = 42;
        repo.update(changed).await.unwrap();

        let before = store
            .scope()
            .get(&VillaFilter::Id(created.id), false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(before.occupancy, created.occupancy);

        repo.save().await.unwrap();

        let after = store
            .scope()
            .get(&VillaFilter::Id(created.id), false)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after.occupancy, 42);
        assert_eq!(after.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_tracked_read_blocks_update_in_same_scope() {
        let store = InMemoryVillaStore::new();
        let created = store.scope().create(new_villa("Pool View")).await.unwrap();

        let mut repo = store.scope();
        let tracked = repo
            .get(&VillaFilter::Id(created.id), true)
            .await
            .unwrap()
            .unwrap();
        assert!(repo.update(tracked).await.is_err());

        let mut other = store.scope();
        let untracked = other
            .get(&VillaFilter::Id(created.id), false)
            .await
            .unwrap()
            .unwrap();
        assert!(other.update(untracked).await.is_ok());
    }

    #[tokio::test]
    async fn test_save_of_missing_villa_is_a_noop() {
        let store = InMemoryVillaStore::new();
        let ghost = new_villa("Ghost").into_villa(77, Utc::now());

        let mut repo = store.scope();
        repo.update(ghost).await.unwrap();
        assert_ok!(repo.save().await);
        assert!(repo
            .get(&VillaFilter::Id(77), false)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_fails_once_ids_are_exhausted() {
        let store = InMemoryVillaStore::new();
        store.state.write().await.last_id = i32::MAX;

        let result = store.scope().create(new_villa("Overflow")).await;
        assert!(matches!(result, Err(AppError::Internal(_))));
        assert!(store.scope().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_name_lookup_ignores_case() {
        let store = InMemoryVillaStore::new();
        store.scope().create(new_villa("Pool View")).await.unwrap();

        let found = store
            .scope()
            .get(&VillaFilter::NameIgnoreCase("POOL view".into()), false)
            .await
            .unwrap();
        assert!(found.is_some());
    }
}
