use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::repository::{Entity, Repository};

/// In-memory repository backed by a concurrent keyed map.
///
/// Mutations are atomic per entry; the single-writer model the scheduling
/// core assumes is satisfied as long as each logical operation runs to
/// completion before the next starts.
pub struct MemoryRepository<T: Entity> {
    items: DashMap<Uuid, T>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: DashMap::new(),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Entity> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn get(&self, id: Uuid) -> StoreResult<Option<T>> {
        Ok(self.items.get(&id).map(|entry| entry.value().clone()))
    }

    async fn insert(&self, item: T) -> StoreResult<()> {
        let id = item.id();
        if self.items.contains_key(&id) {
            return Err(StoreError::DuplicateId {
                entity: T::KIND,
                id,
            });
        }
        debug!(entity = T::KIND, %id, "inserting record");
        self.items.insert(id, item);
        Ok(())
    }

    async fn update(&self, item: T) -> StoreResult<()> {
        let id = item.id();
        if !self.items.contains_key(&id) {
            return Err(StoreError::NotFound {
                entity: T::KIND,
                id,
            });
        }
        self.items.insert(id, item);
        Ok(())
    }

    async fn remove(&self, id: Uuid) -> StoreResult<()> {
        match self.items.remove(&id) {
            Some(_) => {
                debug!(entity = T::KIND, %id, "removed record");
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: T::KIND,
                id,
            }),
        }
    }

    async fn list(&self) -> StoreResult<Vec<T>> {
        Ok(self
            .items
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}
