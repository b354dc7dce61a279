use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreResult;

/// A stored record with a stable identifier.
///
/// Every domain type persisted through a [`Repository`] implements this trait;
/// `KIND` labels the entity in error messages and logs.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: &'static str;

    fn id(&self) -> Uuid;
}

/// Generic repository seam between the scheduling core and its data layer.
///
/// One abstraction replaces per-entity data-access wrappers: the core only
/// needs fetch-by-id, insert, update, remove, and a full listing it can
/// filter in memory. Implementations are expected to serialize access per
/// operation; no cross-entity transaction support is provided.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Fetch a record by id, `None` if absent.
    async fn get(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// Insert a new record. Fails with `DuplicateId` if the id is taken.
    async fn insert(&self, item: T) -> StoreResult<()>;

    /// Replace an existing record. Fails with `NotFound` if absent.
    async fn update(&self, item: T) -> StoreResult<()>;

    /// Delete a record by id. Fails with `NotFound` if absent.
    async fn remove(&self, id: Uuid) -> StoreResult<()>;

    /// List all records. Callers apply their own filters.
    async fn list(&self) -> StoreResult<Vec<T>>;
}
