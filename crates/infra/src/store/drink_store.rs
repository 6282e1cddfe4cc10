use async_trait::async_trait;
use thiserror::Error;

use coffeeshop_core::{DomainError, Drink, DrinkDraft, DrinkId, DrinkPatch};

/// Storage failure.
///
/// Any failed write (validation, unique title, other constraint) is
/// `Persistence`; the API reports it as unprocessable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A create/update/delete could not be persisted.
    #[error("persistence failed: {0}")]
    Persistence(String),

    /// A read failed (connectivity, corrupt row, poisoned lock).
    #[error("query failed: {0}")]
    Query(String),
}

impl From<DomainError> for StoreError {
    fn from(value: DomainError) -> Self {
        StoreError::Persistence(value.to_string())
    }
}

/// Persistent table of drinks.
///
/// Implementations must:
/// - assign ids on create and never reuse them
/// - keep titles unique
/// - apply only the `Some` fields of a patch
#[async_trait]
pub trait DrinkStore: Send + Sync {
    /// All drinks in storage order (ascending id).
    async fn list_all(&self) -> Result<Vec<Drink>, StoreError>;

    async fn find_by_id(&self, id: DrinkId) -> Result<Option<Drink>, StoreError>;

    async fn create(&self, draft: DrinkDraft) -> Result<Drink, StoreError>;

    /// Returns `Ok(None)` if no drink has this id.
    async fn update(&self, id: DrinkId, patch: DrinkPatch) -> Result<Option<Drink>, StoreError>;

    /// Returns the removed id, or `Ok(None)` if no drink has this id.
    async fn delete(&self, id: DrinkId) -> Result<Option<DrinkId>, StoreError>;
}
