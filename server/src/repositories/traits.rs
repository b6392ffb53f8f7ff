//! Common repository traits
//!
//! Generic CRUD interfaces implemented by every backend (MySQL, in-memory).
//! They are object safe through `async_trait`, so the application state can
//! hold `Arc<dyn ...>` stores and tests can swap the backend.

use super::BackendError;
use async_trait::async_trait;

/// Trait for creating new entities in the backend
///
/// # Type Parameters
/// * `Entity` - Type of the returned entity (with ID assigned by the backend)
/// * `CreateDTO` - DTO for creation (without ID, will be automatically generated)
#[async_trait]
pub trait Create<Entity, CreateDTO>: Send + Sync {
    /// Creates a new entity
    ///
    /// # Returns
    /// * `Ok(Entity)` - Created entity with ID assigned by the backend
    /// * `Err(BackendError)` - Error during insertion
    async fn create(&self, data: &CreateDTO) -> Result<Entity, BackendError>;
}

/// Trait for reading a single entity by primary key
#[async_trait]
pub trait Read<Entity, Id>: Send + Sync {
    /// Reads an entity by its primary key
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - Entity found
    /// * `Ok(None)` - No entity with that ID
    /// * `Err(BackendError)` - Error during reading
    async fn read(&self, id: &Id) -> Result<Option<Entity>, BackendError>;
}

/// Trait for updating existing entities
///
/// # Type Parameters
/// * `Entity` - Type of the updated entity
/// * `UpdateDTO` - DTO for updating (only `Some(_)` fields are modified)
/// * `Id` - Type of the primary key
#[async_trait]
pub trait Update<Entity, UpdateDTO, Id>: Send + Sync {
    /// Updates an existing entity
    ///
    /// # Returns
    /// * `Ok(Entity)` - Updated entity
    /// * `Err(BackendError::NotFound)` - No entity with that ID
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, BackendError>;
}

/// Trait for deleting entities
#[async_trait]
pub trait Delete<Id>: Send + Sync {
    /// Deletes an entity
    ///
    /// # Returns
    /// * `Ok(())` - Deletion successful
    /// * `Err(BackendError::NotFound)` - No entity with that ID
    async fn delete(&self, id: &Id) -> Result<(), BackendError>;
}
