//! Task storage.
//!
//! Reads go straight through [`TaskRepository`]. Writes go through a
//! [`TaskTransaction`] acquired with [`TaskRepository::begin`]: staged writes
//! become visible on [`TaskTransaction::commit`], and a transaction dropped
//! without committing is rolled back.

pub mod in_memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::task::Task;

pub use in_memory::InMemoryTaskRepository;
pub use mongo::MongoTaskRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<mongodb::error::Error> for RepositoryError {
    fn from(error: mongodb::error::Error) -> Self {
        Self::Database(error.to_string())
    }
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepositoryError>;

    /// Every stored task, oldest first. Tasks created within the same
    /// timestamp come back in a backend-defined order.
    async fn find_all(&self) -> Result<Vec<Task>, RepositoryError>;

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Opens a write transaction. It holds its backend resources until it is
    /// committed or dropped.
    async fn begin(&self) -> Result<Box<dyn TaskTransaction>, RepositoryError>;
}

#[async_trait]
pub trait TaskTransaction: Send {
    /// Sees this transaction's own uncommitted writes.
    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Task>, RepositoryError>;

    async fn exists_by_id(&mut self, id: Uuid) -> Result<bool, RepositoryError>;

    /// Inserts when `task.id` is `None` (a fresh id is assigned), replaces otherwise.
    async fn save(&mut self, task: Task) -> Result<Task, RepositoryError>;

    async fn delete_by_id(&mut self, id: Uuid) -> Result<(), RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}
