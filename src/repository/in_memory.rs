use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use crate::models::task::Task;
use crate::repository::{RepositoryError, TaskRepository, TaskTransaction};

/// Process-local store. Tasks are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepositoryError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().find(|t| t.id == Some(id)).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Task>, RepositoryError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.iter().any(|t| t.id == Some(id)))
    }

    async fn begin(&self) -> Result<Box<dyn TaskTransaction>, RepositoryError> {
        let guard = Arc::clone(&self.tasks).write_owned().await;
        Ok(Box::new(InMemoryTransaction {
            guard,
            staged: Vec::new(),
        }))
    }
}

#[derive(Debug)]
enum Change {
    Save(Task),
    Delete(Uuid),
}

impl Change {
    fn id(&self) -> Option<Uuid> {
        match self {
            Change::Save(task) => task.id,
            Change::Delete(id) => Some(*id),
        }
    }
}

/// Holds the store's write lock until commit or drop; writes are staged
/// and only applied on commit.
pub struct InMemoryTransaction {
    guard: OwnedRwLockWriteGuard<Vec<Task>>,
    staged: Vec<Change>,
}

impl InMemoryTransaction {
    fn lookup(&self, id: Uuid) -> Option<Task> {
        // Latest staged change for this id wins over the committed state.
        match self.staged.iter().rev().find(|c| c.id() == Some(id)) {
            Some(Change::Save(task)) => Some(task.clone()),
            Some(Change::Delete(_)) => None,
            None => self.guard.iter().find(|t| t.id == Some(id)).cloned(),
        }
    }
}

#[async_trait]
impl TaskTransaction for InMemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Task>, RepositoryError> {
        Ok(self.lookup(id))
    }

    async fn exists_by_id(&mut self, id: Uuid) -> Result<bool, RepositoryError> {
        Ok(self.lookup(id).is_some())
    }

    async fn save(&mut self, mut task: Task) -> Result<Task, RepositoryError> {
        if task.id.is_none() {
            task.id = Some(Uuid::new_v4());
        }
        self.staged.push(Change::Save(task.clone()));
        Ok(task)
    }

    async fn delete_by_id(&mut self, id: Uuid) -> Result<(), RepositoryError> {
        self.staged.push(Change::Delete(id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let InMemoryTransaction { mut guard, staged } = *self;
        debug!("Committing {} staged change(s)", staged.len());
        let tasks = &mut *guard;
        for change in staged {
            match change {
                Change::Save(task) => match tasks.iter_mut().find(|t| t.id == task.id) {
                    Some(existing) => *existing = task,
                    None => tasks.push(task),
                },
                Change::Delete(id) => tasks.retain(|t| t.id != Some(id)),
            }
        }
        Ok(())
    }
}
