use std::sync::Arc;

use chrono::NaiveDateTime;
use log::{debug, info};
use thiserror::Error;
use uuid::Uuid;

use crate::mapper::TaskMapper;
use crate::models::task::{TaskRequest, TaskResponse};
use crate::repository::{RepositoryError, TaskRepository};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Task not found with id: {0}")]
    TaskNotFound(Uuid),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Source of the local wall-clock time stamped on tasks.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Task use cases. Each write runs in its own repository transaction.
#[derive(Clone)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    mapper: TaskMapper,
    clock: Arc<dyn Clock>,
}

impl TaskService {
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        mapper: TaskMapper,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            mapper,
            clock,
        }
    }

    pub async fn create_task(&self, request: &TaskRequest) -> Result<TaskResponse, ServiceError> {
        info!(
            "Creating new task with title: {}",
            request.title.as_deref().unwrap_or_default()
        );

        let mut task = self.mapper.to_entity(request);
        let now = self.clock.now();
        task.created_at = Some(now);
        task.updated_at = Some(now);

        let mut tx = self.repository.begin().await?;
        let saved = tx.save(task).await?;
        tx.commit().await?;

        debug!("Task created successfully with ID: {:?}", saved.id);
        Ok(self.mapper.to_response(&saved))
    }

    pub async fn get_all_tasks(&self) -> Result<Vec<TaskResponse>, ServiceError> {
        info!("Retrieving all tasks");
        let tasks = self.repository.find_all().await?;
        debug!("Found {} tasks", tasks.len());
        Ok(self.mapper.to_response_list(&tasks))
    }

    pub async fn get_task_by_id(&self, id: Uuid) -> Result<TaskResponse, ServiceError> {
        info!("Retrieving task by ID: {}", id);
        let task = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::TaskNotFound(id))?;
        Ok(self.mapper.to_response(&task))
    }

    pub async fn update_task(
        &self,
        id: Uuid,
        request: &TaskRequest,
    ) -> Result<TaskResponse, ServiceError> {
        info!("Updating task with ID: {}", id);

        let mut tx = self.repository.begin().await?;
        let mut task = tx
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::TaskNotFound(id))?;

        self.mapper.apply_request_to_entity(request, &mut task);

        // updated_at must never precede created_at, even if the clock steps back.
        let now = self.clock.now();
        task.updated_at = Some(match task.created_at {
            Some(created_at) if created_at > now => created_at,
            _ => now,
        });

        let updated = tx.save(task).await?;
        tx.commit().await?;

        debug!("Task updated successfully with ID: {}", id);
        Ok(self.mapper.to_response(&updated))
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ServiceError> {
        info!("Deleting task with ID: {}", id);

        let mut tx = self.repository.begin().await?;
        if !tx.exists_by_id(id).await? {
            return Err(ServiceError::TaskNotFound(id));
        }
        tx.delete_by_id(id).await?;
        tx.commit().await?;

        debug!("Task deleted successfully with ID: {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::repository::InMemoryTaskRepository;

    /// Clock that only moves when told to.
    struct ManualClock(Mutex<NaiveDateTime>);

    impl ManualClock {
        fn starting_at(at: NaiveDateTime) -> Arc<Self> {
            Arc::new(Self(Mutex::new(at)))
        }

        fn set(&self, at: NaiveDateTime) {
            *self.0.lock().unwrap() = at;
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> NaiveDateTime {
            *self.0.lock().unwrap()
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .unwrap()
    }

    fn setup() -> (TaskService, Arc<InMemoryTaskRepository>, Arc<ManualClock>) {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let clock = ManualClock::starting_at(noon());
        let service = TaskService::new(repository.clone(), TaskMapper, clock.clone());
        (service, repository, clock)
    }

    fn request(title: &str, description: Option<&str>, completed: Option<bool>) -> TaskRequest {
        TaskRequest {
            title: Some(title.to_string()),
            description: description.map(str::to_string),
            completed,
        }
    }

    #[tokio::test]
    async fn create_assigns_fresh_id_and_equal_timestamps() {
        let (service, _, _) = setup();

        let first = service
            .create_task(&request("Buy milk", Some("2%"), Some(false)))
            .await
            .unwrap();
        let second = service
            .create_task(&request("Buy milk", Some("2%"), Some(false)))
            .await
            .unwrap();

        assert!(first.id.is_some());
        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, Some(noon()));
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(first.title, "Buy milk");
        assert_eq!(first.description.as_deref(), Some("2%"));
        assert!(!first.completed);
    }

    #[tokio::test]
    async fn get_all_returns_every_task() {
        let (service, _, _) = setup();
        service.create_task(&request("Task 1", None, None)).await.unwrap();
        service.create_task(&request("Task 2", None, None)).await.unwrap();

        let all = service.get_all_tasks().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "Task 1");
        assert_eq!(all[1].title, "Task 2");
    }

    #[tokio::test]
    async fn get_by_id_returns_the_stored_task() {
        let (service, _, _) = setup();
        let created = service.create_task(&request("Test", None, None)).await.unwrap();

        let found = service.get_task_by_id(created.id.unwrap()).await.unwrap();

        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn unknown_id_is_not_found_and_store_is_unchanged() {
        let (service, repository, _) = setup();
        service.create_task(&request("Existing", None, None)).await.unwrap();
        let before = repository.find_all().await.unwrap();
        let unknown = Uuid::new_v4();

        assert!(matches!(
            service.get_task_by_id(unknown).await,
            Err(ServiceError::TaskNotFound(id)) if id == unknown
        ));
        assert!(matches!(
            service.update_task(unknown, &request("x", None, Some(true))).await,
            Err(ServiceError::TaskNotFound(id)) if id == unknown
        ));
        assert!(matches!(
            service.delete_task(unknown).await,
            Err(ServiceError::TaskNotFound(id)) if id == unknown
        ));

        assert_eq!(repository.find_all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_refreshes_updated_at() {
        let (service, _, clock) = setup();
        let created = service
            .create_task(&request("Buy milk", Some("2%"), Some(false)))
            .await
            .unwrap();
        clock.advance(Duration::seconds(5));

        let updated = service
            .update_task(created.id.unwrap(), &request("Buy milk", Some("Whole"), Some(true)))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description.as_deref(), Some("Whole"));
        assert!(updated.completed);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.updated_at, Some(noon() + Duration::seconds(5)));
    }

    #[tokio::test]
    async fn update_without_completed_keeps_previous_value() {
        let (service, _, _) = setup();
        let created = service
            .create_task(&request("Done already", None, Some(true)))
            .await
            .unwrap();

        let updated = service
            .update_task(created.id.unwrap(), &request("Renamed", None, None))
            .await
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, "Renamed");
    }

    #[tokio::test]
    async fn update_with_explicit_false_clears_completed() {
        let (service, _, _) = setup();
        let created = service
            .create_task(&request("Done already", None, Some(true)))
            .await
            .unwrap();

        let updated = service
            .update_task(created.id.unwrap(), &request("Done already", None, Some(false)))
            .await
            .unwrap();

        assert!(!updated.completed);
    }

    #[tokio::test]
    async fn updated_at_never_precedes_created_at() {
        let (service, _, clock) = setup();
        let created = service.create_task(&request("t", None, None)).await.unwrap();
        clock.set(noon() - Duration::hours(1));

        let updated = service
            .update_task(created.id.unwrap(), &request("t", None, None))
            .await
            .unwrap();

        assert_eq!(updated.updated_at, created.created_at);
    }

    #[tokio::test]
    async fn updated_at_is_monotonic_across_updates() {
        let (service, _, clock) = setup();
        let id = service
            .create_task(&request("t", None, None))
            .await
            .unwrap()
            .id
            .unwrap();

        let mut last = None;
        for step in 0..3 {
            clock.advance(Duration::seconds(step));
            let updated = service.update_task(id, &request("t", None, None)).await.unwrap();
            assert!(updated.updated_at >= updated.created_at);
            assert!(updated.updated_at >= last);
            last = updated.updated_at;
        }
    }

    #[tokio::test]
    async fn delete_removes_and_repeat_delete_is_not_found() {
        let (service, repository, _) = setup();
        let id = service
            .create_task(&request("t", None, None))
            .await
            .unwrap()
            .id
            .unwrap();

        service.delete_task(id).await.unwrap();
        assert!(!repository.exists_by_id(id).await.unwrap());

        for _ in 0..2 {
            assert!(matches!(
                service.delete_task(id).await,
                Err(ServiceError::TaskNotFound(_))
            ));
        }
    }
}
