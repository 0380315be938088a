use async_trait::async_trait;
use chrono::NaiveDateTime;
use futures_util::StreamExt;
use log::{debug, error};
use mongodb::bson::doc;
use mongodb::{Client, ClientSession, Collection};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::MongoDB;
use crate::models::task::Task;
use crate::repository::{RepositoryError, TaskRepository, TaskTransaction};

/// Stored shape of a task. The id is kept as a UUID string in `_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: Option<NaiveDateTime>,
    updated_at: Option<NaiveDateTime>,
}

impl TaskDocument {
    fn from_task(id: Uuid, task: &Task) -> Self {
        Self {
            id: id.to_string(),
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

impl TryFrom<TaskDocument> for Task {
    type Error = RepositoryError;

    fn try_from(d: TaskDocument) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&d.id).map_err(|e| {
            RepositoryError::Serialization(format!("stored _id {:?} is not a UUID: {}", d.id, e))
        })?;
        Ok(Self {
            id: Some(id),
            title: d.title,
            description: d.description,
            completed: d.completed,
            created_at: d.created_at,
            updated_at: d.updated_at,
        })
    }
}

/// MongoDB-backed repository.
///
/// With `transactional` set every write runs inside a multi-document
/// transaction on its own session, which requires a replica set or sharded
/// cluster. Without it writes still share one session but apply immediately.
#[derive(Clone)]
pub struct MongoTaskRepository {
    client: Client,
    collection: Collection<TaskDocument>,
    transactional: bool,
}

impl MongoTaskRepository {
    pub fn new(mongodb: &MongoDB, collection_name: &str, transactional: bool) -> Self {
        Self {
            client: mongodb.client.clone(),
            collection: mongodb.db.collection::<TaskDocument>(collection_name),
            transactional,
        }
    }
}

#[async_trait]
impl TaskRepository for MongoTaskRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Task>, RepositoryError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .await?
            .map(Task::try_from)
            .transpose()
    }

    async fn find_all(&self) -> Result<Vec<Task>, RepositoryError> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;

        let mut tasks = Vec::new();
        while let Some(document) = cursor.next().await {
            match document {
                Ok(document) => tasks.push(Task::try_from(document)?),
                Err(e) => {
                    error!("Error reading tasks: {}", e);
                    return Err(e.into());
                }
            }
        }
        Ok(tasks)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, RepositoryError> {
        let count = self
            .collection
            .count_documents(doc! { "_id": id.to_string() })
            .await?;
        Ok(count > 0)
    }

    async fn begin(&self) -> Result<Box<dyn TaskTransaction>, RepositoryError> {
        let mut session = self.client.start_session().await?;
        if self.transactional {
            session.start_transaction().await?;
        }
        Ok(Box::new(MongoTransaction {
            collection: self.collection.clone(),
            session,
            transactional: self.transactional,
        }))
    }
}

/// Dropping the session while its transaction is open aborts the transaction.
pub struct MongoTransaction {
    collection: Collection<TaskDocument>,
    session: ClientSession,
    transactional: bool,
}

#[async_trait]
impl TaskTransaction for MongoTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Task>, RepositoryError> {
        self.collection
            .find_one(doc! { "_id": id.to_string() })
            .session(&mut self.session)
            .await?
            .map(Task::try_from)
            .transpose()
    }

    async fn exists_by_id(&mut self, id: Uuid) -> Result<bool, RepositoryError> {
        let count = self
            .collection
            .count_documents(doc! { "_id": id.to_string() })
            .session(&mut self.session)
            .await?;
        Ok(count > 0)
    }

    async fn save(&mut self, mut task: Task) -> Result<Task, RepositoryError> {
        match task.id {
            Some(id) => {
                let document = TaskDocument::from_task(id, &task);
                self.collection
                    .replace_one(doc! { "_id": id.to_string() }, &document)
                    .upsert(true)
                    .session(&mut self.session)
                    .await?;
            }
            None => {
                let id = Uuid::new_v4();
                let document = TaskDocument::from_task(id, &task);
                self.collection
                    .insert_one(&document)
                    .session(&mut self.session)
                    .await?;
                task.id = Some(id);
            }
        }
        Ok(task)
    }

    async fn delete_by_id(&mut self, id: Uuid) -> Result<(), RepositoryError> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id.to_string() })
            .session(&mut self.session)
            .await?;
        debug!("Deleted {} document(s) for {}", result.deleted_count, id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let MongoTransaction {
            mut session,
            transactional,
            ..
        } = *self;
        if transactional {
            session.commit_transaction().await?;
        }
        Ok(())
    }
}
