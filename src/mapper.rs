use crate::models::task::{Task, TaskRequest, TaskResponse};

/// Field-by-field conversions between the wire shapes and [`Task`].
///
/// Nothing here validates; requests are checked before they reach the mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskMapper;

impl TaskMapper {
    /// Copies the client-owned fields. Id and timestamps are left unset.
    pub fn to_entity(&self, request: &TaskRequest) -> Task {
        Task {
            id: None,
            title: request.title.clone().unwrap_or_default(),
            description: request.description.clone(),
            completed: request.completed.unwrap_or(false),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn to_response(&self, task: &Task) -> TaskResponse {
        TaskResponse {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }

    pub fn to_response_list(&self, tasks: &[Task]) -> Vec<TaskResponse> {
        tasks.iter().map(|t| self.to_response(t)).collect()
    }

    /// Title and description are always overwritten. `completed` is only
    /// overwritten when the request carries a value, so an omitted flag keeps
    /// the stored one while an explicit `false` clears it.
    pub fn apply_request_to_entity(&self, request: &TaskRequest, task: &mut Task) {
        task.title = request.title.clone().unwrap_or_default();
        task.description = request.description.clone();
        if let Some(completed) = request.completed {
            task.completed = completed;
        }
    }
}
