use std::sync::Arc;

use crate::mapper::TaskMapper;
use crate::repository::TaskRepository;
use crate::service::{Clock, SystemClock, TaskService};

#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
}

impl AppState {
    /// Wires the service over `repository` with the system clock.
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<dyn TaskRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: TaskService::new(repository, TaskMapper, clock),
        }
    }
}
