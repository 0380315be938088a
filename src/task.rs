// src/task.rs

use actix_web::{web, HttpResponse};
use log::info;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{json_error_handler, path_error_handler, ApiError};
use crate::models::task::TaskRequest;
use crate::validation::validate_task_request;

/// Mounts the task routes under `/api/v1/tasks`. Unreadable paths and bodies
/// are reported as internal errors without echoing the parser detail.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tasks")
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .route("", web::post().to(create_task))
            .route("", web::get().to(get_all_tasks))
            .route("/", web::post().to(create_task))
            .route("/", web::get().to(get_all_tasks))
            .route("/{id}", web::get().to(get_task))
            .route("/{id}", web::put().to(update_task))
            .route("/{id}", web::delete().to(delete_task)),
    );
}

/// POST /api/v1/tasks
pub async fn create_task(
    data: web::Data<AppState>,
    payload: web::Json<TaskRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("POST /api/v1/tasks - Creating new task");
    let request = payload.into_inner();
    validate_task_request(&request).map_err(ApiError::validation)?;

    let created = data.tasks.create_task(&request).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/v1/tasks
pub async fn get_all_tasks(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    info!("GET /api/v1/tasks - Retrieving all tasks");
    let tasks = data.tasks.get_all_tasks().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// GET /api/v1/tasks/{id}
pub async fn get_task(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    info!("GET /api/v1/tasks/{} - Retrieving task by ID", id);
    let task = data.tasks.get_task_by_id(id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// PUT /api/v1/tasks/{id}
pub async fn update_task(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
    payload: web::Json<TaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    info!("PUT /api/v1/tasks/{} - Updating task", id);
    let request = payload.into_inner();
    validate_task_request(&request).map_err(ApiError::validation)?;

    let updated = data.tasks.update_task(id, &request).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete_task(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = id.into_inner();
    info!("DELETE /api/v1/tasks/{} - Deleting task", id);
    data.tasks.delete_task(id).await?;
    Ok(HttpResponse::NoContent().finish())
}
