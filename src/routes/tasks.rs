use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTask, TaskQuery},
    state::AppState,
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Creates a new task for the authenticated user.
///
/// Only `description` (required, non-blank) and `completed` (optional, default
/// `false`) are read from the body. The owner is always the caller.
///
/// ## Responses:
/// - `201 Created`: the stored `Task`.
/// - `400 Bad Request`: missing/blank description, or a store fault.
/// - `401 Unauthorized`: missing or invalid token.
#[post("")]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .create(user.0, task_data.into_inner())
        .await
        .map_err(AppError::from_task_write)?;

    Ok(HttpResponse::Created().json(task))
}

/// Lists the authenticated user's tasks.
///
/// ## Query Parameters:
/// - `completed`: `"true"` keeps completed tasks; any other value keeps open ones.
/// - `sortBy`: `<field>:<asc|desc>`, e.g. `createdAt:desc`.
/// - `limit`, `skip`: integers; unparsable values are ignored.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Task` (possibly empty).
/// - `500 Internal Server Error`: store fault.
#[get("")]
pub async fn get_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let tasks = state.tasks.list(user.0, &query).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Retrieves one of the caller's tasks.
///
/// A task owned by someone else answers exactly like a missing one: `404`.
#[get("/{id}")]
pub async fn get_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state.tasks.get_by_id(user.0, task_id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Updates `description` and/or `completed` of one of the caller's tasks.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`.
/// - `400 Bad Request`: a field outside the whitelist, a badly typed value, or a store fault.
/// - `404 Not Found`: no such task for this user.
#[patch("/{id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
    fields: web::Json<Map<String, Value>>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .update(user.0, task_id.into_inner(), &fields)
        .await
        .map_err(AppError::from_task_write)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes one of the caller's tasks and returns what was removed.
///
/// ## Responses:
/// - `200 OK`: the deleted `Task`.
/// - `400 Bad Request`: store fault.
/// - `404 Not Found`: no such task for this user.
#[delete("/{id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    task_id: web::Path<Uuid>,
) -> Result<impl Responder, AppError> {
    let task = state
        .tasks
        .delete(user.0, task_id.into_inner())
        .await
        .map_err(AppError::from_task_write)?;

    Ok(HttpResponse::Ok().json(task))
}
