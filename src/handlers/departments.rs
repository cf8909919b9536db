use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};

use super::common::{
    created_response, no_content_response, success_response, validate_input, JsonBody, ListParams,
};
use crate::{errors::ServiceError, services::departments::CreateDepartmentInput, AppState};

/// Create a new department
async fn create_department(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateDepartmentInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let department = state.services.departments.create(payload).await?;
    Ok(created_response(department))
}

/// List departments ordered by id
async fn list_departments(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ServiceError> {
    validate_input(&params)?;

    let departments = state.services.departments.list(params.page()).await?;
    Ok(success_response(departments))
}

/// Get a department by ID
async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let department = state.services.departments.get(id).await?;
    Ok(success_response(department))
}

/// Delete a department (rejected while referenced)
async fn delete_department(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.services.departments.delete(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_department).get(list_departments))
        .route("/:id", get(get_department).delete(delete_department))
}
