use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use validator::Validate;

use super::common::{
    created_response, default_limit, no_content_response, success_response, validate_input,
    JsonBody,
};
use crate::{
    errors::ServiceError,
    services::{employees::CreateEmployeeInput, Page},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
struct ListEmployeesParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    limit: u64,
    #[serde(default)]
    offset: u64,
    department_id: Option<i64>,
    active: Option<bool>,
}

/// Create a new employee
async fn create_employee(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateEmployeeInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let employee = state.services.employees.create(payload).await?;
    Ok(created_response(employee))
}

/// List employees, optionally filtered by department and active flag
async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<ListEmployeesParams>,
) -> Result<Response, ServiceError> {
    validate_input(&params)?;

    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };
    let employees = state
        .services
        .employees
        .list(params.department_id, params.active, page)
        .await?;
    Ok(success_response(employees))
}

/// Get an employee by ID
async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let employee = state.services.employees.get(id).await?;
    Ok(success_response(employee))
}

/// Delete an employee (rejected while referenced)
async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.services.employees.delete(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_employee).get(list_employees))
        .route("/:id", get(get_employee).delete(delete_employee))
}
