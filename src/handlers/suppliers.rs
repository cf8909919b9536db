use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};

use super::common::{
    created_response, no_content_response, success_response, validate_input, JsonBody, ListParams,
};
use crate::{errors::ServiceError, services::suppliers::CreateSupplierInput, AppState};

/// Create a new supplier
async fn create_supplier(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateSupplierInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let supplier = state.services.suppliers.create(payload).await?;
    Ok(created_response(supplier))
}

/// List suppliers ordered by id
async fn list_suppliers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Response, ServiceError> {
    validate_input(&params)?;

    let suppliers = state.services.suppliers.list(params.page()).await?;
    Ok(success_response(suppliers))
}

/// Get a supplier by ID
async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let supplier = state.services.suppliers.get(id).await?;
    Ok(success_response(supplier))
}

/// Delete a supplier (rejected while referenced)
async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.services.suppliers.delete(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_supplier).get(list_suppliers))
        .route("/:id", get(get_supplier).delete(delete_supplier))
}
