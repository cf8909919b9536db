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
    entities::invoice::InvoiceStatus,
    errors::ServiceError,
    services::{invoices::CreateInvoiceInput, Page},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
struct ListInvoicesParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    limit: u64,
    #[serde(default)]
    offset: u64,
    status: Option<InvoiceStatus>,
    supplier_id: Option<i64>,
}

/// Create a new invoice
async fn create_invoice(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateInvoiceInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let invoice = state.services.invoices.create(payload).await?;
    Ok(created_response(invoice))
}

/// List invoices, optionally filtered by status and supplier
async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListInvoicesParams>,
) -> Result<Response, ServiceError> {
    validate_input(&params)?;

    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };
    let invoices = state
        .services
        .invoices
        .list(params.status, params.supplier_id, page)
        .await?;
    Ok(success_response(invoices))
}

/// Get an invoice by ID
async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let invoice = state.services.invoices.get(id).await?;
    Ok(success_response(invoice))
}

/// Delete an invoice together with its payments
async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.services.invoices.delete(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_invoice).get(list_invoices))
        .route("/:id", get(get_invoice).delete(delete_invoice))
}
