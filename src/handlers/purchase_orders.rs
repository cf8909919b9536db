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
    entities::purchase_order::PurchaseOrderStatus,
    errors::ServiceError,
    services::{purchase_orders::CreatePurchaseOrderInput, Page},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
struct ListPurchaseOrdersParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    limit: u64,
    #[serde(default)]
    offset: u64,
    status: Option<PurchaseOrderStatus>,
}

/// Create a new purchase order
async fn create_purchase_order(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreatePurchaseOrderInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let po = state.services.purchase_orders.create(payload).await?;
    Ok(created_response(po))
}

/// List purchase orders, optionally filtered by status
async fn list_purchase_orders(
    State(state): State<AppState>,
    Query(params): Query<ListPurchaseOrdersParams>,
) -> Result<Response, ServiceError> {
    validate_input(&params)?;

    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };
    let orders = state
        .services
        .purchase_orders
        .list(params.status, page)
        .await?;
    Ok(success_response(orders))
}

/// Get a purchase order by ID
async fn get_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let po = state.services.purchase_orders.get(id).await?;
    Ok(success_response(po))
}

/// Delete a purchase order; referencing invoices are detached, not removed
async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    state.services.purchase_orders.delete(id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_purchase_order).get(list_purchase_orders))
        .route("/:id", get(get_purchase_order).delete(delete_purchase_order))
}
