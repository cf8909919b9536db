use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use validator::Validate;

use super::common::{created_response, default_limit, success_response, validate_input, JsonBody};
use crate::{
    errors::ServiceError,
    services::{payments::CreatePaymentInput, Page},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
struct ListPaymentsParams {
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 200, message = "limit must be between 1 and 200"))]
    limit: u64,
    #[serde(default)]
    offset: u64,
    invoice_id: Option<i64>,
}

/// Record a payment; settlement of the invoice is recomputed in the same
/// transaction
async fn create_payment(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreatePaymentInput>,
) -> Result<Response, ServiceError> {
    validate_input(&payload)?;

    let payment = state.services.payments.create(payload).await?;
    Ok(created_response(payment))
}

/// List payments, optionally filtered by invoice
async fn list_payments(
    State(state): State<AppState>,
    Query(params): Query<ListPaymentsParams>,
) -> Result<Response, ServiceError> {
    validate_input(&params)?;

    let page = Page {
        limit: params.limit,
        offset: params.offset,
    };
    let payments = state.services.payments.list(params.invoice_id, page).await?;
    Ok(success_response(payments))
}

/// Get a payment by ID
async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ServiceError> {
    let payment = state.services.payments.get(id).await?;
    Ok(success_response(payment))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment).get(list_payments))
        .route("/:id", get(get_payment))
}
