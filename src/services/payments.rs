use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::Page;
use crate::entities::invoice::{self, InvoiceStatus};
use crate::entities::payment::{self, PaymentMethod};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentInput {
    pub invoice_id: i64,
    pub paid_on: NaiveDate,
    #[validate(range(min = 1, message = "amount_cents must be positive"))]
    pub amount_cents: i64,
    pub method: PaymentMethod,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Service for recording payments and keeping invoice settlement current
#[derive(Clone)]
pub struct PaymentService {
    db: Arc<DatabaseConnection>,
}

impl PaymentService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Record a payment and recompute the invoice's settlement status.
    ///
    /// The invoice row is locked for the duration of the transaction, so two
    /// concurrent payments against the same invoice serialize: each sees the
    /// durable payment total including every previously committed payment,
    /// and the PAID transition is applied exactly once.
    #[instrument(skip(self, input), fields(invoice_id = input.invoice_id))]
    pub async fn create(&self, input: CreatePaymentInput) -> Result<payment::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let inv = invoice::Entity::find_by_id(input.invoice_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| {
                ServiceError::InvalidReference(format!(
                    "invoice {} does not exist",
                    input.invoice_id
                ))
            })?;

        let paymt = payment::ActiveModel {
            invoice_id: Set(inv.id),
            paid_on: Set(input.paid_on),
            amount_cents: Set(input.amount_cents),
            method: Set(input.method),
            reference: Set(input.reference),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::insert_error(e, "payment"))?;

        settle_invoice(&txn, inv).await?;

        txn.commit().await?;

        info!(payment_id = paymt.id, "payment recorded");
        Ok(paymt)
    }

    pub async fn get(&self, id: i64) -> Result<payment::Model, ServiceError> {
        payment::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("payment {} not found", id)))
    }

    pub async fn list(
        &self,
        invoice_id: Option<i64>,
        page: Page,
    ) -> Result<Vec<payment::Model>, ServiceError> {
        let mut query = payment::Entity::find();
        if let Some(invoice_id) = invoice_id {
            query = query.filter(payment::Column::InvoiceId.eq(invoice_id));
        }

        let rows = query
            .order_by_asc(payment::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(&*self.db)
            .await?;
        Ok(rows)
    }
}

/// Recompute settlement for an invoice from its durable payments.
///
/// The accumulated total is read back from the store, not carried as a
/// running figure, so the outcome is correct even when payments were
/// recorded by independent callers. The transition only ever moves toward
/// PAID: an invoice that is already PAID stays PAID (overpayment included),
/// and CANCELLED/OVERDUE are never produced here.
async fn settle_invoice(
    txn: &DatabaseTransaction,
    inv: invoice::Model,
) -> Result<(), ServiceError> {
    if inv.status == InvoiceStatus::Paid {
        return Ok(());
    }

    let amounts: Vec<i64> = payment::Entity::find()
        .filter(payment::Column::InvoiceId.eq(inv.id))
        .select_only()
        .column(payment::Column::AmountCents)
        .into_tuple()
        .all(txn)
        .await?;
    let total_paid: i64 = amounts.into_iter().sum();

    if total_paid >= inv.amount_cents {
        let invoice_id = inv.id;
        let mut active: invoice::ActiveModel = inv.into();
        active.status = Set(InvoiceStatus::Paid);
        active.update(txn).await?;
        info!(invoice_id, total_paid, "invoice settled");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_and_negative_amounts() {
        let mut input = CreatePaymentInput {
            invoice_id: 1,
            paid_on: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            amount_cents: 0,
            method: PaymentMethod::Pix,
            reference: None,
        };
        assert!(input.validate().is_err());

        input.amount_cents = -500;
        assert!(input.validate().is_err());

        input.amount_cents = 1;
        assert!(input.validate().is_ok());
    }
}
