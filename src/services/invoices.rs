use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::Page;
use crate::entities::invoice::InvoiceStatus;
use crate::entities::{invoice, payment, purchase_order, supplier};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateInvoiceInput {
    pub supplier_id: i64,
    #[serde(default)]
    pub po_id: Option<i64>,
    #[validate(length(min = 1, message = "invoice_no must not be empty"))]
    pub invoice_no: String,
    pub issued_on: NaiveDate,
    pub due_on: NaiveDate,
    #[validate(range(min = 0, message = "amount_cents must not be negative"))]
    pub amount_cents: i64,
    pub status: InvoiceStatus,
}

/// Service for managing invoices
#[derive(Clone)]
pub struct InvoiceService {
    db: Arc<DatabaseConnection>,
}

impl InvoiceService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create an invoice. `invoice_no` is unique per supplier, not globally.
    #[instrument(skip(self, input), fields(invoice_no = %input.invoice_no))]
    pub async fn create(&self, input: CreateInvoiceInput) -> Result<invoice::Model, ServiceError> {
        let txn = self.db.begin().await?;

        if supplier::Entity::find_by_id(input.supplier_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidReference(format!(
                "supplier {} does not exist",
                input.supplier_id
            )));
        }
        if let Some(po_id) = input.po_id {
            if purchase_order::Entity::find_by_id(po_id)
                .one(&txn)
                .await?
                .is_none()
            {
                return Err(ServiceError::InvalidReference(format!(
                    "purchase order {} does not exist",
                    po_id
                )));
            }
        }

        let inv = invoice::ActiveModel {
            supplier_id: Set(input.supplier_id),
            po_id: Set(input.po_id),
            invoice_no: Set(input.invoice_no),
            issued_on: Set(input.issued_on),
            due_on: Set(input.due_on),
            amount_cents: Set(input.amount_cents),
            status: Set(input.status),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::insert_error(e, "invoice"))?;

        txn.commit().await?;

        info!(invoice_id = inv.id, "invoice created");
        Ok(inv)
    }

    pub async fn get(&self, id: i64) -> Result<invoice::Model, ServiceError> {
        invoice::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("invoice {} not found", id)))
    }

    pub async fn list(
        &self,
        status: Option<InvoiceStatus>,
        supplier_id: Option<i64>,
        page: Page,
    ) -> Result<Vec<invoice::Model>, ServiceError> {
        let mut query = invoice::Entity::find();
        if let Some(status) = status {
            query = query.filter(invoice::Column::Status.eq(status));
        }
        if let Some(supplier_id) = supplier_id {
            query = query.filter(invoice::Column::SupplierId.eq(supplier_id));
        }

        let rows = query
            .order_by_asc(invoice::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(&*self.db)
            .await?;
        Ok(rows)
    }

    /// Delete an invoice together with its payments. Payments carry no
    /// meaning without their invoice, so this cascades rather than restricts.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let inv = invoice::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("invoice {} not found", id)))?;

        payment::Entity::delete_many()
            .filter(payment::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;

        inv.delete(&txn)
            .await
            .map_err(|e| ServiceError::delete_error(e, "invoice"))?;
        txn.commit().await?;

        info!(invoice_id = id, "invoice deleted with payments");
        Ok(())
    }
}
