use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::Page;
use crate::entities::purchase_order::PurchaseOrderStatus;
use crate::entities::{department, employee, invoice, purchase_order, supplier};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePurchaseOrderInput {
    pub supplier_id: i64,
    pub requested_by: i64,
    pub department_id: i64,
    pub status: PurchaseOrderStatus,
    #[validate(range(min = 0, message = "total_cents must not be negative"))]
    pub total_cents: i64,
}

/// Service for managing purchase orders
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a purchase order. All three references are resolved inside the
    /// insert transaction.
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<purchase_order::Model, ServiceError> {
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
        if employee::Entity::find_by_id(input.requested_by)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidReference(format!(
                "employee {} does not exist",
                input.requested_by
            )));
        }
        if department::Entity::find_by_id(input.department_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(ServiceError::InvalidReference(format!(
                "department {} does not exist",
                input.department_id
            )));
        }

        let po = purchase_order::ActiveModel {
            supplier_id: Set(input.supplier_id),
            requested_by: Set(input.requested_by),
            department_id: Set(input.department_id),
            status: Set(input.status),
            total_cents: Set(input.total_cents),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::insert_error(e, "purchase order"))?;

        txn.commit().await?;

        info!(purchase_order_id = po.id, "purchase order created");
        Ok(po)
    }

    pub async fn get(&self, id: i64) -> Result<purchase_order::Model, ServiceError> {
        purchase_order::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("purchase order {} not found", id)))
    }

    pub async fn list(
        &self,
        status: Option<PurchaseOrderStatus>,
        page: Page,
    ) -> Result<Vec<purchase_order::Model>, ServiceError> {
        let mut query = purchase_order::Entity::find();
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status));
        }

        let rows = query
            .order_by_asc(purchase_order::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(&*self.db)
            .await?;
        Ok(rows)
    }

    /// Delete a purchase order. Invoices referencing it are detached
    /// (`po_id` cleared) in the same transaction; the invoices themselves
    /// keep their records.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let po = purchase_order::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("purchase order {} not found", id)))?;

        invoice::Entity::update_many()
            .col_expr(invoice::Column::PoId, Expr::value(None::<i64>))
            .filter(invoice::Column::PoId.eq(id))
            .exec(&txn)
            .await?;

        po.delete(&txn)
            .await
            .map_err(|e| ServiceError::delete_error(e, "purchase order"))?;
        txn.commit().await?;

        info!(purchase_order_id = id, "purchase order deleted");
        Ok(())
    }
}
