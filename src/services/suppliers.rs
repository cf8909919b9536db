use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use super::Page;
use crate::entities::{invoice, purchase_order, supplier};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "tax_id must not be empty"))]
    pub tax_id: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Service for managing suppliers
#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
}

impl SupplierService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(tax_id = %input.tax_id))]
    pub async fn create(
        &self,
        input: CreateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let supplier = supplier::ActiveModel {
            name: Set(input.name),
            tax_id: Set(input.tax_id),
            email: Set(input.email),
            phone: Set(input.phone),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::insert_error(e, "supplier"))?;

        txn.commit().await?;

        info!(supplier_id = supplier.id, "supplier created");
        Ok(supplier)
    }

    pub async fn get(&self, id: i64) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("supplier {} not found", id)))
    }

    pub async fn list(&self, page: Page) -> Result<Vec<supplier::Model>, ServiceError> {
        let rows = supplier::Entity::find()
            .order_by_asc(supplier::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(&*self.db)
            .await?;
        Ok(rows)
    }

    /// Delete a supplier. Rejected while purchase orders or invoices still
    /// reference it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let supplier = supplier::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("supplier {} not found", id)))?;

        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::SupplierId.eq(id))
            .count(&txn)
            .await?;
        let invoices = invoice::Entity::find()
            .filter(invoice::Column::SupplierId.eq(id))
            .count(&txn)
            .await?;
        if orders > 0 || invoices > 0 {
            return Err(ServiceError::Conflict(format!("supplier {} is in use", id)));
        }

        supplier
            .delete(&txn)
            .await
            .map_err(|e| ServiceError::delete_error(e, "supplier"))?;
        txn.commit().await?;

        info!(supplier_id = id, "supplier deleted");
        Ok(())
    }
}
