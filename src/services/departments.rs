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
use crate::entities::{department, employee, purchase_order};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateDepartmentInput {
    #[validate(length(min = 2, message = "name must have at least 2 characters"))]
    pub name: String,
    #[validate(length(min = 2, message = "cost_center must have at least 2 characters"))]
    pub cost_center: String,
}

/// Service for managing departments
#[derive(Clone)]
pub struct DepartmentService {
    db: Arc<DatabaseConnection>,
}

impl DepartmentService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreateDepartmentInput,
    ) -> Result<department::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let dept = department::ActiveModel {
            name: Set(input.name),
            cost_center: Set(input.cost_center),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::insert_error(e, "department"))?;

        txn.commit().await?;

        info!(department_id = dept.id, "department created");
        Ok(dept)
    }

    pub async fn get(&self, id: i64) -> Result<department::Model, ServiceError> {
        department::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("department {} not found", id)))
    }

    pub async fn list(&self, page: Page) -> Result<Vec<department::Model>, ServiceError> {
        let rows = department::Entity::find()
            .order_by_asc(department::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(&*self.db)
            .await?;
        Ok(rows)
    }

    /// Delete a department. Rejected while employees or purchase orders still
    /// reference it.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let dept = department::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("department {} not found", id)))?;

        let employees = employee::Entity::find()
            .filter(employee::Column::DepartmentId.eq(id))
            .count(&txn)
            .await?;
        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::DepartmentId.eq(id))
            .count(&txn)
            .await?;
        if employees > 0 || orders > 0 {
            return Err(ServiceError::Conflict(format!(
                "department {} is in use",
                id
            )));
        }

        dept.delete(&txn)
            .await
            .map_err(|e| ServiceError::delete_error(e, "department"))?;
        txn.commit().await?;

        info!(department_id = id, "department deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_input_requires_minimum_lengths() {
        let input = CreateDepartmentInput {
            name: "F".into(),
            cost_center: "CC-01".into(),
        };
        assert!(input.validate().is_err());

        let input = CreateDepartmentInput {
            name: "Finance".into(),
            cost_center: "CC-01".into(),
        };
        assert!(input.validate().is_ok());
    }
}
