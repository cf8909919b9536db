use chrono::{NaiveDate, Utc};
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
pub struct CreateEmployeeInput {
    pub department_id: i64,
    #[validate(length(min = 1, message = "full_name must not be empty"))]
    pub full_name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "role must not be empty"))]
    pub role: String,
    #[validate(range(min = 0, message = "salary_cents must not be negative"))]
    pub salary_cents: i64,
    pub hired_on: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Service for managing employees
#[derive(Clone)]
pub struct EmployeeService {
    db: Arc<DatabaseConnection>,
}

impl EmployeeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create an employee. The department reference is checked in the same
    /// transaction as the insert, so a concurrent department delete cannot
    /// slip between check and write.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create(
        &self,
        input: CreateEmployeeInput,
    ) -> Result<employee::Model, ServiceError> {
        let txn = self.db.begin().await?;

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

        let emp = employee::ActiveModel {
            department_id: Set(input.department_id),
            full_name: Set(input.full_name),
            email: Set(input.email),
            role: Set(input.role),
            salary_cents: Set(input.salary_cents),
            hired_on: Set(input.hired_on),
            active: Set(input.active),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| ServiceError::insert_error(e, "employee"))?;

        txn.commit().await?;

        info!(employee_id = emp.id, "employee created");
        Ok(emp)
    }

    pub async fn get(&self, id: i64) -> Result<employee::Model, ServiceError> {
        employee::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("employee {} not found", id)))
    }

    pub async fn list(
        &self,
        department_id: Option<i64>,
        active: Option<bool>,
        page: Page,
    ) -> Result<Vec<employee::Model>, ServiceError> {
        let mut query = employee::Entity::find();
        if let Some(department_id) = department_id {
            query = query.filter(employee::Column::DepartmentId.eq(department_id));
        }
        if let Some(active) = active {
            query = query.filter(employee::Column::Active.eq(active));
        }

        let rows = query
            .order_by_asc(employee::Column::Id)
            .limit(page.limit)
            .offset(page.offset)
            .all(&*self.db)
            .await?;
        Ok(rows)
    }

    /// Delete an employee. Rejected while purchase orders name the employee
    /// as requester.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;

        let emp = employee::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("employee {} not found", id)))?;

        let orders = purchase_order::Entity::find()
            .filter(purchase_order::Column::RequestedBy.eq(id))
            .count(&txn)
            .await?;
        if orders > 0 {
            return Err(ServiceError::Conflict(format!("employee {} is in use", id)));
        }

        emp.delete(&txn)
            .await
            .map_err(|e| ServiceError::delete_error(e, "employee"))?;
        txn.commit().await?;

        info!(employee_id = id, "employee deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> CreateEmployeeInput {
        CreateEmployeeInput {
            department_id: 1,
            full_name: "Ana Souza".into(),
            email: "ana@example.com".into(),
            role: "analyst".into(),
            salary_cents: 750_000,
            hired_on: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            active: true,
        }
    }

    #[test]
    fn rejects_malformed_email() {
        let mut input = valid_input();
        input.email = "not-an-email".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn rejects_negative_salary() {
        let mut input = valid_input();
        input.salary_cents = -1;
        assert!(input.validate().is_err());
    }

    #[test]
    fn accepts_valid_input() {
        assert!(valid_input().validate().is_ok());
    }
}
