pub mod departments;
pub mod employees;
pub mod invoices;
pub mod payments;
pub mod purchase_orders;
pub mod suppliers;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Bounded list window. Handlers validate the raw query parameters before
/// constructing this, so a `Page` always holds an in-range limit.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

/// Aggregate of all entity services sharing one database handle.
#[derive(Clone)]
pub struct AppServices {
    pub departments: departments::DepartmentService,
    pub employees: employees::EmployeeService,
    pub suppliers: suppliers::SupplierService,
    pub purchase_orders: purchase_orders::PurchaseOrderService,
    pub invoices: invoices::InvoiceService,
    pub payments: payments::PaymentService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            departments: departments::DepartmentService::new(db.clone()),
            employees: employees::EmployeeService::new(db.clone()),
            suppliers: suppliers::SupplierService::new(db.clone()),
            purchase_orders: purchase_orders::PurchaseOrderService::new(db.clone()),
            invoices: invoices::InvoiceService::new(db.clone()),
            payments: payments::PaymentService::new(db),
        }
    }
}
