use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_departments_table::Migration),
            Box::new(m20240101_000002_create_employees_table::Migration),
            Box::new(m20240101_000003_create_suppliers_table::Migration),
            Box::new(m20240101_000004_create_purchase_orders_table::Migration),
            Box::new(m20240101_000005_create_invoices_table::Migration),
            Box::new(m20240101_000006_create_payments_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_departments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_departments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Departments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Departments::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Departments::Name).string().not_null())
                        .col(ColumnDef::new(Departments::CostCenter).string().not_null())
                        .col(
                            ColumnDef::new(Departments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_departments_name")
                        .table(Departments::Table)
                        .col(Departments::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_departments_cost_center")
                        .table(Departments::Table)
                        .col(Departments::CostCenter)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Departments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Departments {
        Table,
        Id,
        Name,
        CostCenter,
        CreatedAt,
    }
}

mod m20240101_000002_create_employees_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_employees_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Employees::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Employees::DepartmentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Employees::FullName).string().not_null())
                        .col(ColumnDef::new(Employees::Email).string().not_null())
                        .col(ColumnDef::new(Employees::Role).string().not_null())
                        .col(
                            ColumnDef::new(Employees::SalaryCents)
                                .big_integer()
                                .not_null()
                                .check(Expr::col(Employees::SalaryCents).gte(0)),
                        )
                        .col(ColumnDef::new(Employees::HiredOn).date().not_null())
                        .col(
                            ColumnDef::new(Employees::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Employees::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_employees_department")
                                .from(Employees::Table, Employees::DepartmentId)
                                .to(Departments::Table, Departments::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_employees_email")
                        .table(Employees::Table)
                        .col(Employees::Email)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_employees_department_id")
                        .table(Employees::Table)
                        .col(Employees::DepartmentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Employees {
        Table,
        Id,
        DepartmentId,
        FullName,
        Email,
        Role,
        SalaryCents,
        HiredOn,
        Active,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Departments {
        Table,
        Id,
    }
}

mod m20240101_000003_create_suppliers_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_suppliers_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::TaxId).string().not_null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(
                            ColumnDef::new(Suppliers::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_suppliers_name")
                        .table(Suppliers::Table)
                        .col(Suppliers::Name)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_suppliers_tax_id")
                        .table(Suppliers::Table)
                        .col(Suppliers::TaxId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Suppliers {
        Table,
        Id,
        Name,
        TaxId,
        Email,
        Phone,
        CreatedAt,
    }
}

mod m20240101_000004_create_purchase_orders_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_purchase_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseOrders::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::SupplierId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::RequestedBy)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::DepartmentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::Status)
                                .string_len(20)
                                .not_null()
                                .check(Expr::col(PurchaseOrders::Status).is_in([
                                    "DRAFT",
                                    "APPROVED",
                                    "SENT",
                                    "RECEIVED",
                                    "CANCELLED",
                                ])),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::TotalCents)
                                .big_integer()
                                .not_null()
                                .check(Expr::col(PurchaseOrders::TotalCents).gte(0)),
                        )
                        .col(
                            ColumnDef::new(PurchaseOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_supplier")
                                .from(PurchaseOrders::Table, PurchaseOrders::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_requested_by")
                                .from(PurchaseOrders::Table, PurchaseOrders::RequestedBy)
                                .to(Employees::Table, Employees::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_orders_department")
                                .from(PurchaseOrders::Table, PurchaseOrders::DepartmentId)
                                .to(Departments::Table, Departments::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_supplier_id")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::SupplierId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_orders_status")
                        .table(PurchaseOrders::Table)
                        .col(PurchaseOrders::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PurchaseOrders {
        Table,
        Id,
        SupplierId,
        RequestedBy,
        DepartmentId,
        Status,
        TotalCents,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Employees {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Departments {
        Table,
        Id,
    }
}

mod m20240101_000005_create_invoices_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_invoices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Invoices::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::SupplierId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Invoices::PoId).big_integer().null())
                        .col(ColumnDef::new(Invoices::InvoiceNo).string().not_null())
                        .col(ColumnDef::new(Invoices::IssuedOn).date().not_null())
                        .col(ColumnDef::new(Invoices::DueOn).date().not_null())
                        .col(
                            ColumnDef::new(Invoices::AmountCents)
                                .big_integer()
                                .not_null()
                                .check(Expr::col(Invoices::AmountCents).gte(0)),
                        )
                        .col(
                            ColumnDef::new(Invoices::Status)
                                .string_len(20)
                                .not_null()
                                .check(
                                    Expr::col(Invoices::Status)
                                        .is_in(["OPEN", "PAID", "CANCELLED", "OVERDUE"]),
                                ),
                        )
                        .col(
                            ColumnDef::new(Invoices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_supplier")
                                .from(Invoices::Table, Invoices::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_purchase_order")
                                .from(Invoices::Table, Invoices::PoId)
                                .to(PurchaseOrders::Table, PurchaseOrders::Id)
                                .on_delete(ForeignKeyAction::SetNull)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // invoice_no is only unique per supplier
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_invoices_supplier_invoice_no")
                        .table(Invoices::Table)
                        .col(Invoices::SupplierId)
                        .col(Invoices::InvoiceNo)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_status")
                        .table(Invoices::Table)
                        .col(Invoices::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_po_id")
                        .table(Invoices::Table)
                        .col(Invoices::PoId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Invoices {
        Table,
        Id,
        SupplierId,
        PoId,
        InvoiceNo,
        IssuedOn,
        DueOn,
        AmountCents,
        Status,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum PurchaseOrders {
        Table,
        Id,
    }
}

mod m20240101_000006_create_payments_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_payments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Payments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Payments::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Payments::InvoiceId).big_integer().not_null())
                        .col(ColumnDef::new(Payments::PaidOn).date().not_null())
                        .col(
                            ColumnDef::new(Payments::AmountCents)
                                .big_integer()
                                .not_null()
                                .check(Expr::col(Payments::AmountCents).gt(0)),
                        )
                        .col(
                            ColumnDef::new(Payments::Method)
                                .string_len(20)
                                .not_null()
                                .check(Expr::col(Payments::Method).is_in([
                                    "PIX",
                                    "TED",
                                    "BOLETO",
                                    "CREDIT_CARD",
                                    "CASH",
                                ])),
                        )
                        .col(ColumnDef::new(Payments::Reference).string().null())
                        .col(
                            ColumnDef::new(Payments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null()
                                .default(Expr::current_timestamp()),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_payments_invoice")
                                .from(Payments::Table, Payments::InvoiceId)
                                .to(Invoices::Table, Invoices::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_payments_invoice_id")
                        .table(Payments::Table)
                        .col(Payments::InvoiceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Payments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Payments {
        Table,
        Id,
        InvoiceId,
        PaidOn,
        AmountCents,
        Method,
        Reference,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
    }
}
