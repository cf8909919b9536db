//! Integration tests for the CRUD surface: uniqueness conflicts, reference
//! checks, the restrict/detach/cascade deletion policy and list windowing.

mod common;

use axum::http::StatusCode;
use common::{response_json, TestApp};
use serde_json::json;

// ==================== Uniqueness ====================

#[tokio::test]
async fn duplicate_department_name_is_a_conflict() {
    let app = TestApp::new().await;
    app.seed_department("Finance").await;

    let response = app
        .post(
            "/departments",
            json!({ "name": "Finance", "cost_center": "CC-OTHER" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn duplicate_employee_email_keeps_first_record_intact() {
    let app = TestApp::new().await;
    let dept = app.seed_department("Finance").await;
    let first = app.seed_employee(dept, "ana@example.com").await;

    let response = app
        .post(
            "/employees",
            json!({
                "department_id": dept,
                "full_name": "Another Ana",
                "email": "ana@example.com",
                "role": "manager",
                "salary_cents": 900_000,
                "hired_on": "2024-04-01",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // the first employee is untouched and remains the only row
    let response = app.get(&format!("/employees/{}", first)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response_json(response).await["full_name"].as_str(),
        Some("Ana Souza")
    );

    let response = app.get("/employees").await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_supplier_tax_id_is_a_conflict() {
    let app = TestApp::new().await;
    app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;

    let response = app
        .post(
            "/suppliers",
            json!({ "name": "Acme Industria", "tax_id": "12.345.678/0001-00" }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invoice_no_is_unique_per_supplier_only() {
    let app = TestApp::new().await;
    let supplier_a = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;
    let supplier_b = app.seed_supplier("Beta SA", "98.765.432/0001-00").await;
    app.seed_invoice(supplier_a, "NF-2000", 10_000, None).await;

    // same number for the same supplier conflicts
    let response = app
        .post(
            "/invoices",
            json!({
                "supplier_id": supplier_a,
                "invoice_no": "NF-2000",
                "issued_on": "2024-05-02",
                "due_on": "2024-06-02",
                "amount_cents": 10_000,
                "status": "OPEN",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // same number for another supplier is fine
    app.seed_invoice(supplier_b, "NF-2000", 10_000, None).await;
}

// ==================== Reference checks ====================

#[tokio::test]
async fn purchase_order_with_unknown_supplier_leaves_no_row() {
    let app = TestApp::new().await;
    let dept = app.seed_department("Finance").await;
    let emp = app.seed_employee(dept, "ana@example.com").await;

    let response = app
        .post(
            "/purchase-orders",
            json!({
                "supplier_id": 4242,
                "requested_by": emp,
                "department_id": dept,
                "status": "DRAFT",
                "total_cents": 1_000,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("does not exist"));

    let response = app.get("/purchase-orders").await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn employee_with_unknown_department_is_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post(
            "/employees",
            json!({
                "department_id": 77,
                "full_name": "Ana Souza",
                "email": "ana@example.com",
                "role": "analyst",
                "salary_cents": 100,
                "hired_on": "2024-03-01",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invoice_with_unknown_purchase_order_is_rejected() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;

    let response = app
        .post(
            "/invoices",
            json!({
                "supplier_id": supplier,
                "po_id": 555,
                "invoice_no": "NF-3000",
                "issued_on": "2024-05-02",
                "due_on": "2024-06-02",
                "amount_cents": 10_000,
                "status": "OPEN",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ==================== Deletion policy ====================

#[tokio::test]
async fn department_delete_is_restricted_while_referenced() {
    let app = TestApp::new().await;
    let dept = app.seed_department("Finance").await;
    let emp = app.seed_employee(dept, "ana@example.com").await;

    let response = app.delete(&format!("/departments/{}", dept)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = response_json(response).await;
    assert!(body["message"].as_str().unwrap().contains("in use"));

    // removing the employee unblocks the department
    let response = app.delete(&format!("/employees/{}", emp)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = app.delete(&format!("/departments/{}", dept)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("/departments/{}", dept)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn employee_delete_is_restricted_while_requester_of_a_po() {
    let app = TestApp::new().await;
    let dept = app.seed_department("Finance").await;
    let emp = app.seed_employee(dept, "ana@example.com").await;
    let supplier = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;
    app.seed_purchase_order(supplier, emp, dept).await;

    let response = app.delete(&format!("/employees/{}", emp)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn supplier_delete_is_restricted_while_invoiced() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;
    app.seed_invoice(supplier, "NF-4000", 10_000, None).await;

    let response = app.delete(&format!("/suppliers/{}", supplier)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn purchase_order_delete_detaches_referencing_invoice() {
    let app = TestApp::new().await;
    let dept = app.seed_department("Finance").await;
    let emp = app.seed_employee(dept, "ana@example.com").await;
    let supplier = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;
    let po = app.seed_purchase_order(supplier, emp, dept).await;
    let invoice = app.seed_invoice(supplier, "NF-5000", 10_000, Some(po)).await;

    let response = app.delete(&format!("/purchase-orders/{}", po)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // the invoice survives with its reference cleared
    let response = app.get(&format!("/invoices/{}", invoice)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["po_id"].is_null());
}

#[tokio::test]
async fn invoice_delete_cascades_to_payments() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;
    let invoice = app.seed_invoice(supplier, "NF-6000", 100_000, None).await;

    let response = app.pay(invoice, 30_000).await;
    let payment_id = response_json(response).await["id"].as_i64().unwrap();
    app.pay(invoice, 20_000).await;

    let response = app.delete(&format!("/invoices/{}", invoice)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.get(&format!("/payments/{}", payment_id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.get("/payments").await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 0);
}

// ==================== List windowing, ordering and filters ====================

#[tokio::test]
async fn lists_are_ordered_by_id_and_respect_the_window() {
    let app = TestApp::new().await;
    for name in ["Finance", "Engineering", "Procurement"] {
        app.seed_department(name).await;
    }

    let response = app.get("/departments").await;
    let all = response_json(response).await;
    let ids: Vec<i64> = all
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);

    // identical query, identical order
    let response = app.get("/departments").await;
    assert_eq!(response_json(response).await, all);

    let response = app.get("/departments?limit=2").await;
    let window = response_json(response).await;
    assert_eq!(window.as_array().unwrap().len(), 2);
    assert_eq!(window.as_array().unwrap()[0]["id"].as_i64(), Some(ids[0]));

    let response = app.get("/departments?limit=2&offset=2").await;
    let window = response_json(response).await;
    assert_eq!(window.as_array().unwrap().len(), 1);
    assert_eq!(window.as_array().unwrap()[0]["id"].as_i64(), Some(ids[2]));
}

#[tokio::test]
async fn out_of_range_limits_are_rejected() {
    let app = TestApp::new().await;
    app.seed_department("Finance").await;

    let response = app.get("/departments?limit=0").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/departments?limit=201").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.get("/departments?limit=200").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn employees_filter_by_department_and_active() {
    let app = TestApp::new().await;
    let finance = app.seed_department("Finance").await;
    let engineering = app.seed_department("Engineering").await;
    app.seed_employee(finance, "ana@example.com").await;
    app.seed_employee(engineering, "bruno@example.com").await;

    let response = app
        .post(
            "/employees",
            json!({
                "department_id": finance,
                "full_name": "Carla Lima",
                "email": "carla@example.com",
                "role": "intern",
                "salary_cents": 200_000,
                "hired_on": "2024-06-01",
                "active": false,
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .get(&format!("/employees?department_id={}", finance))
        .await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 2);

    let response = app.get("/employees?active=false").await;
    let inactive = response_json(response).await;
    assert_eq!(inactive.as_array().unwrap().len(), 1);
    assert_eq!(
        inactive.as_array().unwrap()[0]["email"].as_str(),
        Some("carla@example.com")
    );

    let response = app
        .get(&format!("/employees?department_id={}&active=true", finance))
        .await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invoices_filter_by_status_and_supplier() {
    let app = TestApp::new().await;
    let supplier_a = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;
    let supplier_b = app.seed_supplier("Beta SA", "98.765.432/0001-00").await;
    let open = app.seed_invoice(supplier_a, "NF-7000", 10_000, None).await;
    let paid = app.seed_invoice(supplier_a, "NF-7001", 5_000, None).await;
    app.seed_invoice(supplier_b, "NF-7002", 7_000, None).await;
    app.pay(paid, 5_000).await;

    let response = app.get("/invoices?status=OPEN").await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 2);

    let response = app.get("/invoices?status=PAID").await;
    let settled = response_json(response).await;
    assert_eq!(settled.as_array().unwrap().len(), 1);
    assert_eq!(settled.as_array().unwrap()[0]["id"].as_i64(), Some(paid));

    let response = app
        .get(&format!("/invoices?supplier_id={}&status=OPEN", supplier_a))
        .await;
    let filtered = response_json(response).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
    assert_eq!(filtered.as_array().unwrap()[0]["id"].as_i64(), Some(open));
}

#[tokio::test]
async fn payments_filter_by_invoice() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;
    let first = app.seed_invoice(supplier, "NF-8000", 100_000, None).await;
    let second = app.seed_invoice(supplier, "NF-8001", 100_000, None).await;
    app.pay(first, 10_000).await;
    app.pay(first, 15_000).await;
    app.pay(second, 20_000).await;

    let response = app.get(&format!("/payments?invoice_id={}", first)).await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 2);

    let response = app.get("/payments").await;
    assert_eq!(response_json(response).await.as_array().unwrap().len(), 3);
}

// ==================== Validation and error surface ====================

#[tokio::test]
async fn unknown_enum_values_are_rejected_as_validation_errors() {
    let app = TestApp::new().await;
    let supplier = app.seed_supplier("Acme Ltda", "12.345.678/0001-00").await;

    let response = app
        .post(
            "/invoices",
            json!({
                "supplier_id": supplier,
                "invoice_no": "NF-9000",
                "issued_on": "2024-05-02",
                "due_on": "2024-06-02",
                "amount_cents": 10_000,
                "status": "SETTLED",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_fields_are_rejected_as_validation_errors() {
    let app = TestApp::new().await;

    let response = app.post("/departments", json!({ "name": "Finance" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn short_department_fields_are_rejected() {
    let app = TestApp::new().await;

    let response = app
        .post("/departments", json!({ "name": "F", "cost_center": "C" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_records_return_not_found() {
    let app = TestApp::new().await;

    for path in [
        "/departments/999",
        "/employees/999",
        "/suppliers/999",
        "/purchase-orders/999",
        "/invoices/999",
        "/payments/999",
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
    }

    let response = app.delete("/departments/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn status_and_health_endpoints_respond() {
    let app = TestApp::new().await;

    let response = app.get("/status").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["status"].as_str(), Some("ok"));

    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert_eq!(body["checks"]["database"].as_str(), Some("healthy"));
}
