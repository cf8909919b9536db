//! Shared harness for API integration tests: a fresh SQLite-backed
//! application per test, driven through the real router.
#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use backoffice_api::{config::AppConfig, db, AppState};

pub struct TestApp {
    router: Router,
    _db_dir: TempDir,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir for test database");
        let db_path = dir.path().join("backoffice_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1",
            0,
            "test",
        );
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("connect to test database");
        db::run_migrations(&pool).await.expect("run migrations");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = backoffice_api::api_routes().with_state(state);

        Self {
            router,
            _db_dir: dir,
        }
    }

    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(path);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("request build"))
            .await
            .expect("router call")
    }

    pub async fn post(&self, path: &str, body: Value) -> Response {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn get(&self, path: &str) -> Response {
        self.request(Method::GET, path, None).await
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.request(Method::DELETE, path, None).await
    }

    // Seed helpers; each asserts creation succeeded and returns the new id.

    pub async fn seed_department(&self, name: &str) -> i64 {
        let response = self
            .post(
                "/departments",
                json!({ "name": name, "cost_center": format!("CC-{}", name) }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["id"].as_i64().expect("id")
    }

    pub async fn seed_employee(&self, department_id: i64, email: &str) -> i64 {
        let response = self
            .post(
                "/employees",
                json!({
                    "department_id": department_id,
                    "full_name": "Ana Souza",
                    "email": email,
                    "role": "analyst",
                    "salary_cents": 750_000,
                    "hired_on": "2024-03-01",
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["id"].as_i64().expect("id")
    }

    pub async fn seed_supplier(&self, name: &str, tax_id: &str) -> i64 {
        let response = self
            .post("/suppliers", json!({ "name": name, "tax_id": tax_id }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["id"].as_i64().expect("id")
    }

    pub async fn seed_purchase_order(
        &self,
        supplier_id: i64,
        requested_by: i64,
        department_id: i64,
    ) -> i64 {
        let response = self
            .post(
                "/purchase-orders",
                json!({
                    "supplier_id": supplier_id,
                    "requested_by": requested_by,
                    "department_id": department_id,
                    "status": "APPROVED",
                    "total_cents": 500_000,
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["id"].as_i64().expect("id")
    }

    pub async fn seed_invoice(
        &self,
        supplier_id: i64,
        invoice_no: &str,
        amount_cents: i64,
        po_id: Option<i64>,
    ) -> i64 {
        let response = self
            .post(
                "/invoices",
                json!({
                    "supplier_id": supplier_id,
                    "po_id": po_id,
                    "invoice_no": invoice_no,
                    "issued_on": "2024-05-02",
                    "due_on": "2024-06-02",
                    "amount_cents": amount_cents,
                    "status": "OPEN",
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response_json(response).await["id"].as_i64().expect("id")
    }

    pub async fn pay(&self, invoice_id: i64, amount_cents: i64) -> Response {
        self.post(
            "/payments",
            json!({
                "invoice_id": invoice_id,
                "paid_on": "2024-05-10",
                "amount_cents": amount_cents,
                "method": "PIX",
            }),
        )
        .await
    }

    pub async fn invoice_status(&self, invoice_id: i64) -> String {
        let response = self.get(&format!("/invoices/{}", invoice_id)).await;
        assert_eq!(response.status(), StatusCode::OK);
        response_json(response).await["status"]
            .as_str()
            .expect("status")
            .to_string()
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}
