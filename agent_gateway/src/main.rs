use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

mod client;
mod config;
mod errors;
mod normalize;
mod tools;

use client::ApiClient;
use config::Config;
use errors::GatewayError;

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    client: Arc<ApiClient>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "agent_gateway=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env();
    info!("forwarding tool calls to {}", cfg.api_base_url);

    let client = Arc::new(ApiClient::new(
        cfg.api_base_url.clone(),
        cfg.request_timeout(),
    )?);
    let state = AppState { client };

    let app = Router::new()
        .route("/", get(|| async { "agent-gateway up" }))
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(invoke_tool))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let host: std::net::IpAddr = cfg.host.parse()?;
    let addr = SocketAddr::from((host, cfg.port));
    info!("agent-gateway listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Catalog of every callable tool
async fn list_tools() -> Json<Value> {
    Json(tools::catalog())
}

/// Invoke a tool by name; the body carries the named arguments
async fn invoke_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, GatewayError> {
    let args = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let result = tools::dispatch(&state.client, &name, args).await?;
    Ok(Json(result))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
