use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::errors::GatewayError;

/// Thin HTTP client for the back-office API.
///
/// Upstream success bodies pass through verbatim. Upstream failures
/// (status >= 400) are not raised as gateway errors: they are wrapped as
/// `{"ok": false, "status": <code>, "body": <upstream body>}` so the calling
/// agent sees what the API rejected and why.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "forwarding GET");
        let response = self.http.get(&url).query(query).send().await?;
        Self::into_value(response).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "forwarding POST");
        let response = self.http.post(&url).json(body).send().await?;
        Self::into_value(response).await
    }

    async fn into_value(response: reqwest::Response) -> Result<Value, GatewayError> {
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = match response.json::<Value>().await {
                Ok(json) => json,
                Err(_) => Value::Null,
            };
            return Ok(json!({
                "ok": false,
                "status": status.as_u16(),
                "body": body,
            }));
        }

        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        Ok(response.json::<Value>().await?)
    }
}
