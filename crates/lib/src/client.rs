//! Commune HTTP API client (https://api.commune.email/v1).
//!
//! One request entry point shared by the action node, the option loader, and
//! the webhook lifecycle. Every request carries the bearer credential; mutation
//! requests send JSON bodies.

use reqwest::Method;
use serde_json::Value;

use crate::credentials;

const DEFAULT_BASE_URL: &str = "https://api.commune.email/v1";

/// Client for the Commune REST API.
#[derive(Clone)]
pub struct CommuneClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum CommuneError {
    #[error("commune request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("commune api error: {status} {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("commune api returned invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CommuneClient {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(commune_api_base);
        Self {
            base_url,
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform one API call. `path` is appended to the base URL; `query` pairs are
    /// URL-encoded by the HTTP layer; a body, when present, is sent as JSON with
    /// `Content-Type: application/json`. Non-2xx responses become [`CommuneError::Api`];
    /// an empty 2xx body decodes as JSON null.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<Value, CommuneError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, &url).header(
            "Authorization",
            credentials::auth_header_value(&self.api_key),
        );
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(b) = body {
            req = req.json(b);
        }
        let res = req.send().await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(CommuneError::Api { status, body });
        }
        let text = res.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Unwrap the `{ "data": ... }` envelope Commune wraps most responses in.
/// A missing or null `data` property leaves the response as-is.
pub fn unwrap_data(response: Value) -> Value {
    match response.get("data") {
        Some(data) if !data.is_null() => data.clone(),
        _ => response,
    }
}

/// Resolve the Commune API base URL (COMMUNE_API_BASE env for tests or custom endpoints).
pub fn commune_api_base() -> String {
    std::env::var("COMMUNE_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_data_takes_envelope_contents() {
        assert_eq!(
            unwrap_data(json!({ "data": [1, 2] })),
            json!([1, 2])
        );
        assert_eq!(
            unwrap_data(json!({ "data": { "x": 1 } })),
            json!({ "x": 1 })
        );
    }

    #[test]
    fn unwrap_data_leaves_bare_values_alone() {
        assert_eq!(unwrap_data(json!([1, 2])), json!([1, 2]));
        assert_eq!(unwrap_data(json!({ "x": 1 })), json!({ "x": 1 }));
        assert_eq!(unwrap_data(json!({ "data": null })), json!({ "data": null }));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let c = CommuneClient::new("comm_k", Some("http://127.0.0.1:9/v1/".to_string()));
        assert_eq!(c.base_url(), "http://127.0.0.1:9/v1");
    }
}
