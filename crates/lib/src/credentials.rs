//! Commune API credential: descriptor, header injection, connectivity test.
//!
//! The credential is a single API key injected as a bearer header. The test
//! request lists inboxes; success implies a valid key.

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::{CommuneClient, CommuneError};

/// Credential type name referenced by the node descriptors.
pub const CREDENTIAL_NAME: &str = "communeApi";

/// Build the Authorization header value for an API key.
pub fn auth_header_value(api_key: &str) -> String {
    format!("Bearer {}", api_key)
}

/// Serializable credential descriptor for the host: the masked apiKey property,
/// the header-injection rule, and the connectivity-test request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub documentation_url: &'static str,
    pub properties: Vec<Value>,
    pub authenticate: Value,
    pub test: Value,
}

pub fn credential_descriptor() -> CredentialDescriptor {
    CredentialDescriptor {
        name: CREDENTIAL_NAME,
        display_name: "Commune API",
        documentation_url: "https://docs.commune.email/authentication",
        properties: vec![json!({
            "displayName": "API Key",
            "name": "apiKey",
            "type": "string",
            "typeOptions": { "password": true },
            "required": true,
            "default": "",
            "description": "Your Commune API key. Find it in your dashboard under Settings → API Keys.",
            "placeholder": "comm_...",
        })],
        authenticate: json!({
            "type": "generic",
            "properties": {
                "headers": { "Authorization": "Bearer {{apiKey}}" },
            },
        }),
        test: json!({
            "request": { "method": "GET", "url": "/inboxes" },
        }),
    }
}

/// Verify the key by listing inboxes. Any non-2xx or transport failure is the error.
pub async fn test_credentials(client: &CommuneClient) -> Result<(), CommuneError> {
    client
        .request(reqwest::Method::GET, "/inboxes", &[], None)
        .await
        .map(|_| ())
}
