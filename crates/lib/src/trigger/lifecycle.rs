//! Webhook lifecycle on a Commune inbox: check, register, deregister.
//!
//! The registered/not-registered state lives entirely on the Commune API;
//! nothing is cached locally. A failed lookup reads as "not registered" and a
//! failed deregistration reads as done.

use reqwest::Method;
use serde_json::json;

use crate::client::{unwrap_data, CommuneClient, CommuneError};

/// Handle to one inbox's webhook registration.
pub struct InboxWebhook {
    client: CommuneClient,
    domain_id: String,
    inbox_id: String,
}

impl InboxWebhook {
    pub fn new(
        client: CommuneClient,
        domain_id: impl Into<String>,
        inbox_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            domain_id: domain_id.into(),
            inbox_id: inbox_id.into(),
        }
    }

    fn path(&self) -> String {
        format!("/domains/{}/inboxes/{}", self.domain_id, self.inbox_id)
    }

    /// True iff the inbox's webhook endpoint equals `callback_url`.
    /// A failed lookup returns false rather than an error.
    pub async fn is_registered(&self, callback_url: &str) -> bool {
        match self
            .client
            .request(Method::GET, &self.path(), &[], None)
            .await
        {
            Ok(response) => {
                let inbox = unwrap_data(response);
                inbox
                    .get("webhook")
                    .and_then(|w| w.get("endpoint"))
                    .and_then(|e| e.as_str())
                    == Some(callback_url)
            }
            Err(e) => {
                log::debug!(
                    "webhook lookup for inbox {} failed, treating as unregistered: {}",
                    self.inbox_id,
                    e
                );
                false
            }
        }
    }

    /// Point the inbox's webhook at `callback_url` for the given events.
    pub async fn register(
        &self,
        callback_url: &str,
        events: &[String],
    ) -> Result<(), CommuneError> {
        self.client
            .request(
                Method::PUT,
                &self.path(),
                &[],
                Some(&json!({ "webhook": { "endpoint": callback_url, "events": events } })),
            )
            .await?;
        log::info!(
            "webhook registered on inbox {}: {}",
            self.inbox_id,
            callback_url
        );
        Ok(())
    }

    /// Clear the inbox's webhook endpoint. Failures (e.g. the inbox was already
    /// deleted) are logged and treated as successful cleanup.
    pub async fn deregister(&self) {
        let result = self
            .client
            .request(
                Method::PUT,
                &self.path(),
                &[],
                Some(&json!({ "webhook": { "endpoint": null } })),
            )
            .await;
        match result {
            Ok(_) => log::info!("webhook removed from inbox {}", self.inbox_id),
            Err(e) => log::debug!(
                "webhook removal for inbox {} failed (inbox may already be gone): {}",
                self.inbox_id,
                e
            ),
        }
    }
}
