//! Inbox option loader: populate the dependent "From Inbox" selector field.

use reqwest::Method;
use serde_json::Value;

use crate::client::{unwrap_data, CommuneClient, CommuneError};
use crate::host::OptionItem;

/// Fetch the full inbox list and map it to selectable options.
///
/// Label prefers the full address, falls back to `localPart@domain_name`, then
/// to the raw id; value is the inbox id; description is the display name or
/// local part or empty. Failures propagate to the caller (no fallback list).
pub async fn load_inbox_options(client: &CommuneClient) -> Result<Vec<OptionItem>, CommuneError> {
    let response = client.request(Method::GET, "/inboxes", &[], None).await?;
    let inboxes = match unwrap_data(response) {
        Value::Array(list) => list,
        _ => Vec::new(),
    };
    Ok(inboxes.iter().map(inbox_option).collect())
}

fn inbox_option(inbox: &Value) -> OptionItem {
    let id = field(inbox, "id");
    let address = field(inbox, "address");
    let local_part = field(inbox, "localPart");
    let domain_name = field(inbox, "domain_name");

    let label = if !address.is_empty() {
        address
    } else if !local_part.is_empty() && !domain_name.is_empty() {
        format!("{}@{}", local_part, domain_name)
    } else {
        id.clone()
    };

    let description = {
        let display_name = field(inbox, "displayName");
        if !display_name.is_empty() {
            display_name
        } else {
            local_part
        }
    };

    OptionItem {
        label,
        value: id,
        description,
    }
}

fn field(inbox: &Value, name: &str) -> String {
    inbox
        .get(name)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_prefers_address() {
        let opt = inbox_option(&json!({
            "id": "inbox_1",
            "address": "support@acme.com",
            "localPart": "support",
            "domain_name": "acme.com",
            "displayName": "Acme Support"
        }));
        assert_eq!(
            opt,
            OptionItem {
                label: "support@acme.com".to_string(),
                value: "inbox_1".to_string(),
                description: "Acme Support".to_string(),
            }
        );
    }

    #[test]
    fn label_falls_back_to_local_part_at_domain_then_id() {
        let opt = inbox_option(&json!({
            "id": "inbox_2",
            "localPart": "sales",
            "domain_name": "acme.com"
        }));
        assert_eq!(opt.label, "sales@acme.com");
        assert_eq!(opt.description, "sales");

        let opt = inbox_option(&json!({ "id": "inbox_3" }));
        assert_eq!(opt.label, "inbox_3");
        assert_eq!(opt.description, "");
    }
}
