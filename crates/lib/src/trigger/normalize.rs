//! Inbound event normalization: flatten a Commune inbound-email event into a
//! stable field set, or pass the raw payload through unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// How much of each inbound event reaches the workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Key email fields (subject, body, sender, thread ID, extracted data).
    #[default]
    Message,
    /// The complete raw webhook payload.
    Full,
}

/// First non-null value among the candidates, cloned.
fn first_defined(candidates: &[Option<&Value>]) -> Option<Value> {
    candidates
        .iter()
        .flatten()
        .find(|v| !v.is_null())
        .map(|v| (*v).clone())
}

fn lookup<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = root;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

/// Normalize one inbound-email event body into exactly one produced record.
///
/// `Full` passes the body through unchanged. `Message` flattens the nested
/// event into a fixed field set, applying each field's fallback chain.
pub fn normalize_inbound(body: &Value, mode: OutputMode) -> Value {
    if mode == OutputMode::Full {
        return body.clone();
    }

    let message = body.get("message");
    let msg = |path: &[&str]| message.and_then(|m| lookup(m, path));

    let sender = msg(&["participants"])
        .and_then(|p| p.as_array())
        .and_then(|participants| {
            participants
                .iter()
                .find(|p| p.get("role").and_then(|r| r.as_str()) == Some("sender"))
        });

    let attachments = msg(&["attachments"])
        .and_then(|a| a.as_array())
        .cloned()
        .unwrap_or_default();

    let mut out = Map::new();
    // Core identifiers; absent when the event omits them.
    if let Some(id) = first_defined(&[msg(&["message_id"])]) {
        out.insert("message_id".into(), id);
    }
    if let Some(id) = first_defined(&[msg(&["thread_id"])]) {
        out.insert("thread_id".into(), id);
    }
    out.insert(
        "inbox_id".into(),
        first_defined(&[body.get("inboxId")]).unwrap_or(Value::Null),
    );
    out.insert(
        "inbox_address".into(),
        first_defined(&[body.get("inboxAddress")]).unwrap_or(Value::Null),
    );
    // Content
    out.insert(
        "subject".into(),
        first_defined(&[msg(&["metadata", "subject"])]).unwrap_or_else(|| json!("")),
    );
    out.insert(
        "body_text".into(),
        first_defined(&[msg(&["content"])]).unwrap_or_else(|| json!("")),
    );
    out.insert(
        "body_html".into(),
        first_defined(&[msg(&["content_html"])]).unwrap_or_else(|| json!("")),
    );
    // Sender
    out.insert(
        "from".into(),
        first_defined(&[sender.and_then(|s| s.get("identity"))]).unwrap_or_else(|| json!("")),
    );
    // Structured extraction (top-level shortcut preferred)
    out.insert(
        "extracted_data".into(),
        first_defined(&[
            body.get("extractedData"),
            msg(&["metadata", "extracted_data"]),
        ])
        .unwrap_or_else(|| json!({})),
    );
    // Security
    out.insert(
        "spam_flagged".into(),
        first_defined(&[lookup(body, &["security", "spam", "flagged"])])
            .unwrap_or_else(|| json!(false)),
    );
    out.insert(
        "prompt_injection".into(),
        first_defined(&[lookup(body, &["security", "prompt_injection", "detected"])])
            .unwrap_or_else(|| json!(false)),
    );
    // Timestamps
    out.insert(
        "received_at".into(),
        first_defined(&[msg(&["created_at"])])
            .unwrap_or_else(|| json!(chrono::Utc::now().to_rfc3339())),
    );
    // Attachments
    out.insert("has_attachments".into(), json!(!attachments.is_empty()));
    out.insert("attachment_ids".into(), Value::Array(attachments));

    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound_event() -> Value {
        json!({
            "message": {
                "message_id": "m1",
                "thread_id": "t1",
                "metadata": { "subject": "Hi" },
                "content": "body",
                "participants": [
                    { "role": "recipient", "identity": "us@inbox.com" },
                    { "role": "sender", "identity": "a@b.com" }
                ],
                "attachments": ["att1"]
            },
            "inboxId": "i1",
            "inboxAddress": "i1@x.com"
        })
    }

    #[test]
    fn message_mode_flattens_the_event() {
        let out = normalize_inbound(&inbound_event(), OutputMode::Message);
        assert_eq!(out["message_id"], "m1");
        assert_eq!(out["thread_id"], "t1");
        assert_eq!(out["inbox_id"], "i1");
        assert_eq!(out["inbox_address"], "i1@x.com");
        assert_eq!(out["subject"], "Hi");
        assert_eq!(out["body_text"], "body");
        assert_eq!(out["body_html"], "");
        assert_eq!(out["from"], "a@b.com");
        assert_eq!(out["extracted_data"], json!({}));
        assert_eq!(out["spam_flagged"], false);
        assert_eq!(out["prompt_injection"], false);
        assert_eq!(out["has_attachments"], true);
        assert_eq!(out["attachment_ids"], json!(["att1"]));
        assert!(out["received_at"].is_string());
    }

    #[test]
    fn full_mode_passes_the_raw_body_through() {
        let body = inbound_event();
        assert_eq!(normalize_inbound(&body, OutputMode::Full), body);
    }

    #[test]
    fn empty_event_gets_every_default() {
        let out = normalize_inbound(&json!({}), OutputMode::Message);
        assert!(out.get("message_id").is_none());
        assert!(out.get("thread_id").is_none());
        assert_eq!(out["inbox_id"], Value::Null);
        assert_eq!(out["subject"], "");
        assert_eq!(out["body_text"], "");
        assert_eq!(out["from"], "");
        assert_eq!(out["extracted_data"], json!({}));
        assert_eq!(out["spam_flagged"], false);
        assert_eq!(out["prompt_injection"], false);
        assert_eq!(out["has_attachments"], false);
        assert_eq!(out["attachment_ids"], json!([]));
        // Fallback timestamp is stamped at processing time.
        assert!(out["received_at"].is_string());
    }

    #[test]
    fn extracted_data_prefers_top_level_then_metadata() {
        let body = json!({
            "extractedData": { "intent": "refund" },
            "message": { "metadata": { "extracted_data": { "intent": "other" } } }
        });
        let out = normalize_inbound(&body, OutputMode::Message);
        assert_eq!(out["extracted_data"], json!({ "intent": "refund" }));

        let body = json!({
            "message": { "metadata": { "extracted_data": { "intent": "other" } } }
        });
        let out = normalize_inbound(&body, OutputMode::Message);
        assert_eq!(out["extracted_data"], json!({ "intent": "other" }));
    }

    #[test]
    fn security_flags_are_read_from_nested_context() {
        let body = json!({
            "security": {
                "spam": { "flagged": true },
                "prompt_injection": { "detected": true }
            }
        });
        let out = normalize_inbound(&body, OutputMode::Message);
        assert_eq!(out["spam_flagged"], true);
        assert_eq!(out["prompt_injection"], true);
    }

    #[test]
    fn created_at_wins_over_processing_time() {
        let body = json!({ "message": { "created_at": "2026-01-02T03:04:05Z" } });
        let out = normalize_inbound(&body, OutputMode::Message);
        assert_eq!(out["received_at"], "2026-01-02T03:04:05Z");
    }

    #[test]
    fn missing_sender_role_yields_empty_from() {
        let body = json!({
            "message": { "participants": [{ "role": "recipient", "identity": "x@y.com" }] }
        });
        let out = normalize_inbound(&body, OutputMode::Message);
        assert_eq!(out["from"], "");
    }
}
