//! Commune trigger node: webhook lifecycle on an inbox plus inbound event
//! normalization. The receiver wires both to the HTTP side.

mod lifecycle;
mod normalize;

use serde_json::json;

use crate::node::{NodeDescriptor, NodeProperty, PropertyKind, PropertyOption};

pub use lifecycle::InboxWebhook;
pub use normalize::{normalize_inbound, OutputMode};

/// The trigger-node descriptor: inbox coordinates, event subscription, and
/// output-shape selector.
pub fn trigger_descriptor() -> NodeDescriptor {
    NodeDescriptor {
        display_name: "Commune Trigger",
        name: "communeTrigger",
        group: "trigger",
        description: "Starts a workflow when an email arrives in a Commune inbox",
        credentials: vec![crate::credentials::CREDENTIAL_NAME],
        properties: vec![
            string_prop(
                "Domain ID",
                "domainId",
                "The domain ID that owns the inbox. Find this in your Commune dashboard under Domains.",
                "d_abc123",
            ),
            string_prop(
                "Inbox ID",
                "inboxId",
                "The inbox to listen for emails on",
                "inbox_xyz",
            ),
            NodeProperty {
                display_name: "Events",
                name: "events",
                kind: PropertyKind::MultiOptions,
                required: false,
                default: json!(["inbound"]),
                description: Some("Which events to listen for"),
                placeholder: None,
                type_options: None,
                options: vec![PropertyOption {
                    name: "Inbound Email",
                    value: "inbound",
                    description: Some("Trigger when an email is received"),
                }],
                items: Vec::new(),
                show: None,
            },
            NodeProperty {
                display_name: "Output",
                name: "output",
                kind: PropertyKind::Options,
                required: false,
                default: json!("message"),
                description: Some("How much data to pass into the workflow"),
                placeholder: None,
                type_options: None,
                options: vec![
                    PropertyOption {
                        name: "Message Only",
                        value: "message",
                        description: Some(
                            "Return the key email fields (subject, body, sender, thread ID, extracted data). Recommended.",
                        ),
                    },
                    PropertyOption {
                        name: "Full Payload",
                        value: "full",
                        description: Some(
                            "Return the complete raw webhook payload including raw email, security context, and attachment metadata",
                        ),
                    },
                ],
                items: Vec::new(),
                show: None,
            },
        ],
    }
}

fn string_prop(
    display_name: &'static str,
    name: &'static str,
    description: &'static str,
    placeholder: &'static str,
) -> NodeProperty {
    NodeProperty {
        display_name,
        name,
        kind: PropertyKind::String,
        required: true,
        default: json!(""),
        description: Some(description),
        placeholder: Some(placeholder),
        type_options: None,
        options: Vec::new(),
        items: Vec::new(),
        show: None,
    }
}
