//! Parameter-form metadata for the action node: the typed field definitions
//! (names, types, defaults, visibility conditions) the host renders and feeds
//! back through [`super::ItemParams`].

use serde::Serialize;
use serde_json::{json, Value};

/// Serializable node descriptor consumed by the host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescriptor {
    pub display_name: &'static str,
    pub name: &'static str,
    pub group: &'static str,
    pub description: &'static str,
    pub credentials: Vec<&'static str>,
    pub properties: Vec<NodeProperty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PropertyKind {
    Options,
    MultiOptions,
    String,
    Number,
    Json,
    Collection,
}

/// One selectable option in an options/multiOptions property.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOption {
    pub name: &'static str,
    pub value: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

/// Visibility condition: show the property only for these selector values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowWhen {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resource: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub operation: Vec<&'static str>,
}

/// One typed parameter field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperty {
    pub display_name: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    #[serde(skip_serializing_if = "is_false")]
    pub required: bool,
    pub default: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_options: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PropertyOption>,
    /// Member fields of a collection property.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NodeProperty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<ShowWhen>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl NodeProperty {
    fn new(display_name: &'static str, name: &'static str, kind: PropertyKind) -> Self {
        Self {
            display_name,
            name,
            kind,
            required: false,
            default: json!(""),
            description: None,
            placeholder: None,
            type_options: None,
            options: Vec::new(),
            items: Vec::new(),
            show: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn default_value(mut self, v: Value) -> Self {
        self.default = v;
        self
    }

    fn desc(mut self, d: &'static str) -> Self {
        self.description = Some(d);
        self
    }

    fn placeholder(mut self, p: &'static str) -> Self {
        self.placeholder = Some(p);
        self
    }

    fn type_options(mut self, v: Value) -> Self {
        self.type_options = Some(v);
        self
    }

    fn options(mut self, options: Vec<PropertyOption>) -> Self {
        self.options = options;
        self
    }

    fn items(mut self, items: Vec<NodeProperty>) -> Self {
        self.items = items;
        self
    }

    fn show(mut self, resource: &[&'static str], operation: &[&'static str]) -> Self {
        self.show = Some(ShowWhen {
            resource: resource.to_vec(),
            operation: operation.to_vec(),
        });
        self
    }
}

fn opt(name: &'static str, value: &'static str) -> PropertyOption {
    PropertyOption {
        name,
        value,
        description: None,
    }
}

fn opt_desc(
    name: &'static str,
    value: &'static str,
    description: &'static str,
) -> PropertyOption {
    PropertyOption {
        name,
        value,
        description: Some(description),
    }
}

/// The full action-node descriptor: resource/operation selectors and every
/// operation's parameter fields, with visibility keyed on the selectors.
pub fn node_descriptor() -> NodeDescriptor {
    NodeDescriptor {
        display_name: "Commune",
        name: "commune",
        group: "output",
        description:
            "Send and receive emails, manage inboxes, and search conversations with Commune",
        credentials: vec![crate::credentials::CREDENTIAL_NAME],
        properties: node_properties(),
    }
}

fn node_properties() -> Vec<NodeProperty> {
    let mut props = vec![
        // Resource selector
        NodeProperty::new("Resource", "resource", PropertyKind::Options)
            .default_value(json!("message"))
            .options(vec![
                opt("Inbox", "inbox"),
                opt("Message", "message"),
                opt("Thread", "thread"),
                opt("Search", "search"),
                opt("Delivery", "delivery"),
            ]),
        // Message operations
        NodeProperty::new("Operation", "operation", PropertyKind::Options)
            .default_value(json!("send"))
            .options(vec![
                opt_desc("Send", "send", "Send an email from a Commune inbox"),
                opt_desc("List", "list", "List messages in an inbox or thread"),
            ])
            .show(&["message"], &[]),
    ];

    // Send email fields
    props.extend(vec![
        NodeProperty::new("From Inbox", "inboxId", PropertyKind::Options)
            .required()
            .desc("The inbox to send this email from")
            .type_options(json!({ "loadOptionsMethod": "getInboxes" }))
            .show(&["message"], &["send"]),
        NodeProperty::new("To", "to", PropertyKind::String)
            .required()
            .desc("Recipient email address. Separate multiple addresses with commas.")
            .placeholder("e.g. customer@example.com")
            .show(&["message"], &["send"]),
        NodeProperty::new("Subject", "subject", PropertyKind::String)
            .required()
            .desc("Email subject line")
            .placeholder("e.g. Your order has shipped")
            .show(&["message"], &["send"]),
        NodeProperty::new("Email Body (HTML)", "html", PropertyKind::String)
            .desc("HTML email body. Provide either this or Plain Text Body (or both).")
            .placeholder("e.g. <p>Hello!</p>")
            .show(&["message"], &["send"]),
        NodeProperty::new("Plain Text Body", "text", PropertyKind::String)
            .desc("Plain text fallback. Recommended alongside the HTML body.")
            .show(&["message"], &["send"]),
        NodeProperty::new("Additional Options", "sendOptions", PropertyKind::Collection)
            .default_value(json!({}))
            .items(vec![
                NodeProperty::new("Thread ID", "thread_id", PropertyKind::String)
                    .desc("Reply within an existing conversation thread"),
                NodeProperty::new("CC", "cc", PropertyKind::String)
                    .desc("CC addresses (comma-separated)")
                    .placeholder("e.g. cc@example.com"),
                NodeProperty::new("BCC", "bcc", PropertyKind::String)
                    .desc("BCC addresses (comma-separated)")
                    .placeholder("e.g. bcc@example.com"),
                NodeProperty::new("Reply-To", "reply_to", PropertyKind::String)
                    .desc("Override the reply-to address")
                    .placeholder("e.g. noreply@example.com"),
                NodeProperty::new("From Name", "from", PropertyKind::String)
                    .desc("Custom sender display name")
                    .placeholder("e.g. Acme Support"),
            ])
            .show(&["message"], &["send"]),
        // List messages
        NodeProperty::new("Inbox ID", "inboxId", PropertyKind::String)
            .desc("Filter messages by inbox (leave blank for all)")
            .show(&["message"], &["list"]),
    ]);

    // Inbox operations
    props.push(
        NodeProperty::new("Operation", "operation", PropertyKind::Options)
            .default_value(json!("list"))
            .options(vec![
                opt("Create", "create"),
                opt("List", "list"),
                opt("Get", "get"),
                opt("Update", "update"),
                opt("Delete", "delete"),
                opt("Set Webhook", "setWebhook"),
                opt("Set Extraction Schema", "setSchema"),
            ])
            .show(&["inbox"], &[]),
    );
    props.extend(vec![
        NodeProperty::new("Local Part", "localPart", PropertyKind::String)
            .required()
            .desc("The part before @ in the email address (e.g. \"support\" → support@yourdomain.com)")
            .placeholder("e.g. support")
            .show(&["inbox"], &["create"]),
        NodeProperty::new("Inbox Options", "inboxCreateOptions", PropertyKind::Collection)
            .default_value(json!({}))
            .items(vec![
                NodeProperty::new("Domain ID", "domainId", PropertyKind::String)
                    .desc("The domain to create the inbox on. Auto-resolved if left blank."),
                NodeProperty::new("Display Name", "displayName", PropertyKind::String)
                    .desc("Sender name shown in email clients (e.g. \"Acme Support\")")
                    .placeholder("e.g. Acme Support"),
                NodeProperty::new("Agent Name", "agentName", PropertyKind::String)
                    .desc("Internal name for this agent inbox")
                    .placeholder("e.g. support-bot"),
                NodeProperty::new("Webhook URL", "webhookEndpoint", PropertyKind::String)
                    .desc("URL to notify when emails arrive. Use the trigger node for native webhook handling.")
                    .placeholder("e.g. https://your-server.com/webhook"),
            ])
            .show(&["inbox"], &["create"]),
        NodeProperty::new("Domain ID", "domainId", PropertyKind::String)
            .required()
            .desc("The ID of the domain the inbox belongs to")
            .placeholder("e.g. d_abc123")
            .show(&["inbox"], &["get", "update", "delete", "setWebhook", "setSchema"]),
        NodeProperty::new("Inbox ID", "inboxId", PropertyKind::String)
            .required()
            .desc("The ID of the inbox to act on")
            .placeholder("e.g. inbox_xyz")
            .show(&["inbox"], &["get", "update", "delete", "setWebhook", "setSchema"]),
        NodeProperty::new("Update Fields", "inboxUpdateOptions", PropertyKind::Collection)
            .default_value(json!({}))
            .items(vec![
                NodeProperty::new("Display Name", "displayName", PropertyKind::String)
                    .desc("Sender name shown in email clients")
                    .placeholder("e.g. Acme Support"),
                NodeProperty::new("Agent Name", "agentName", PropertyKind::String)
                    .desc("Internal name for this agent inbox")
                    .placeholder("e.g. support-bot"),
            ])
            .show(&["inbox"], &["update"]),
        NodeProperty::new("Webhook Endpoint", "webhookEndpoint", PropertyKind::String)
            .required()
            .desc("The URL that Commune will POST inbound email events to")
            .placeholder("e.g. https://your-server.com/webhook/email")
            .show(&["inbox"], &["setWebhook"]),
        NodeProperty::new("Schema JSON", "schemaJson", PropertyKind::Json)
            .required()
            .default_value(json!(
                "{\"type\":\"object\",\"properties\":{\"intent\":{\"type\":\"string\"},\"summary\":{\"type\":\"string\"}}}"
            ))
            .desc("A JSON Schema object defining what to extract from inbound emails")
            .show(&["inbox"], &["setSchema"]),
        NodeProperty::new("Schema Name", "schemaName", PropertyKind::String)
            .default_value(json!("extraction"))
            .desc("Name for this extraction schema")
            .show(&["inbox"], &["setSchema"]),
    ]);

    // Thread operations
    props.push(
        NodeProperty::new("Operation", "operation", PropertyKind::Options)
            .default_value(json!("list"))
            .options(vec![
                opt("List", "list"),
                opt("Get Messages", "getMessages"),
                opt("Update Status", "updateStatus"),
            ])
            .show(&["thread"], &[]),
    );
    props.extend(vec![
        NodeProperty::new("Inbox ID", "inboxId", PropertyKind::String)
            .required()
            .desc("Filter threads by inbox ID")
            .show(&["thread"], &["list"]),
        NodeProperty::new("Thread ID", "threadId", PropertyKind::String)
            .required()
            .desc("The thread to read or update")
            .show(&["thread"], &["getMessages", "updateStatus"]),
        NodeProperty::new("Status", "status", PropertyKind::Options)
            .default_value(json!("open"))
            .desc("New status to set on the thread")
            .options(vec![
                opt("Open", "open"),
                opt("Needs Reply", "needs_reply"),
                opt("Waiting", "waiting"),
                opt("Closed", "closed"),
            ])
            .show(&["thread"], &["updateStatus"]),
        NodeProperty::new("Limit", "limit", PropertyKind::Number)
            .default_value(json!(20))
            .desc("Maximum number of threads to return (1–100)")
            .show(&["thread"], &["list"]),
    ]);

    // Search operations
    props.push(
        NodeProperty::new("Operation", "operation", PropertyKind::Options)
            .default_value(json!("searchThreads"))
            .options(vec![opt_desc(
                "Search Threads",
                "searchThreads",
                "Semantic or keyword search across email threads",
            )])
            .show(&["search"], &[]),
    );
    props.extend(vec![
        NodeProperty::new("Query", "query", PropertyKind::String)
            .required()
            .desc("What to search for. Commune uses semantic (vector) search when available.")
            .placeholder("e.g. angry customer about refund")
            .show(&["search"], &[]),
        NodeProperty::new("Inbox ID", "inboxId", PropertyKind::String)
            .desc("Narrow results to a specific inbox (recommended)")
            .show(&["search"], &[]),
        NodeProperty::new("Limit", "limit", PropertyKind::Number)
            .default_value(json!(10))
            .desc("Maximum number of results (1–100)")
            .show(&["search"], &[]),
    ]);

    // Delivery operations
    props.push(
        NodeProperty::new("Operation", "operation", PropertyKind::Options)
            .default_value(json!("getMetrics"))
            .options(vec![opt_desc(
                "Get Metrics",
                "getMetrics",
                "Get delivery, bounce, and complaint rates for an inbox",
            )])
            .show(&["delivery"], &[]),
    );
    props.extend(vec![
        NodeProperty::new("Inbox ID", "inboxId", PropertyKind::String)
            .required()
            .desc("The inbox to fetch metrics for")
            .show(&["delivery"], &[]),
        NodeProperty::new("Period", "period", PropertyKind::Options)
            .default_value(json!("7d"))
            .desc("Time range for the metrics")
            .options(vec![
                opt("Last 24 Hours", "24h"),
                opt("Last 7 Days", "7d"),
                opt("Last 30 Days", "30d"),
            ])
            .show(&["delivery"], &[]),
    ]);

    props
}
