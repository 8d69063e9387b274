//! Action dispatch: map a (resource, operation) selector plus item parameters
//! onto exactly one Commune API request, then reshape the response into output
//! records.
//!
//! Each pair resolves through a lookup table to a builder that produces a
//! [`RequestPlan`]; validation happens in the builder, before any request is
//! sent. Items are processed sequentially, one outstanding request at a time.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::client::{unwrap_data, CommuneClient, CommuneError};
use crate::host::NodeOutput;
use crate::node::params::{split_addresses, ItemParams};

/// API resource groups exposed by the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    Inbox,
    Message,
    Thread,
    Search,
    Delivery,
}

/// Operations across all resources; each resource accepts its own subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Send,
    List,
    Create,
    Get,
    Update,
    Delete,
    SetWebhook,
    SetSchema,
    GetMessages,
    UpdateStatus,
    SearchThreads,
    GetMetrics,
}

#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("item {item}: {message}")]
    Validation { item: usize, message: String },
    #[error("operation {operation:?} is not available for resource {resource:?}")]
    Unsupported {
        resource: Resource,
        operation: Operation,
    },
    #[error("item {item}: {source}")]
    Api {
        item: usize,
        #[source]
        source: CommuneError,
    },
}

/// One fully-determined API call: method, path, query pairs, optional JSON body.
/// `fixed_response` replaces the upstream response for operations whose useful
/// output is synthesized (inbox delete).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub fixed_response: Option<Value>,
}

impl RequestPlan {
    fn get(path: String) -> Self {
        Self {
            method: Method::GET,
            path,
            query: Vec::new(),
            body: None,
            fixed_response: None,
        }
    }

    fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    fn send_json(method: Method, path: String, body: Value) -> Self {
        Self {
            method,
            path,
            query: Vec::new(),
            body: Some(body),
            fixed_response: None,
        }
    }
}

type Builder = fn(&ItemParams) -> Result<RequestPlan, NodeError>;

/// The dispatch table: every supported (resource, operation) pair and its builder.
const OPERATIONS: &[(Resource, Operation, Builder)] = &[
    (Resource::Message, Operation::Send, message_send),
    (Resource::Message, Operation::List, message_list),
    (Resource::Inbox, Operation::Create, inbox_create),
    (Resource::Inbox, Operation::List, inbox_list),
    (Resource::Inbox, Operation::Get, inbox_get),
    (Resource::Inbox, Operation::Update, inbox_update),
    (Resource::Inbox, Operation::Delete, inbox_delete),
    (Resource::Inbox, Operation::SetWebhook, inbox_set_webhook),
    (Resource::Inbox, Operation::SetSchema, inbox_set_schema),
    (Resource::Thread, Operation::List, thread_list),
    (Resource::Thread, Operation::GetMessages, thread_get_messages),
    (Resource::Thread, Operation::UpdateStatus, thread_update_status),
    (Resource::Search, Operation::SearchThreads, search_threads),
    (Resource::Delivery, Operation::GetMetrics, delivery_metrics),
];

const THREAD_STATUSES: [&str; 4] = ["open", "needs_reply", "waiting", "closed"];
const METRIC_PERIODS: [&str; 3] = ["24h", "7d", "30d"];

/// Resolve the builder for a selector pair and produce the request plan.
pub fn request_plan(
    resource: Resource,
    operation: Operation,
    params: &ItemParams,
) -> Result<RequestPlan, NodeError> {
    let builder = OPERATIONS
        .iter()
        .find(|(r, o, _)| *r == resource && *o == operation)
        .map(|(_, _, b)| b)
        .ok_or(NodeError::Unsupported {
            resource,
            operation,
        })?;
    builder(params)
}

fn inbox_path(domain_id: &str, inbox_id: &str) -> String {
    format!("/domains/{}/inboxes/{}", domain_id, inbox_id)
}

fn message_send(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let to = p.required_str("to")?;
    let subject = p.required_str("subject")?;
    let html = p.str_or("html", "");
    let text = p.str_or("text", "");

    if html.is_empty() && text.is_empty() {
        return Err(NodeError::Validation {
            item: p.index(),
            message: "provide at least an HTML body or a plain text body".to_string(),
        });
    }

    let mut body = Map::new();
    body.insert("to".into(), json!(split_addresses(&to)));
    body.insert("subject".into(), json!(subject));
    if !html.is_empty() {
        body.insert("html".into(), json!(html));
    }
    if !text.is_empty() {
        body.insert("text".into(), json!(text));
    }
    if let Some(inbox_id) = p.non_empty("inboxId") {
        body.insert("inboxId".into(), json!(inbox_id));
    }
    if let Some(thread_id) = p.nested_non_empty("sendOptions", "thread_id") {
        body.insert("thread_id".into(), json!(thread_id));
    }
    if let Some(cc) = p.nested_non_empty("sendOptions", "cc") {
        body.insert("cc".into(), json!(split_addresses(&cc)));
    }
    if let Some(bcc) = p.nested_non_empty("sendOptions", "bcc") {
        body.insert("bcc".into(), json!(split_addresses(&bcc)));
    }
    if let Some(reply_to) = p.nested_non_empty("sendOptions", "reply_to") {
        body.insert("reply_to".into(), json!(reply_to));
    }
    if let Some(from) = p.nested_non_empty("sendOptions", "from") {
        body.insert("from".into(), json!(from));
    }

    Ok(RequestPlan::send_json(
        Method::POST,
        "/messages/send".to_string(),
        Value::Object(body),
    ))
}

fn message_list(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let mut query = Vec::new();
    if let Some(inbox_id) = p.non_empty("inboxId") {
        query.push(("inbox_id".to_string(), inbox_id));
    }
    Ok(RequestPlan::get("/messages".to_string()).with_query(query))
}

fn inbox_create(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let local_part = p.required_str("localPart")?;

    let mut body = Map::new();
    body.insert("local_part".into(), json!(local_part));
    if let Some(domain_id) = p.nested_non_empty("inboxCreateOptions", "domainId") {
        body.insert("domain_id".into(), json!(domain_id));
    }
    if let Some(display_name) = p.nested_non_empty("inboxCreateOptions", "displayName") {
        body.insert("display_name".into(), json!(display_name));
    }
    if let Some(agent_name) = p.nested_non_empty("inboxCreateOptions", "agentName") {
        body.insert("name".into(), json!(agent_name));
    }
    if let Some(endpoint) = p.nested_non_empty("inboxCreateOptions", "webhookEndpoint") {
        body.insert(
            "webhook".into(),
            json!({ "endpoint": endpoint, "events": ["inbound"] }),
        );
    }

    Ok(RequestPlan::send_json(
        Method::POST,
        "/inboxes".to_string(),
        Value::Object(body),
    ))
}

fn inbox_list(_p: &ItemParams) -> Result<RequestPlan, NodeError> {
    Ok(RequestPlan::get("/inboxes".to_string()))
}

fn inbox_get(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let domain_id = p.required_str("domainId")?;
    let inbox_id = p.required_str("inboxId")?;
    Ok(RequestPlan::get(inbox_path(&domain_id, &inbox_id)))
}

fn inbox_update(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let domain_id = p.required_str("domainId")?;
    let inbox_id = p.required_str("inboxId")?;

    let mut body = Map::new();
    if let Some(display_name) = p.nested_non_empty("inboxUpdateOptions", "displayName") {
        body.insert("display_name".into(), json!(display_name));
    }
    if let Some(agent_name) = p.nested_non_empty("inboxUpdateOptions", "agentName") {
        body.insert("name".into(), json!(agent_name));
    }
    if body.is_empty() {
        return Err(NodeError::Validation {
            item: p.index(),
            message: "provide at least one field to update".to_string(),
        });
    }

    Ok(RequestPlan::send_json(
        Method::PUT,
        inbox_path(&domain_id, &inbox_id),
        Value::Object(body),
    ))
}

fn inbox_delete(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let domain_id = p.required_str("domainId")?;
    let inbox_id = p.required_str("inboxId")?;
    let mut plan = RequestPlan::get(inbox_path(&domain_id, &inbox_id));
    plan.method = Method::DELETE;
    plan.fixed_response = Some(json!({ "deleted": true }));
    Ok(plan)
}

fn inbox_set_webhook(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let domain_id = p.required_str("domainId")?;
    let inbox_id = p.required_str("inboxId")?;
    let endpoint = p.required_str("webhookEndpoint")?;
    Ok(RequestPlan::send_json(
        Method::PUT,
        inbox_path(&domain_id, &inbox_id),
        json!({ "webhook": { "endpoint": endpoint, "events": ["inbound"] } }),
    ))
}

fn inbox_set_schema(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let domain_id = p.required_str("domainId")?;
    let inbox_id = p.required_str("inboxId")?;
    let schema_name = p.str_or("schemaName", "extraction");
    let schema = match p.value("schemaJson") {
        Some(Value::String(s)) => serde_json::from_str::<Value>(s).map_err(|e| {
            NodeError::Validation {
                item: p.index(),
                message: format!("invalid schema JSON: {}", e),
            }
        })?,
        Some(v) => v.clone(),
        None => {
            return Err(NodeError::Validation {
                item: p.index(),
                message: "missing required parameter 'schemaJson'".to_string(),
            })
        }
    };
    Ok(RequestPlan::send_json(
        Method::PUT,
        format!("{}/extraction-schema", inbox_path(&domain_id, &inbox_id)),
        json!({ "name": schema_name, "enabled": true, "schema": schema }),
    ))
}

fn thread_list(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let inbox_id = p.required_str("inboxId")?;
    let limit = p.u64_or("limit", 20);
    Ok(RequestPlan::get("/threads".to_string()).with_query(vec![
        ("inbox_id".to_string(), inbox_id),
        ("limit".to_string(), limit.to_string()),
    ]))
}

fn thread_get_messages(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let thread_id = p.required_str("threadId")?;
    Ok(RequestPlan::get(format!("/threads/{}/messages", thread_id)))
}

fn thread_update_status(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let thread_id = p.required_str("threadId")?;
    let status = p.str_or("status", "open");
    if !THREAD_STATUSES.contains(&status.as_str()) {
        return Err(NodeError::Validation {
            item: p.index(),
            message: format!(
                "status must be one of {}, got '{}'",
                THREAD_STATUSES.join(", "),
                status
            ),
        });
    }
    Ok(RequestPlan::send_json(
        Method::PUT,
        format!("/threads/{}/status", thread_id),
        json!({ "status": status }),
    ))
}

fn search_threads(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let query_text = p.required_str("query")?;
    let limit = p.u64_or("limit", 10);
    let mut query = vec![
        ("q".to_string(), query_text),
        ("limit".to_string(), limit.to_string()),
    ];
    if let Some(inbox_id) = p.non_empty("inboxId") {
        query.push(("inbox_id".to_string(), inbox_id));
    }
    Ok(RequestPlan::get("/search/threads".to_string()).with_query(query))
}

fn delivery_metrics(p: &ItemParams) -> Result<RequestPlan, NodeError> {
    let inbox_id = p.required_str("inboxId")?;
    let period = p.str_or("period", "7d");
    if !METRIC_PERIODS.contains(&period.as_str()) {
        return Err(NodeError::Validation {
            item: p.index(),
            message: format!(
                "period must be one of {}, got '{}'",
                METRIC_PERIODS.join(", "),
                period
            ),
        });
    }
    Ok(RequestPlan::get("/delivery/metrics".to_string()).with_query(vec![
        ("inbox_id".to_string(), inbox_id),
        ("period".to_string(), period),
    ]))
}

fn parse_selector<T: DeserializeOwned>(params: &ItemParams, name: &str) -> Result<T, NodeError> {
    let raw = params.required_str(name)?;
    serde_json::from_value(Value::String(raw.clone())).map_err(|_| NodeError::Validation {
        item: params.index(),
        message: format!("unknown {} '{}'", name, raw),
    })
}

/// Reshape one response into output records: a sequence becomes one record per
/// element, anything else a single record, all tagged with the item index.
fn reshape(response: Value, item: usize) -> Vec<NodeOutput> {
    match unwrap_data(response) {
        Value::Array(elements) => elements
            .into_iter()
            .map(|json| NodeOutput { json, item })
            .collect(),
        other => vec![NodeOutput { json: other, item }],
    }
}

async fn run_item(
    client: &CommuneClient,
    item: usize,
    raw: &Value,
) -> Result<Vec<NodeOutput>, NodeError> {
    let values = raw.as_object().ok_or_else(|| NodeError::Validation {
        item,
        message: "item parameters must be a JSON object".to_string(),
    })?;
    let params = ItemParams::new(item, values);
    let resource: Resource = parse_selector(&params, "resource")?;
    let operation: Operation = parse_selector(&params, "operation")?;
    let plan = request_plan(resource, operation, &params)?;

    let response = client
        .request(
            plan.method.clone(),
            &plan.path,
            &plan.query,
            plan.body.as_ref(),
        )
        .await
        .map_err(|source| NodeError::Api { item, source })?;
    let response = plan.fixed_response.unwrap_or(response);
    Ok(reshape(response, item))
}

/// Execute a batch of items sequentially, in order, one request at a time.
///
/// With `continue_on_fail`, a failing item contributes a single
/// `{ "error": <message> }` record and processing moves to the next item;
/// otherwise the first failure aborts the batch, tagged with its item index.
/// No request is retried.
pub async fn execute(
    client: &CommuneClient,
    items: &[Value],
    continue_on_fail: bool,
) -> Result<Vec<NodeOutput>, NodeError> {
    let mut produced = Vec::new();
    for (item, raw) in items.iter().enumerate() {
        match run_item(client, item, raw).await {
            Ok(records) => produced.extend(records),
            Err(e) => {
                if !continue_on_fail {
                    return Err(e);
                }
                log::debug!("item {} failed, continuing: {}", item, e);
                produced.push(NodeOutput {
                    json: json!({ "error": e.to_string() }),
                    item,
                });
            }
        }
    }
    Ok(produced)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_for(resource: Resource, operation: Operation, params: Value) -> RequestPlan {
        try_plan_for(resource, operation, params).expect("request plan")
    }

    fn try_plan_for(
        resource: Resource,
        operation: Operation,
        params: Value,
    ) -> Result<RequestPlan, NodeError> {
        let map = params.as_object().expect("object").clone();
        let p = ItemParams::new(0, &map);
        request_plan(resource, operation, &p)
    }

    #[test]
    fn send_builds_sparse_body_with_split_addresses() {
        let plan = plan_for(
            Resource::Message,
            Operation::Send,
            json!({
                "inboxId": "inbox_1",
                "to": "a@x.com, b@y.com",
                "subject": "Hello",
                "html": "<p>Hi</p>",
                "text": "",
                "sendOptions": { "cc": "c@z.com", "reply_to": "" }
            }),
        );
        assert_eq!(plan.method, Method::POST);
        assert_eq!(plan.path, "/messages/send");
        assert_eq!(
            plan.body,
            Some(json!({
                "to": ["a@x.com", "b@y.com"],
                "subject": "Hello",
                "html": "<p>Hi</p>",
                "inboxId": "inbox_1",
                "cc": ["c@z.com"]
            }))
        );
    }

    #[test]
    fn send_without_any_body_fails_before_request() {
        let err = try_plan_for(
            Resource::Message,
            Operation::Send,
            json!({ "inboxId": "inbox_1", "to": "a@x.com", "subject": "Hi" }),
        )
        .unwrap_err();
        assert!(matches!(err, NodeError::Validation { item: 0, .. }));
        assert!(err.to_string().contains("HTML body or a plain text body"));
    }

    #[test]
    fn message_list_filters_by_inbox_only_when_set() {
        let plan = plan_for(Resource::Message, Operation::List, json!({}));
        assert_eq!(plan.method, Method::GET);
        assert_eq!(plan.path, "/messages");
        assert!(plan.query.is_empty());

        let plan = plan_for(
            Resource::Message,
            Operation::List,
            json!({ "inboxId": "inbox_1" }),
        );
        assert_eq!(
            plan.query,
            vec![("inbox_id".to_string(), "inbox_1".to_string())]
        );
    }

    #[test]
    fn inbox_create_maps_option_keys() {
        let plan = plan_for(
            Resource::Inbox,
            Operation::Create,
            json!({
                "localPart": "support",
                "inboxCreateOptions": {
                    "displayName": "Acme Support",
                    "agentName": "support-bot",
                    "webhookEndpoint": "https://hooks.example.com/in"
                }
            }),
        );
        assert_eq!(plan.method, Method::POST);
        assert_eq!(plan.path, "/inboxes");
        assert_eq!(
            plan.body,
            Some(json!({
                "local_part": "support",
                "display_name": "Acme Support",
                "name": "support-bot",
                "webhook": { "endpoint": "https://hooks.example.com/in", "events": ["inbound"] }
            }))
        );
    }

    #[test]
    fn inbox_list_is_a_bare_get() {
        let plan = plan_for(Resource::Inbox, Operation::List, json!({}));
        assert_eq!(plan.method, Method::GET);
        assert_eq!(plan.path, "/inboxes");
        assert!(plan.query.is_empty());
        assert!(plan.body.is_none());
    }

    #[test]
    fn thread_messages_are_fetched_by_thread_id() {
        let plan = plan_for(
            Resource::Thread,
            Operation::GetMessages,
            json!({ "threadId": "t_9" }),
        );
        assert_eq!(plan.method, Method::GET);
        assert_eq!(plan.path, "/threads/t_9/messages");
    }

    #[test]
    fn inbox_get_update_delete_share_the_inbox_path() {
        let params = json!({ "domainId": "d_1", "inboxId": "inbox_1" });

        let plan = plan_for(Resource::Inbox, Operation::Get, params.clone());
        assert_eq!(plan.method, Method::GET);
        assert_eq!(plan.path, "/domains/d_1/inboxes/inbox_1");

        let plan = plan_for(Resource::Inbox, Operation::Delete, params);
        assert_eq!(plan.method, Method::DELETE);
        assert_eq!(plan.path, "/domains/d_1/inboxes/inbox_1");
        assert_eq!(plan.fixed_response, Some(json!({ "deleted": true })));
    }

    #[test]
    fn inbox_update_requires_at_least_one_field() {
        let err = try_plan_for(
            Resource::Inbox,
            Operation::Update,
            json!({ "domainId": "d_1", "inboxId": "inbox_1", "inboxUpdateOptions": {} }),
        )
        .unwrap_err();
        assert!(matches!(err, NodeError::Validation { item: 0, .. }));

        let plan = plan_for(
            Resource::Inbox,
            Operation::Update,
            json!({
                "domainId": "d_1",
                "inboxId": "inbox_1",
                "inboxUpdateOptions": { "agentName": "helper" }
            }),
        );
        assert_eq!(plan.method, Method::PUT);
        assert_eq!(plan.body, Some(json!({ "name": "helper" })));
    }

    #[test]
    fn set_webhook_wraps_endpoint_and_events() {
        let plan = plan_for(
            Resource::Inbox,
            Operation::SetWebhook,
            json!({
                "domainId": "d_1",
                "inboxId": "inbox_1",
                "webhookEndpoint": "https://hooks.example.com/in"
            }),
        );
        assert_eq!(plan.method, Method::PUT);
        assert_eq!(plan.path, "/domains/d_1/inboxes/inbox_1");
        assert_eq!(
            plan.body,
            Some(json!({
                "webhook": { "endpoint": "https://hooks.example.com/in", "events": ["inbound"] }
            }))
        );
    }

    #[test]
    fn set_schema_parses_textual_schema() {
        let plan = plan_for(
            Resource::Inbox,
            Operation::SetSchema,
            json!({
                "domainId": "d_1",
                "inboxId": "inbox_1",
                "schemaJson": "{\"type\":\"object\"}"
            }),
        );
        assert_eq!(plan.path, "/domains/d_1/inboxes/inbox_1/extraction-schema");
        assert_eq!(
            plan.body,
            Some(json!({
                "name": "extraction",
                "enabled": true,
                "schema": { "type": "object" }
            }))
        );
    }

    #[test]
    fn set_schema_rejects_invalid_schema_text() {
        let err = try_plan_for(
            Resource::Inbox,
            Operation::SetSchema,
            json!({ "domainId": "d_1", "inboxId": "inbox_1", "schemaJson": "{nope" }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid schema JSON"));
    }

    #[test]
    fn thread_list_carries_inbox_and_limit() {
        let plan = plan_for(
            Resource::Thread,
            Operation::List,
            json!({ "inboxId": "inbox_1" }),
        );
        assert_eq!(plan.path, "/threads");
        assert_eq!(
            plan.query,
            vec![
                ("inbox_id".to_string(), "inbox_1".to_string()),
                ("limit".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn thread_status_is_validated() {
        let plan = plan_for(
            Resource::Thread,
            Operation::UpdateStatus,
            json!({ "threadId": "t_1", "status": "needs_reply" }),
        );
        assert_eq!(plan.method, Method::PUT);
        assert_eq!(plan.path, "/threads/t_1/status");
        assert_eq!(plan.body, Some(json!({ "status": "needs_reply" })));

        let err = try_plan_for(
            Resource::Thread,
            Operation::UpdateStatus,
            json!({ "threadId": "t_1", "status": "archived" }),
        )
        .unwrap_err();
        assert!(matches!(err, NodeError::Validation { .. }));
    }

    #[test]
    fn search_appends_inbox_filter_last() {
        let plan = plan_for(
            Resource::Search,
            Operation::SearchThreads,
            json!({ "query": "angry customer", "limit": 5, "inboxId": "inbox_1" }),
        );
        assert_eq!(plan.path, "/search/threads");
        assert_eq!(
            plan.query,
            vec![
                ("q".to_string(), "angry customer".to_string()),
                ("limit".to_string(), "5".to_string()),
                ("inbox_id".to_string(), "inbox_1".to_string()),
            ]
        );
    }

    #[test]
    fn delivery_metrics_validates_period() {
        let plan = plan_for(
            Resource::Delivery,
            Operation::GetMetrics,
            json!({ "inboxId": "inbox_1" }),
        );
        assert_eq!(plan.path, "/delivery/metrics");
        assert_eq!(
            plan.query,
            vec![
                ("inbox_id".to_string(), "inbox_1".to_string()),
                ("period".to_string(), "7d".to_string()),
            ]
        );

        let err = try_plan_for(
            Resource::Delivery,
            Operation::GetMetrics,
            json!({ "inboxId": "inbox_1", "period": "90d" }),
        )
        .unwrap_err();
        assert!(matches!(err, NodeError::Validation { .. }));
    }

    #[test]
    fn unsupported_pair_is_rejected() {
        let err = try_plan_for(Resource::Message, Operation::Create, json!({})).unwrap_err();
        assert!(matches!(err, NodeError::Unsupported { .. }));
    }

    #[test]
    fn reshape_emits_one_record_per_sequence_element() {
        let records = reshape(json!({ "data": [{ "id": 1 }, { "id": 2 }] }), 4);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].json, json!({ "id": 1 }));
        assert_eq!(records[0].item, 4);
        assert_eq!(records[1].item, 4);
    }

    #[test]
    fn reshape_emits_single_record_for_scalars_and_objects() {
        let records = reshape(json!({ "data": { "x": 1 } }), 0);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].json, json!({ "x": 1 }));

        let records = reshape(json!({ "id": "m_1" }), 2);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].json, json!({ "id": "m_1" }));
        assert_eq!(records[0].item, 2);
    }

    #[test]
    fn reshape_handles_bare_arrays() {
        let records = reshape(json!([{ "a": 1 }, { "b": 2 }, { "c": 3 }]), 1);
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn selectors_parse_their_wire_values() {
        let map = json!({ "resource": "inbox", "operation": "setWebhook" })
            .as_object()
            .unwrap()
            .clone();
        let p = ItemParams::new(0, &map);
        let r: Resource = parse_selector(&p, "resource").unwrap();
        let o: Operation = parse_selector(&p, "operation").unwrap();
        assert_eq!(r, Resource::Inbox);
        assert_eq!(o, Operation::SetWebhook);

        let map = json!({ "resource": "mailbox" }).as_object().unwrap().clone();
        let p = ItemParams::new(1, &map);
        let err = parse_selector::<Resource>(&p, "resource").unwrap_err();
        assert!(err.to_string().contains("unknown resource 'mailbox'"));
    }
}
