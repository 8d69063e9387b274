//! Commune action node: (resource, operation) dispatch over the REST API.
//!
//! The host selects a resource and operation, supplies per-item parameters,
//! and receives one-or-many output records per item. Dispatch resolves through
//! a lookup table; validation runs before any request is sent.

mod dispatch;
mod options;
mod params;
mod properties;

pub use dispatch::{execute, request_plan, NodeError, Operation, RequestPlan, Resource};
pub use options::load_inbox_options;
pub use params::{split_addresses, ItemParams};
pub use properties::{
    node_descriptor, NodeDescriptor, NodeProperty, PropertyKind, PropertyOption, ShowWhen,
};
