//! # Attribute Services
//!
//! Request and response types for the Read and Write services, plus the per-item
//! operations that back them:
//!
//! - [`read::read_node`] copies one attribute out of one node.
//! - [`write::write_node`] applies one attribute value to one node.
//!
//! Every per-item problem becomes a [`StatusCode`] on that item. The batch wrappers
//! ([`read::run`], [`write::run`]) only add the header-level outcomes: an empty Read
//! batch is `BadNothingToDo`, and a batch over the configured limit is
//! `BadTooManyOperations`. In both cases no item is processed.

use crate::attributes::{DataValue, Variant};
use crate::model::NodeId;
use crate::status::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod read;
pub mod write;

/// One item of a Read request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadValueId {
    pub node_id: NodeId,
    /// Raw wire id; ids outside the legality table are answered per item.
    pub attribute_id: u32,
}

impl ReadValueId {
    pub fn new(node_id: NodeId, attribute_id: impl Into<u32>) -> Self {
        Self {
            node_id,
            attribute_id: attribute_id.into(),
        }
    }
}

/// One item of a Write request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteValue {
    pub node_id: NodeId,
    pub attribute_id: u32,
    pub value: DataValue,
}

impl WriteValue {
    pub fn new(node_id: NodeId, attribute_id: impl Into<u32>, value: impl Into<DataValue>) -> Self {
        Self {
            node_id,
            attribute_id: attribute_id.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseHeader {
    pub timestamp: DateTime<Utc>,
    pub service_result: StatusCode,
}

impl ResponseHeader {
    pub fn new(service_result: StatusCode) -> Self {
        Self {
            timestamp: Utc::now(),
            service_result,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReadRequest {
    pub nodes_to_read: Vec<ReadValueId>,
}

impl ReadRequest {
    pub fn new(nodes_to_read: Vec<ReadValueId>) -> Self {
        Self { nodes_to_read }
    }
}

/// Outcome of reading one attribute: the copied value, or why there is none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadResult {
    Value(Variant),
    Status(StatusCode),
}

impl ReadResult {
    /// `Good` for a value, otherwise the failure status.
    pub fn status(&self) -> StatusCode {
        match self {
            ReadResult::Value(_) => StatusCode::Good,
            ReadResult::Status(status) => *status,
        }
    }

    pub fn value(&self) -> Option<&Variant> {
        match self {
            ReadResult::Value(value) => Some(value),
            ReadResult::Status(_) => None,
        }
    }

    pub fn into_value(self) -> Option<Variant> {
        match self {
            ReadResult::Value(value) => Some(value),
            ReadResult::Status(_) => None,
        }
    }
}

/// Wire form: a variant-only data value, or a status-only data value.
impl From<ReadResult> for DataValue {
    fn from(result: ReadResult) -> Self {
        match result {
            ReadResult::Value(value) => DataValue::from_variant(value),
            ReadResult::Status(status) => DataValue::from_status(status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<ReadResult>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WriteRequest {
    pub nodes_to_write: Vec<WriteValue>,
}

impl WriteRequest {
    pub fn new(nodes_to_write: Vec<WriteValue>) -> Self {
        Self { nodes_to_write }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteResponse {
    pub response_header: ResponseHeader,
    pub results: Vec<StatusCode>,
}
