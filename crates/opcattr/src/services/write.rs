//! The Write service.
//!
//! Only two attributes are writable:
//!
//! | Attribute | Nodes | Payload | Effect |
//! |-----------|-------|---------|--------|
//! | `WriteMask` | every class | `UInt32` | replaces the node's write mask |
//! | `Value` | Variable | any variant | replaces the variable's value |
//!
//! Every other attribute answers `BadWriteNotSupported` whatever the node or payload.
//! A payload that is not a plain variant (a status, timestamps, or no value at all)
//! leaves the node untouched and still reports `Good`. A `WriteMask` variant of any
//! type other than `UInt32` is refused with `BadTypeMismatch`.

use super::{ResponseHeader, WriteRequest, WriteResponse, WriteValue};
use crate::attributes::{get_spec, AttributeId, Variant};
use crate::config::ServerConfig;
use crate::status::StatusCode;
use crate::store::NodeStore;
use tracing::{debug, instrument, warn, Level};

/// Writes one attribute of one node and returns the item status.
#[instrument(skip(store, item), fields(node_id = %item.node_id, attribute_id = item.attribute_id), ret(level = Level::DEBUG))]
pub fn write_node<S: NodeStore + ?Sized>(store: &S, item: &WriteValue) -> StatusCode {
    let Some(node_ref) = store.resolve(&item.node_id) else {
        debug!("node id does not resolve");
        return StatusCode::BadNodeIdInvalid;
    };

    let Some(spec) = get_spec(item.attribute_id) else {
        debug!("attribute id not in table");
        return StatusCode::BadAttributeIdInvalid;
    };

    let payload = item.value.variant_only();
    if payload.is_none() {
        debug!(mask = item.value.encoding_mask(), "payload not in variant form");
    }

    match spec.id {
        AttributeId::WriteMask => {
            let Some(payload) = payload else {
                return StatusCode::Good;
            };
            match spec.declared.accept(payload.clone()) {
                Ok(Variant::UInt32(mask)) => {
                    node_ref.write().write_mask = mask;
                    debug!(mask, "write mask updated");
                    StatusCode::Good
                }
                Ok(other) => {
                    debug!(actual = %other.type_label(), "write mask payload refused");
                    StatusCode::BadTypeMismatch
                }
                Err(err) => {
                    debug!(%err, "write mask payload refused");
                    StatusCode::BadTypeMismatch
                }
            }
        }
        AttributeId::Value => {
            let mut node = node_ref.write();
            let class = node.node_class();
            if !spec.permits(class) {
                debug!(%class, "value written to a node without one");
                return StatusCode::BadNotWritable;
            }
            if let (Some(value), Some(slot)) = (payload, node.value_mut()) {
                *slot = value.clone();
                debug!(value_type = %value.type_label(), "value updated");
            }
            StatusCode::Good
        }
        _ => StatusCode::BadWriteNotSupported,
    }
}

/// Runs a whole Write batch. Statuses come back in request order.
#[instrument(skip_all, fields(items = request.nodes_to_write.len()))]
pub fn run<S: NodeStore + ?Sized>(
    store: &S,
    config: &ServerConfig,
    request: &WriteRequest,
) -> WriteResponse {
    let items = &request.nodes_to_write;

    if let Some(limit) = config.write_limit() {
        if items.len() > limit {
            warn!(limit, "write batch over operation limit");
            return WriteResponse {
                response_header: ResponseHeader::new(StatusCode::BadTooManyOperations),
                results: Vec::new(),
            };
        }
    }

    let results = items.iter().map(|item| write_node(store, item)).collect();
    WriteResponse {
        response_header: ResponseHeader::new(StatusCode::Good),
        results,
    }
}
