//! The Read service.
//!
//! Each item is checked in a fixed order, and the first failing check decides the
//! status:
//!
//! 1. the node id resolves, else `BadNodeIdUnknown`
//! 2. the attribute id is in the legality table, else `BadAttributeIdInvalid`
//! 3. the node's class carries the attribute, else `BadNotReadable`
//! 4. the field copies out with the attribute's declared type, else `BadNotReadable`

use super::{ReadRequest, ReadResponse, ReadResult, ReadValueId, ResponseHeader};
use crate::attributes::get_spec;
use crate::config::ServerConfig;
use crate::status::StatusCode;
use crate::store::NodeStore;
use tracing::{debug, instrument, warn, Level};

/// Reads one attribute of one node.
#[instrument(skip(store, item), fields(node_id = %item.node_id, attribute_id = item.attribute_id), ret(level = Level::TRACE))]
pub fn read_node<S: NodeStore + ?Sized>(store: &S, item: &ReadValueId) -> ReadResult {
    let Some(node_ref) = store.resolve(&item.node_id) else {
        debug!("node id does not resolve");
        return ReadResult::Status(StatusCode::BadNodeIdUnknown);
    };

    let Some(spec) = get_spec(item.attribute_id) else {
        debug!("attribute id not in table");
        return ReadResult::Status(StatusCode::BadAttributeIdInvalid);
    };

    let node = node_ref.read();
    let class = node.node_class();
    if !spec.permits(class) {
        debug!(%class, attribute = spec.name, "attribute not present on node class");
        return ReadResult::Status(StatusCode::BadNotReadable);
    }

    let Some(field) = node.attribute(spec.id) else {
        warn!(%class, attribute = spec.name, "permitted attribute has no field");
        return ReadResult::Status(StatusCode::BadNotReadable);
    };

    match spec.declared.accept(field) {
        Ok(value) => ReadResult::Value(value),
        Err(err) => {
            warn!(attribute = spec.name, error = %err, "attribute copy failed");
            ReadResult::Status(StatusCode::BadNotReadable)
        }
    }
}

/// Runs a whole Read batch. Results come back in request order.
#[instrument(skip_all, fields(items = request.nodes_to_read.len()))]
pub fn run<S: NodeStore + ?Sized>(
    store: &S,
    config: &ServerConfig,
    request: &ReadRequest,
) -> ReadResponse {
    let items = &request.nodes_to_read;

    if items.is_empty() {
        debug!("empty read batch");
        return ReadResponse {
            response_header: ResponseHeader::new(StatusCode::BadNothingToDo),
            results: Vec::new(),
        };
    }

    if let Some(limit) = config.read_limit() {
        if items.len() > limit {
            warn!(limit, "read batch over operation limit");
            return ReadResponse {
                response_header: ResponseHeader::new(StatusCode::BadTooManyOperations),
                results: Vec::new(),
            };
        }
    }

    let results = items.iter().map(|item| read_node(store, item)).collect();
    ReadResponse {
        response_header: ResponseHeader::new(StatusCode::Good),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{Array, AttributeId, Variant};
    use crate::model::NodeId;
    use crate::store::memory::fixtures::AddressSpaceFixture;
    use crate::store::sample::ids;

    #[test]
    fn test_read_value_of_variable() {
        let fixture = AddressSpaceFixture::sample();
        let result = read_node(
            &fixture.store,
            &ReadValueId::new(ids::temperature(), AttributeId::Value),
        );
        assert_eq!(result, ReadResult::Value(Variant::Double(21.5)));
        assert_eq!(fixture.store.outstanding_refs(), 0);
    }

    #[test]
    fn test_read_array_dimensions() {
        let fixture = AddressSpaceFixture::sample();
        let result = read_node(
            &fixture.store,
            &ReadValueId::new(ids::setpoints(), AttributeId::ArrayDimensions),
        );
        assert_eq!(
            result.into_value(),
            Some(Variant::Array(Array::from_scalars([3u32])))
        );
    }

    #[test]
    fn test_unknown_node_wins_over_unknown_attribute() {
        let fixture = AddressSpaceFixture::sample();
        let result = read_node(
            &fixture.store,
            &ReadValueId::new(NodeId::numeric(9, 9), 999u32),
        );
        assert_eq!(result, ReadResult::Status(StatusCode::BadNodeIdUnknown));
    }

    #[test]
    fn test_class_gate_on_view_attribute() {
        let fixture = AddressSpaceFixture::sample();
        let result = read_node(
            &fixture.store,
            &ReadValueId::new(ids::boiler(), AttributeId::ContainsNoLoops),
        );
        assert_eq!(result.status(), StatusCode::BadNotReadable);
        assert_eq!(fixture.store.outstanding_refs(), 0);
    }

    #[test]
    fn test_empty_batch_is_nothing_to_do() {
        let fixture = AddressSpaceFixture::sample();
        let response = run(
            &fixture.store,
            &ServerConfig::default(),
            &ReadRequest::default(),
        );
        assert_eq!(
            response.response_header.service_result,
            StatusCode::BadNothingToDo
        );
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_batch_over_limit_is_rejected_whole() {
        let fixture = AddressSpaceFixture::sample();
        let config = ServerConfig {
            max_nodes_per_read: 1,
            ..Default::default()
        };
        let request = ReadRequest::new(vec![
            ReadValueId::new(ids::boiler(), AttributeId::NodeId),
            ReadValueId::new(ids::boiler(), AttributeId::BrowseName),
        ]);
        let response = run(&fixture.store, &config, &request);
        assert_eq!(
            response.response_header.service_result,
            StatusCode::BadTooManyOperations
        );
        assert!(response.results.is_empty());
        assert_eq!(fixture.store.outstanding_refs(), 0);
    }
}
