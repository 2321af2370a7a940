//! A small boiler address space with one node of every class.
//!
//! Used by `opcattr init` and as a test address space. The node ids are stable;
//! [`ids`] names each of them.

use super::memory::MemoryNodeStore;
use crate::attributes::{Array, Variant, VariantType};
use crate::error::Result;
use crate::model::{
    LocalizedText, MethodNode, Node, NodeBody, QualifiedName, ReferenceTypeNode, VariableNode,
    VariableTypeNode, ViewNode, ACCESS_LEVEL_CURRENT_READ, ACCESS_LEVEL_CURRENT_WRITE,
};

/// Namespace the sample nodes live in.
pub const NAMESPACE: u16 = 1;

pub mod ids {
    use super::NAMESPACE;
    use crate::model::NodeId;

    pub fn boiler() -> NodeId {
        NodeId::string(NAMESPACE, "Boiler")
    }

    pub fn temperature() -> NodeId {
        NodeId::string(NAMESPACE, "Boiler.Temperature")
    }

    pub fn setpoints() -> NodeId {
        NodeId::string(NAMESPACE, "Boiler.Setpoints")
    }

    pub fn purge() -> NodeId {
        NodeId::string(NAMESPACE, "Boiler.Purge")
    }

    pub fn boiler_type() -> NodeId {
        NodeId::numeric(NAMESPACE, 1001)
    }

    pub fn temperature_type() -> NodeId {
        NodeId::numeric(NAMESPACE, 1002)
    }

    pub fn feeds() -> NodeId {
        NodeId::numeric(NAMESPACE, 1003)
    }

    pub fn pressure_unit() -> NodeId {
        NodeId::numeric(NAMESPACE, 1004)
    }

    pub fn maintenance_view() -> NodeId {
        NodeId::numeric(NAMESPACE, 1005)
    }
}

fn name(text: &str) -> QualifiedName {
    QualifiedName::new(NAMESPACE, text)
}

pub fn sample_nodes() -> Vec<Node> {
    let read_write = ACCESS_LEVEL_CURRENT_READ | ACCESS_LEVEL_CURRENT_WRITE;

    vec![
        Node::new(ids::boiler(), name("Boiler"), NodeBody::Object)
            .with_description(LocalizedText::new("en", "Main boiler")),
        Node::new(
            ids::temperature(),
            name("Temperature"),
            NodeBody::Variable(
                VariableNode::new(Variant::Double(21.5))
                    .with_access_level(read_write, read_write)
                    .with_minimum_sampling_interval(250.0)
                    .historizing(true),
            ),
        )
        .with_display_name(LocalizedText::new("en", "Boiler temperature")),
        Node::new(
            ids::setpoints(),
            name("Setpoints"),
            NodeBody::Variable(VariableNode::new(Variant::Array(Array::from_scalars([
                60.0f64, 75.0, 90.0,
            ])))),
        ),
        Node::new(
            ids::purge(),
            name("Purge"),
            NodeBody::Method(MethodNode {
                executable: true,
                user_executable: false,
            }),
        ),
        Node::new(ids::boiler_type(), name("BoilerType"), NodeBody::ObjectType),
        Node::new(
            ids::temperature_type(),
            name("TemperatureType"),
            NodeBody::VariableType(VariableTypeNode::new(
                VariantType::Double.data_type_id(),
                -1,
                Vec::new(),
            )),
        ),
        Node::new(
            ids::feeds(),
            name("Feeds"),
            NodeBody::ReferenceType(ReferenceTypeNode {
                is_abstract: false,
                symmetric: false,
                inverse_name: LocalizedText::invariant("FedBy"),
            }),
        ),
        Node::new(ids::pressure_unit(), name("PressureUnit"), NodeBody::DataType),
        Node::new(
            ids::maintenance_view(),
            name("MaintenanceView"),
            NodeBody::View(ViewNode {
                contains_no_loops: true,
                event_notifier: 0,
            }),
        ),
    ]
}

/// The sample nodes loaded into a fresh store.
pub fn sample_store() -> Result<MemoryNodeStore> {
    MemoryNodeStore::from_nodes(sample_nodes())
}
