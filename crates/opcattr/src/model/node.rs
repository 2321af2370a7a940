//! Nodes of the address space.
//!
//! A [`Node`] is a common header plus a [`NodeBody`]: one variant per [`NodeClass`],
//! each carrying exactly the fields that class has. The node's class is derived from
//! the body, so a node can never claim one class while holding another's fields.
//!
//! Attribute access goes through [`Node::attribute`], an exhaustive match over
//! [`AttributeId`] and [`NodeBody`]. Callers are expected to gate on the legality
//! table first; `attribute` returning `None` for a permitted pair is a bug in the table.

use super::{LocalizedText, NodeId, QualifiedName};
use crate::attributes::{Array, AttributeId, Variant, VariantType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of node kinds. [`NodeClass::bits`] gives the OPC UA wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeClass {
    Object,
    Variable,
    Method,
    ObjectType,
    VariableType,
    ReferenceType,
    DataType,
    View,
}

impl NodeClass {
    pub const ALL: [NodeClass; 8] = [
        NodeClass::Object,
        NodeClass::Variable,
        NodeClass::Method,
        NodeClass::ObjectType,
        NodeClass::VariableType,
        NodeClass::ReferenceType,
        NodeClass::DataType,
        NodeClass::View,
    ];

    pub const fn bits(self) -> u32 {
        match self {
            NodeClass::Object => 1,
            NodeClass::Variable => 2,
            NodeClass::Method => 4,
            NodeClass::ObjectType => 8,
            NodeClass::VariableType => 16,
            NodeClass::ReferenceType => 32,
            NodeClass::DataType => 64,
            NodeClass::View => 128,
        }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.bits() == bits)
    }

    pub const fn name(self) -> &'static str {
        match self {
            NodeClass::Object => "Object",
            NodeClass::Variable => "Variable",
            NodeClass::Method => "Method",
            NodeClass::ObjectType => "ObjectType",
            NodeClass::VariableType => "VariableType",
            NodeClass::ReferenceType => "ReferenceType",
            NodeClass::DataType => "DataType",
            NodeClass::View => "View",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Access level bit: the current value can be read.
pub const ACCESS_LEVEL_CURRENT_READ: u8 = 0x01;
/// Access level bit: the current value can be written.
pub const ACCESS_LEVEL_CURRENT_WRITE: u8 = 0x02;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableNode {
    pub data_type: NodeId,
    #[serde(default = "scalar_rank")]
    pub value_rank: i32,
    #[serde(default)]
    pub array_dimensions: Vec<u32>,
    #[serde(default)]
    pub value: Variant,
    #[serde(default = "read_only")]
    pub access_level: u8,
    #[serde(default = "read_only")]
    pub user_access_level: u8,
    #[serde(default)]
    pub minimum_sampling_interval: f64,
    #[serde(default)]
    pub historizing: bool,
}

impl VariableNode {
    /// A readable variable whose data type and shape are taken from `value`.
    pub fn new(value: Variant) -> Self {
        let (data_type, value_rank, array_dimensions) = match &value {
            Variant::Array(array) => (
                array.value_type().data_type_id(),
                1,
                vec![u32::try_from(array.len()).unwrap_or(u32::MAX)],
            ),
            other => (
                other
                    .variant_type()
                    .map(VariantType::data_type_id)
                    .unwrap_or_else(base_data_type),
                scalar_rank(),
                Vec::new(),
            ),
        };
        Self {
            data_type,
            value_rank,
            array_dimensions,
            value,
            access_level: read_only(),
            user_access_level: read_only(),
            minimum_sampling_interval: 0.0,
            historizing: false,
        }
    }

    pub fn with_access_level(mut self, access_level: u8, user_access_level: u8) -> Self {
        self.access_level = access_level;
        self.user_access_level = user_access_level;
        self
    }

    pub fn with_minimum_sampling_interval(mut self, interval: f64) -> Self {
        self.minimum_sampling_interval = interval;
        self
    }

    pub fn historizing(mut self, historizing: bool) -> Self {
        self.historizing = historizing;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableTypeNode {
    pub data_type: NodeId,
    #[serde(default = "scalar_rank")]
    pub value_rank: i32,
    #[serde(default)]
    pub array_dimensions: Vec<u32>,
}

impl VariableTypeNode {
    pub fn new(data_type: NodeId, value_rank: i32, array_dimensions: Vec<u32>) -> Self {
        Self {
            data_type,
            value_rank,
            array_dimensions,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTypeNode {
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub symmetric: bool,
    #[serde(default)]
    pub inverse_name: LocalizedText,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewNode {
    #[serde(default)]
    pub contains_no_loops: bool,
    #[serde(default)]
    pub event_notifier: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodNode {
    #[serde(default)]
    pub executable: bool,
    #[serde(default)]
    pub user_executable: bool,
}

/// Class-specific part of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node_class")]
pub enum NodeBody {
    Object,
    Variable(VariableNode),
    Method(MethodNode),
    ObjectType,
    VariableType(VariableTypeNode),
    ReferenceType(ReferenceTypeNode),
    DataType,
    View(ViewNode),
}

impl NodeBody {
    pub fn node_class(&self) -> NodeClass {
        match self {
            NodeBody::Object => NodeClass::Object,
            NodeBody::Variable(_) => NodeClass::Variable,
            NodeBody::Method(_) => NodeClass::Method,
            NodeBody::ObjectType => NodeClass::ObjectType,
            NodeBody::VariableType(_) => NodeClass::VariableType,
            NodeBody::ReferenceType(_) => NodeClass::ReferenceType,
            NodeBody::DataType => NodeClass::DataType,
            NodeBody::View(_) => NodeClass::View,
        }
    }

    /// (data type, value rank, array dimensions) for Variable and VariableType.
    fn value_shape(&self) -> Option<(&NodeId, i32, &[u32])> {
        match self {
            NodeBody::Variable(v) => Some((&v.data_type, v.value_rank, &v.array_dimensions)),
            NodeBody::VariableType(t) => Some((&t.data_type, t.value_rank, &t.array_dimensions)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    node_id: NodeId,
    pub browse_name: QualifiedName,
    pub display_name: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub write_mask: u32,
    #[serde(default)]
    pub user_write_mask: u32,
    #[serde(flatten)]
    pub body: NodeBody,
}

impl Node {
    /// Creates a node whose display name defaults to the browse name.
    pub fn new(node_id: NodeId, browse_name: QualifiedName, body: NodeBody) -> Self {
        let display_name = LocalizedText::invariant(browse_name.name.clone());
        Self {
            node_id,
            browse_name,
            display_name,
            description: LocalizedText::default(),
            write_mask: 0,
            user_write_mask: 0,
            body,
        }
    }

    pub fn with_display_name(mut self, display_name: LocalizedText) -> Self {
        self.display_name = display_name;
        self
    }

    pub fn with_description(mut self, description: LocalizedText) -> Self {
        self.description = description;
        self
    }

    pub fn with_write_masks(mut self, write_mask: u32, user_write_mask: u32) -> Self {
        self.write_mask = write_mask;
        self.user_write_mask = user_write_mask;
        self
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn node_class(&self) -> NodeClass {
        self.body.node_class()
    }

    /// Mutable access to the value of a Variable node.
    pub fn value_mut(&mut self) -> Option<&mut Variant> {
        match &mut self.body {
            NodeBody::Variable(v) => Some(&mut v.value),
            _ => None,
        }
    }

    /// Copies an attribute out of the node.
    ///
    /// Returns `None` when the node's class does not carry the attribute.
    pub fn attribute(&self, id: AttributeId) -> Option<Variant> {
        match id {
            AttributeId::NodeId => Some(Variant::NodeId(self.node_id.clone())),
            AttributeId::NodeClass => Some(Variant::Int32(self.node_class().bits() as i32)),
            AttributeId::BrowseName => Some(Variant::QualifiedName(self.browse_name.clone())),
            AttributeId::DisplayName => Some(Variant::LocalizedText(self.display_name.clone())),
            AttributeId::Description => Some(Variant::LocalizedText(self.description.clone())),
            AttributeId::WriteMask => Some(Variant::UInt32(self.write_mask)),
            AttributeId::UserWriteMask => Some(Variant::UInt32(self.user_write_mask)),
            AttributeId::IsAbstract => match &self.body {
                NodeBody::ReferenceType(r) => Some(Variant::Boolean(r.is_abstract)),
                _ => None,
            },
            AttributeId::Symmetric => match &self.body {
                NodeBody::ReferenceType(r) => Some(Variant::Boolean(r.symmetric)),
                _ => None,
            },
            AttributeId::InverseName => match &self.body {
                NodeBody::ReferenceType(r) => Some(Variant::LocalizedText(r.inverse_name.clone())),
                _ => None,
            },
            AttributeId::ContainsNoLoops => match &self.body {
                NodeBody::View(v) => Some(Variant::Boolean(v.contains_no_loops)),
                _ => None,
            },
            AttributeId::EventNotifier => match &self.body {
                NodeBody::View(v) => Some(Variant::Byte(v.event_notifier)),
                _ => None,
            },
            AttributeId::Value => match &self.body {
                NodeBody::Variable(v) => Some(v.value.clone()),
                _ => None,
            },
            AttributeId::DataType => self
                .body
                .value_shape()
                .map(|(data_type, _, _)| Variant::NodeId(data_type.clone())),
            AttributeId::ValueRank => self
                .body
                .value_shape()
                .map(|(_, rank, _)| Variant::Int32(rank)),
            AttributeId::ArrayDimensions => self.body.value_shape().map(|(_, _, dims)| {
                Variant::Array(Array::from_scalars(dims.iter().copied()))
            }),
            AttributeId::AccessLevel => match &self.body {
                NodeBody::Variable(v) => Some(Variant::Byte(v.access_level)),
                _ => None,
            },
            AttributeId::UserAccessLevel => match &self.body {
                NodeBody::Variable(v) => Some(Variant::Byte(v.user_access_level)),
                _ => None,
            },
            AttributeId::MinimumSamplingInterval => match &self.body {
                NodeBody::Variable(v) => Some(Variant::Double(v.minimum_sampling_interval)),
                _ => None,
            },
            AttributeId::Historizing => match &self.body {
                NodeBody::Variable(v) => Some(Variant::Boolean(v.historizing)),
                _ => None,
            },
            AttributeId::Executable => match &self.body {
                NodeBody::Method(m) => Some(Variant::Boolean(m.executable)),
                _ => None,
            },
            AttributeId::UserExecutable => match &self.body {
                NodeBody::Method(m) => Some(Variant::Boolean(m.user_executable)),
                _ => None,
            },
        }
    }
}

fn scalar_rank() -> i32 {
    -1
}

fn read_only() -> u8 {
    ACCESS_LEVEL_CURRENT_READ
}

fn base_data_type() -> NodeId {
    NodeId::numeric(0, 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temperature() -> Node {
        Node::new(
            NodeId::string(2, "Boiler.Temperature"),
            QualifiedName::new(2, "Temperature"),
            NodeBody::Variable(VariableNode::new(Variant::Double(21.5))),
        )
    }

    #[test]
    fn class_comes_from_body() {
        assert_eq!(temperature().node_class(), NodeClass::Variable);
        let view = Node::new(
            NodeId::numeric(1, 1),
            QualifiedName::new(1, "V"),
            NodeBody::View(ViewNode::default()),
        );
        assert_eq!(view.node_class(), NodeClass::View);
    }

    #[test]
    fn display_name_defaults_to_browse_name() {
        let node = temperature();
        assert_eq!(node.display_name, LocalizedText::invariant("Temperature"));
    }

    #[test]
    fn variable_infers_data_type_from_value() {
        let scalar = VariableNode::new(Variant::Double(1.0));
        assert_eq!(scalar.data_type, NodeId::numeric(0, 11));
        assert_eq!(scalar.value_rank, -1);
        assert!(scalar.array_dimensions.is_empty());

        let array = VariableNode::new(Variant::Array(Array::from_scalars([1i32, 2, 3])));
        assert_eq!(array.data_type, NodeId::numeric(0, 6));
        assert_eq!(array.value_rank, 1);
        assert_eq!(array.array_dimensions, vec![3]);

        let empty = VariableNode::new(Variant::Empty);
        assert_eq!(empty.data_type, NodeId::numeric(0, 24));
    }

    #[test]
    fn node_class_attribute_is_the_bitmask_value() {
        assert_eq!(
            temperature().attribute(AttributeId::NodeClass),
            Some(Variant::Int32(2))
        );
    }

    #[test]
    fn class_specific_attribute_missing_on_other_classes() {
        let node = temperature();
        assert_eq!(node.attribute(AttributeId::IsAbstract), None);
        assert_eq!(node.attribute(AttributeId::Executable), None);
        assert_eq!(node.attribute(AttributeId::ContainsNoLoops), None);
        assert_eq!(
            node.attribute(AttributeId::Value),
            Some(Variant::Double(21.5))
        );
    }

    #[test]
    fn value_mut_only_on_variables() {
        let mut node = temperature();
        *node.value_mut().unwrap() = Variant::Double(80.0);
        assert_eq!(node.attribute(AttributeId::Value), Some(Variant::Double(80.0)));

        let mut object = Node::new(
            NodeId::numeric(1, 5),
            QualifiedName::new(1, "Boiler"),
            NodeBody::Object,
        );
        assert!(object.value_mut().is_none());
    }

    #[test]
    fn json_uses_flat_node_class_tag() {
        let json = serde_json::to_value(temperature()).unwrap();
        assert_eq!(json["node_class"], "Variable");
        assert_eq!(json["node_id"], "ns=2;s=Boiler.Temperature");

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, temperature());
    }

    #[test]
    fn json_fills_defaults() {
        let node: Node = serde_json::from_str(
            r#"{
                "node_id": "ns=1;i=7",
                "browse_name": {"namespace_index": 1, "name": "Pump"},
                "display_name": {"text": "Pump"},
                "node_class": "Object"
            }"#,
        )
        .unwrap();
        assert_eq!(node.node_class(), NodeClass::Object);
        assert_eq!(node.write_mask, 0);
        assert_eq!(node.description, LocalizedText::default());
    }
}
