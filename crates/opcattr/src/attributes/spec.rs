//! The attribute legality table.
//!
//! Every attribute has a fixed declared wire type and a fixed set of node classes
//! that carry it. [`ATTRIBUTES`] is the single source of truth for both; the Read and
//! Write services consult it before touching any class-specific field.

use super::value::{CopyError, Variant, VariantType};
use crate::error::OpcAttrError;
use crate::model::NodeClass;
use std::fmt;
use std::str::FromStr;

/// The 22 node attributes. Discriminants are the OPC UA wire ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass = 2,
    BrowseName = 3,
    DisplayName = 4,
    Description = 5,
    WriteMask = 6,
    UserWriteMask = 7,
    IsAbstract = 8,
    Symmetric = 9,
    InverseName = 10,
    ContainsNoLoops = 11,
    EventNotifier = 12,
    Value = 13,
    DataType = 14,
    ValueRank = 15,
    ArrayDimensions = 16,
    AccessLevel = 17,
    UserAccessLevel = 18,
    MinimumSamplingInterval = 19,
    Historizing = 20,
    Executable = 21,
    UserExecutable = 22,
}

impl AttributeId {
    pub const ALL: [AttributeId; 22] = [
        AttributeId::NodeId,
        AttributeId::NodeClass,
        AttributeId::BrowseName,
        AttributeId::DisplayName,
        AttributeId::Description,
        AttributeId::WriteMask,
        AttributeId::UserWriteMask,
        AttributeId::IsAbstract,
        AttributeId::Symmetric,
        AttributeId::InverseName,
        AttributeId::ContainsNoLoops,
        AttributeId::EventNotifier,
        AttributeId::Value,
        AttributeId::DataType,
        AttributeId::ValueRank,
        AttributeId::ArrayDimensions,
        AttributeId::AccessLevel,
        AttributeId::UserAccessLevel,
        AttributeId::MinimumSamplingInterval,
        AttributeId::Historizing,
        AttributeId::Executable,
        AttributeId::UserExecutable,
    ];

    /// Decodes a wire id. Anything outside 1..=22 is not an attribute.
    pub fn from_u32(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| *attr as u32 == id)
    }

    /// The legality table entry for this attribute.
    pub fn spec(self) -> &'static AttributeSpec {
        &ATTRIBUTES[self as usize - 1]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<AttributeId> for u32 {
    fn from(id: AttributeId) -> Self {
        id as u32
    }
}

/// Parses either a wire id (`13`) or a case-insensitive name (`value`).
impl FromStr for AttributeId {
    type Err = OpcAttrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = match s.parse::<u32>() {
            Ok(id) => AttributeId::from_u32(id),
            Err(_) => ATTRIBUTES
                .iter()
                .find(|spec| spec.name.eq_ignore_ascii_case(s))
                .map(|spec| spec.id),
        };
        found.ok_or_else(|| OpcAttrError::UnknownAttribute(s.to_string()))
    }
}

/// A set of node classes, stored as the OPC UA class bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeClassSet(u32);

impl NodeClassSet {
    pub const EMPTY: NodeClassSet = NodeClassSet(0);
    pub const ALL: NodeClassSet = NodeClassSet(0xFF);

    pub const fn with(self, class: NodeClass) -> Self {
        NodeClassSet(self.0 | class.bits())
    }

    pub const fn contains(self, class: NodeClass) -> bool {
        self.0 & class.bits() != 0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = NodeClass> {
        NodeClass::ALL
            .into_iter()
            .filter(move |class| self.contains(*class))
    }
}

/// The wire type an attribute is always reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredType {
    Scalar(VariantType),
    Array(VariantType),
    /// The Value attribute: any variant, including `Empty`.
    Any,
}

impl DeclaredType {
    pub fn admits(self, value: &Variant) -> bool {
        match self {
            DeclaredType::Any => true,
            DeclaredType::Scalar(ty) => value.variant_type() == Some(ty),
            DeclaredType::Array(ty) => value
                .as_array()
                .is_some_and(|array| array.value_type() == ty),
        }
    }

    /// Hands `value` back if it has this declared type.
    pub fn accept(self, value: Variant) -> Result<Variant, CopyError> {
        if self.admits(&value) {
            Ok(value)
        } else {
            Err(CopyError::TypeMismatch {
                expected: self,
                actual: value.type_label(),
            })
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredType::Scalar(ty) => write!(f, "{}", ty),
            DeclaredType::Array(ty) => write!(f, "Array<{}>", ty),
            DeclaredType::Any => f.write_str("BaseDataType"),
        }
    }
}

/// Legality table entry for a single attribute.
#[derive(Debug, Clone)]
pub struct AttributeSpec {
    pub id: AttributeId,

    /// The attribute name as used by OPC UA (e.g. "BrowseName")
    pub name: &'static str,

    /// The type every successful read of this attribute carries
    pub declared: DeclaredType,

    /// The node classes on which the attribute exists
    pub classes: NodeClassSet,
}

impl AttributeSpec {
    /// Create a spec that exists on no node class yet.
    const fn new(id: AttributeId, name: &'static str, declared: DeclaredType) -> Self {
        Self {
            id,
            name,
            declared,
            classes: NodeClassSet::EMPTY,
        }
    }

    /// The attribute exists on every node class.
    const fn on_all(mut self) -> Self {
        self.classes = NodeClassSet::ALL;
        self
    }

    /// The attribute exists on `class`.
    const fn on(mut self, class: NodeClass) -> Self {
        self.classes = self.classes.with(class);
        self
    }

    pub fn permits(&self, class: NodeClass) -> bool {
        self.classes.contains(class)
    }
}

const fn scalar(ty: VariantType) -> DeclaredType {
    DeclaredType::Scalar(ty)
}

/// Registry of all node attributes, ordered by wire id.
pub const ATTRIBUTES: &[AttributeSpec] = &[
    // Common to every node class
    AttributeSpec::new(AttributeId::NodeId, "NodeId", scalar(VariantType::NodeId)).on_all(),
    AttributeSpec::new(AttributeId::NodeClass, "NodeClass", scalar(VariantType::Int32)).on_all(),
    AttributeSpec::new(
        AttributeId::BrowseName,
        "BrowseName",
        scalar(VariantType::QualifiedName),
    )
    .on_all(),
    AttributeSpec::new(
        AttributeId::DisplayName,
        "DisplayName",
        scalar(VariantType::LocalizedText),
    )
    .on_all(),
    AttributeSpec::new(
        AttributeId::Description,
        "Description",
        scalar(VariantType::LocalizedText),
    )
    .on_all(),
    AttributeSpec::new(AttributeId::WriteMask, "WriteMask", scalar(VariantType::UInt32)).on_all(),
    AttributeSpec::new(
        AttributeId::UserWriteMask,
        "UserWriteMask",
        scalar(VariantType::UInt32),
    )
    .on_all(),
    // ReferenceType
    AttributeSpec::new(AttributeId::IsAbstract, "IsAbstract", scalar(VariantType::Boolean))
        .on(NodeClass::ReferenceType),
    AttributeSpec::new(AttributeId::Symmetric, "Symmetric", scalar(VariantType::Boolean))
        .on(NodeClass::ReferenceType),
    AttributeSpec::new(
        AttributeId::InverseName,
        "InverseName",
        scalar(VariantType::LocalizedText),
    )
    .on(NodeClass::ReferenceType),
    // View
    AttributeSpec::new(
        AttributeId::ContainsNoLoops,
        "ContainsNoLoops",
        scalar(VariantType::Boolean),
    )
    .on(NodeClass::View),
    AttributeSpec::new(
        AttributeId::EventNotifier,
        "EventNotifier",
        scalar(VariantType::Byte),
    )
    .on(NodeClass::View),
    // Variable, VariableType
    AttributeSpec::new(AttributeId::Value, "Value", DeclaredType::Any).on(NodeClass::Variable),
    AttributeSpec::new(AttributeId::DataType, "DataType", scalar(VariantType::NodeId))
        .on(NodeClass::Variable)
        .on(NodeClass::VariableType),
    AttributeSpec::new(AttributeId::ValueRank, "ValueRank", scalar(VariantType::Int32))
        .on(NodeClass::Variable)
        .on(NodeClass::VariableType),
    AttributeSpec::new(
        AttributeId::ArrayDimensions,
        "ArrayDimensions",
        DeclaredType::Array(VariantType::UInt32),
    )
    .on(NodeClass::Variable)
    .on(NodeClass::VariableType),
    AttributeSpec::new(AttributeId::AccessLevel, "AccessLevel", scalar(VariantType::Byte))
        .on(NodeClass::Variable),
    AttributeSpec::new(
        AttributeId::UserAccessLevel,
        "UserAccessLevel",
        scalar(VariantType::Byte),
    )
    .on(NodeClass::Variable),
    AttributeSpec::new(
        AttributeId::MinimumSamplingInterval,
        "MinimumSamplingInterval",
        scalar(VariantType::Double),
    )
    .on(NodeClass::Variable),
    AttributeSpec::new(
        AttributeId::Historizing,
        "Historizing",
        scalar(VariantType::Boolean),
    )
    .on(NodeClass::Variable),
    // Method
    AttributeSpec::new(AttributeId::Executable, "Executable", scalar(VariantType::Boolean))
        .on(NodeClass::Method),
    AttributeSpec::new(
        AttributeId::UserExecutable,
        "UserExecutable",
        scalar(VariantType::Boolean),
    )
    .on(NodeClass::Method),
];

/// Look up an attribute spec by wire id.
pub fn get_spec(attribute_id: u32) -> Option<&'static AttributeSpec> {
    AttributeId::from_u32(attribute_id).map(AttributeId::spec)
}
