//! Variant values and data values.
//!
//! [`Variant`] is the tagged union every attribute is copied into and out of. The tag
//! travels with the data, so the declared type of an attribute can be checked at the
//! point of copy (see [`DeclaredType::accept`](super::DeclaredType::accept)).
//!
//! [`DataValue`] is the wire container around a variant. Its encoding mask records
//! which optional fields are present; the Write service only acts on data values in
//! plain tagged-variant form (mask == [`ENCODING_MASK_VARIANT`]).

use super::DeclaredType;
use crate::model::{LocalizedText, NodeId, QualifiedName};
use crate::status::StatusCode;
use chrono::{DateTime, Utc};
use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// The built-in scalar types a variant can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantType {
    Boolean,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Float,
    Double,
    String,
    DateTime,
    Guid,
    ByteString,
    NodeId,
    StatusCode,
    QualifiedName,
    LocalizedText,
}

impl VariantType {
    pub const fn name(self) -> &'static str {
        match self {
            VariantType::Boolean => "Boolean",
            VariantType::SByte => "SByte",
            VariantType::Byte => "Byte",
            VariantType::Int16 => "Int16",
            VariantType::UInt16 => "UInt16",
            VariantType::Int32 => "Int32",
            VariantType::UInt32 => "UInt32",
            VariantType::Int64 => "Int64",
            VariantType::UInt64 => "UInt64",
            VariantType::Float => "Float",
            VariantType::Double => "Double",
            VariantType::String => "String",
            VariantType::DateTime => "DateTime",
            VariantType::Guid => "Guid",
            VariantType::ByteString => "ByteString",
            VariantType::NodeId => "NodeId",
            VariantType::StatusCode => "StatusCode",
            VariantType::QualifiedName => "QualifiedName",
            VariantType::LocalizedText => "LocalizedText",
        }
    }

    /// The namespace 0 DataType node for this built-in type.
    pub fn data_type_id(self) -> NodeId {
        let id = match self {
            VariantType::Boolean => 1,
            VariantType::SByte => 2,
            VariantType::Byte => 3,
            VariantType::Int16 => 4,
            VariantType::UInt16 => 5,
            VariantType::Int32 => 6,
            VariantType::UInt32 => 7,
            VariantType::Int64 => 8,
            VariantType::UInt64 => 9,
            VariantType::Float => 10,
            VariantType::Double => 11,
            VariantType::String => 12,
            VariantType::DateTime => 13,
            VariantType::Guid => 14,
            VariantType::ByteString => 15,
            VariantType::NodeId => 17,
            VariantType::StatusCode => 19,
            VariantType::QualifiedName => 20,
            VariantType::LocalizedText => 21,
        };
        NodeId::numeric(0, id)
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CopyError {
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        expected: DeclaredType,
        actual: String,
    },

    #[error("array of {expected} holds a {found}")]
    MixedArray { expected: VariantType, found: String },
}

/// A type-tagged value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Empty,
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(DateTime<Utc>),
    Guid(Uuid),
    ByteString(Vec<u8>),
    NodeId(NodeId),
    StatusCode(StatusCode),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
    Array(Array),
}

impl Variant {
    /// The scalar type tag, `None` for `Empty` and arrays.
    pub fn variant_type(&self) -> Option<VariantType> {
        let ty = match self {
            Variant::Empty | Variant::Array(_) => return None,
            Variant::Boolean(_) => VariantType::Boolean,
            Variant::SByte(_) => VariantType::SByte,
            Variant::Byte(_) => VariantType::Byte,
            Variant::Int16(_) => VariantType::Int16,
            Variant::UInt16(_) => VariantType::UInt16,
            Variant::Int32(_) => VariantType::Int32,
            Variant::UInt32(_) => VariantType::UInt32,
            Variant::Int64(_) => VariantType::Int64,
            Variant::UInt64(_) => VariantType::UInt64,
            Variant::Float(_) => VariantType::Float,
            Variant::Double(_) => VariantType::Double,
            Variant::String(_) => VariantType::String,
            Variant::DateTime(_) => VariantType::DateTime,
            Variant::Guid(_) => VariantType::Guid,
            Variant::ByteString(_) => VariantType::ByteString,
            Variant::NodeId(_) => VariantType::NodeId,
            Variant::StatusCode(_) => VariantType::StatusCode,
            Variant::QualifiedName(_) => VariantType::QualifiedName,
            Variant::LocalizedText(_) => VariantType::LocalizedText,
        };
        Some(ty)
    }

    /// Human readable type, e.g. `Double` or `Array<UInt32>`.
    pub fn type_label(&self) -> String {
        match self {
            Variant::Empty => "Empty".to_string(),
            Variant::Array(array) => format!("Array<{}>", array.value_type()),
            other => other
                .variant_type()
                .map(|ty| ty.name().to_string())
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Variant::Array(array) => Some(array),
            _ => None,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Empty => f.write_str("(empty)"),
            Variant::Boolean(v) => write!(f, "{}", v),
            Variant::SByte(v) => write!(f, "{}", v),
            Variant::Byte(v) => write!(f, "{}", v),
            Variant::Int16(v) => write!(f, "{}", v),
            Variant::UInt16(v) => write!(f, "{}", v),
            Variant::Int32(v) => write!(f, "{}", v),
            Variant::UInt32(v) => write!(f, "{}", v),
            Variant::Int64(v) => write!(f, "{}", v),
            Variant::UInt64(v) => write!(f, "{}", v),
            Variant::Float(v) => write!(f, "{}", v),
            Variant::Double(v) => write!(f, "{}", v),
            Variant::String(v) => write!(f, "{:?}", v),
            Variant::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
            Variant::Guid(v) => write!(f, "{}", v),
            Variant::ByteString(v) => write!(f, "{}", BASE64.encode(v)),
            Variant::NodeId(v) => write!(f, "{}", v),
            Variant::StatusCode(v) => write!(f, "{}", v),
            Variant::QualifiedName(v) => write!(f, "{}", v),
            Variant::LocalizedText(v) => write!(f, "{}", v),
            Variant::Array(array) => {
                f.write_str("[")?;
                for (i, value) in array.values().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Rust types that map onto exactly one [`VariantType`].
pub trait Scalar: Into<Variant> {
    const TYPE: VariantType;
}

macro_rules! scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::$variant(value)
                }
            }

            impl Scalar for $ty {
                const TYPE: VariantType = VariantType::$variant;
            }
        )*
    };
}

scalar! {
    bool => Boolean,
    i8 => SByte,
    u8 => Byte,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
    i64 => Int64,
    u64 => UInt64,
    f32 => Float,
    f64 => Double,
    String => String,
    DateTime<Utc> => DateTime,
    Uuid => Guid,
    Vec<u8> => ByteString,
    NodeId => NodeId,
    StatusCode => StatusCode,
    QualifiedName => QualifiedName,
    LocalizedText => LocalizedText,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.to_string())
    }
}

impl From<Array> for Variant {
    fn from(value: Array) -> Self {
        Variant::Array(value)
    }
}

/// A one-dimensional array whose elements all share one scalar type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArray")]
pub struct Array {
    value_type: VariantType,
    values: Vec<Variant>,
}

#[derive(Deserialize)]
struct RawArray {
    value_type: VariantType,
    values: Vec<Variant>,
}

impl TryFrom<RawArray> for Array {
    type Error = CopyError;

    fn try_from(raw: RawArray) -> Result<Self, Self::Error> {
        Array::new(raw.value_type, raw.values)
    }
}

impl Array {
    /// Builds an array, rejecting elements of any other type (nested arrays included).
    pub fn new(value_type: VariantType, values: Vec<Variant>) -> Result<Self, CopyError> {
        if let Some(stray) = values
            .iter()
            .find(|value| value.variant_type() != Some(value_type))
        {
            return Err(CopyError::MixedArray {
                expected: value_type,
                found: stray.type_label(),
            });
        }
        Ok(Self { value_type, values })
    }

    pub fn from_scalars<T: Scalar>(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            value_type: T::TYPE,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn value_type(&self) -> VariantType {
        self.value_type
    }

    pub fn values(&self) -> &[Variant] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub const ENCODING_MASK_VARIANT: u8 = 0x01;
pub const ENCODING_MASK_STATUS: u8 = 0x02;
pub const ENCODING_MASK_SOURCE_TIMESTAMP: u8 = 0x04;
pub const ENCODING_MASK_SERVER_TIMESTAMP: u8 = 0x08;

/// A variant plus optional status and timestamps, as carried on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Variant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_timestamp: Option<DateTime<Utc>>,
}

impl DataValue {
    pub fn from_variant(value: impl Into<Variant>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_source_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.source_timestamp = Some(timestamp);
        self
    }

    pub fn encoding_mask(&self) -> u8 {
        let mut mask = 0;
        if self.value.is_some() {
            mask |= ENCODING_MASK_VARIANT;
        }
        if self.status.is_some() {
            mask |= ENCODING_MASK_STATUS;
        }
        if self.source_timestamp.is_some() {
            mask |= ENCODING_MASK_SOURCE_TIMESTAMP;
        }
        if self.server_timestamp.is_some() {
            mask |= ENCODING_MASK_SERVER_TIMESTAMP;
        }
        mask
    }

    /// The variant, but only if the data value is in plain tagged-variant form.
    pub fn variant_only(&self) -> Option<&Variant> {
        if self.encoding_mask() == ENCODING_MASK_VARIANT {
            self.value.as_ref()
        } else {
            None
        }
    }
}

impl From<Variant> for DataValue {
    fn from(value: Variant) -> Self {
        Self::from_variant(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_type_tags() {
        assert_eq!(Variant::from(true).variant_type(), Some(VariantType::Boolean));
        assert_eq!(Variant::from(7u32).variant_type(), Some(VariantType::UInt32));
        assert_eq!(Variant::from("x").variant_type(), Some(VariantType::String));
        assert_eq!(Variant::Empty.variant_type(), None);
        assert_eq!(
            Variant::Array(Array::from_scalars([1u8])).variant_type(),
            None
        );
    }

    #[test]
    fn type_label_names_arrays() {
        let dims = Variant::Array(Array::from_scalars([2u32, 3]));
        assert_eq!(dims.type_label(), "Array<UInt32>");
        assert_eq!(Variant::Double(1.0).type_label(), "Double");
        assert_eq!(Variant::Empty.type_label(), "Empty");
    }

    #[test]
    fn array_rejects_mixed_elements() {
        let err = Array::new(
            VariantType::Int32,
            vec![Variant::Int32(1), Variant::Double(2.0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            CopyError::MixedArray {
                expected: VariantType::Int32,
                found: "Double".to_string()
            }
        );
    }

    #[test]
    fn array_rejects_nesting() {
        let inner = Variant::Array(Array::from_scalars([1i32]));
        assert!(Array::new(VariantType::Int32, vec![inner]).is_err());
    }

    #[test]
    fn array_deserialization_validates() {
        let ok: Array =
            serde_json::from_str(r#"{"value_type":"Byte","values":[{"Byte":1},{"Byte":2}]}"#)
                .unwrap();
        assert_eq!(ok.len(), 2);

        let mixed = serde_json::from_str::<Array>(
            r#"{"value_type":"Byte","values":[{"Byte":1},{"Boolean":true}]}"#,
        );
        assert!(mixed.is_err());
    }

    #[test]
    fn display_formats() {
        assert_eq!(Variant::from(21.5f64).to_string(), "21.5");
        assert_eq!(Variant::from("on").to_string(), "\"on\"");
        assert_eq!(
            Variant::Array(Array::from_scalars([1u32, 2])).to_string(),
            "[1, 2]"
        );
        assert_eq!(Variant::Empty.to_string(), "(empty)");
    }

    #[test]
    fn encoding_mask_tracks_present_fields() {
        assert_eq!(DataValue::default().encoding_mask(), 0);
        assert_eq!(
            DataValue::from_variant(1i32).encoding_mask(),
            ENCODING_MASK_VARIANT
        );
        let stamped = DataValue::from_variant(1i32).with_source_timestamp(Utc::now());
        assert_eq!(
            stamped.encoding_mask(),
            ENCODING_MASK_VARIANT | ENCODING_MASK_SOURCE_TIMESTAMP
        );
    }

    #[test]
    fn variant_only_requires_plain_form() {
        assert_eq!(
            DataValue::from_variant(true).variant_only(),
            Some(&Variant::Boolean(true))
        );
        assert_eq!(
            DataValue::from_status(StatusCode::Good).variant_only(),
            None
        );
        let stamped = DataValue::from_variant(true).with_source_timestamp(Utc::now());
        assert_eq!(stamped.variant_only(), None);
    }

    #[test]
    fn variant_json_is_externally_tagged() {
        let json = serde_json::to_string(&Variant::Double(1.5)).unwrap();
        assert_eq!(json, r#"{"Double":1.5}"#);
        let empty: Variant = serde_json::from_str(r#""Empty""#).unwrap();
        assert!(empty.is_empty());
    }
}
