//! # Attribute System
//!
//! Everything the services need to know about attributes, independent of any node:
//!
//! - **Identity**: [`AttributeId`], the 22 attributes with their wire ids
//! - **Legality**: [`ATTRIBUTES`], declared type and permitted node classes per attribute
//! - **Values**: [`Variant`] (tagged union) and [`DataValue`] (wire container)
//!
//! ## Declared Types
//!
//! | Attribute | Declared type |
//! |-----------|---------------|
//! | `NodeId`, `DataType` | `NodeId` |
//! | `NodeClass`, `ValueRank` | `Int32` |
//! | `WriteMask`, `UserWriteMask` | `UInt32` |
//! | `EventNotifier`, `AccessLevel`, `UserAccessLevel` | `Byte` |
//! | `ArrayDimensions` | `Array<UInt32>` |
//! | `Value` | any variant |
//!
//! ## Usage
//!
//! ```ignore
//! let spec = get_spec(request.attribute_id).ok_or(StatusCode::BadAttributeIdInvalid)?;
//! if !spec.permits(node.node_class()) { ... }
//! let value = spec.declared.accept(node.attribute(spec.id)?)?;
//! ```

mod spec;
mod value;

pub use spec::{get_spec, AttributeId, AttributeSpec, DeclaredType, NodeClassSet, ATTRIBUTES};
pub use value::{
    Array, CopyError, DataValue, Scalar, Variant, VariantType, ENCODING_MASK_SERVER_TIMESTAMP,
    ENCODING_MASK_SOURCE_TIMESTAMP, ENCODING_MASK_STATUS, ENCODING_MASK_VARIANT,
};
