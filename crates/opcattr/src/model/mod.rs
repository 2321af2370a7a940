//! # Domain Model
//!
//! Node identities, names and the node sum type. See [`node`] for how node classes
//! map onto class-specific fields.

mod node;
mod node_id;
mod text;

pub use node::{
    MethodNode, Node, NodeBody, NodeClass, ReferenceTypeNode, VariableNode, VariableTypeNode,
    ViewNode, ACCESS_LEVEL_CURRENT_READ, ACCESS_LEVEL_CURRENT_WRITE,
};
pub use node_id::{Identifier, NodeId};
pub use text::{LocalizedText, QualifiedName};
