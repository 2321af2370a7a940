//! # opcattr Architecture
//!
//! opcattr is the **attribute access layer** of an OPC UA style server. Given a node
//! identity and an attribute id it resolves the node, checks that the attribute exists
//! for the node's class, and either copies the attribute out as a type-tagged
//! [`Variant`](attributes::Variant) (Read) or applies a supplied value (Write).
//!
//! Every per-item failure degrades to a [`StatusCode`](status::StatusCode). Nothing a
//! client sends can abort a batch or panic the server.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session Layer (session.rs)                                 │
//! │  - SecureChannel -> Session -> Application gate             │
//! │  - The only place a whole batch can fail                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade owning the NodeStore and ServerConfig        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Service Layer (services/*.rs)                              │
//! │  - Batch plumbing (empty batch, operation limits, ordering) │
//! │  - Per-item read / write against the legality table         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - NodeStore trait, scoped NodeRef leases                   │
//! │  - MemoryNodeStore + JSON node sets                         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Legality Table
//!
//! [`attributes::ATTRIBUTES`] maps each of the 22 attributes to its declared wire type
//! and the set of node classes that carry it. Reader and writer both consult it before
//! touching any class-specific field; the field access itself is an exhaustive match
//! over [`model::NodeBody`].
//!
//! ## Module Overview
//!
//! - [`api`]: The facade used by sessions and the CLI
//! - [`attributes`]: Attribute ids, the legality table, variants and data values
//! - [`config`]: Server configuration (operation limits)
//! - [`error`]: Error types for infrastructure and batch-level failures
//! - [`model`]: Node ids, node classes and the node sum type
//! - [`services`]: Read and Write services
//! - [`session`]: Channel/session gate in front of the API
//! - [`status`]: OPC UA status codes
//! - [`store`]: Node storage abstraction and the in-memory implementation

pub mod api;
pub mod attributes;
pub mod config;
pub mod error;
pub mod model;
pub mod services;
pub mod session;
pub mod status;
pub mod store;
