//! # API Facade
//!
//! The API layer is a **thin facade** over the attribute services. Sessions and the
//! CLI both go through [`AttributeApi`]; neither calls the services directly.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns** the [`NodeStore`] and the [`ServerConfig`] the services run against
//! - **Dispatches** batches to [`services::read::run`] / [`services::write::run`]
//! - **Normalizes inputs** for textual callers (attribute names or wire ids)
//!
//! It does no I/O and formats nothing; results are the service response types.
//!
//! ## Attribute Selectors
//!
//! Textual attribute selectors are either a wire id (`13`) or an attribute name
//! (`Value`, case-insensitive). A number is passed through untouched, so an id that
//! is not in the legality table still reaches the service and comes back as
//! `BadAttributeIdInvalid` on its item. An unrecognised *name* is a caller error.
//!
//! ## Generic Over NodeStore
//!
//! `AttributeApi<S: NodeStore>` works with any store. The CLI and the tests use
//! [`MemoryNodeStore`](crate::store::memory::MemoryNodeStore).

use crate::attributes::{AttributeId, DataValue};
use crate::config::ServerConfig;
use crate::error::{OpcAttrError, Result};
use crate::model::NodeId;
use crate::services::{
    self, ReadRequest, ReadResponse, ReadValueId, WriteRequest, WriteResponse, WriteValue,
};
use crate::status::StatusCode;
use crate::store::NodeStore;

/// The entry point for attribute reads and writes.
pub struct AttributeApi<S: NodeStore> {
    store: S,
    config: ServerConfig,
}

impl<S: NodeStore> AttributeApi<S> {
    pub fn new(store: S, config: ServerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn read(&self, request: &ReadRequest) -> ReadResponse {
        services::read::run(&self.store, &self.config, request)
    }

    pub fn write(&self, request: &WriteRequest) -> WriteResponse {
        services::write::run(&self.store, &self.config, request)
    }

    /// Reads several attributes of one node, one result per selector.
    pub fn read_attributes<I: AsRef<str>>(
        &self,
        node_id: &NodeId,
        attributes: &[I],
    ) -> Result<ReadResponse> {
        let items = attributes
            .iter()
            .map(|attr| parse_attribute(attr.as_ref()))
            .map(|id| id.map(|id| ReadValueId::new(node_id.clone(), id)))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.read(&ReadRequest::new(items)))
    }

    /// Writes one attribute of one node and returns its item status.
    pub fn write_attribute(
        &self,
        node_id: &NodeId,
        attribute: &str,
        value: DataValue,
    ) -> Result<StatusCode> {
        let item = WriteValue::new(node_id.clone(), parse_attribute(attribute)?, value);
        Ok(services::write::write_node(&self.store, &item))
    }
}

/// Resolves a textual selector to a wire attribute id.
pub fn parse_attribute(selector: &str) -> Result<u32> {
    let selector = selector.trim();
    if let Ok(raw) = selector.parse::<u32>() {
        return Ok(raw);
    }
    match selector.parse::<AttributeId>() {
        Ok(id) => Ok(id.into()),
        Err(_) => Err(OpcAttrError::UnknownAttribute(selector.to_string())),
    }
}
