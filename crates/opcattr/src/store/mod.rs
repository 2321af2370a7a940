//! # Storage Layer
//!
//! Nodes are owned by a [`NodeStore`]. The attribute services never own a node; they
//! borrow one for the span of a single read or write through a [`NodeRef`].
//!
//! ## Scoped References
//!
//! `resolve` hands out a [`NodeRef`] lease. Dropping it is the release, so every exit
//! path of a service (early returns included) gives the reference back exactly once.
//! Stores that want to account for leases share a [`LeaseCounter`] with the refs they
//! hand out; [`memory::MemoryNodeStore::outstanding_refs`] exposes it.
//!
//! ## Locking
//!
//! Each node sits behind its own `parking_lot::RwLock`. Readers take a shared guard for
//! the field copy, writers an exclusive guard for the field assignment, so at most one
//! mutation per node is in flight and a reader never sees a half-written field.
//!
//! ## Implementations
//!
//! - [`memory::MemoryNodeStore`]: namespaces of nodes held in memory.
//! - [`nodeset`]: JSON node set files loaded into / saved from a `MemoryNodeStore`.
//! - [`sample`]: a small address space with one node of every class.

use crate::model::{Node, NodeId};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub mod memory;
pub mod nodeset;
pub mod sample;

/// Lookup of nodes by identity.
///
/// Implementations must be safe to call from several readers and writers at once.
pub trait NodeStore: Send + Sync {
    /// Borrows the node with `node_id`. The lease ends when the returned ref is dropped.
    fn resolve(&self, node_id: &NodeId) -> Option<NodeRef>;
}

impl<S: NodeStore + ?Sized> NodeStore for Arc<S> {
    fn resolve(&self, node_id: &NodeId) -> Option<NodeRef> {
        (**self).resolve(node_id)
    }
}

impl<S: NodeStore + ?Sized> NodeStore for &S {
    fn resolve(&self, node_id: &NodeId) -> Option<NodeRef> {
        (**self).resolve(node_id)
    }
}

/// Counts leases handed out and not yet dropped.
#[derive(Debug, Clone, Default)]
pub struct LeaseCounter(Arc<AtomicUsize>);

impl LeaseCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn acquire(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A borrowed node. Released on drop.
#[derive(Debug)]
pub struct NodeRef {
    node: Arc<RwLock<Node>>,
    lease: Option<LeaseCounter>,
}

impl NodeRef {
    /// A lease that is not tracked by any counter.
    pub fn untracked(node: Arc<RwLock<Node>>) -> Self {
        Self { node, lease: None }
    }

    /// A lease counted in `lease` until this ref is dropped.
    pub fn tracked(node: Arc<RwLock<Node>>, lease: &LeaseCounter) -> Self {
        lease.acquire();
        Self {
            node,
            lease: Some(lease.clone()),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Node> {
        self.node.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Node> {
        self.node.write()
    }
}

impl Drop for NodeRef {
    fn drop(&mut self) {
        if let Some(lease) = &self.lease {
            lease.release();
        }
    }
}
