use super::{LeaseCounter, NodeRef, NodeStore};
use crate::error::{OpcAttrError, Result};
use crate::model::{Node, NodeId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

type Namespace = HashMap<NodeId, Arc<RwLock<Node>>>;

/// Nodes held in memory, grouped by namespace index.
///
/// Every [`NodeRef`] it hands out is counted; [`MemoryNodeStore::outstanding_refs`]
/// drops back to zero once all of them are released.
#[derive(Debug, Default)]
pub struct MemoryNodeStore {
    namespaces: RwLock<BTreeMap<u16, Namespace>>,
    leases: LeaseCounter,
}

impl MemoryNodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> Result<Self> {
        let store = Self::new();
        for node in nodes {
            store.insert(node)?;
        }
        Ok(store)
    }

    /// Adds a node. Fails if a node with the same id is already present.
    pub fn insert(&self, node: Node) -> Result<()> {
        let node_id = node.node_id().clone();
        let mut namespaces = self.namespaces.write();
        let namespace = namespaces.entry(node_id.namespace()).or_default();
        if namespace.contains_key(&node_id) {
            return Err(OpcAttrError::DuplicateNode(node_id));
        }
        namespace.insert(node_id, Arc::new(RwLock::new(node)));
        Ok(())
    }

    /// Removes a node, returning its last state. Outstanding refs keep their copy alive.
    pub fn remove(&self, node_id: &NodeId) -> Option<Node> {
        let mut namespaces = self.namespaces.write();
        let namespace = namespaces.get_mut(&node_id.namespace())?;
        let shared = namespace.remove(node_id)?;
        if namespace.is_empty() {
            namespaces.remove(&node_id.namespace());
        }
        Some(match Arc::try_unwrap(shared) {
            Ok(lock) => lock.into_inner(),
            Err(shared) => shared.read().clone(),
        })
    }

    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.namespaces
            .read()
            .get(&node_id.namespace())
            .is_some_and(|namespace| namespace.contains_key(node_id))
    }

    /// A snapshot of every node, ordered by node id.
    pub fn nodes(&self) -> Vec<Node> {
        let namespaces = self.namespaces.read();
        let mut nodes: Vec<Node> = namespaces
            .values()
            .flat_map(|namespace| namespace.values().map(|node| node.read().clone()))
            .collect();
        nodes.sort_by(|a, b| a.node_id().cmp(b.node_id()));
        nodes
    }

    pub fn namespaces(&self) -> Vec<u16> {
        self.namespaces.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.namespaces.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of refs handed out by `resolve` and not yet dropped.
    pub fn outstanding_refs(&self) -> usize {
        self.leases.outstanding()
    }
}

impl NodeStore for MemoryNodeStore {
    fn resolve(&self, node_id: &NodeId) -> Option<NodeRef> {
        let namespaces = self.namespaces.read();
        let Some(namespace) = namespaces.get(&node_id.namespace()) else {
            debug!(%node_id, "namespace not registered");
            return None;
        };
        let Some(node) = namespace.get(node_id) else {
            debug!(%node_id, "node not found");
            return None;
        };
        Some(NodeRef::tracked(node.clone(), &self.leases))
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::attributes::Variant;
    use crate::model::{NodeBody, QualifiedName, VariableNode};
    use crate::store::sample;

    pub struct AddressSpaceFixture {
        pub store: MemoryNodeStore,
    }

    impl Default for AddressSpaceFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AddressSpaceFixture {
        pub fn new() -> Self {
            Self {
                store: MemoryNodeStore::new(),
            }
        }

        /// Starts from the sample address space (one node of every class).
        pub fn sample() -> Self {
            Self {
                store: MemoryNodeStore::from_nodes(sample::sample_nodes()).unwrap(),
            }
        }

        pub fn with_node(self, node: Node) -> Self {
            self.store.insert(node).unwrap();
            self
        }

        pub fn with_object(self, node_id: NodeId, name: &str) -> Self {
            let browse_name = QualifiedName::new(node_id.namespace(), name);
            self.with_node(Node::new(node_id, browse_name, NodeBody::Object))
        }

        pub fn with_variable(self, node_id: NodeId, name: &str, value: impl Into<Variant>) -> Self {
            let browse_name = QualifiedName::new(node_id.namespace(), name);
            let body = NodeBody::Variable(VariableNode::new(value.into()));
            self.with_node(Node::new(node_id, browse_name, body))
        }
    }
}
