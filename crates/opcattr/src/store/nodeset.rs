//! JSON node set files.
//!
//! ```json
//! {
//!   "nodes": [
//!     {
//!       "node_id": "ns=1;s=Boiler.Temperature",
//!       "browse_name": { "namespace_index": 1, "name": "Temperature" },
//!       "display_name": { "text": "Temperature" },
//!       "node_class": "Variable",
//!       "data_type": "i=11",
//!       "value": { "Double": 21.5 }
//!     }
//!   ]
//! }
//! ```
//!
//! Saving writes a temporary file next to the target and renames it into place.
//! The serialized text is parsed back first, so a set that could not be loaded again
//! (a NaN or infinite float is written as `null`) is refused and the target is left
//! untouched.

use super::memory::MemoryNodeStore;
use crate::error::{OpcAttrError, Result};
use crate::model::Node;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeSet {
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl NodeSet {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn from_store(store: &MemoryNodeStore) -> Self {
        Self::new(store.nodes())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(OpcAttrError::Io)?;
        let set: NodeSet = serde_json::from_str(&content).map_err(OpcAttrError::Serialization)?;
        debug!(path = %path.display(), nodes = set.nodes.len(), "read node set");
        Ok(set)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(OpcAttrError::Serialization)?;
        serde_json::from_str::<NodeSet>(&content).map_err(OpcAttrError::Serialization)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let tmp_file = dir.join(format!(".nodeset-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(OpcAttrError::Io)?;
        fs::rename(&tmp_file, path).map_err(OpcAttrError::Io)?;
        debug!(path = %path.display(), nodes = self.nodes.len(), "wrote node set");
        Ok(())
    }

    /// Builds a store from the set. Duplicate node ids are rejected.
    pub fn into_store(self) -> Result<MemoryNodeStore> {
        MemoryNodeStore::from_nodes(self.nodes)
    }
}

/// Reads a node set file into a fresh store.
pub fn load(path: &Path) -> Result<MemoryNodeStore> {
    NodeSet::read(path)?.into_store()
}

/// Writes every node in `store` to `path`.
pub fn save(store: &MemoryNodeStore, path: &Path) -> Result<()> {
    NodeSet::from_store(store).write(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeId, Variant};
    use crate::model::NodeId;
    use crate::store::sample::{self, ids};
    use crate::store::NodeStore;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_sample() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boiler.json");

        let store = sample::sample_store().unwrap();
        save(&store, &path).unwrap();

        let loaded = load(&path).unwrap();
        assert_eq!(loaded.nodes(), store.nodes());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_saved_writes_are_reloaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boiler.json");
        let store = sample::sample_store().unwrap();
        {
            let node = store.resolve(&ids::temperature()).unwrap();
            *node.write().value_mut().unwrap() = Variant::Double(88.0);
        }
        save(&store, &path).unwrap();

        let loaded = load(&path).unwrap();
        let node = loaded.resolve(&ids::temperature()).unwrap();
        assert_eq!(
            node.read().attribute(AttributeId::Value),
            Some(Variant::Double(88.0))
        );
    }

    #[rstest]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    #[case::negative_infinite(f64::NEG_INFINITY)]
    fn test_save_refuses_floats_json_cannot_hold(#[case] value: f64) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boiler.json");
        let store = sample::sample_store().unwrap();
        save(&store, &path).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        {
            let node = store.resolve(&ids::temperature()).unwrap();
            *node.write().value_mut().unwrap() = Variant::Double(value);
        }
        assert!(matches!(
            save(&store, &path),
            Err(OpcAttrError::Serialization(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
        assert!(load(&path).is_ok());
    }

    #[test]
    fn test_empty_string_node_id_value_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("boiler.json");
        let store = sample::sample_store().unwrap();
        {
            let node = store.resolve(&ids::temperature()).unwrap();
            *node.write().value_mut().unwrap() = Variant::NodeId(NodeId::string(1, ""));
        }
        save(&store, &path).unwrap();

        let loaded = load(&path).unwrap();
        let node = loaded.resolve(&ids::temperature()).unwrap();
        assert_eq!(
            node.read().attribute(AttributeId::Value),
            Some(Variant::NodeId(NodeId::string(1, "")))
        );
    }

    #[test]
    fn test_load_rejects_duplicate_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dupes.json");
        let node = sample::sample_nodes().remove(0);
        NodeSet::new(vec![node.clone(), node]).write(&path).unwrap();

        match load(&path) {
            Err(OpcAttrError::DuplicateNode(id)) => assert_eq!(id, ids::boiler()),
            other => panic!("Expected DuplicateNode, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load(&dir.path().join("absent.json")),
            Err(OpcAttrError::Io(_))
        ));
    }

    #[test]
    fn test_load_malformed_file_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"nodes": [{"node_id": "ns=1;x=1"}]}"#).unwrap();
        assert!(matches!(load(&path), Err(OpcAttrError::Serialization(_))));
    }
}
