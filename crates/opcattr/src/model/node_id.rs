//! Node identities and their textual form.
//!
//! A [`NodeId`] is a namespace index plus one of four identifier kinds. It is only
//! ever used as a lookup key, so it is immutable once constructed.
//!
//! ## Textual Form
//!
//! | Kind | Example |
//! |------|---------|
//! | Numeric | `ns=1;i=1001` |
//! | String | `ns=2;s=Boiler.Temperature` |
//! | Guid | `ns=1;g=09087e75-8e5e-499b-954f-f2a9603db28a` |
//! | Opaque | `ns=1;b=AAEC` (base64) |
//!
//! The `ns=0;` prefix is omitted when printing and optional when parsing.

use crate::error::OpcAttrError;
use data_encoding::BASE64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Identifier {
    Numeric(u32),
    String(String),
    Guid(Uuid),
    Opaque(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId {
    namespace: u16,
    identifier: Identifier,
}

impl NodeId {
    pub fn new(namespace: u16, identifier: Identifier) -> Self {
        Self {
            namespace,
            identifier,
        }
    }

    pub fn numeric(namespace: u16, value: u32) -> Self {
        Self::new(namespace, Identifier::Numeric(value))
    }

    pub fn string(namespace: u16, value: impl Into<String>) -> Self {
        Self::new(namespace, Identifier::String(value.into()))
    }

    pub fn guid(namespace: u16, value: Uuid) -> Self {
        Self::new(namespace, Identifier::Guid(value))
    }

    pub fn opaque(namespace: u16, value: impl Into<Vec<u8>>) -> Self {
        Self::new(namespace, Identifier::Opaque(value.into()))
    }

    pub fn namespace(&self) -> u16 {
        self.namespace
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};", self.namespace)?;
        }
        match &self.identifier {
            Identifier::Numeric(value) => write!(f, "i={}", value),
            Identifier::String(value) => write!(f, "s={}", value),
            Identifier::Guid(value) => write!(f, "g={}", value),
            Identifier::Opaque(value) => write!(f, "b={}", BASE64.encode(value)),
        }
    }
}

impl FromStr for NodeId {
    type Err = OpcAttrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OpcAttrError::InvalidNodeId(s.to_string());

        let (namespace, rest) = match s.strip_prefix("ns=") {
            Some(tail) => {
                let (ns, rest) = tail.split_once(';').ok_or_else(invalid)?;
                (ns.parse::<u16>().map_err(|_| invalid())?, rest)
            }
            None => (0, s),
        };

        let (kind, value) = rest.split_once('=').ok_or_else(invalid)?;
        let identifier = match kind {
            "i" => Identifier::Numeric(value.parse().map_err(|_| invalid())?),
            "s" => Identifier::String(value.to_string()),
            "g" => Identifier::Guid(Uuid::parse_str(value).map_err(|_| invalid())?),
            "b" => Identifier::Opaque(BASE64.decode(value.as_bytes()).map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };

        Ok(Self::new(namespace, identifier))
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = OpcAttrError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_with_namespace() {
        let id: NodeId = "ns=1;i=1001".parse().unwrap();
        assert_eq!(id, NodeId::numeric(1, 1001));
        assert_eq!(id.namespace(), 1);
    }

    #[test]
    fn namespace_zero_prefix_is_optional() {
        let short: NodeId = "i=85".parse().unwrap();
        let long: NodeId = "ns=0;i=85".parse().unwrap();
        assert_eq!(short, long);
        assert_eq!(long.to_string(), "i=85");
    }

    #[test]
    fn string_identifier_keeps_separators() {
        let id: NodeId = "ns=2;s=Line1;Boiler=Hot".parse().unwrap();
        assert_eq!(id, NodeId::string(2, "Line1;Boiler=Hot"));
    }

    #[test]
    fn guid_and_opaque_print_back() {
        let guid = Uuid::parse_str("09087e75-8e5e-499b-954f-f2a9603db28a").unwrap();
        let id = NodeId::guid(3, guid);
        assert_eq!(id.to_string(), "ns=3;g=09087e75-8e5e-499b-954f-f2a9603db28a");
        assert_eq!(id.to_string().parse::<NodeId>().unwrap(), id);

        let opaque = NodeId::opaque(1, vec![0u8, 1, 2]);
        assert_eq!(opaque.to_string(), "ns=1;b=AAEC");
        assert_eq!("ns=1;b=AAEC".parse::<NodeId>().unwrap(), opaque);
    }

    #[test]
    fn rejects_malformed_ids() {
        for bad in ["", "ns=1", "ns=x;i=1", "i=abc", "q=1", "g=not-a-guid"] {
            assert!(
                matches!(bad.parse::<NodeId>(), Err(OpcAttrError::InvalidNodeId(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn empty_string_identifier_prints_back() {
        let id = NodeId::string(1, "");
        assert_eq!(id.to_string(), "ns=1;s=");
        assert_eq!(id.to_string().parse::<NodeId>().unwrap(), id);
    }

    #[test]
    fn serializes_as_string() {
        let id = NodeId::string(2, "Pump");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ns=2;s=Pump\"");
        let back: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
