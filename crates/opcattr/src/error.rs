use crate::model::NodeId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcAttrError {
    #[error("No session is attached to the channel")]
    SessionMissing,

    #[error("Session is not bound to an application")]
    ApplicationMissing,

    #[error("Invalid node id: {0}")]
    InvalidNodeId(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Duplicate node: {0}")]
    DuplicateNode(NodeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

pub type Result<T> = std::result::Result<T, OpcAttrError>;
