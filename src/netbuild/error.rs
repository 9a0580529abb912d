//! The fail-fast error class of spec §7 ("Topology conflicts"). Everything else in §7 is a
//! warning reported through [`crate::netbuild::sink::Sink`], not a `Result` error.

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("endpoint of road `{road}` is already bound to node `{existing}`, cannot rebind to `{attempted}`")]
    TopologyConflict {
        road: String,
        existing: String,
        attempted: String,
    },
    #[error("node `{0}` could not be inserted")]
    NodeInsertFailed(String),
    #[error("edge `{0}` could not be inserted")]
    EdgeInsertFailed(String),
}

pub type Result<T, E = ProcessError> = std::result::Result<T, E>;
