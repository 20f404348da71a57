use super::config::ConfigError;
use super::gateway::GatewayError;
use crate::core::fragments::spin::SpinError;
use crate::core::io::conect::ConectError;
use crate::core::io::forces::ForceTableError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] SpinError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Bond graph covers {graph_atoms} atoms, but the system has {system_atoms}")]
    TopologyMismatch {
        graph_atoms: usize,
        system_atoms: usize,
    },

    #[error("Connectivity inference failed: {0}")]
    Connectivity(String),

    #[error("Failed to read connectivity records: {0}")]
    Conect(#[from] ConectError),

    #[error("Job submission failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Failed to write '{path}': {source}", path = path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: ForceTableError,
    },
}
