use super::error::EngineError;
use crate::core::io::conect::read_conect_from_path;
use crate::core::models::topology::BondGraph;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, instrument};

/// External bond-perception tool converting XYZ coordinates into a PDB file whose
/// `CONECT` records carry the bonds.
///
/// Invoked as `{command} -ixyz {xyz} -opdb -O {pdb}` (Open Babel's interface).
#[derive(Debug, Clone)]
pub struct ConnectivityTool {
    command: String,
    pdb_path: PathBuf,
}

impl ConnectivityTool {
    pub fn new(command: impl Into<String>, pdb_path: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            pdb_path: pdb_path.into(),
        }
    }

    pub fn pdb_path(&self) -> &Path {
        &self.pdb_path
    }

    /// Runs the tool on `xyz_path` and reads the resulting bond graph.
    ///
    /// # Errors
    ///
    /// Fails if the tool cannot be launched, exits unsuccessfully, or leaves behind a PDB
    /// file whose `CONECT` records are unreadable or refer to atoms beyond `atom_count`.
    #[instrument(skip_all, name = "connectivity")]
    pub fn infer(&self, xyz_path: &Path, atom_count: usize) -> Result<BondGraph, EngineError> {
        let mut parts = self.command.split_whitespace();
        let program = parts.next().ok_or_else(|| {
            EngineError::Connectivity("connectivity command is empty".to_string())
        })?;

        debug!(program, xyz = %xyz_path.display(), pdb = %self.pdb_path.display(), "Running connectivity tool.");
        let status = Command::new(program)
            .args(parts)
            .arg("-ixyz")
            .arg(xyz_path)
            .arg("-opdb")
            .arg("-O")
            .arg(&self.pdb_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| EngineError::Connectivity(format!("failed to launch '{}': {}", program, e)))?;
        if !status.success() {
            return Err(EngineError::Connectivity(format!(
                "'{}' exited with {}",
                program, status
            )));
        }

        let graph = read_conect_from_path(&self.pdb_path, atom_count)?;
        info!(
            atoms = graph.atom_count(),
            bonds = graph.bond_count(),
            "Read bond graph."
        );
        Ok(graph)
    }
}
