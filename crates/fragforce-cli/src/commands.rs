pub mod plan;
pub mod run;

use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use fragforce::core::io::traits::StructureFile;
use fragforce::core::io::xyz::XyzFile;
use fragforce::core::models::system::AtomicSystem;
use fragforce::core::models::topology::BondGraph;
use fragforce::engine::connectivity::ConnectivityTool;
use tracing::info;

/// Reads the snapshot and infers its bonds with the configured connectivity tool.
fn load_system(app: &AppConfig) -> Result<(AtomicSystem, BondGraph)> {
    info!("Loading input coordinates from {:?}", &app.input_path);
    let system = XyzFile::read_from_path(&app.input_path).map_err(|e| CliError::FileParsing {
        path: app.input_path.clone(),
        source: e.into(),
    })?;
    if system.is_empty() {
        return Err(CliError::Argument(format!(
            "Input file '{}' contains no atoms",
            app.input_path.display()
        )));
    }

    let tool = ConnectivityTool::new(
        app.connectivity.command.clone(),
        app.connectivity.pdb_path.clone(),
    );
    let bonds = tool.infer(&app.input_path, system.len())?;
    Ok((system, bonds))
}
