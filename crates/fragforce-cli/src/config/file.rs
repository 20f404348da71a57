use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileRunnerKind {
    #[default]
    Pool,
    Delegate,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileQmConfig {
    pub method: Option<String>,
    pub basis: Option<String>,
    pub memory: Option<String>,
    pub nproc: Option<usize>,
    pub one_body_keywords: Option<String>,
    pub two_body_keywords: Option<String>,
    pub extra_keywords: Option<String>,
    pub force_unit: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRunnerConfig {
    #[serde(rename = "type")]
    pub kind: Option<FileRunnerKind>,
    pub command: Option<String>,
    pub total_cores: Option<usize>,
    pub job_list: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileLocationsConfig {
    pub job_dir: Option<PathBuf>,
    pub cache: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConnectivityConfig {
    pub command: Option<String>,
    pub pdb: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub input: Option<PathBuf>,
    pub cutoff: Option<f64>,
    pub cell: Option<Vec<f64>>,
    pub pbc: Option<bool>,
    pub qm: Option<FileQmConfig>,
    pub runner: Option<FileRunnerConfig>,
    pub files: Option<FileLocationsConfig>,
    pub connectivity: Option<FileConnectivityConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
