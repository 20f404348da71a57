use fragforce::engine::config as core_config;
use std::path::PathBuf;

pub struct AppConfig {
    pub input_path: PathBuf,
    pub connectivity: ConnectivitySettings,
    pub core_config: core_config::FragmentationConfig,
}

pub struct ConnectivitySettings {
    pub command: String,
    pub pdb_path: PathBuf,
}
