use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Directives written into every electronic-structure input.
#[derive(Debug, Clone, PartialEq)]
pub struct QmConfig {
    pub method: String,
    pub basis: String,
    pub memory: String,
    /// Execution lanes requested by each individual job (`%nproc`).
    pub nproc_per_job: usize,
    pub one_body_keywords: String,
    pub two_body_keywords: String,
    pub extra_keywords: String,
    /// Factor applied to every force component read back from the engine.
    pub force_unit: f64,
}

/// How prepared jobs are executed.
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerConfig {
    /// Run `command <input>` for every job on a bounded in-process worker pool.
    Pool { command: String, total_cores: usize },
    /// Write all input paths to `job_list` and hand them to an external command.
    Delegate { command: String, job_list: PathBuf },
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileLocations {
    pub job_dir: PathBuf,
    pub cache: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FragmentationConfig {
    /// Maximum inter-fragment atom distance (Angstroms) for which a pair job is generated.
    pub cutoff: f64,
    pub cell: [f64; 3],
    pub pbc: bool,
    pub qm: QmConfig,
    pub runner: RunnerConfig,
    pub files: FileLocations,
}

#[derive(Default)]
pub struct FragmentationConfigBuilder {
    cutoff: Option<f64>,
    cell: Option<[f64; 3]>,
    pbc: Option<bool>,
    qm: Option<QmConfig>,
    runner: Option<RunnerConfig>,
    job_dir: Option<PathBuf>,
    cache: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl FragmentationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn cell(mut self, lengths: [f64; 3]) -> Self {
        self.cell = Some(lengths);
        self
    }
    pub fn pbc(mut self, pbc: bool) -> Self {
        self.pbc = Some(pbc);
        self
    }
    pub fn qm(mut self, qm: QmConfig) -> Self {
        self.qm = Some(qm);
        self
    }
    pub fn runner(mut self, runner: RunnerConfig) -> Self {
        self.runner = Some(runner);
        self
    }
    pub fn job_dir(mut self, path: PathBuf) -> Self {
        self.job_dir = Some(path);
        self
    }
    pub fn cache_path(mut self, path: PathBuf) -> Self {
        self.cache = Some(path);
        self
    }
    pub fn output_path(mut self, path: PathBuf) -> Self {
        self.output = Some(path);
        self
    }

    pub fn build(self) -> Result<FragmentationConfig, ConfigError> {
        let cutoff = self.cutoff.ok_or(ConfigError::MissingParameter("cutoff"))?;
        if !(cutoff.is_finite() && cutoff > 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "cutoff",
                reason: format!("must be a positive distance, got {}", cutoff),
            });
        }

        let cell = self.cell.unwrap_or([0.0; 3]);
        if cell.iter().any(|l| !(l.is_finite() && *l >= 0.0)) {
            return Err(ConfigError::InvalidValue {
                parameter: "cell",
                reason: format!("lengths must be non-negative, got {:?}", cell),
            });
        }
        let pbc = self.pbc.unwrap_or(false);
        if pbc && cell.iter().all(|&l| l == 0.0) {
            return Err(ConfigError::InvalidValue {
                parameter: "cell",
                reason: "periodic boundary conditions need at least one non-zero cell length"
                    .to_string(),
            });
        }

        let qm = self.qm.ok_or(ConfigError::MissingParameter("qm"))?;
        if qm.nproc_per_job == 0 {
            return Err(ConfigError::InvalidValue {
                parameter: "nproc_per_job",
                reason: "must be at least 1".to_string(),
            });
        }
        if !qm.force_unit.is_finite() {
            return Err(ConfigError::InvalidValue {
                parameter: "force_unit",
                reason: format!("must be finite, got {}", qm.force_unit),
            });
        }

        let runner = self.runner.ok_or(ConfigError::MissingParameter("runner"))?;
        match &runner {
            RunnerConfig::Pool { total_cores: 0, .. } => {
                return Err(ConfigError::InvalidValue {
                    parameter: "total_cores",
                    reason: "must be at least 1".to_string(),
                });
            }
            RunnerConfig::Pool { command, .. } | RunnerConfig::Delegate { command, .. }
                if command.trim().is_empty() =>
            {
                return Err(ConfigError::InvalidValue {
                    parameter: "command",
                    reason: "must not be empty".to_string(),
                });
            }
            _ => {}
        }

        Ok(FragmentationConfig {
            cutoff,
            cell,
            pbc,
            qm,
            runner,
            files: FileLocations {
                job_dir: self.job_dir.ok_or(ConfigError::MissingParameter("job_dir"))?,
                cache: self.cache.ok_or(ConfigError::MissingParameter("cache"))?,
                output: self.output.ok_or(ConfigError::MissingParameter("output"))?,
            },
        })
    }
}
