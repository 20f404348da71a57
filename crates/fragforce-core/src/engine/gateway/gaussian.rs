use super::runner::{DelegateRunner, PoolRunner};
use super::{ComputationGateway, ForceMapping, GatewayError, JobOutcome, JobRunner};
use crate::engine::config::{FragmentationConfig, QmConfig, RunnerConfig};
use crate::engine::jobs::{Job, JobPlan};
use crate::engine::progress::ProgressReporter;
use nalgebra::Vector3;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

const INPUT_EXTENSION: &str = "gjf";
const OUTPUT_EXTENSION: &str = "log";
const FORCE_TABLE_MARKER: &str = "Forces (Hartrees/Bohr)";

/// Gateway to Gaussian: one `.gjf` input and one `.log` output per job in `job_dir`.
pub struct GaussianGateway {
    job_dir: PathBuf,
    qm: QmConfig,
    runner: Box<dyn JobRunner>,
}

impl GaussianGateway {
    pub fn new(job_dir: PathBuf, qm: QmConfig, runner: Box<dyn JobRunner>) -> Self {
        Self {
            job_dir,
            qm,
            runner,
        }
    }

    /// Builds the gateway and its runner from a run configuration.
    pub fn from_config(config: &FragmentationConfig) -> Result<Self, GatewayError> {
        let runner: Box<dyn JobRunner> = match &config.runner {
            RunnerConfig::Pool {
                command,
                total_cores,
            } => Box::new(PoolRunner::new(
                command,
                *total_cores,
                config.qm.nproc_per_job,
            )?),
            RunnerConfig::Delegate { command, job_list } => {
                Box::new(DelegateRunner::new(command, job_list.clone())?)
            }
        };
        Ok(Self::new(
            config.files.job_dir.clone(),
            config.qm.clone(),
            runner,
        ))
    }

    pub fn input_path(&self, job_name: &str) -> PathBuf {
        self.job_dir
            .join(job_name)
            .with_extension(INPUT_EXTENSION)
    }

    pub fn output_path(&self, job_name: &str) -> PathBuf {
        self.job_dir
            .join(job_name)
            .with_extension(OUTPUT_EXTENSION)
    }

    fn write_input(&self, job: &Job) -> Result<PathBuf, GatewayError> {
        let path = self.input_path(&job.name);
        fs::write(&path, render_input(job, &self.qm)).map_err(|source| GatewayError::WriteInput {
            job: job.name.clone(),
            source,
        })?;
        // A stale output from an earlier run must never be mistaken for this run's result.
        let stale = self.output_path(&job.name);
        if stale.exists() {
            fs::remove_file(&stale).map_err(|source| GatewayError::WriteInput {
                job: job.name.clone(),
                source,
            })?;
        }
        Ok(path)
    }
}

impl ComputationGateway for GaussianGateway {
    #[instrument(skip_all, name = "gaussian_submit")]
    fn submit(&self, plan: &JobPlan, reporter: &ProgressReporter) -> Result<(), GatewayError> {
        fs::create_dir_all(&self.job_dir).map_err(|source| GatewayError::JobDirectory {
            path: self.job_dir.clone(),
            source,
        })?;
        let inputs = plan
            .iter()
            .map(|job| self.write_input(job))
            .collect::<Result<Vec<_>, _>>()?;
        info!(
            jobs = inputs.len(),
            dir = %self.job_dir.display(),
            "Wrote Gaussian inputs."
        );
        self.runner.run(&inputs, reporter)
    }

    fn fetch(&self, job: &Job) -> JobOutcome {
        let path = self.output_path(&job.name);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!(job = %job.name, error = %e, "Output file is not readable.");
                return JobOutcome::Unavailable;
            }
        };
        match parse_forces(&content) {
            Some(forces) if forces.len() == job.atoms.len() => JobOutcome::Forces(
                job.atom_indices()
                    .zip(forces)
                    .map(|(atom, force)| (atom, force * self.qm.force_unit))
                    .collect::<ForceMapping>(),
            ),
            Some(forces) => {
                debug!(
                    job = %job.name,
                    expected = job.atoms.len(),
                    found = forces.len(),
                    "Force table does not cover every atom."
                );
                JobOutcome::Unavailable
            }
            None => {
                debug!(job = %job.name, "No force table found in output.");
                JobOutcome::Unavailable
            }
        }
    }

    fn result_location(&self, job_name: &str) -> String {
        self.output_path(job_name).display().to_string()
    }
}

/// Renders the Gaussian input deck of `job`.
pub fn render_input(job: &Job, qm: &QmConfig) -> String {
    let kbody_keywords = if job.kind.is_one_body() {
        &qm.one_body_keywords
    } else {
        &qm.two_body_keywords
    };
    let level = format!("{}/{}", qm.method, qm.basis);
    let route = [
        "force",
        level.as_str(),
        kbody_keywords.as_str(),
        qm.extra_keywords.as_str(),
    ]
    .iter()
    .map(|part| part.trim())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    let mut deck = String::new();
    let _ = writeln!(deck, "%nproc={}", qm.nproc_per_job);
    let _ = writeln!(deck, "%mem={}", qm.memory);
    let _ = writeln!(deck, "# {}", route);
    let _ = writeln!(deck);
    let _ = writeln!(deck, "{}", job.name);
    let _ = writeln!(deck);
    let _ = writeln!(deck, "0 {}", job.multiplicity);
    for atom in &job.atoms {
        let p = &atom.position;
        let _ = writeln!(
            deck,
            "{:<2} {:>16.10} {:>16.10} {:>16.10}",
            atom.symbol, p.x, p.y, p.z
        );
    }
    let _ = writeln!(deck);
    deck
}

/// Extracts the last `Forces (Hartrees/Bohr)` table of a Gaussian log.
///
/// Returns the forces in center order, or `None` if there is no complete, well-formed
/// table (missing table, malformed row, or non-consecutive center numbers).
pub fn parse_forces(log: &str) -> Option<Vec<Vector3<f64>>> {
    let lines: Vec<&str> = log.lines().collect();
    let header = lines.iter().rposition(|l| l.contains(FORCE_TABLE_MARKER))?;

    let mut rows = lines[header + 1..]
        .iter()
        .skip_while(|l| !is_separator(l))
        .skip(1);

    let mut forces = Vec::new();
    loop {
        let line = rows.next()?;
        if is_separator(line) {
            break;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 5 {
            return None;
        }
        let center: usize = fields[0].parse().ok()?;
        if center != forces.len() + 1 {
            return None;
        }
        let mut components = [0.0; 3];
        for (slot, raw) in components.iter_mut().zip(&fields[2..5]) {
            *slot = raw.parse().ok()?;
        }
        forces.push(Vector3::from(components));
    }

    (!forces.is_empty()).then_some(forces)
}

fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c == '-')
}
