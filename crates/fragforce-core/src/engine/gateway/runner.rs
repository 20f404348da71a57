use super::{GatewayError, JobRunner};
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, instrument, warn};

/// Splits a configured command line into program and leading arguments.
fn split_command(command: &str, role: &'static str) -> Result<(String, Vec<String>), GatewayError> {
    let mut parts = command.split_whitespace().map(str::to_string);
    let program = parts.next().ok_or(GatewayError::EmptyCommand(role))?;
    Ok((program, parts.collect()))
}

/// Runs every input with a local engine executable on a bounded worker pool.
///
/// The pool has `max(1, total_cores / nproc_per_job)` workers, so that concurrently
/// running jobs never oversubscribe the machine. Engine output goes to the engine's own
/// log file next to the input; the process streams are discarded.
#[derive(Debug)]
pub struct PoolRunner {
    program: String,
    args: Vec<String>,
    workers: usize,
}

impl PoolRunner {
    pub fn new(
        command: &str,
        total_cores: usize,
        nproc_per_job: usize,
    ) -> Result<Self, GatewayError> {
        let (program, args) = split_command(command, "pool runner")?;
        Ok(Self {
            program,
            args,
            workers: worker_count(total_cores, nproc_per_job),
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn run_one(&self, input: &Path) {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if status.success() => {
                debug!(input = %input.display(), "Engine finished.");
            }
            Ok(status) => {
                warn!(input = %input.display(), %status, "Engine exited unsuccessfully.");
            }
            Err(e) => {
                warn!(
                    input = %input.display(),
                    program = %self.program,
                    error = %e,
                    "Failed to launch engine."
                );
            }
        }
    }
}

impl JobRunner for PoolRunner {
    #[instrument(skip_all, name = "pool_runner")]
    fn run(&self, inputs: &[PathBuf], reporter: &ProgressReporter) -> Result<(), GatewayError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map_err(|e| GatewayError::Pool(e.to_string()))?;

        info!(
            jobs = inputs.len(),
            workers = self.workers,
            "Running jobs on local worker pool."
        );
        reporter.report(Progress::JobsSubmitted {
            total: inputs.len() as u64,
        });
        pool.install(|| {
            inputs.par_iter().for_each(|input| {
                self.run_one(input);
                reporter.report(Progress::JobFinished);
            })
        });
        reporter.report(Progress::JobsDrained);
        Ok(())
    }
}

fn worker_count(total_cores: usize, nproc_per_job: usize) -> usize {
    (total_cores / nproc_per_job.max(1)).max(1)
}

/// Hands the whole batch to an external submission script.
///
/// The input paths are written space-separated on a single line to `job_list`, then the
/// command is invoked once. It is expected to read the list itself and to block until
/// every job has finished.
#[derive(Debug)]
pub struct DelegateRunner {
    program: String,
    args: Vec<String>,
    job_list: PathBuf,
}

impl DelegateRunner {
    pub fn new(command: &str, job_list: PathBuf) -> Result<Self, GatewayError> {
        let (program, args) = split_command(command, "delegate runner")?;
        Ok(Self {
            program,
            args,
            job_list,
        })
    }

    fn write_job_list(&self, inputs: &[PathBuf]) -> Result<(), GatewayError> {
        let line = inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        fs::write(&self.job_list, format!("{}\n", line)).map_err(|source| GatewayError::JobList {
            path: self.job_list.clone(),
            source,
        })
    }
}

impl JobRunner for DelegateRunner {
    #[instrument(skip_all, name = "delegate_runner")]
    fn run(&self, inputs: &[PathBuf], reporter: &ProgressReporter) -> Result<(), GatewayError> {
        self.write_job_list(inputs)?;
        info!(
            jobs = inputs.len(),
            list = %self.job_list.display(),
            program = %self.program,
            "Delegating jobs to submission command."
        );
        reporter.report(Progress::Message(format!(
            "Waiting for {} delegated jobs...",
            inputs.len()
        )));

        match Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
        {
            Ok(status) if !status.success() => {
                warn!(%status, "Submission command exited unsuccessfully.");
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    program = %self.program,
                    error = %e,
                    "Failed to launch submission command. No delegated job will produce results."
                );
            }
        }
        Ok(())
    }
}
