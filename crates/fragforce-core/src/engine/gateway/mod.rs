//! # Gateway Module
//!
//! The boundary between the pipeline and the external electronic-structure engine.
//!
//! The pipeline only depends on [`ComputationGateway`]: jobs are submitted as a batch,
//! the gateway blocks until every one of them has finished, and results are then fetched
//! per job. A failed, non-converged or missing computation is reported as
//! [`JobOutcome::Unavailable`]; it is never an error.
//!
//! - [`gaussian`] - Gaussian input writer and force-table reader
//! - [`runner`] - Worker-pool and delegate-script execution strategies

pub mod gaussian;
pub mod runner;

use super::jobs::JobPlan;
use super::progress::ProgressReporter;
use crate::engine::jobs::Job;
use nalgebra::Vector3;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Forces of one job keyed by atom index in the full system.
pub type ForceMapping = BTreeMap<usize, Vector3<f64>>;

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Forces(ForceMapping),
    Unavailable,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to prepare job directory '{path}': {source}", path = path.display())]
    JobDirectory { path: PathBuf, source: io::Error },

    #[error("Failed to write input for job '{job}': {source}")]
    WriteInput { job: String, source: io::Error },

    #[error("Failed to write job list '{path}': {source}", path = path.display())]
    JobList { path: PathBuf, source: io::Error },

    #[error("Failed to build worker pool: {0}")]
    Pool(String),

    #[error("Empty command line for {0}")]
    EmptyCommand(&'static str),
}

/// Executes jobs on an external engine and reads their forces back.
pub trait ComputationGateway: Sync {
    /// Submits every job of `plan` and returns once all of them have finished.
    ///
    /// # Errors
    ///
    /// Only environment failures that prevent submission altogether are errors;
    /// individual job failures surface later as [`JobOutcome::Unavailable`].
    fn submit(&self, plan: &JobPlan, reporter: &ProgressReporter) -> Result<(), GatewayError>;

    /// Reads the result of a finished job.
    fn fetch(&self, job: &Job) -> JobOutcome;

    /// Human-readable location of a job's result, used when reporting failures.
    fn result_location(&self, job_name: &str) -> String {
        job_name.to_string()
    }
}

/// Strategy for running a batch of prepared input files to completion.
pub trait JobRunner: Send + Sync {
    fn run(&self, inputs: &[PathBuf], reporter: &ProgressReporter) -> Result<(), GatewayError>;
}
