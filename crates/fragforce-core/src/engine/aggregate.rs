use super::cache::{CacheOrigin, CachedForces, ForceTable};
use super::gateway::JobOutcome;
use super::jobs::{Job, JobPlan};
use super::progress::{Progress, ProgressReporter};
use itertools::Itertools;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Forces assembled from the job results of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// One-body forces and two-body corrections, including substituted values.
    pub table: ForceTable,
    /// Names of jobs whose results were unavailable, in processing order.
    pub failed_jobs: Vec<String>,
    /// Atoms whose two-body correction was taken from the fallback cache.
    pub cached_two_body_atoms: Vec<usize>,
}

impl AggregateResult {
    /// Final per-atom force: one-body force plus two-body correction.
    pub fn total_forces(&self) -> Vec<Vector3<f64>> {
        self.table.total()
    }
}

/// Recombines job results through the pairwise many-body expansion
/// `F ≈ Σ F(I) + Σ_{I<J} [F(IJ) - F(I) - F(J)]`.
pub struct ForceAggregator<'a> {
    fallback: &'a CachedForces,
}

impl<'a> ForceAggregator<'a> {
    pub fn new(fallback: &'a CachedForces) -> Self {
        Self { fallback }
    }

    /// Fetches and merges every job result of `plan`.
    ///
    /// All one-body results are merged before any two-body result is looked at, because
    /// the two-body correction subtracts the final one-body baseline. Within a phase the
    /// results are fetched in parallel.
    #[instrument(skip_all, name = "force_aggregation")]
    pub fn aggregate<F>(&self, plan: &JobPlan, fetch: F, reporter: &ProgressReporter) -> AggregateResult
    where
        F: Fn(&Job) -> JobOutcome + Sync,
    {
        let atom_count = self.fallback.table.atom_count();
        let mut table = ForceTable::zeros(atom_count);
        let mut failed_jobs = Vec::new();

        reporter.report(Progress::Message("Collecting one-body forces...".to_string()));
        let one_body = collect_outcomes(&plan.one_body, &fetch);
        for (job, outcome) in plan.one_body.iter().zip(one_body) {
            if !self.merge_one_body(&mut table, job, outcome) {
                failed_jobs.push(job.name.clone());
            }
        }

        reporter.report(Progress::Message("Collecting two-body forces...".to_string()));
        let two_body = collect_outcomes(&plan.two_body, &fetch);
        let mut failed_atoms = BTreeSet::new();
        for (job, outcome) in plan.two_body.iter().zip(two_body) {
            if !self.merge_two_body(&mut table, job, outcome) {
                failed_atoms.extend(job.atom_indices());
                failed_jobs.push(job.name.clone());
            }
        }
        let cached_two_body_atoms = self.substitute_two_body(&mut table, &failed_atoms);

        info!(
            jobs = plan.len(),
            failed = failed_jobs.len(),
            "Force aggregation complete."
        );

        AggregateResult {
            table,
            failed_jobs,
            cached_two_body_atoms,
        }
    }

    /// Stores a one-body result, or the cached one-body forces of the job's atoms.
    ///
    /// Returns `false` if the job failed.
    pub fn merge_one_body(&self, table: &mut ForceTable, job: &Job, outcome: JobOutcome) -> bool {
        match outcome {
            JobOutcome::Forces(forces) => {
                let one_body = table.one_body_mut();
                for (atom, force) in forces {
                    if let Some(slot) = one_body.get_mut(atom) {
                        *slot = force;
                    }
                }
                true
            }
            JobOutcome::Unavailable => {
                self.warn_missing(job);
                let cached = self.fallback.table.one_body();
                let one_body = table.one_body_mut();
                for atom in job.atom_indices() {
                    one_body[atom] = cached[atom];
                }
                false
            }
        }
    }

    /// Adds `pair force - one-body force` for every atom of a successful pair job.
    ///
    /// Returns `false` if the job failed; the caller substitutes cached corrections for
    /// its atoms once all pair jobs are processed.
    pub fn merge_two_body(&self, table: &mut ForceTable, job: &Job, outcome: JobOutcome) -> bool {
        match outcome {
            JobOutcome::Forces(forces) => {
                for (atom, force) in forces {
                    if atom >= table.atom_count() {
                        continue;
                    }
                    let baseline = table.one_body()[atom];
                    table.two_body_mut()[atom] += force - baseline;
                }
                true
            }
            JobOutcome::Unavailable => {
                self.warn_missing(job);
                false
            }
        }
    }

    fn substitute_two_body(&self, table: &mut ForceTable, atoms: &BTreeSet<usize>) -> Vec<usize> {
        if atoms.is_empty() {
            return Vec::new();
        }
        let cached = self.fallback.table.two_body();
        let two_body = table.two_body_mut();
        for &atom in atoms {
            two_body[atom] = cached[atom];
        }
        info!("Atom {} use(s) the old 2-body forces.", atoms.iter().join(" "));
        atoms.iter().copied().collect()
    }

    fn warn_missing(&self, job: &Job) {
        let atoms = job.atom_indices().join(" ");
        match self.fallback.origin {
            CacheOrigin::Loaded => warn!(
                job = %job.name,
                %atoms,
                "No forces of {} found. Use the old forces instead.",
                job.name
            ),
            CacheOrigin::ColdStart => warn!(
                job = %job.name,
                %atoms,
                "No forces of {} found. No old forces are available, use 0 instead.",
                job.name
            ),
        }
    }
}

fn collect_outcomes<F>(jobs: &[Job], fetch: &F) -> Vec<JobOutcome>
where
    F: Fn(&Job) -> JobOutcome + Sync,
{
    jobs.par_iter()
        .map(|job| {
            let outcome = fetch(job);
            debug!(job = %job.name, available = matches!(outcome, JobOutcome::Forces(_)), "Fetched job result.");
            outcome
        })
        .collect()
}
