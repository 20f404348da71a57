use crate::core::fragments::{Fragment, build_fragments, total_multiplicity};
use crate::core::io::forces::{ForceTableError, write_vector_columns};
use crate::core::models::system::{AtomicSystem, Cell};
use crate::core::models::topology::BondGraph;
use crate::engine::aggregate::ForceAggregator;
use crate::engine::cache::{ForceTable, PersistentForceCache};
use crate::engine::config::FragmentationConfig;
use crate::engine::correction::{net_force, remove_net_force};
use crate::engine::error::EngineError;
use crate::engine::gateway::ComputationGateway;
use crate::engine::jobs::{JobGenerator, JobPlan};
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Fragments and jobs derived from one snapshot, before anything is submitted.
#[derive(Debug, Clone)]
pub struct FragmentationPlan {
    /// The snapshot with the configured cell applied.
    pub system: AtomicSystem,
    pub fragments: Vec<Fragment>,
    pub jobs: JobPlan,
    pub total_multiplicity: u32,
}

#[derive(Debug, Clone)]
pub struct FragmentationResult {
    /// Final per-atom forces with the net force removed.
    pub forces: Vec<Vector3<f64>>,
    /// The one-body/two-body split that was written to the cache.
    pub split: ForceTable,
    /// Names of jobs whose results were unavailable.
    pub failed_jobs: Vec<String>,
    /// Net force before correction.
    pub residual: Vector3<f64>,
    pub total_multiplicity: u32,
    pub fragment_count: usize,
    pub one_body_jobs: usize,
    pub two_body_jobs: usize,
}

/// Fragments `system` and enumerates its jobs without running anything.
///
/// # Errors
///
/// Fails if `bonds` does not describe the same number of atoms as `system`, or if a
/// fragment contains an unsupported element.
#[instrument(skip_all, name = "fragmentation_plan")]
pub fn plan(
    system: &AtomicSystem,
    bonds: &BondGraph,
    config: &FragmentationConfig,
) -> Result<FragmentationPlan, EngineError> {
    if bonds.atom_count() != system.len() {
        return Err(EngineError::TopologyMismatch {
            graph_atoms: bonds.atom_count(),
            system_atoms: system.len(),
        });
    }
    let system = system
        .clone()
        .with_cell(Cell::orthorhombic(config.cell, config.pbc));

    let fragments = build_fragments(&system, bonds)?;
    let total_multiplicity = total_multiplicity(&fragments);
    info!(
        fragments = fragments.len(),
        atoms = system.len(),
        "Total S: {}",
        total_multiplicity
    );

    let jobs = JobGenerator::new(&system, &fragments, config.cutoff).generate();
    Ok(FragmentationPlan {
        system,
        fragments,
        jobs,
        total_multiplicity,
    })
}

/// Computes the fragment-based forces of one snapshot.
///
/// The jobs are submitted through `gateway`; any job whose result is unavailable falls
/// back to the forces stored in the cache file of the previous run (zeros on a cold
/// start). The corrected forces are written to the output file, then the one-body and
/// two-body split is written to the cache file.
///
/// # Errors
///
/// Fails on an invalid topology or unsupported element (before any job is submitted),
/// when jobs cannot be submitted at all, or when the output or cache file cannot be
/// written. Individual job failures are not errors; they are reported in
/// [`FragmentationResult::failed_jobs`].
#[instrument(skip_all, name = "fragment_workflow")]
pub fn run<G: ComputationGateway + ?Sized>(
    system: &AtomicSystem,
    bonds: &BondGraph,
    config: &FragmentationConfig,
    gateway: &G,
    reporter: &ProgressReporter,
) -> Result<FragmentationResult, EngineError> {
    // === Phase 1: Fragmentation and job generation ===
    reporter.report(Progress::PhaseStart {
        name: "Fragmentation",
    });
    let FragmentationPlan {
        system,
        fragments,
        jobs,
        total_multiplicity,
    } = plan(system, bonds, config)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: External computation ===
    reporter.report(Progress::PhaseStart {
        name: "Subsystem Jobs",
    });
    let cache = PersistentForceCache::new(&config.files.cache);
    let fallback = cache.load(system.len());
    gateway.submit(&jobs, reporter)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Aggregation and correction ===
    reporter.report(Progress::PhaseStart {
        name: "Force Assembly",
    });
    let aggregate =
        ForceAggregator::new(&fallback).aggregate(&jobs, |job| gateway.fetch(job), reporter);
    if !aggregate.cached_two_body_atoms.is_empty() {
        debug!(atoms = ?aggregate.cached_two_body_atoms, "Two-body fallback applied.");
    }

    let mut forces = aggregate.total_forces();
    let residual = remove_net_force(&mut forces);
    info!(
        "Resultant force: {:16.9} {:16.9} {:16.9}",
        residual.x, residual.y, residual.z
    );
    info!("Magnitude: {:16.9}", residual.norm());
    let remaining = net_force(&forces);
    debug!(
        "Resultant force after correction: {:16.9} {:16.9} {:16.9}",
        remaining.x, remaining.y, remaining.z
    );

    write_forces(&config.files.output, &forces)?;
    cache.save(&aggregate.table).map_err(|source| EngineError::Output {
        path: cache.path().to_path_buf(),
        source,
    })?;
    reporter.report(Progress::PhaseFinish);

    info!(
        output = %config.files.output.display(),
        failed = aggregate.failed_jobs.len(),
        "Fragment force calculation complete."
    );

    Ok(FragmentationResult {
        forces,
        split: aggregate.table,
        failed_jobs: aggregate.failed_jobs,
        residual,
        total_multiplicity,
        fragment_count: fragments.len(),
        one_body_jobs: jobs.one_body.len(),
        two_body_jobs: jobs.two_body.len(),
    })
}

fn write_forces(path: &Path, forces: &[Vector3<f64>]) -> Result<(), EngineError> {
    let to_error = |source: ForceTableError| EngineError::Output {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(|e| to_error(e.into()))?;
    let mut writer = BufWriter::new(file);
    write_vector_columns(&mut writer, &[forces]).map_err(to_error)?;
    writer.flush().map_err(|e| to_error(e.into()))
}
