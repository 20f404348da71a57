use crate::core::fragments::Fragment;
use crate::core::fragments::spin::coupled_multiplicity;
use crate::core::models::system::AtomicSystem;
use crate::core::utils::geometry::{min_distance_between, wrap_around};
use itertools::Itertools;
use nalgebra::Point3;
use rayon::prelude::*;
use tracing::{debug, info, instrument};

/// Which fragments a job covers.
///
/// Fragment ids are zero-based positions in the fragment list; job names use 1-based ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JobKind {
    OneBody { fragment: usize },
    /// Invariant: `first < second`.
    TwoBody { first: usize, second: usize },
}

impl JobKind {
    pub fn one_body(fragment: usize) -> Self {
        Self::OneBody { fragment }
    }

    /// Creates a pair job kind; the argument order does not matter.
    pub fn two_body(a: usize, b: usize) -> Self {
        Self::TwoBody {
            first: a.min(b),
            second: a.max(b),
        }
    }

    /// Canonical job name: `mol{k}` or `tb{i}-{j}` with `i < j`.
    pub fn name(&self) -> String {
        match *self {
            Self::OneBody { fragment } => format!("mol{}", fragment + 1),
            Self::TwoBody { first, second } => format!("tb{}-{}", first + 1, second + 1),
        }
    }

    #[inline]
    pub fn is_one_body(&self) -> bool {
        matches!(self, Self::OneBody { .. })
    }
}

/// One atom of a job's coordinate block.
#[derive(Debug, Clone, PartialEq)]
pub struct JobAtom {
    /// Index of the atom in the full system.
    pub index: usize,
    pub symbol: String,
    /// Position after periodic re-imaging around the job's first atom.
    pub position: Point3<f64>,
}

/// A self-contained electronic-structure subproblem.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub kind: JobKind,
    pub name: String,
    pub multiplicity: u32,
    /// Atoms in submission order: the first fragment, then (for pairs) the second.
    pub atoms: Vec<JobAtom>,
}

impl Job {
    pub fn atom_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.atoms.iter().map(|a| a.index)
    }
}

/// All jobs of a run, split by phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPlan {
    pub one_body: Vec<Job>,
    pub two_body: Vec<Job>,
}

impl JobPlan {
    pub fn len(&self) -> usize {
        self.one_body.len() + self.two_body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every job, one-body jobs first.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.one_body.iter().chain(self.two_body.iter())
    }

    pub fn find(&self, name: &str) -> Option<&Job> {
        self.iter().find(|job| job.name == name)
    }
}

/// Enumerates the one-body and cutoff-screened two-body jobs of a fragmented system.
pub struct JobGenerator<'a> {
    system: &'a AtomicSystem,
    fragments: &'a [Fragment],
    cutoff: f64,
}

impl<'a> JobGenerator<'a> {
    pub fn new(system: &'a AtomicSystem, fragments: &'a [Fragment], cutoff: f64) -> Self {
        Self {
            system,
            fragments,
            cutoff,
        }
    }

    #[instrument(skip_all, name = "job_generation")]
    pub fn generate(&self) -> JobPlan {
        let one_body: Vec<Job> = (0..self.fragments.len())
            .map(|f| self.build_job(JobKind::one_body(f)))
            .collect();

        let pairs: Vec<(usize, usize)> = (0..self.fragments.len()).tuple_combinations().collect();
        let two_body: Vec<Job> = pairs
            .par_iter()
            .filter(|&&(i, j)| self.within_cutoff(i, j))
            .map(|&(i, j)| self.build_job(JobKind::two_body(i, j)))
            .collect();

        info!(
            one_body = one_body.len(),
            two_body = two_body.len(),
            screened_pairs = pairs.len(),
            cutoff = self.cutoff,
            "Generated subsystem jobs."
        );
        JobPlan { one_body, two_body }
    }

    /// Whether the closest atoms of fragments `i` and `j` are at most `cutoff` apart.
    pub fn within_cutoff(&self, i: usize, j: usize) -> bool {
        min_distance_between(
            self.system,
            &self.fragments[i].atoms,
            &self.fragments[j].atoms,
        )
        .is_some_and(|d| d <= self.cutoff)
    }

    /// Builds the job for `kind`, including its re-imaged coordinate block.
    pub fn build_job(&self, kind: JobKind) -> Job {
        let (indices, multiplicity): (Vec<usize>, u32) = match kind {
            JobKind::OneBody { fragment } => {
                let f = &self.fragments[fragment];
                (f.atoms.clone(), f.multiplicity)
            }
            JobKind::TwoBody { first, second } => {
                let (a, b) = (&self.fragments[first], &self.fragments[second]);
                (
                    a.atoms.iter().chain(&b.atoms).copied().collect(),
                    coupled_multiplicity(a.multiplicity, b.multiplicity),
                )
            }
        };

        let atoms = self.system.atoms();
        let cell = self.system.cell();
        let mut positions: Vec<Point3<f64>> = indices.iter().map(|&i| atoms[i].position).collect();
        if cell.is_periodic() {
            if let Some(reference) = positions.first().copied() {
                positions = wrap_around(&positions, &reference, cell);
            }
        }

        let name = kind.name();
        debug!(job = %name, atoms = indices.len(), multiplicity, "Built job.");

        Job {
            kind,
            name,
            multiplicity,
            atoms: indices
                .into_iter()
                .zip(positions)
                .map(|(index, position)| JobAtom {
                    index,
                    symbol: atoms[index].symbol.clone(),
                    position,
                })
                .collect(),
        }
    }
}
