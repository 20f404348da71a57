//! # Fragments Module
//!
//! Splits a snapshot into covalently bonded fragments and characterizes each one.
//!
//! - [`partition`] - Connected components of the bond graph
//! - [`spin`] - Spin multiplicity heuristic for C/H/O fragments

pub mod partition;
pub mod spin;

use crate::core::models::system::AtomicSystem;
use crate::core::models::topology::BondGraph;
use spin::SpinError;

/// A connected component of the bond graph: one molecule (or lone atom/ion).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Ascending atom indices of the fragment.
    pub atoms: Vec<usize>,
    /// Spin multiplicity (2S + 1) assigned to the isolated fragment.
    pub multiplicity: u32,
}

/// Partitions `system` along `bonds` and assigns every fragment its multiplicity.
///
/// Fragments are ordered by their smallest atom index, so the ordering (and with it the
/// job naming) is reproducible for identical input.
///
/// # Errors
///
/// Returns [`SpinError::UnsupportedElement`] if any fragment contains an element outside
/// the supported set.
pub fn build_fragments(system: &AtomicSystem, bonds: &BondGraph) -> Result<Vec<Fragment>, SpinError> {
    partition::connected_components(bonds)
        .into_iter()
        .map(|atoms| {
            let multiplicity = spin::multiplicity_of(system, &atoms)?;
            Ok(Fragment {
                atoms,
                multiplicity,
            })
        })
        .collect()
}

/// Multiplicity of the whole system when all fragments are coupled additively.
pub fn total_multiplicity(fragments: &[Fragment]) -> u32 {
    fragments
        .iter()
        .map(|f| f.multiplicity)
        .fold(1, spin::coupled_multiplicity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::system::Cell;
    use nalgebra::Point3;

    fn system_of(symbols: &[&str]) -> AtomicSystem {
        AtomicSystem::new(
            symbols
                .iter()
                .enumerate()
                .map(|(i, s)| Atom::new(s, Point3::new(i as f64, 0.0, 0.0)))
                .collect(),
            Cell::non_periodic(),
        )
    }

    #[test]
    fn build_fragments_assigns_multiplicity_per_component() {
        // CH3 radical (atoms 0-3) and O2 (atoms 4-5)
        let system = system_of(&["C", "H", "H", "H", "O", "O"]);
        let bonds = BondGraph::from_bonds(6, [(0, 1), (0, 2), (0, 3), (4, 5)]).unwrap();
        let fragments = build_fragments(&system, &bonds).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].atoms, vec![0, 1, 2, 3]);
        assert_eq!(fragments[0].multiplicity, 2);
        assert_eq!(fragments[1].atoms, vec![4, 5]);
        assert_eq!(fragments[1].multiplicity, 3);
    }

    #[test]
    fn build_fragments_rejects_unsupported_elements() {
        let system = system_of(&["N", "H"]);
        let bonds = BondGraph::from_bonds(2, [(0, 1)]).unwrap();
        let result = build_fragments(&system, &bonds);
        assert!(matches!(
            result,
            Err(SpinError::UnsupportedElement { atom_index: 0, .. })
        ));
    }

    #[test]
    fn total_multiplicity_couples_fragments_additively() {
        let fragments = [
            Fragment { atoms: vec![0], multiplicity: 2 },
            Fragment { atoms: vec![1], multiplicity: 3 },
            Fragment { atoms: vec![2], multiplicity: 1 },
        ];
        // sum(S) - F + 1 = 6 - 3 + 1
        assert_eq!(total_multiplicity(&fragments), 4);
        assert_eq!(total_multiplicity(&[]), 1);
    }
}
