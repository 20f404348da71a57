use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BondGraphError {
    #[error("Bond references atom index {index}, but the system has only {atom_count} atoms")]
    IndexOutOfRange { index: usize, atom_count: usize },
}

/// Undirected covalent bond graph over zero-based atom indices.
///
/// Bonds are always stored in both directions, so `b` is a neighbor of `a` exactly when
/// `a` is a neighbor of `b`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BondGraph {
    adjacency: Vec<BTreeSet<usize>>,
}

impl BondGraph {
    /// Creates a graph over `atom_count` atoms with no bonds.
    pub fn new(atom_count: usize) -> Self {
        Self {
            adjacency: vec![BTreeSet::new(); atom_count],
        }
    }

    /// Builds a graph from a list of index pairs.
    ///
    /// # Errors
    ///
    /// Returns [`BondGraphError::IndexOutOfRange`] if a pair references a missing atom.
    pub fn from_bonds(
        atom_count: usize,
        bonds: impl IntoIterator<Item = (usize, usize)>,
    ) -> Result<Self, BondGraphError> {
        let mut graph = Self::new(atom_count);
        for (a, b) in bonds {
            graph.add_bond(a, b)?;
        }
        Ok(graph)
    }

    /// Adds an undirected bond. Self-bonds are ignored.
    pub fn add_bond(&mut self, a: usize, b: usize) -> Result<(), BondGraphError> {
        let atom_count = self.atom_count();
        for index in [a, b] {
            if index >= atom_count {
                return Err(BondGraphError::IndexOutOfRange { index, atom_count });
            }
        }
        if a != b {
            self.adjacency[a].insert(b);
            self.adjacency[b].insert(a);
        }
        Ok(())
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn bond_count(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    /// Returns the bonded partners of `atom` in ascending order.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency
            .get(atom)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn is_bonded(&self, a: usize, b: usize) -> bool {
        self.adjacency.get(a).is_some_and(|set| set.contains(&b))
    }
}
