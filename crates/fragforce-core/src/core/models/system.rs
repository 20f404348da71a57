use super::atom::Atom;
use nalgebra::{Point3, Vector3};

/// An orthorhombic simulation cell.
///
/// An axis is periodic only when periodicity is requested *and* the cell length along
/// that axis is positive; a zero length marks a non-periodic axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    lengths: Vector3<f64>,
    periodic: [bool; 3],
}

impl Cell {
    /// Creates an orthorhombic cell.
    ///
    /// # Arguments
    ///
    /// * `lengths` - Cell edge lengths along x, y and z in Angstroms.
    /// * `pbc` - Whether periodic boundary conditions are requested.
    pub fn orthorhombic(lengths: [f64; 3], pbc: bool) -> Self {
        Self {
            lengths: Vector3::from(lengths),
            periodic: lengths.map(|l| pbc && l > 0.0),
        }
    }

    /// Creates a cell with no periodic axis.
    pub fn non_periodic() -> Self {
        Self::orthorhombic([0.0; 3], false)
    }

    #[inline]
    pub fn lengths(&self) -> &Vector3<f64> {
        &self.lengths
    }

    #[inline]
    pub fn is_periodic_along(&self, axis: usize) -> bool {
        self.periodic[axis]
    }

    /// Returns `true` if at least one axis is periodic.
    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.periodic.iter().any(|&p| p)
    }

    /// Converts a Cartesian position into fractional coordinates.
    ///
    /// Non-periodic axes are returned unchanged, since they have no meaningful cell length.
    pub fn fractional(&self, position: &Point3<f64>) -> Vector3<f64> {
        Vector3::from_fn(|axis, _| {
            if self.periodic[axis] {
                position[axis] / self.lengths[axis]
            } else {
                position[axis]
            }
        })
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::non_periodic()
    }
}

/// One frame of a molecular-dynamics trajectory.
///
/// The atom order is the order of the input coordinate file and every other structure in
/// the pipeline refers to atoms by their index in this list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomicSystem {
    atoms: Vec<Atom>,
    cell: Cell,
}

impl AtomicSystem {
    pub fn new(atoms: Vec<Atom>, cell: Cell) -> Self {
        Self { atoms, cell }
    }

    /// Returns the same system with a different cell.
    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cell = cell;
        self
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    #[inline]
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn cell(&self) -> &Cell {
        &self.cell
    }
}
