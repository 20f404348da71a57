use nalgebra::Point3;

/// A single atom of the snapshot.
///
/// The element symbol is stored in canonical capitalization (`"C"`, `"Cl"`), regardless
/// of how it was spelled in the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Canonical element symbol.
    pub symbol: String,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new atom, normalizing the element symbol.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The element symbol, in any capitalization.
    /// * `position` - The Cartesian position of the atom.
    pub fn new(symbol: &str, position: Point3<f64>) -> Self {
        Self {
            symbol: normalize_symbol(symbol),
            position,
        }
    }
}

/// Converts an element symbol into canonical capitalization (first letter upper-case).
pub fn normalize_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}
