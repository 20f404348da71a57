//! Spin multiplicity heuristic.
//!
//! The rule is only meaningful for neutral fragments built from carbon, hydrogen and
//! oxygen: C and O contribute an even number of valence electrons, so the parity of the
//! electron count follows the hydrogen count. Molecular oxygen is the one closed-form
//! exception (triplet ground state). This is not a general valence-electron count; any
//! other element is rejected.

use crate::core::models::system::AtomicSystem;
use phf::phf_set;
use thiserror::Error;

static SUPPORTED_ELEMENTS: phf::Set<&'static str> = phf_set! {
    "C",
    "H",
    "O",
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpinError {
    #[error(
        "Unsupported element '{symbol}' at atom {atom_index}; spin assignment is only defined for C, H and O"
    )]
    UnsupportedElement { symbol: String, atom_index: usize },
}

/// Returns `true` if the spin rule is defined for `symbol`.
pub fn is_supported(symbol: &str) -> bool {
    SUPPORTED_ELEMENTS.contains(symbol)
}

/// Spin multiplicity of a fragment given its element symbols.
///
/// `O2` is a triplet; otherwise the multiplicity is `1 + (#H mod 2)`.
///
/// # Errors
///
/// Returns [`SpinError::UnsupportedElement`] naming the position (within `symbols`) of
/// the first unsupported element.
pub fn multiplicity<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Result<u32, SpinError> {
    let mut hydrogens = 0u32;
    let mut oxygens = 0u32;
    let mut count = 0usize;

    for (i, symbol) in symbols.into_iter().enumerate() {
        if !is_supported(symbol) {
            return Err(SpinError::UnsupportedElement {
                symbol: symbol.to_string(),
                atom_index: i,
            });
        }
        match symbol {
            "H" => hydrogens += 1,
            "O" => oxygens += 1,
            _ => {}
        }
        count += 1;
    }

    if count == 2 && oxygens == 2 {
        return Ok(3);
    }
    Ok(1 + hydrogens % 2)
}

/// Spin multiplicity of the fragment made of `atoms` in `system`.
///
/// Errors report the offending atom by its index in `system`.
pub fn multiplicity_of(system: &AtomicSystem, atoms: &[usize]) -> Result<u32, SpinError> {
    let all = system.atoms();
    multiplicity(atoms.iter().map(|&i| all[i].symbol.as_str())).map_err(|e| match e {
        SpinError::UnsupportedElement { symbol, atom_index } => SpinError::UnsupportedElement {
            symbol,
            atom_index: atoms[atom_index],
        },
    })
}

/// Multiplicity of two fragments coupled additively: `S1 + S2 - 1`.
///
/// Higher-multiplicity couplings are deliberately not considered.
#[inline]
pub fn coupled_multiplicity(first: u32, second: u32) -> u32 {
    first + second - 1
}
