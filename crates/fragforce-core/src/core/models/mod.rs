//! # Core Models Module
//!
//! Data structures describing one molecular-dynamics snapshot.
//!
//! - [`atom`] - A single atom: element symbol and Cartesian position
//! - [`system`] - The full snapshot together with its (optional) periodic cell
//! - [`topology`] - The undirected covalent bond graph over atom indices
//!
//! All structures address atoms by their zero-based index in the input frame.
//! They are built once per run and treated as read-only afterwards.
//!
//! ```ignore
//! use fragforce::core::models::{atom::Atom, system::{AtomicSystem, Cell}};
//!
//! let system = AtomicSystem::new(
//!     vec![Atom::new("O", Point3::new(0.0, 0.0, 0.0)), Atom::new("O", Point3::new(1.2, 0.0, 0.0))],
//!     Cell::non_periodic(),
//! );
//! ```

pub mod atom;
pub mod system;
pub mod topology;
