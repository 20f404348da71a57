//! # Core Module
//!
//! Fundamental building blocks of the fragmentation pipeline.
//!
//! - **Molecular Representation** ([`models`]) - Atoms, periodic cells, atomic systems and bond graphs
//! - **File I/O** ([`io`]) - XYZ coordinates, `CONECT` connectivity records, and force tables
//! - **Fragmentation** ([`fragments`]) - Connected-component partitioning and spin assignment
//! - **Geometry** ([`utils`]) - Minimum-image distances and periodic re-imaging

pub mod fragments;
pub mod io;
pub mod models;
pub mod utils;
