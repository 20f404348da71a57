//! # FragForce Core Library
//!
//! Fragment-based many-body force assembly for ab initio molecular dynamics snapshots.
//! A multi-molecule system is split into covalently bonded fragments, every fragment and
//! every close fragment pair is handed to an external electronic-structure engine as an
//! independent job, and the returned per-atom forces are recombined into one force vector
//! per atom.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomicSystem`, `BondGraph`),
//!   fragment partitioning and spin characterization, periodic geometry, and file I/O.
//!
//! - **[`engine`]: The Logic Core.** Job generation, the persistent force cache, the
//!   many-body force aggregator, the net-force corrector, and the gateway abstraction
//!   through which jobs reach the external engine.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together to turn one
//!   snapshot into a corrected force field, writing the output and cache files.

pub mod core;
pub mod engine;
pub mod workflows;
