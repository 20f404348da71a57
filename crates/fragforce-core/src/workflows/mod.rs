//! # Workflows Module
//!
//! High-level entry points of the library.
//!
//! - **Fragment Workflow** ([`fragment`]) - One snapshot in, one corrected force field
//!   out: fragmentation, job submission, many-body aggregation with cache fallback,
//!   net-force removal, and persistence of the output and cache files.

pub mod fragment;
