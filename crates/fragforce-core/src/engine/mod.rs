//! # Engine Module
//!
//! The stateful part of the fragmentation pipeline.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Cutoff, cell, engine directives, file locations and runner choice
//! - **Job Generation** ([`jobs`]) - One-body and cutoff-screened two-body subsystem jobs
//! - **External Engine** ([`gateway`]) - The interface through which jobs are executed and read back
//! - **Recovery Cache** ([`cache`]) - The persisted one-body/two-body force split of the last run
//! - **Aggregation** ([`aggregate`]) - Many-body recombination with fallback to cached forces
//! - **Correction** ([`correction`]) - Removal of the residual net force
//! - **Connectivity** ([`connectivity`]) - Invocation of the external bond-perception tool
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Fatal engine errors
//!
//! Job-level failures never surface as errors: they are contained in [`aggregate`] and
//! degrade to cached forces.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod connectivity;
pub mod correction;
pub mod error;
pub mod gateway;
pub mod jobs;
pub mod progress;
