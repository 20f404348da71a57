//! # I/O Module
//!
//! Plain-text formats consumed and produced by the pipeline.
//!
//! - [`traits`] - The [`traits::StructureFile`] reader interface
//! - [`xyz`] - XYZ coordinate frames
//! - [`conect`] - `CONECT` records emitted by the external connectivity tool
//! - [`forces`] - Fixed-width numeric force tables (output and cache files)

pub mod conect;
pub mod forces;
pub mod traits;
pub mod xyz;
