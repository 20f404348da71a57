use crate::core::models::system::AtomicSystem;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading coordinate file formats.
///
/// Implementors handle format-specific parsing; the cell of the returned system is left
/// non-periodic unless the format itself carries cell information.
pub trait StructureFile {
    /// The error type for parsing operations.
    type Error: Error + From<io::Error>;

    /// Reads a single frame from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<AtomicSystem, Self::Error>;

    /// Reads a single frame from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<AtomicSystem, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }
}
