use nalgebra::Vector3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForceTableError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid number '{value}' on line {line}")]
    InvalidFloat { line: usize, value: String },
}

/// Writes one row per atom, concatenating the given per-atom vector columns.
///
/// Every component is formatted as `%16.9f` and components are separated by a single
/// space, matching the layout of `numpy.savetxt(..., fmt="%16.9f")`.
///
/// # Arguments
///
/// * `writer` - The destination.
/// * `columns` - Blocks of per-atom vectors; all blocks must have the same length.
pub fn write_vector_columns(
    writer: &mut impl Write,
    columns: &[&[Vector3<f64>]],
) -> Result<(), ForceTableError> {
    let rows = columns.first().map_or(0, |c| c.len());
    for row in 0..rows {
        let line = columns
            .iter()
            .flat_map(|column| column[row].iter())
            .map(|value| format!("{:16.9}", value))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Reads a whitespace-separated numeric table. Blank lines are skipped.
pub fn read_rows(reader: &mut impl BufRead) -> Result<Vec<Vec<f64>>, ForceTableError> {
    let mut rows = Vec::new();
    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split_whitespace()
            .map(|raw| {
                raw.parse::<f64>().map_err(|_| ForceTableError::InvalidFloat {
                    line: line_num + 1,
                    value: raw.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }
    Ok(rows)
}
