use crate::core::models::topology::{BondGraph, BondGraphError};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

const CONECT_TAG: &str = "CONECT";
const SERIAL_WIDTH: usize = 5;

#[derive(Debug, Error)]
pub enum ConectError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid atom serial '{value}' on line {line}")]
    InvalidSerial { line: usize, value: String },
    #[error("Atom serial 0 on line {line} (serials are 1-based)")]
    ZeroSerial { line: usize },
    #[error("Line {line}: {source}")]
    Graph {
        line: usize,
        #[source]
        source: BondGraphError,
    },
}

/// Reads the `CONECT` records of a PDB file into a [`BondGraph`].
///
/// Serials in the file are 1-based and are converted to zero-based atom indices.
/// Every other record type is ignored. The resulting graph is symmetric even when
/// the file lists a bond only from one side.
///
/// # Arguments
///
/// * `reader` - The buffered reader to read from.
/// * `atom_count` - Number of atoms in the system the records refer to.
///
/// # Errors
///
/// Returns an error on malformed serials or serials beyond `atom_count`.
pub fn read_conect(reader: &mut impl BufRead, atom_count: usize) -> Result<BondGraph, ConectError> {
    let mut graph = BondGraph::new(atom_count);

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line_num = line_num + 1;
        if !line.starts_with(CONECT_TAG) {
            continue;
        }

        let serials = serial_fields(&line)
            .into_iter()
            .map(|raw| parse_serial(raw, line_num))
            .collect::<Result<Vec<_>, _>>()?;

        let Some((&origin, partners)) = serials.split_first() else {
            continue;
        };
        for &partner in partners {
            graph
                .add_bond(origin, partner)
                .map_err(|source| ConectError::Graph {
                    line: line_num,
                    source,
                })?;
        }
    }

    Ok(graph)
}

/// Reads `CONECT` records from a file path.
pub fn read_conect_from_path<P: AsRef<Path>>(
    path: P,
    atom_count: usize,
) -> Result<BondGraph, ConectError> {
    let file = File::open(path)?;
    read_conect(&mut BufReader::new(file), atom_count)
}

/// Splits the serial fields of a `CONECT` record.
///
/// Fields occupy fixed 5-column slots starting at column 7, so five-digit serials can
/// run together (`CONECT10000 999910001`). Records that do not fit that layout, such as
/// hand-written ones with single-space separation, are split on whitespace instead.
fn serial_fields(line: &str) -> Vec<&str> {
    let body = &line[CONECT_TAG.len()..];
    if body.is_ascii() {
        let fields: Vec<&str> = body
            .as_bytes()
            .chunks(SERIAL_WIDTH)
            .filter_map(|chunk| std::str::from_utf8(chunk).ok())
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect();
        if fields.iter().all(|field| !field.contains(char::is_whitespace)) {
            return fields;
        }
    }
    body.split_whitespace().collect()
}

fn parse_serial(raw: &str, line: usize) -> Result<usize, ConectError> {
    let serial: usize = raw.parse().map_err(|_| ConectError::InvalidSerial {
        line,
        value: raw.to_string(),
    })?;
    serial.checked_sub(1).ok_or(ConectError::ZeroSerial { line })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(content: &str, atom_count: usize) -> Result<BondGraph, ConectError> {
        read_conect(&mut BufReader::new(Cursor::new(content)), atom_count)
    }

    #[test]
    fn converts_serials_to_zero_based_indices() {
        let pdb = "\
HETATM    1  C   UNL     1       0.000   0.000   0.000  1.00  0.00           C
CONECT    1    2    3
CONECT    2    1
CONECT    3    1
END
";
        let graph = read(pdb, 4).unwrap();
        assert!(graph.is_bonded(0, 1));
        assert!(graph.is_bonded(0, 2));
        assert_eq!(graph.bond_count(), 2);
        assert_eq!(graph.neighbors(3).count(), 0);
    }

    #[test]
    fn one_sided_records_produce_symmetric_graph() {
        let graph = read("CONECT    1    2\n", 2).unwrap();
        assert!(graph.is_bonded(1, 0));
    }

    #[test]
    fn lone_serial_record_adds_no_bond() {
        let graph = read("CONECT    1\n", 1).unwrap();
        assert_eq!(graph.bond_count(), 0);
    }

    #[test]
    fn rejects_serial_beyond_atom_count() {
        let result = read("CONECT    1    9\n", 2);
        assert!(matches!(result, Err(ConectError::Graph { line: 1, .. })));
    }

    #[test]
    fn rejects_non_numeric_serial() {
        let result = read("CONECT    1    X\n", 2);
        assert!(matches!(result, Err(ConectError::InvalidSerial { .. })));
    }

    #[test]
    fn five_digit_serials_are_read_from_fixed_columns() {
        let graph = read("CONECT10000 999910001\nCONECT 9999 9998\n", 10001).unwrap();
        assert!(graph.is_bonded(9999, 9998));
        assert!(graph.is_bonded(9999, 10000));
        assert!(graph.is_bonded(9998, 9997));
        assert_eq!(graph.bond_count(), 3);
    }

    #[test]
    fn loosely_spaced_records_fall_back_to_whitespace_fields() {
        let graph = read("CONECT 1 2 3\n", 3).unwrap();
        assert!(graph.is_bonded(0, 1));
        assert!(graph.is_bonded(0, 2));
        assert_eq!(graph.bond_count(), 2);
    }

    #[test]
    fn rejects_zero_serial() {
        let result = read("CONECT    0    1\n", 2);
        assert!(matches!(result, Err(ConectError::ZeroSerial { line: 1 })));
    }
}
