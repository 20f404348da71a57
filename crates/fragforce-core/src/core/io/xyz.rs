use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::system::{AtomicSystem, Cell};
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: XyzParseErrorKind },
    #[error("Header declares {expected} atoms, but only {found} atom lines were found")]
    AtomCountMismatch { expected: usize, found: usize },
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
}

#[derive(Debug, Error)]
pub enum XyzParseErrorKind {
    #[error("Invalid atom count '{0}'")]
    InvalidAtomCount(String),
    #[error("Invalid coordinate '{0}'")]
    InvalidFloat(String),
    #[error("Atom line must contain a symbol and three coordinates")]
    TooFewFields,
}

/// Reader for the first frame of an XYZ (or extended XYZ) file.
///
/// Only the symbol and the first three numeric columns of each atom line are used;
/// extra per-atom columns and the comment line are ignored.
pub struct XyzFile;

impl StructureFile for XyzFile {
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<AtomicSystem, Self::Error> {
        let mut lines = reader.lines().enumerate();

        let expected = loop {
            match lines.next() {
                Some((i, line)) => {
                    let line = line?;
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    break trimmed.parse::<usize>().map_err(|_| XyzError::Parse {
                        line: i + 1,
                        kind: XyzParseErrorKind::InvalidAtomCount(trimmed.to_string()),
                    })?;
                }
                None => return Err(XyzError::MissingRecord("atom count header")),
            }
        };

        match lines.next() {
            Some((_, comment)) => {
                comment?;
            }
            None if expected > 0 => return Err(XyzError::MissingRecord("comment line")),
            None => {}
        }

        let mut atoms = Vec::with_capacity(expected);
        for (i, line) in lines {
            if atoms.len() == expected {
                break;
            }
            let line = line?;
            let line_num = i + 1;
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                break;
            }
            if fields.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::TooFewFields,
                });
            }
            let mut coords = [0.0; 3];
            for (slot, raw) in coords.iter_mut().zip(&fields[1..4]) {
                *slot = raw.parse().map_err(|_| XyzError::Parse {
                    line: line_num,
                    kind: XyzParseErrorKind::InvalidFloat(raw.to_string()),
                })?;
            }
            atoms.push(Atom::new(fields[0], Point3::from(coords)));
        }

        if atoms.len() != expected {
            return Err(XyzError::AtomCountMismatch {
                expected,
                found: atoms.len(),
            });
        }

        Ok(AtomicSystem::new(atoms, Cell::non_periodic()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor};
    use tempfile::tempdir;

    fn read(content: &str) -> Result<AtomicSystem, XyzError> {
        XyzFile::read_from(&mut BufReader::new(Cursor::new(content)))
    }

    #[test]
    fn reads_symbols_and_positions() {
        let system = read("3\nwater\nO 0.0 0.0 0.0\nh 0.96 0.0 0.0\nH -0.24 0.93 0.0\n").unwrap();
        assert_eq!(system.len(), 3);
        assert_eq!(system.atoms()[1].symbol, "H");
        assert_eq!(system.atoms()[2].position, Point3::new(-0.24, 0.93, 0.0));
        assert!(!system.cell().is_periodic());
    }

    #[test]
    fn ignores_extra_columns_and_trailing_frames() {
        let system =
            read("1\nLattice=\"10 0 0 0 10 0 0 0 10\"\nC 1.0 2.0 3.0 0.1 0.2 0.3\n1\nnext\nC 9 9 9\n")
                .unwrap();
        assert_eq!(system.len(), 1);
        assert_eq!(system.atoms()[0].position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rejects_invalid_header() {
        let result = read("three\ncomment\n");
        assert!(matches!(
            result,
            Err(XyzError::Parse {
                line: 1,
                kind: XyzParseErrorKind::InvalidAtomCount(_)
            })
        ));
    }

    #[test]
    fn rejects_truncated_frame() {
        let result = read("2\ncomment\nO 0 0 0\n");
        assert!(matches!(
            result,
            Err(XyzError::AtomCountMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn rejects_bad_coordinate() {
        let result = read("1\ncomment\nO 0 x 0\n");
        assert!(matches!(
            result,
            Err(XyzError::Parse {
                line: 3,
                kind: XyzParseErrorKind::InvalidFloat(_)
            })
        ));
    }

    #[test]
    fn rejects_short_atom_line() {
        let result = read("1\ncomment\nO 0 0\n");
        assert!(matches!(
            result,
            Err(XyzError::Parse {
                kind: XyzParseErrorKind::TooFewFields,
                ..
            })
        ));
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempdir().unwrap();
        let result = XyzFile::read_from_path(dir.path().join("missing.xyz"));
        assert!(matches!(result, Err(XyzError::Io(_))));
    }
}
