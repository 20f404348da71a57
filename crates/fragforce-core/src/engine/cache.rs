use crate::core::io::forces::{ForceTableError, read_rows, write_vector_columns};
use nalgebra::Vector3;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Per-atom split of the force into its one-body part and its two-body correction.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceTable {
    one_body: Vec<Vector3<f64>>,
    two_body: Vec<Vector3<f64>>,
}

impl ForceTable {
    pub fn zeros(atom_count: usize) -> Self {
        Self {
            one_body: vec![Vector3::zeros(); atom_count],
            two_body: vec![Vector3::zeros(); atom_count],
        }
    }

    /// Creates a table from its two halves; returns `None` if their lengths differ.
    pub fn from_split(one_body: Vec<Vector3<f64>>, two_body: Vec<Vector3<f64>>) -> Option<Self> {
        (one_body.len() == two_body.len()).then_some(Self { one_body, two_body })
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.one_body.len()
    }

    #[inline]
    pub fn one_body(&self) -> &[Vector3<f64>] {
        &self.one_body
    }

    #[inline]
    pub fn two_body(&self) -> &[Vector3<f64>] {
        &self.two_body
    }

    pub(crate) fn one_body_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.one_body
    }

    pub(crate) fn two_body_mut(&mut self) -> &mut [Vector3<f64>] {
        &mut self.two_body
    }

    /// Atom-wise sum of the one-body and two-body parts.
    pub fn total(&self) -> Vec<Vector3<f64>> {
        self.one_body
            .iter()
            .zip(&self.two_body)
            .map(|(one, two)| one + two)
            .collect()
    }

    /// Writes the six-column layout: three one-body then three two-body components.
    pub fn write_to(&self, writer: &mut impl Write) -> Result<(), ForceTableError> {
        write_vector_columns(writer, &[&self.one_body, &self.two_body])
    }
}

/// Where the fallback forces of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOrigin {
    /// Read from the cache file of a previous run.
    Loaded,
    /// No usable cache; the fallback is all zeros.
    ColdStart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CachedForces {
    pub table: ForceTable,
    pub origin: CacheOrigin,
}

impl CachedForces {
    pub fn cold(atom_count: usize) -> Self {
        Self {
            table: ForceTable::zeros(atom_count),
            origin: CacheOrigin::ColdStart,
        }
    }
}

const CACHE_COLUMNS: usize = 6;

/// The on-disk force table carried from one run to the next.
#[derive(Debug, Clone)]
pub struct PersistentForceCache {
    path: PathBuf,
}

impl PersistentForceCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the cache for a system of `atom_count` atoms.
    ///
    /// Never fails: a missing, unreadable or differently shaped file yields a zero table.
    pub fn load(&self, atom_count: usize) -> CachedForces {
        if !self.path.is_file() {
            info!(path = %self.path.display(), "No old forces found. Use 0 instead.");
            return CachedForces::cold(atom_count);
        }

        let rows = match File::open(&self.path)
            .map_err(ForceTableError::from)
            .and_then(|file| read_rows(&mut BufReader::new(file)))
        {
            Ok(rows) => rows,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cached forces are unreadable. Use 0 instead.");
                return CachedForces::cold(atom_count);
            }
        };

        let well_shaped = rows.len() == atom_count && rows.iter().all(|r| r.len() == CACHE_COLUMNS);
        if !well_shaped {
            let columns = rows.first().map_or(0, Vec::len);
            info!(
                path = %self.path.display(),
                "Cached forces have shape ({}, {}), expected ({}, {}). Use 0 instead.",
                rows.len(),
                columns,
                atom_count,
                CACHE_COLUMNS
            );
            return CachedForces::cold(atom_count);
        }

        let (one_body, two_body) = rows
            .iter()
            .map(|r| (Vector3::new(r[0], r[1], r[2]), Vector3::new(r[3], r[4], r[5])))
            .unzip();
        info!(path = %self.path.display(), "Load old forces.");
        CachedForces {
            table: ForceTable {
                one_body,
                two_body,
            },
            origin: CacheOrigin::Loaded,
        }
    }

    /// Overwrites the cache file with `table`.
    pub fn save(&self, table: &ForceTable) -> Result<(), ForceTableError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        table.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Runs `f` with a subscriber that records every event on this thread as plain text.
    pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        (result, text.lines().map(str::to_string).collect())
    }

    pub(crate) fn lines_at<'a>(logs: &'a [String], level: &str) -> Vec<&'a String> {
        logs.iter()
            .filter(|line| line.split_whitespace().any(|word| word == level))
            .collect()
    }

    fn sample_table() -> ForceTable {
        ForceTable::from_split(
            vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(-1.0, 0.5, 0.0)],
            vec![Vector3::new(0.25, 0.0, -0.125), Vector3::zeros()],
        )
        .unwrap()
    }

    #[test]
    fn from_split_rejects_mismatched_halves() {
        assert!(ForceTable::from_split(vec![Vector3::zeros()], vec![]).is_none());
    }

    #[test]
    fn total_sums_both_parts() {
        let total = sample_table().total();
        assert_eq!(total[0], Vector3::new(1.25, 2.0, 2.875));
        assert_eq!(total[1], Vector3::new(-1.0, 0.5, 0.0));
    }

    #[test]
    fn missing_file_is_a_cold_start() {
        let dir = tempdir().unwrap();
        let cache = PersistentForceCache::new(dir.path().join("kbforce.dat"));
        let loaded = cache.load(3);
        assert_eq!(loaded.origin, CacheOrigin::ColdStart);
        assert_eq!(loaded.table, ForceTable::zeros(3));
    }

    #[test]
    fn saved_table_is_loaded_back() {
        let dir = tempdir().unwrap();
        let cache = PersistentForceCache::new(dir.path().join("kbforce.dat"));
        cache.save(&sample_table()).unwrap();

        let loaded = cache.load(2);
        assert_eq!(loaded.origin, CacheOrigin::Loaded);
        assert_eq!(loaded.table, sample_table());
    }

    #[test]
    fn saved_file_has_six_columns_per_atom() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kbforce.dat");
        PersistentForceCache::new(&path).save(&sample_table()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.split_whitespace().count() == 6));
    }

    #[test]
    fn atom_count_mismatch_is_a_cold_start() {
        let dir = tempdir().unwrap();
        let cache = PersistentForceCache::new(dir.path().join("kbforce.dat"));
        cache.save(&sample_table()).unwrap();

        let (loaded, logs) = capture_logs(|| cache.load(5));
        assert_eq!(loaded.origin, CacheOrigin::ColdStart);
        assert_eq!(loaded.table, ForceTable::zeros(5));

        let info = lines_at(&logs, "INFO");
        assert!(info.iter().any(|line| line.contains("expected (5, 6)")), "{:?}", logs);
        assert!(lines_at(&logs, "WARN").is_empty(), "{:?}", logs);
    }

    #[test]
    fn wrong_column_count_is_a_cold_start() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kbforce.dat");
        fs::write(&path, "1 2 3\n4 5 6\n").unwrap();
        let loaded = PersistentForceCache::new(&path).load(2);
        assert_eq!(loaded.origin, CacheOrigin::ColdStart);
    }

    #[test]
    fn corrupt_file_is_a_cold_start() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kbforce.dat");
        fs::write(&path, "1 2 3 4 5 nan?\n").unwrap();
        let loaded = PersistentForceCache::new(&path).load(1);
        assert_eq!(loaded.origin, CacheOrigin::ColdStart);
        assert_eq!(loaded.table, ForceTable::zeros(1));
    }
}
