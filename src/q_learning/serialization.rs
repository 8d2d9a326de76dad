//! Flat binary persistence for the Q-table.
//!
//! The file is the raw table: `19683 * 9` little-endian `f64` values in
//! state-major order, no header. A missing file loads as a zero table; a file
//! of any other length is rejected. Saves go through a temporary file in the
//! same directory so an interrupted write never leaves a short table behind.

use std::{
    fs::File,
    io::{BufReader, BufWriter, ErrorKind, Read, Write},
    path::Path,
};

use tempfile::NamedTempFile;

use crate::{Error, Result, q_learning::q_table::QTable};

/// Default table location
pub const DEFAULT_TABLE_PATH: &str = "q_table.bin";

const VALUE_BYTES: usize = std::mem::size_of::<f64>();

/// Expected file size in bytes
pub const TABLE_BYTES: u64 = (QTable::LEN * VALUE_BYTES) as u64;

/// Write the whole table to `path`, replacing any existing file
pub fn save<P: AsRef<Path>>(table: &QTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::io(format!("create temp file in {}", dir.display()), e))?;
    let mut writer = BufWriter::new(tmp.as_file_mut());

    for value in table.values() {
        writer
            .write_all(&value.to_le_bytes())
            .map_err(|e| Error::io(format!("write table file {}", path.display()), e))?;
    }
    writer
        .flush()
        .map_err(|e| Error::io(format!("flush table file {}", path.display()), e))?;
    drop(writer);

    tmp.persist(path)
        .map_err(|e| Error::io(format!("replace table file {}", path.display()), e.error))?;

    log::debug!("saved Q-table to {}", path.display());
    Ok(())
}

/// Read a table from `path`, or return a zero table when the file is absent.
///
/// # Errors
///
/// Fails with [`Error::TableSizeMismatch`] when the file length is not
/// exactly [`TABLE_BYTES`], and with [`Error::Io`] for other I/O failures.
pub fn load<P: AsRef<Path>>(path: P) -> Result<QTable> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!(
                "no Q-table at {}, starting from a zero table",
                path.display()
            );
            return Ok(QTable::new());
        }
        Err(e) => return Err(Error::io(format!("open table file {}", path.display()), e)),
    };

    let actual = file
        .metadata()
        .map_err(|e| Error::io(format!("stat table file {}", path.display()), e))?
        .len();
    if actual != TABLE_BYTES {
        return Err(Error::TableSizeMismatch {
            path: path.display().to_string(),
            expected: TABLE_BYTES,
            actual,
        });
    }

    let mut bytes = Vec::with_capacity(TABLE_BYTES as usize);
    BufReader::new(file)
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(format!("read table file {}", path.display()), e))?;
    if bytes.len() as u64 != TABLE_BYTES {
        return Err(Error::TableSizeMismatch {
            path: path.display().to_string(),
            expected: TABLE_BYTES,
            actual: bytes.len() as u64,
        });
    }

    let values = bytes
        .chunks_exact(VALUE_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; VALUE_BYTES];
            raw.copy_from_slice(chunk);
            f64::from_le_bytes(raw)
        })
        .collect();

    log::debug!("loaded Q-table from {}", path.display());
    QTable::from_values(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_roundtrip_is_bit_exact() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.bin");

        let mut table = QTable::new();
        table.set(0, 0, 1.0);
        table.set(4, 8, -0.1);
        table.set(19_682, 4, f64::MIN_POSITIVE);
        table.set(100, 3, 1.0 / 3.0);
        save(&table, &path)?;

        let loaded = load(&path)?;
        for (a, b) in table.values().iter().zip(loaded.values()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        Ok(())
    }

    #[test]
    fn test_file_size() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.bin");
        save(&QTable::new(), &path)?;
        assert_eq!(std::fs::metadata(&path)?.len(), TABLE_BYTES);
        Ok(())
    }

    #[test]
    fn test_save_replaces_short_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("table.bin");
        std::fs::write(&path, vec![0u8; (TABLE_BYTES / 2) as usize])?;

        let mut table = QTable::new();
        table.set(7, 3, 0.75);
        save(&table, &path)?;

        assert_eq!(load(&path)?.get(7, 3), 0.75);
        let entries: Vec<_> = std::fs::read_dir(dir.path())?.collect::<std::io::Result<_>>()?;
        assert_eq!(entries.len(), 1);
        Ok(())
    }

    #[test]
    fn test_missing_file_loads_zero_table() -> Result<()> {
        let dir = TempDir::new()?;
        let table = load(dir.path().join("absent.bin"))?;
        assert_eq!(table.values().len(), QTable::LEN);
        assert_eq!(table.nonzero_count(), 0);
        Ok(())
    }

    #[test]
    fn test_truncated_file_is_rejected() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("short.bin");
        std::fs::write(&path, [0u8; 80])?;
        assert!(matches!(
            load(&path),
            Err(Error::TableSizeMismatch { actual: 80, .. })
        ));
        Ok(())
    }
}
