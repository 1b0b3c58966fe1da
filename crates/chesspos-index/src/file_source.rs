//! Directory-backed tables.
//!
//! Each table is a file `<key>.cpt` in the directory:
//!
//! ```text
//! offset  size  field
//! 0       4     magic "CPT1"
//! 4       4     row width in bits (u32, little-endian)
//! 8       8     row count (u64, little-endian)
//! 16      ...   rows, one byte per bit (0 or 1)
//! ```
//!
//! Reads seek straight to the requested rows, so only one chunk is ever
//! resident.

use std::fs;
use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IndexError, Result};
use crate::source::VectorSource;

/// File extension of table files.
pub const TABLE_EXTENSION: &str = "cpt";

const MAGIC: &[u8; 4] = b"CPT1";
const HEADER_LEN: u64 = 16;

struct Header {
    width: usize,
    rows: usize,
}

/// Tables stored as `.cpt` files in one directory, ordered by key.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
    name: String,
}

impl FileSource {
    /// Open a directory of tables. The directory must exist.
    pub fn open(dir: impl AsRef<Path>) -> Result<FileSource> {
        let dir = dir.as_ref().to_path_buf();
        let name = dir.display().to_string();
        if !dir.is_dir() {
            return Err(IndexError::SourceUnreadable {
                source_name: name,
                key: String::new(),
                reason: "not a directory".to_string(),
            });
        }
        Ok(FileSource { dir, name })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{TABLE_EXTENSION}"))
    }

    fn io_error(&self, key: &str, source: std::io::Error) -> IndexError {
        IndexError::SourceIo {
            source_name: self.name.clone(),
            key: key.to_string(),
            source,
        }
    }

    fn corrupt(&self, key: &str, reason: impl Into<String>) -> IndexError {
        IndexError::SourceUnreadable {
            source_name: self.name.clone(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    fn open_table(&self, key: &str) -> Result<(fs::File, Header)> {
        let mut file = fs::File::open(self.path(key)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => self.corrupt(key, "no such table"),
            _ => self.io_error(key, e),
        })?;
        let mut raw = [0u8; HEADER_LEN as usize];
        file.read_exact(&mut raw).map_err(|e| self.io_error(key, e))?;

        if &raw[..4] != MAGIC {
            return Err(self.corrupt(key, "bad magic"));
        }
        let width = u32::from_le_bytes([raw[4], raw[5], raw[6], raw[7]]);
        let mut count = [0u8; 8];
        count.copy_from_slice(&raw[8..16]);
        let rows = u64::from_le_bytes(count);

        let body_len = u64::from(width)
            .checked_mul(rows)
            .filter(|&len| usize::try_from(len).is_ok())
            .ok_or_else(|| self.corrupt(key, "header row count overflows"))?;
        let expected_len = body_len
            .checked_add(HEADER_LEN)
            .ok_or_else(|| self.corrupt(key, "header row count overflows"))?;
        let actual_len = file.metadata().map_err(|e| self.io_error(key, e))?.len();
        if actual_len != expected_len {
            return Err(self.corrupt(
                key,
                format!("file is {actual_len} bytes, header implies {expected_len}"),
            ));
        }

        let (Ok(width), Ok(rows)) = (usize::try_from(width), usize::try_from(rows)) else {
            return Err(self.corrupt(key, "header row count overflows"));
        };
        Ok((file, Header { width, rows }))
    }
}

impl VectorSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| self.io_error("", e))?;
        let mut keys = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| self.io_error("", e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TABLE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn row_count(&self, key: &str) -> Result<usize> {
        Ok(self.open_table(key)?.1.rows)
    }

    fn row_bits(&self, key: &str) -> Result<usize> {
        Ok(self.open_table(key)?.1.width)
    }

    fn read_rows(&self, key: &str, range: Range<usize>) -> Result<Vec<bool>> {
        let (mut file, header) = self.open_table(key)?;
        if range.start > range.end || range.end > header.rows {
            return Err(self.corrupt(
                key,
                format!("rows {range:?} out of bounds for {} rows", header.rows),
            ));
        }

        let offset = HEADER_LEN + (range.start * header.width) as u64;
        let mut raw = vec![0u8; range.len() * header.width];
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| self.io_error(key, e))?;
        file.read_exact(&mut raw).map_err(|e| self.io_error(key, e))?;
        debug!(source = %self.name, key, rows = range.len(), "read table rows");

        raw.into_iter()
            .map(|byte| match byte {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(self.corrupt(key, format!("invalid bit value {other}"))),
            })
            .collect()
    }
}

/// Write a table file `<key>.cpt` into `dir`, replacing any existing one.
pub fn write_table(dir: impl AsRef<Path>, key: &str, width: usize, bits: &[bool]) -> Result<PathBuf> {
    let shape_error = IndexError::Shape {
        context: "table length (multiple of row width)",
        expected: bits.len().next_multiple_of(width.max(1)),
        found: bits.len(),
    };
    if width == 0 || bits.len() % width != 0 {
        return Err(shape_error);
    }
    let width_field = u32::try_from(width).map_err(|_| IndexError::InvalidArgument(
        format!("row width {width} does not fit the table header"),
    ))?;

    let path = dir.as_ref().join(format!("{key}.{TABLE_EXTENSION}"));
    let io_error = |source| IndexError::SourceIo {
        source_name: dir.as_ref().display().to_string(),
        key: key.to_string(),
        source,
    };

    let mut out = BufWriter::new(fs::File::create(&path).map_err(io_error)?);
    out.write_all(MAGIC).map_err(io_error)?;
    out.write_all(&width_field.to_le_bytes()).map_err(io_error)?;
    out.write_all(&((bits.len() / width) as u64).to_le_bytes())
        .map_err(io_error)?;
    let body: Vec<u8> = bits.iter().map(|&bit| u8::from(bit)).collect();
    out.write_all(&body).map_err(io_error)?;
    out.flush().map_err(io_error)?;
    Ok(path)
}
