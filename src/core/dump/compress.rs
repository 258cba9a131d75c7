//! Streaming gzip compression of staging files
//!
//! The uncompressed file is read in fixed-size chunks so memory use is bound
//! by the chunk size. The gzip header records the source file's base name and
//! modification time so identical inputs produce identical archives.

use crate::domain::{DumpError, Result};
use flate2::{Compression, GzBuilder};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Default read chunk size (16 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Tuning of [`gzip_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOptions {
    pub chunk_size: usize,
    /// zlib level, 0-9
    pub level: u32,
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            level: 6,
        }
    }
}

/// Sizes of a finished compression
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressionReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

fn publish_err(action: &str, path: &Path, e: std::io::Error) -> DumpError {
    DumpError::Publish(format!("{action} {}: {e}", path.display()))
}

/// Compress `source` into `target`
///
/// # Errors
///
/// Returns [`DumpError::Publish`] if either file cannot be read or written.
pub fn gzip_file(
    source: &Path,
    target: &Path,
    options: CompressionOptions,
) -> Result<CompressionReport> {
    let mut input = File::open(source).map_err(|e| publish_err("failed to open", source, e))?;
    let metadata = input
        .metadata()
        .map_err(|e| publish_err("failed to stat", source, e))?;
    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| u32::try_from(d.as_secs()).unwrap_or(u32::MAX))
        .unwrap_or(0);
    let orig_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let output = File::create(target).map_err(|e| publish_err("failed to create", target, e))?;
    let mut encoder = GzBuilder::new()
        .filename(orig_name)
        .mtime(mtime)
        .write(BufWriter::new(output), Compression::new(options.level));

    let mut buffer = vec![0u8; options.chunk_size.max(1)];
    let mut input_bytes = 0u64;
    loop {
        let read = input
            .read(&mut buffer)
            .map_err(|e| publish_err("failed to read", source, e))?;
        if read == 0 {
            break;
        }
        encoder
            .write_all(&buffer[..read])
            .map_err(|e| publish_err("failed to write", target, e))?;
        input_bytes += read as u64;
    }

    let mut writer = encoder
        .finish()
        .map_err(|e| publish_err("failed to finish", target, e))?;
    writer
        .flush()
        .map_err(|e| publish_err("failed to flush", target, e))?;
    drop(writer);

    let output_bytes = std::fs::metadata(target)
        .map_err(|e| publish_err("failed to stat", target, e))?
        .len();

    Ok(CompressionReport {
        input_bytes,
        output_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use tempfile::TempDir;

    #[test]
    fn test_gzip_round_trip_with_small_chunks() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("rows.csv");
        let target = dir.path().join("rows.gz");
        let body = "id,name\n".to_string() + &"1,galaxy\n".repeat(500);
        std::fs::write(&source, &body).unwrap();

        let report = gzip_file(
            &source,
            &target,
            CompressionOptions {
                chunk_size: 7,
                level: 9,
            },
        )
        .unwrap();
        assert_eq!(report.input_bytes, body.len() as u64);
        assert!(report.output_bytes > 0);

        let mut decoder = GzDecoder::new(File::open(&target).unwrap());
        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_header_carries_name_and_mtime() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("project_subjects_export_a_b.csv");
        let target = dir.path().join("project_subjects_export_a_b.gz");
        std::fs::write(&source, "subject_id\n1\n").unwrap();

        gzip_file(&source, &target, CompressionOptions::default()).unwrap();

        let expected_mtime = std::fs::metadata(&source)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as u32;

        let mut decoder = GzDecoder::new(File::open(&target).unwrap());
        let mut sink = Vec::new();
        decoder.read_to_end(&mut sink).unwrap();
        let header = decoder.header().unwrap();
        assert_eq!(
            header.filename(),
            Some("project_subjects_export_a_b.csv".as_bytes())
        );
        assert_eq!(header.mtime(), expected_mtime);
    }

    #[test]
    fn test_missing_source_is_publish_error() {
        let dir = TempDir::new().unwrap();
        let result = gzip_file(
            &dir.path().join("absent.csv"),
            &dir.path().join("absent.gz"),
            CompressionOptions::default(),
        );
        assert!(matches!(result, Err(DumpError::Publish(_))));
    }
}
