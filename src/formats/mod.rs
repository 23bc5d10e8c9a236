//! Instrument file decoders.
//!
//! A gather is recorded as three co-located files sharing a basename:
//!
//! - **Header** (`.rad`): keyword-tagged text with the survey parameters
//! - **Traces** (`.rd3`): raw little-endian `i16` samples, trace after trace
//! - **Geometry** (`.tlf`): one text row per range of traces with Tx/Rx depths
//!
//! Each file is resolved independently: the bare basename first, then the
//! lower-case extension, then the upper-case one.

pub mod lexer;
pub mod ramac;
pub mod rad;
pub mod rd3;
pub mod tlf;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::CoreConfig;
use crate::error::MogError;
use crate::models::GatherRecord;

pub use ramac::{antenna_offsets, read_ramac, AntennaOffsets};

/// The three files making up a RAMAC gather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileKind {
    Header,
    Traces,
    Geometry,
}

impl FileKind {
    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Header => "rad",
            FileKind::Traces => "rd3",
            FileKind::Geometry => "tlf",
        }
    }

    /// Paths tried, in order, for a given basename.
    pub fn candidates(&self, basename: &str) -> [PathBuf; 3] {
        let ext = self.extension();
        [
            PathBuf::from(basename),
            PathBuf::from(format!("{basename}.{ext}")),
            PathBuf::from(format!("{basename}.{}", ext.to_ascii_uppercase())),
        ]
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension().to_ascii_uppercase())
    }
}

/// Reads the first candidate path of `kind` that can be read.
///
/// Fails with [`MogError::FileNotFound`] carrying the last OS error, cut to
/// `config.diagnostic_limit` characters.
pub fn read_with_fallback(
    basename: &str,
    kind: FileKind,
    config: &CoreConfig,
) -> Result<(PathBuf, Vec<u8>), MogError> {
    let mut last_error = String::new();
    for path in kind.candidates(basename) {
        match fs::read(&path) {
            Ok(bytes) => {
                tracing::debug!("resolved {} file {}", kind, path.display());
                return Ok((path, bytes));
            }
            Err(e) => last_error = format!("{e}: '{}'", path.display()),
        }
    }
    Err(MogError::FileNotFound {
        kind,
        detail: truncate_chars(&last_error, config.diagnostic_limit),
    })
}

/// Text variant of [`read_with_fallback`]; invalid UTF-8 is replaced, not rejected.
pub fn read_text_with_fallback(
    basename: &str,
    kind: FileKind,
    config: &CoreConfig,
) -> Result<(PathBuf, String), MogError> {
    let (path, bytes) = read_with_fallback(basename, kind, config)?;
    Ok((path, String::from_utf8_lossy(&bytes).into_owned()))
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

/// Encodings a gather can be recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentFormat {
    /// Malå RAMAC `.rad`/`.rd3`/`.tlf` triplet.
    Ramac,
    /// SEG-Y; recognised but not decoded.
    Segy,
}

impl InstrumentFormat {
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "rad" | "rd3" | "tlf" => Some(InstrumentFormat::Ramac),
            "sgy" | "segy" => Some(InstrumentFormat::Segy),
            _ => None,
        }
    }
}

/// Decode the gather stored under `basename` in the given format.
pub fn read_gather(
    format: InstrumentFormat,
    basename: &str,
    config: &CoreConfig,
) -> Result<GatherRecord, MogError> {
    match format {
        InstrumentFormat::Ramac => read_ramac(basename, config),
        InstrumentFormat::Segy => Err(MogError::UnsupportedFormat("SEG-Y gathers".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_candidates_order() {
        let paths = FileKind::Header.candidates("data/t0102");
        assert_eq!(paths[0], PathBuf::from("data/t0102"));
        assert_eq!(paths[1], PathBuf::from("data/t0102.rad"));
        assert_eq!(paths[2], PathBuf::from("data/t0102.RAD"));
    }

    #[test]
    fn test_fallback_to_upper_case_extension() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("shot");
        fs::write(dir.path().join("shot.TLF"), b"header\n").unwrap();

        let (path, text) =
            read_text_with_fallback(base.to_str().unwrap(), FileKind::Geometry, &CoreConfig::default())
                .unwrap();
        assert_eq!(path, dir.path().join("shot.TLF"));
        assert_eq!(text, "header\n");
    }

    #[test]
    fn test_bare_name_wins() {
        let dir = TempDir::new().unwrap();
        let bare = dir.path().join("shot.rd3");
        fs::write(&bare, [1u8, 0]).unwrap();
        fs::write(dir.path().join("shot.rd3.rd3"), [2u8, 0]).unwrap();

        let (path, bytes) =
            read_with_fallback(bare.to_str().unwrap(), FileKind::Traces, &CoreConfig::default())
                .unwrap();
        assert_eq!(path, bare);
        assert_eq!(bytes, vec![1, 0]);
    }

    #[test]
    fn test_missing_file_detail_is_bounded() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("a_rather_long_basename_that_keeps_going_and_going");
        let config = CoreConfig::default();

        let err = read_with_fallback(base.to_str().unwrap(), FileKind::Header, &config).unwrap_err();
        match err {
            MogError::FileNotFound { kind, detail } => {
                assert_eq!(kind, FileKind::Header);
                assert!(detail.chars().count() <= config.diagnostic_limit);
                assert!(!detail.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            InstrumentFormat::from_extension(Path::new("a/b.RAD")),
            Some(InstrumentFormat::Ramac)
        );
        assert_eq!(
            InstrumentFormat::from_extension(Path::new("b.sgy")),
            Some(InstrumentFormat::Segy)
        );
        assert_eq!(InstrumentFormat::from_extension(Path::new("b.txt")), None);
        assert_eq!(InstrumentFormat::from_extension(Path::new("b")), None);
    }

    #[test]
    fn test_segy_is_unsupported() {
        let err = read_gather(InstrumentFormat::Segy, "/nonexistent", &CoreConfig::default())
            .unwrap_err();
        assert_eq!(err, MogError::UnsupportedFormat("SEG-Y gathers".to_string()));
    }
}
