//! RAMAC trace data (`.rd3`) decoding.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};
use ndarray::Array2;

use crate::config::CoreConfig;
use crate::error::MogError;
use crate::formats::{read_with_fallback, FileKind};

/// Locate and decode the trace file for `basename`.
pub fn read_rd3(
    basename: &str,
    samples_per_trace: usize,
    trace_count: usize,
    config: &CoreConfig,
) -> Result<Array2<f64>, MogError> {
    let (path, bytes) = read_with_fallback(basename, FileKind::Traces, config)?;
    tracing::debug!("{}: {} bytes", path.display(), bytes.len());
    decode_rd3(&bytes, samples_per_trace, trace_count)
}

/// Decode `samples_per_trace * trace_count` little-endian `i16` samples.
///
/// Samples are stored trace after trace; the returned matrix is sample-major
/// (`samples_per_trace` rows, `trace_count` columns). Bytes beyond the
/// expected count are ignored, a short buffer is an error.
pub fn decode_rd3(
    bytes: &[u8],
    samples_per_trace: usize,
    trace_count: usize,
) -> Result<Array2<f64>, MogError> {
    let count = samples_per_trace
        .checked_mul(trace_count)
        .filter(|c| c.checked_mul(2).is_some())
        .ok_or_else(|| MogError::malformed(FileKind::Traces, "sample count overflows"))?;
    let short = || {
        MogError::malformed(
            FileKind::Traces,
            format!(
                "expected {count} samples ({samples_per_trace} x {trace_count}), got {}",
                bytes.len() / 2
            ),
        )
    };

    // The buffer is sized from the header, so check the file holds it first.
    if bytes.len() / 2 < count {
        return Err(short());
    }
    let mut raw = vec![0i16; count];
    Cursor::new(bytes)
        .read_i16_into::<LittleEndian>(&mut raw)
        .map_err(|_| short())?;

    let by_trace = Array2::from_shape_vec(
        (trace_count, samples_per_trace),
        raw.into_iter().map(f64::from).collect(),
    )
    .map_err(|e| MogError::malformed(FileKind::Traces, e.to_string()))?;

    Ok(by_trace.reversed_axes().as_standard_layout().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn test_decode_is_sample_major() {
        // 2 traces of 3 samples, written trace after trace.
        let bytes = encode(&[1, 2, 3, -4, -5, i16::MIN]);
        let matrix = decode_rd3(&bytes, 3, 2).unwrap();

        assert_eq!(matrix.shape(), &[3, 2]);
        assert_eq!(matrix[[0, 0]], 1.0);
        assert_eq!(matrix[[2, 0]], 3.0);
        assert_eq!(matrix[[0, 1]], -4.0);
        assert_eq!(matrix[[2, 1]], -32768.0);
    }

    #[test]
    fn test_short_buffer_fails() {
        let bytes = encode(&[1, 2, 3, 4, 5]);
        let err = decode_rd3(&bytes, 3, 2).unwrap_err();
        assert!(matches!(
            err,
            MogError::MalformedInput {
                kind: FileKind::Traces,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut bytes = encode(&[7, 8]);
        bytes.extend_from_slice(&[0xff, 0xff, 0x01]);
        let matrix = decode_rd3(&bytes, 1, 2).unwrap();
        assert_eq!(matrix.shape(), &[1, 2]);
        assert_eq!(matrix[[0, 1]], 8.0);
    }

    #[test]
    fn test_empty_gather() {
        let matrix = decode_rd3(&[], 0, 0).unwrap();
        assert_eq!(matrix.shape(), &[0, 0]);
    }

    #[test]
    fn test_huge_claimed_size_fails() {
        let err = decode_rd3(&[0u8; 4], 1_000_000, 1_000_000).unwrap_err();
        assert!(matches!(
            err,
            MogError::MalformedInput {
                kind: FileKind::Traces,
                ..
            }
        ));
        assert!(err.to_string().contains("got 2"));

        assert!(decode_rd3(&[0u8; 4], usize::MAX, 2).is_err());
    }
}
