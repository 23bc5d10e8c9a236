//! RAMAC trace geometry (`.tlf`) decoding.
//!
//! After one header line, each row describes a range of traces recorded with
//! a fixed transmitter while the receiver moved linearly:
//!
//! ```text
//! first_trace  last_trace  rx_first_depth  rx_last_depth  tx_depth
//! ```

use crate::config::CoreConfig;
use crate::error::MogError;
use crate::formats::lexer::decimals;
use crate::formats::{read_text_with_fallback, FileKind};

/// Per-trace depths, concatenated over all rows in file order.
///
/// The length follows the table, not the header's trace count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TlfGeometry {
    pub tx_z: Vec<f64>,
    pub rx_z: Vec<f64>,
}

/// Locate and decode the geometry file for `basename`.
pub fn read_tlf(basename: &str, config: &CoreConfig) -> Result<TlfGeometry, MogError> {
    let (path, text) = read_text_with_fallback(basename, FileKind::Geometry, config)?;
    let geometry = parse_tlf(&text)?;
    tracing::debug!("{}: {} trace positions", path.display(), geometry.rx_z.len());
    Ok(geometry)
}

pub fn parse_tlf(text: &str) -> Result<TlfGeometry, MogError> {
    let mut geometry = TlfGeometry::default();

    for (lineno, line) in text.lines().enumerate().skip(1) {
        if line.trim().is_empty() {
            continue;
        }
        let fields = decimals(line);
        if fields.len() < 5 {
            return Err(MogError::malformed(
                FileKind::Geometry,
                format!("line {}: expected 5 numbers, found {}", lineno + 1, fields.len()),
            ));
        }

        let first_trace = trace_index(fields[0], lineno)?;
        let last_trace = trace_index(fields[1], lineno)?;
        let mut rx_first = depth(fields[2], lineno)?;
        let rx_last = depth(fields[3], lineno)?;
        let tx = depth(fields[4], lineno)?;

        let span = last_trace - first_trace + 1;
        if span <= 0 {
            tracing::debug!("line {}: empty trace range {first_trace}..{last_trace}", lineno + 1);
            continue;
        }

        if span == 1 {
            if rx_first > rx_last {
                rx_first = rx_last;
            }
            geometry.rx_z.push(rx_first);
        } else {
            let step = (rx_last - rx_first) / (span - 1) as f64;
            geometry
                .rx_z
                .extend((0..span).map(|i| rx_first + step * i as f64));
        }
        geometry
            .tx_z
            .extend(std::iter::repeat(tx).take(span as usize));
    }

    Ok(geometry)
}

fn trace_index(token: &str, lineno: usize) -> Result<i64, MogError> {
    token.parse().map_err(|_| {
        MogError::malformed(
            FileKind::Geometry,
            format!("line {}: trace index '{token}' is not an integer", lineno + 1),
        )
    })
}

fn depth(token: &str, lineno: usize) -> Result<f64, MogError> {
    token.parse().map_err(|_| {
        MogError::malformed(
            FileKind::Geometry,
            format!("line {}: '{token}' is not a number", lineno + 1),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ranges() {
        let text = "Trace no   Rx from   Rx to   Tx\n\
                    1 5 1.0 3.0 10.0\n\
                    6 8 4.0 3.0 12.5\n";
        let geometry = parse_tlf(text).unwrap();

        assert_eq!(geometry.rx_z, vec![1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 3.5, 3.0]);
        assert_eq!(
            geometry.tx_z,
            vec![10.0, 10.0, 10.0, 10.0, 10.0, 12.5, 12.5, 12.5]
        );
    }

    #[test]
    fn test_span_greater_than_one_is_monotonic() {
        let geometry = parse_tlf("hdr\n10 19 0.3 7.1 2.0\n").unwrap();
        assert_eq!(geometry.rx_z.len(), 10);
        assert_eq!(geometry.rx_z[0], 0.3);
        assert!((geometry.rx_z[9] - 7.1).abs() < 1e-12);
        assert!(geometry.rx_z.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_single_trace_takes_lesser_bound() {
        let geometry = parse_tlf("hdr\n3 3 5.0 2.0 1.0\n4 4 1.0 6.0 1.0\n").unwrap();
        assert_eq!(geometry.rx_z, vec![2.0, 1.0]);
        assert_eq!(geometry.tx_z, vec![1.0, 1.0]);
    }

    #[test]
    fn test_empty_range_contributes_nothing() {
        let geometry = parse_tlf("hdr\n5 4 1.0 2.0 3.0\n1 1 0.5 0.5 0.5\n").unwrap();
        assert_eq!(geometry.rx_z, vec![0.5]);
        assert_eq!(geometry.tx_z, vec![0.5]);
    }

    #[test]
    fn test_header_only_and_blank_lines() {
        assert_eq!(parse_tlf("hdr\n").unwrap(), TlfGeometry::default());
        assert_eq!(parse_tlf("hdr\n\n   \n").unwrap(), TlfGeometry::default());
        assert_eq!(parse_tlf("").unwrap(), TlfGeometry::default());
    }

    #[test]
    fn test_short_row_fails() {
        let err = parse_tlf("hdr\n1 5 1.0 3.0\n").unwrap_err();
        assert!(matches!(
            err,
            MogError::MalformedInput {
                kind: FileKind::Geometry,
                ..
            }
        ));
    }

    #[test]
    fn test_fractional_trace_index_fails() {
        assert!(parse_tlf("hdr\n1.5 5 1.0 3.0 2.0\n").is_err());
    }
}
