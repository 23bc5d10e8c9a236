//! RAMAC header (`.rad`) decoding.
//!
//! Only the keywords below are interpreted; every other line is ignored and
//! a missing keyword leaves its field at the default (0 or empty).

use crate::config::CoreConfig;
use crate::error::MogError;
use crate::formats::lexer::{first_decimal, first_unsigned};
use crate::formats::{read_text_with_fallback, FileKind};

const SAMPLES: &str = "SAMPLES:";
const FREQUENCY: &str = "FREQUENCY:";
const OPERATOR: &str = "OPERATOR:";
const ANTENNAS: &str = "ANTENNAS:";
const LAST_TRACE: &str = "LAST TRACE";

/// Operator tags written by modelling software instead of a field crew.
const SYNTHETIC_OPERATORS: [&str; 2] = ["MoRad", "syntetic"];

const FIELD_ANTENNA_SUFFIX: &str = "  - Ramac";

/// Survey parameters read from a header file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadHeader {
    pub samples_per_trace: usize,
    /// The raw `FREQUENCY:` field (MHz sampling frequency).
    pub frequency: f64,
    /// `1000 / frequency`, in ns.
    pub sample_interval: f64,
    pub times: Vec<f64>,
    pub synthetic: bool,
    /// Nominal antenna frequency (MHz), the first number of the antenna line.
    pub nominal_frequency: f64,
    pub antennas: String,
    pub trace_count: usize,
}

/// Locate and decode the header file for `basename`.
pub fn read_rad(basename: &str, config: &CoreConfig) -> Result<RadHeader, MogError> {
    let (path, text) = read_text_with_fallback(basename, FileKind::Header, config)?;
    let header = parse_rad(&text, config)?;
    tracing::debug!(
        "{}: {} traces of {} samples, dt = {} ns, antenna {} MHz, synthetic = {}",
        path.display(),
        header.trace_count,
        header.samples_per_trace,
        header.sample_interval,
        header.nominal_frequency,
        header.synthetic
    );
    Ok(header)
}

/// Decode header text.
///
/// Fails when a recognised keyword carries no number, when the sampling
/// frequency is missing, zero or negative, or when the declared sizes exceed
/// the limits in `config`.
pub fn parse_rad(text: &str, config: &CoreConfig) -> Result<RadHeader, MogError> {
    let mut header = RadHeader::default();

    for line in text.lines() {
        if line.contains(SAMPLES) {
            header.samples_per_trace = unsigned_field(line, SAMPLES)?;
        } else if line.contains(FREQUENCY) {
            header.frequency = decimal_field(line, FREQUENCY)?;
        } else if line.contains(OPERATOR) {
            header.synthetic = SYNTHETIC_OPERATORS.iter().any(|tag| line.contains(tag));
        } else if line.contains(ANTENNAS) {
            let (_, digits) = first_unsigned(line).ok_or_else(|| missing_number(ANTENNAS, line))?;
            header.nominal_frequency = digits
                .parse()
                .map_err(|_| missing_number(ANTENNAS, line))?;
            header.antennas = line.chars().skip(ANTENNAS.len()).collect();
        } else if line.contains(LAST_TRACE) {
            header.trace_count = unsigned_field(line, LAST_TRACE)?;
        }
    }

    check_limit(SAMPLES, header.samples_per_trace, config.max_samples_per_trace)?;
    check_limit(LAST_TRACE, header.trace_count, config.max_trace_count)?;

    if !(header.frequency.is_finite() && header.frequency > 0.0) {
        return Err(MogError::malformed(
            FileKind::Header,
            format!("sampling frequency must be positive, got {}", header.frequency),
        ));
    }
    header.sample_interval = 1000.0 / header.frequency;
    header.times = (0..header.samples_per_trace)
        .map(|k| header.sample_interval * k as f64)
        .collect();

    if !header.synthetic {
        header.antennas.push_str(FIELD_ANTENNA_SUFFIX);
    }

    Ok(header)
}

fn check_limit(keyword: &str, value: usize, limit: usize) -> Result<(), MogError> {
    if value > limit {
        return Err(MogError::malformed(
            FileKind::Header,
            format!("{keyword} {value} exceeds the limit of {limit}"),
        ));
    }
    Ok(())
}

fn unsigned_field(line: &str, keyword: &str) -> Result<usize, MogError> {
    first_unsigned(line)
        .and_then(|(_, digits)| digits.parse().ok())
        .ok_or_else(|| missing_number(keyword, line))
}

fn decimal_field(line: &str, keyword: &str) -> Result<f64, MogError> {
    first_decimal(line)
        .and_then(|tok| tok.parse().ok())
        .ok_or_else(|| missing_number(keyword, line))
}

fn missing_number(keyword: &str, line: &str) -> MogError {
    MogError::malformed(
        FileKind::Header,
        format!("no number after {keyword} in '{}'", line.trim()),
    )
}
