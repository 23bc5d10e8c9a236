use thiserror::Error;

use crate::formats::FileKind;

/// Error type for gather decoding and travel-time calibration.
#[derive(Error, Debug, Clone, PartialEq, uniffi::Error)]
#[uniffi(flat_error)]
pub enum MogError {
    #[error("cannot open {kind} file '{detail}...'")]
    FileNotFound { kind: FileKind, detail: String },

    #[error("malformed {kind} input: {message}")]
    MalformedInput { kind: FileKind, message: String },

    #[error("{0}")]
    Configuration(String),

    #[error("{0} not yet supported")]
    UnsupportedFormat(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl MogError {
    pub(crate) fn malformed(kind: FileKind, message: impl Into<String>) -> Self {
        MogError::MalformedInput {
            kind,
            message: message.into(),
        }
    }

    /// The error raised when air-shot calibration cannot produce a time-zero.
    pub fn missing_air_shots() -> Self {
        MogError::Configuration(
            "t0 correction not applied; pick t0 before and t0 after for correction".to_string(),
        )
    }

    pub fn is_file_not_found(&self) -> bool {
        matches!(self, MogError::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mog_error_display() {
        let err = MogError::FileNotFound {
            kind: FileKind::Header,
            detail: "No such file or directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "cannot open RAD file 'No such file or directory...'"
        );

        let err = MogError::malformed(FileKind::Traces, "expected 12 samples, got 7");
        assert_eq!(
            err.to_string(),
            "malformed RD3 input: expected 12 samples, got 7"
        );

        let err = MogError::UnsupportedFormat("walkaway air shots".to_string());
        assert_eq!(err.to_string(), "walkaway air shots not yet supported");

        assert!(MogError::missing_air_shots()
            .to_string()
            .starts_with("t0 correction not applied"));
    }

    #[test]
    fn test_is_file_not_found() {
        let err = MogError::FileNotFound {
            kind: FileKind::Geometry,
            detail: String::new(),
        };
        assert!(err.is_file_not_found());
        assert!(!MogError::Configuration("x".to_string()).is_file_not_found());
    }
}
