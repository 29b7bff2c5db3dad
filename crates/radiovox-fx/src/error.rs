//! Error types for the effect chain.

use thiserror::Error;

/// Result type for effect chain operations.
pub type FxResult<T> = Result<T, FxError>;

/// Errors raised by the effect chain.
///
/// Configuration problems are caught when an engine is built, DSP faults when a
/// stage produces a non-finite sample, and input problems when a buffer is
/// handed to `process`.
#[derive(Debug, Error)]
pub enum FxError {
    /// Invalid static parameter.
    #[error("invalid parameter '{name}': {message}")]
    Configuration {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Unrecognized urgency token.
    #[error("unknown urgency level '{token}' (expected low, medium, or high)")]
    UnknownUrgency {
        /// The rejected token.
        token: String,
    },

    /// Malformed parameter document.
    #[error("failed to parse effect parameters: {0}")]
    ParamsJson(#[from] serde_json::Error),

    /// A filter stage produced NaN or infinity.
    #[error("{stage} produced a non-finite sample at index {index}")]
    Dsp {
        /// Name of the stage that failed.
        stage: &'static str,
        /// Index of the first offending sample.
        index: usize,
    },

    /// The buffer handed to the engine cannot be processed.
    #[error("invalid input: {message}")]
    Input {
        /// Error message.
        message: String,
    },
}

/// Broad error classes, one per failure domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Static configuration rejected at construction.
    Configuration,
    /// Non-finite samples detected after a filter stage.
    Dsp,
    /// Caller-supplied buffer rejected.
    Input,
}

impl FxError {
    /// Creates a configuration error.
    pub fn config(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an input error.
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    /// Returns the broad class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FxError::Configuration { .. }
            | FxError::UnknownUrgency { .. }
            | FxError::ParamsJson(_) => ErrorKind::Configuration,
            FxError::Dsp { .. } => ErrorKind::Dsp,
            FxError::Input { .. } => ErrorKind::Input,
        }
    }

    /// Returns a stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            FxError::Configuration { .. } => "RVX_001",
            FxError::UnknownUrgency { .. } => "RVX_002",
            FxError::ParamsJson(_) => "RVX_003",
            FxError::Dsp { .. } => "RVX_010",
            FxError::Input { .. } => "RVX_020",
        }
    }

    /// Returns the error category name.
    pub fn category(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Dsp => "dsp",
            ErrorKind::Input => "input",
        }
    }
}

/// Fails with a DSP error if any sample is NaN or infinite.
pub fn ensure_finite(samples: &[f64], stage: &'static str) -> FxResult<()> {
    match samples.iter().position(|s| !s.is_finite()) {
        Some(index) => Err(FxError::Dsp { stage, index }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_helper() {
        let err = FxError::config("eq.low_cutoff", "must be below Nyquist");
        assert!(err.to_string().contains("eq.low_cutoff"));
        assert!(err.to_string().contains("below Nyquist"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_unknown_urgency_is_configuration() {
        let err = FxError::UnknownUrgency {
            token: "critical".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.code(), "RVX_002");
        assert!(err.to_string().contains("critical"));
    }

    #[test]
    fn test_ensure_finite_reports_first_bad_index() {
        let samples = [0.0, 0.5, f64::NAN, f64::INFINITY];
        match ensure_finite(&samples, "resonance") {
            Err(FxError::Dsp { stage, index }) => {
                assert_eq!(stage, "resonance");
                assert_eq!(index, 2);
            }
            other => panic!("expected DSP error, got {:?}", other),
        }
    }

    #[test]
    fn test_ensure_finite_accepts_clean_buffer() {
        assert!(ensure_finite(&[0.0, -1.0, 1.0], "eq").is_ok());
        assert!(ensure_finite(&[], "eq").is_ok());
    }

    #[test]
    fn test_categories() {
        assert_eq!(FxError::input("empty").category(), "input");
        assert_eq!(
            FxError::Dsp {
                stage: "eq",
                index: 0
            }
            .category(),
            "dsp"
        );
    }
}
