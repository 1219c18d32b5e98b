//! Input and configuration errors.
//!
//! The sorting engines cannot fail; everything that can go wrong happens while
//! turning user input into a run configuration.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A token in `--values` is not a non-negative integer
    #[error("invalid value {token:?} at position {position}: expected a non-negative integer")]
    InvalidValue { token: String, position: usize },

    /// `--values` was given but contained nothing
    #[error("value list is empty")]
    EmptyValues,

    /// Requested array size is outside the supported range
    #[error("size {size} is out of range ({min}..={max})")]
    SizeOutOfRange { size: usize, min: usize, max: usize },

    /// Random values need a positive upper bound
    #[error("max value must be at least 1")]
    ZeroMaxValue,

    /// `--silent` only makes sense together with `--json`
    #[error("--silent can only be used with --json. Use --silent --json together.")]
    SilentWithoutJson,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::SizeOutOfRange {
            size: 0,
            min: 1,
            max: 512,
        };
        assert_eq!(err.to_string(), "size 0 is out of range (1..=512)");

        let err = ConfigError::InvalidValue {
            token: "x".into(),
            position: 2,
        };
        assert!(err.to_string().contains("\"x\" at position 2"));
    }

    #[test]
    fn test_converts_into_anyhow() {
        let err: anyhow::Error = ConfigError::ZeroMaxValue.into();
        assert!(err.downcast_ref::<ConfigError>().is_some());
    }
}
