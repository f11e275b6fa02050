// THEORY:
// Only two things in this crate can go wrong: a stored string that does not
// decode, and a caller-built palette that breaks the reference table rules.
// Classification and aggregation are total by construction and never return
// an error. The async worker pool adds one more failure mode (the pool went
// away while a task was in flight).

use thiserror::Error;

/// Why a stored string was rejected by the decoder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("length {len} is not a multiple of {width}")]
    InvalidLength { len: usize, width: usize },

    #[error("length {len} does not match the expected {expected}")]
    ExpectedLength { len: usize, expected: usize },

    #[error("invalid digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },

    #[error("ordinal {value} at position {position} is out of range")]
    OrdinalOutOfRange { position: usize, value: u8 },

    #[error("{colors} colors but {luminance} luminance values")]
    LengthMismatch { colors: usize, luminance: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PerceptionError {
    /// A stored encoding could not be decoded. The whole string is rejected.
    #[error("Malformed {field} encoding: {reason}")]
    MalformedEncoding {
        field: &'static str,
        reason: MalformedReason,
    },

    #[error("Reference palette is empty")]
    EmptyPalette,

    #[error("Duplicate reference color #{:02X}{:02X}{:02X}", .0[0], .0[1], .0[2])]
    DuplicateReference([u8; 3]),

    #[error("Worker pool error: {0}")]
    WorkerPool(String),
}

impl PerceptionError {
    pub(crate) fn malformed(field: &'static str, reason: MalformedReason) -> Self {
        PerceptionError::MalformedEncoding { field, reason }
    }
}

pub type Result<T> = std::result::Result<T, PerceptionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_encoding_display() {
        let error = PerceptionError::malformed(
            "luminance",
            MalformedReason::InvalidLength { len: 3, width: 2 },
        );
        assert_eq!(
            error.to_string(),
            "Malformed luminance encoding: length 3 is not a multiple of 2"
        );
    }

    #[test]
    fn duplicate_reference_display() {
        let error = PerceptionError::DuplicateReference([0xA1, 0x88, 0x7F]);
        assert_eq!(error.to_string(), "Duplicate reference color #A1887F");
    }
}
