use thiserror::Error;

/// Failures when turning bytes back into ring elements
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("expected {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("coefficient {index} decodes to {value}, outside [0, {q})")]
    CoefficientOutOfRange { index: usize, value: u16, q: u16 },
}

pub type Result<T> = std::result::Result<T, EncodingError>;
