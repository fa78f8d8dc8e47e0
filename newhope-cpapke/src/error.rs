use newhope_core::error::EncodingError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PkeError {
    /// The random source could not deliver a seed
    #[error("random source unavailable")]
    EntropyUnavailable(#[source] rand::Error),

    /// A public key, secret key or ciphertext failed to decode
    #[error("malformed {what}")]
    MalformedEncoding {
        what: &'static str,
        #[source]
        source: EncodingError,
    },
}

pub type Result<T> = std::result::Result<T, PkeError>;
