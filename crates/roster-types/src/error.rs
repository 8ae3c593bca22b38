use thiserror::Error;

/// Errors produced by entity encoding and decoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("failed to encode {kind}: {reason}")]
    Encode { kind: &'static str, reason: String },

    #[error("failed to decode {kind}: {reason}")]
    Decode { kind: &'static str, reason: String },

    #[error("invalid transaction id: {0}")]
    InvalidTxId(String),
}

pub type TypeResult<T> = Result<T, TypeError>;
