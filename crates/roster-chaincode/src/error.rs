use roster_registry::{ErrorKind, RegistryError};
use roster_store::StoreError;
use thiserror::Error;

use crate::operation::Arity;

#[derive(Debug, Error)]
pub enum ChaincodeError {
    #[error("received unknown invoke function name - '{0}'")]
    UnknownFunction(String),

    #[error("incorrect number of arguments for {operation}: expecting {expected}, got {got}")]
    Arity {
        operation: &'static str,
        expected: Arity,
        got: usize,
    },

    #[error("expecting a numeric string argument to init, got '{0}'")]
    NonNumericInit(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("ledger transaction failed: {0}")]
    Ledger(#[from] StoreError),

    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ChaincodeError {
    /// Classification used to pick an HTTP status.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownFunction(_) | Self::Arity { .. } | Self::NonNumericInit(_) => {
                ErrorKind::InvalidArgument
            }
            Self::Registry(e) => e.kind(),
            Self::Ledger(_) | Self::Encode(_) => ErrorKind::StorageFailure,
        }
    }
}

pub type ChaincodeResult<T> = Result<T, ChaincodeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use roster_types::EntityKind;

    #[test]
    fn unknown_function_names_it() {
        let err = ChaincodeError::UnknownFunction("transfer".into());
        assert!(err.to_string().contains("'transfer'"));
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn registry_errors_keep_their_kind_and_message() {
        let inner = RegistryError::AlreadyExists {
            kind: EntityKind::Employee,
            id: "e1".into(),
        };
        let message = inner.to_string();
        let err = ChaincodeError::from(inner);
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn arity_message() {
        let err = ChaincodeError::Arity {
            operation: "set_domain",
            expected: Arity::Exactly(3),
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "incorrect number of arguments for set_domain: expecting 3, got 1"
        );
    }
}
