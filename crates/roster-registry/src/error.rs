use std::fmt;

use roster_store::StoreError;
use roster_types::{EntityKind, TypeError};

/// What an authorization assertion was trying to permit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Create,
    Transfer,
    Disable,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Create => "creation",
            Self::Transfer => "transfers",
            Self::Disable => "disabling",
            Self::Delete => "deletion",
        })
    }
}

/// Coarse classification used by hosts to map errors to status codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Unauthorized,
    StorageFailure,
}

/// Errors produced by registry and query operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Wrong argument count, or an argument failed sanitation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The referenced entity is absent or its record does not decode.
    #[error("{kind} does not exist - {id}")]
    NotFound { kind: EntityKind, id: String },

    /// An entity with this id already exists.
    #[error("{kind} already exists - {id}")]
    AlreadyExists { kind: EntityKind, id: String },

    /// The asserted name does not authorize the action.
    #[error("the {authority} '{asserted}' cannot authorize {action} for {target} '{target_id}'")]
    Unauthorized {
        authority: EntityKind,
        asserted: String,
        action: Action,
        target: EntityKind,
        target_id: String,
    },

    /// The ledger rejected a read or write.
    #[error("storage failure: {0}")]
    StorageFailure(StoreError),

    /// An entity could not be encoded for storage.
    #[error("codec error: {0}")]
    Codec(#[from] TypeError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::StorageFailure(_) | Self::Codec(_) => ErrorKind::StorageFailure,
        }
    }

    pub(crate) fn not_found(kind: EntityKind, id: &str) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            // Malformed keys and ranges come straight from caller arguments.
            StoreError::InvalidKey { .. } | StoreError::InvalidRange { .. } => {
                Self::InvalidArgument(err.to_string())
            }
            other => Self::StorageFailure(other),
        }
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
