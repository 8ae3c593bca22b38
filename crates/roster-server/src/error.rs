use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use roster_chaincode::ChaincodeError;
use roster_registry::ErrorKind;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Chaincode(#[from] ChaincodeError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Chaincode(e) => match e.kind() {
                ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::AlreadyExists => StatusCode::CONFLICT,
                ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
                ErrorKind::StorageFailure => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use roster_registry::RegistryError;
    use roster_types::EntityKind;

    #[test]
    fn registry_kinds_map_to_statuses() {
        let not_found = ServerError::from(ChaincodeError::from(RegistryError::NotFound {
            kind: EntityKind::Domain,
            id: "d9".into(),
        }));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let unknown = ServerError::from(ChaincodeError::UnknownFunction("x".into()));
        assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

        assert_eq!(
            ServerError::Internal("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
