use serde::{Deserialize, Serialize};

use crate::error::ChaincodeResult;

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

/// Outcome of one invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    Success { payload: Option<Vec<u8>> },
    Error { message: String },
}

impl Response {
    pub fn ok() -> Self {
        Self::Success { payload: None }
    }

    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self::Success {
            payload: Some(payload),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Success { .. } => STATUS_OK,
            Self::Error { .. } => STATUS_ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Success { payload } => payload.as_deref(),
            Self::Error { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Error { message } => Some(message),
        }
    }

    /// JSON form used by the HTTP host and the CLI's `--format json`.
    pub fn to_wire(&self) -> WireResponse {
        WireResponse {
            status: self.status(),
            payload: self.payload().map(wire_payload),
            message: self.message().map(str::to_string),
        }
    }
}

impl From<ChaincodeResult<Option<Vec<u8>>>> for Response {
    fn from(result: ChaincodeResult<Option<Vec<u8>>>) -> Self {
        match result {
            Ok(payload) => Self::Success { payload },
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Serializable view of a [`Response`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload bytes as JSON when they parse, otherwise as a string.
pub fn wire_payload(bytes: &[u8]) -> serde_json::Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| {
        serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChaincodeError;

    #[test]
    fn status_codes() {
        assert_eq!(Response::ok().status(), 200);
        assert_eq!(Response::error("boom").status(), 500);
    }

    #[test]
    fn from_result() {
        let ok: Response = Ok(Some(b"[]".to_vec())).into();
        assert_eq!(ok.payload(), Some(&b"[]"[..]));

        let err: Response = Err(ChaincodeError::UnknownFunction("nope".into())).into();
        assert!(!err.is_success());
        assert!(err.message().unwrap().contains("nope"));
    }

    #[test]
    fn wire_form() {
        let wire = Response::with_payload(br#"{"a":1}"#.to_vec()).to_wire();
        let json = serde_json::to_value(wire).unwrap();
        assert_eq!(json, serde_json::json!({"status": 200, "payload": {"a": 1}}));

        let wire = Response::with_payload(b"test".to_vec()).to_wire();
        let json = serde_json::to_value(wire).unwrap();
        assert_eq!(json["payload"], "test");

        let json = serde_json::to_value(Response::error("bad").to_wire()).unwrap();
        assert_eq!(json, serde_json::json!({"status": 500, "message": "bad"}));
    }
}
