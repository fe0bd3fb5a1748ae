//! The result envelope returned by every public operation.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

/// Uniform envelope for every public operation.
///
/// Callers branch on `success`; `data` is only meaningful when `success` is
/// true. Failures carry a stable [`ErrorCode`] wire code and its default
/// message — never internal diagnostic detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable outcome description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Stable error code, set on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Operation payload, set on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ServiceResult<T> {
    /// Creates a successful result carrying `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            error_code: None,
            data: Some(data),
        }
    }

    /// Creates a successful result with an outcome message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error_code: None,
            data: Some(data),
        }
    }

    /// Creates a failed result from an error code.
    pub fn fail(code: ErrorCode) -> Self {
        Self {
            success: false,
            message: Some(code.message().to_string()),
            error_code: Some(code.code().to_string()),
            data: None,
        }
    }

    /// Returns whether the result carries a payload.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns whether the result failed with the given code.
    pub fn failed_with(&self, code: ErrorCode) -> bool {
        !self.success && self.error_code.as_deref() == Some(code.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_result() {
        let result = ServiceResult::ok(42);
        assert!(result.is_success());
        assert_eq!(result.data, Some(42));
        assert!(result.error_code.is_none());
    }

    #[test]
    fn test_fail_result() {
        let result = ServiceResult::<()>::fail(ErrorCode::ObjectNotFound);
        assert!(!result.is_success());
        assert!(result.failed_with(ErrorCode::ObjectNotFound));
        assert!(result.data.is_none());
        assert_eq!(result.error_code.as_deref(), Some("STR-002"));
    }

    #[test]
    fn test_envelope_wire_shape() {
        let ok = serde_json::to_value(ServiceResult::ok(1)).unwrap();
        assert_eq!(ok, serde_json::json!({"success": true, "data": 1}));

        let fail = serde_json::to_value(ServiceResult::<u8>::fail(ErrorCode::InvalidBucket)).unwrap();
        assert_eq!(fail["success"], serde_json::json!(false));
        assert_eq!(fail["errorCode"], serde_json::json!("STR-008"));
        assert!(fail.get("data").is_none());
    }
}
