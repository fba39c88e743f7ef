//! Response classification
//!
//! Decides whether a received response is a success. A transport-level
//! success can still be an application failure: the bridge API answers
//! HTTP 200 with `{"code": 1001, "message": "..."}` when it rejects a call.

use super::error::RequestError;
use super::transport::RawResponse;
use serde_json::Value;

/// Payload `code` that marks success
pub const OK_CODE: i64 = 0;

const DEFAULT_BUSINESS_MESSAGE: &str = "Business error occurred";

pub trait ResponseClassifier: Send + Sync {
    fn classify(&self, response: &RawResponse) -> Result<Value, RequestError>;
}

/// Status-code classification plus the `code` sentinel in 2xx bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct BusinessCodeClassifier;

impl ResponseClassifier for BusinessCodeClassifier {
    fn classify(&self, response: &RawResponse) -> Result<Value, RequestError> {
        if !response.is_success() {
            return Err(RequestError::http(response.status, &response.body));
        }

        let body: Value = if response.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&response.body)
                .map_err(|e| RequestError::decode(response.status, e.to_string()))?
        };

        if let Some(code) = body.get("code").and_then(business_code) {
            if code != OK_CODE {
                let message = body
                    .get("message")
                    .and_then(Value::as_str)
                    .filter(|m| !m.is_empty())
                    .unwrap_or(DEFAULT_BUSINESS_MESSAGE);
                return Err(RequestError::Business {
                    code,
                    message: message.to_string(),
                    status: response.status,
                });
            }
        }

        Ok(body)
    }
}

/// Numeric `code` of a payload, or `None` if it is absent or not a number
///
/// Integers beyond `i64` saturate. Fractional codes round away from zero so
/// that a non-zero value never reads as [`OK_CODE`].
fn business_code(code: &Value) -> Option<i64> {
    let Value::Number(number) = code else {
        return None;
    };
    if let Some(code) = number.as_i64() {
        return Some(code);
    }
    if number.as_u64().is_some() {
        return Some(i64::MAX);
    }
    let code = number.as_f64()?;
    if code == 0.0 {
        return Some(OK_CODE);
    }
    // `as` saturates at the i64 bounds
    Some((code.signum() * code.abs().ceil()) as i64)
}

/// Status-code classification only; any 2xx JSON body is a success
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusClassifier;

impl ResponseClassifier for StatusClassifier {
    fn classify(&self, response: &RawResponse) -> Result<Value, RequestError> {
        if !response.is_success() {
            return Err(RequestError::http(response.status, &response.body));
        }
        if response.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body)
            .map_err(|e| RequestError::decode(response.status, e.to_string()))
    }
}
