//! The uniform response envelope returned by every request.

use std::fmt;

use serde_json::Value;

use crate::error::{DojoError, Result};

/// Status code recorded when no HTTP response was ever received (the
/// request failed at the transport layer before a status line existed).
pub const NO_RESPONSE: i32 = -1;

/// Container for all DefectDojo API outcomes, including errors.
///
/// Every request produces exactly one envelope; HTTP-level and transport
/// failures are reported through it rather than raised. Callers inspect
/// [`success`](Self::success) and [`message`](Self::message) instead of
/// matching on error types.
#[derive(Debug, Clone, PartialEq)]
pub struct DojoResponse {
    /// True only for recognized 2xx-class outcomes.
    pub success: bool,
    /// Human-readable summary of the outcome category.
    pub message: String,
    /// Raw HTTP status code, or [`NO_RESPONSE`] when the request never
    /// produced a response.
    pub response_code: i32,
    /// Decoded JSON body, raw response text, or an extracted id for
    /// created objects.
    pub data: Option<Value>,
}

impl DojoResponse {
    pub(crate) fn ok(response_code: i32, message: &str, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            response_code,
            data,
        }
    }

    pub(crate) fn failed(response_code: i32, message: &str, data: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            response_code,
            data,
        }
    }

    /// Envelope for a request that never reached the status line.
    pub(crate) fn transport(message: String) -> Self {
        Self {
            success: false,
            message,
            response_code: NO_RESPONSE,
            data: None,
        }
    }

    /// The id of the object this request created or fetched.
    ///
    /// Works for creation responses where the id was extracted from the
    /// `Location` header as well as for payloads carrying an `id` field.
    ///
    /// # Errors
    ///
    /// Returns [`DojoError::ObjectNotCreated`] when the envelope records a
    /// 400 rejection (there is no id to return; the serialized error
    /// payload is carried in the message), and [`DojoError::MissingId`]
    /// when the payload has no integer id.
    pub fn id(&self) -> Result<u64> {
        if self.response_code == 400 {
            return Err(DojoError::ObjectNotCreated(self.data_json_pretty()));
        }

        match &self.data {
            Some(Value::Number(n)) => n.as_u64().ok_or(DojoError::MissingId),
            Some(Value::Object(map)) => map
                .get("id")
                .and_then(Value::as_u64)
                .ok_or(DojoError::MissingId),
            _ => Err(DojoError::MissingId),
        }
    }

    /// Total record count of a list payload, if present.
    pub fn count(&self) -> Option<u64> {
        self.data.as_ref()?.get("count")?.as_u64()
    }

    /// The `results` array of a list payload, if present.
    pub fn results(&self) -> Option<&Vec<Value>> {
        self.data.as_ref()?.get("results")?.as_array()
    }

    /// Returns the payload as a JSON string (`"null"` when absent).
    pub fn data_json(&self) -> String {
        serde_json::to_string(&self.data).unwrap_or_default()
    }

    /// Returns the payload as a pretty-printed JSON string.
    pub fn data_json_pretty(&self) -> String {
        serde_json::to_string_pretty(&self.data).unwrap_or_default()
    }
}

impl fmt::Display for DojoResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => write!(f, "{data}"),
            None => write!(f, "{}", self.message),
        }
    }
}
