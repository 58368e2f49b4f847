use serde::{Deserialize, Serialize};

/// Uniform JSON body returned by every route.
///
/// Success responses carry a message and, for operations that produce a
/// payload, the payload under `data`. Error responses only carry `message`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonResult {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonResult {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    /// Wrap an already encoded payload
    pub fn with_data(message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }

    /// Encode `payload` and wrap it. Fails only if the payload cannot be
    /// represented as JSON (e.g. a map with non-string keys).
    pub fn encode<T: Serialize>(
        message: impl Into<String>,
        payload: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::with_data(message, serde_json::to_value(payload)?))
    }
}
