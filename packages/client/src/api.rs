//! Response envelopes returned by the schedule backend

use serde::Deserialize;

/// Standard API error body
#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiError {
    /// Most specific human readable text the body carries
    pub fn reason(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_prefers_message() {
        let body: ApiError =
            serde_json::from_str(r#"{"error":"Bad Request","message":"Unknown task"}"#).unwrap();
        assert_eq!(body.reason(), Some("Unknown task"));

        let body: ApiError = serde_json::from_str(r#"{"error":"Forbidden"}"#).unwrap();
        assert_eq!(body.reason(), Some("Forbidden"));

        let body: ApiError = serde_json::from_str(r#"{"message":"  "}"#).unwrap();
        assert_eq!(body.reason(), None);
    }
}
