use axum::{http::StatusCode, Json};
use serde::Serialize;

/// Envelope shared by every success response: `{success, message, data?}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub fn ok<T: Serialize>(message: impl Into<String>, data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        message: message.into(),
        data: Some(data),
    })
}

pub fn created<T: Serialize>(
    message: impl Into<String>,
    data: T,
) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(message, data))
}

/// Success response with no payload (e.g. logout, delete).
pub fn ok_message(message: impl Into<String>) -> Json<Envelope<()>> {
    Json(Envelope {
        success: true,
        message: message.into(),
        data: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_serializes_success_and_data() {
        let Json(body) = ok("done", serde_json::json!({"id": 1}));
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"message\":\"done\""));
        assert!(json.contains("\"id\":1"));
    }

    #[test]
    fn empty_envelope_omits_data() {
        let Json(body) = ok_message("Logged out successfully (clear token on client)");
        let json = serde_json::to_string(&body).unwrap();
        assert!(!json.contains("\"data\""));
    }
}
