// src/errors.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Message used when a failure carries no text of its own.
pub const FALLBACK_MESSAGE: &str = "Failed to analyze skin";

/// Fixed message for a failed image-analysis upstream call.
pub const SKIN_ANALYSIS_FAILED: &str = "Skin analysis failed";

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    UpstreamError(String),

    #[error("Malformed upstream response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("{}", or_fallback(.0))]
    AnalysisFailed(String),
}

fn or_fallback(message: &str) -> &str {
    if message.is_empty() {
        FALLBACK_MESSAGE
    } else {
        message
    }
}

impl AnalyzeError {
    pub fn skin_analysis_failed() -> Self {
        AnalyzeError::UpstreamError(SKIN_ANALYSIS_FAILED.to_string())
    }
}

impl From<serde_json::Error> for AnalyzeError {
    fn from(e: serde_json::Error) -> Self {
        AnalyzeError::AnalysisFailed(e.to_string())
    }
}

impl From<reqwest::Error> for AnalyzeError {
    fn from(e: reqwest::Error) -> Self {
        AnalyzeError::AnalysisFailed(e.to_string())
    }
}

impl ResponseError for AnalyzeError {
    fn status_code(&self) -> StatusCode {
        match self {
            AnalyzeError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AnalyzeError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AnalyzeError::UpstreamError(_)
            | AnalyzeError::MalformedUpstreamResponse(_)
            | AnalyzeError::AnalysisFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("Analysis error: {}", self);
        } else {
            log::warn!("Rejected request ({}): {}", status.as_u16(), self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: AnalyzeError) -> (StatusCode, serde_json::Value) {
        let resp = err.error_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn unauthorized_maps_to_401_envelope() {
        let (status, body) = body_json(AnalyzeError::Unauthorized("Unauthorized".into())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Unauthorized");
    }

    #[actix_web::test]
    async fn upstream_failure_keeps_fixed_message() {
        let (status, body) = body_json(AnalyzeError::skin_analysis_failed()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Skin analysis failed");
    }

    #[test]
    fn empty_failure_message_uses_fallback() {
        assert_eq!(
            AnalyzeError::AnalysisFailed(String::new()).to_string(),
            FALLBACK_MESSAGE
        );
        assert_eq!(
            AnalyzeError::AnalysisFailed("model overloaded".into()).to_string(),
            "model overloaded"
        );
    }

    #[test]
    fn bad_request_is_client_error() {
        assert_eq!(
            AnalyzeError::BadRequest("No image provided".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
