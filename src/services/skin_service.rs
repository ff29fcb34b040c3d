// src/services/skin_service.rs
use crate::errors::AnalyzeError;
use crate::models::{ImageUpload, SkinMetrics};
use reqwest::Client;
use reqwest::multipart::{Form, Part};

/// Client for the skin analysis API. Every call carries the caller's ID token.
pub struct SkinAnalysisService {
    base_url: String,
    client: Client,
}

impl SkinAnalysisService {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Metrics for today's photo. Any failure here fails the whole analysis.
    pub async fn analyze(
        &self,
        id_token: &str,
        upload: &ImageUpload,
        mime: &str,
    ) -> Result<SkinMetrics, AnalyzeError> {
        let part = Part::stream(upload.data.clone())
            .file_name(upload.filename.clone())
            .mime_str(mime)
            .map_err(|e| AnalyzeError::AnalysisFailed(format!("Invalid image type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/analyze/", self.base_url))
            .bearer_auth(id_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                log::error!("Skin analysis request failed: {}", e);
                AnalyzeError::skin_analysis_failed()
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::error!("Skin analysis returned {}: {}", status, body);
            return Err(AnalyzeError::skin_analysis_failed());
        }

        let metrics: SkinMetrics = response.json().await.map_err(|e| {
            AnalyzeError::MalformedUpstreamResponse(format!("skin analysis body: {}", e))
        })?;

        metrics
            .validate()
            .map_err(|e| AnalyzeError::MalformedUpstreamResponse(format!("skin analysis: {}", e)))?;

        Ok(metrics)
    }

    /// The caller's previous-day record, if the service has a usable one.
    pub async fn yesterday(&self, id_token: &str) -> Option<SkinMetrics> {
        let response = match self
            .client
            .get(format!("{}/yesterday/", self.base_url))
            .bearer_auth(id_token)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Yesterday lookup failed, continuing without history: {}", e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::info!("No yesterday record (status {})", status);
            return None;
        }

        let metrics: SkinMetrics = match response.json().await {
            Ok(metrics) => metrics,
            Err(e) => {
                log::warn!("Ignoring undecodable yesterday record: {}", e);
                return None;
            }
        };

        if let Err(e) = metrics.validate() {
            log::warn!("Ignoring invalid yesterday record: {}", e);
            return None;
        }

        Some(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upload() -> ImageUpload {
        ImageUpload {
            filename: "skin-analysis.jpg".into(),
            content_type: Some("image/jpeg".into()),
            data: Bytes::from_static(&[0xFF, 0xD8, 0xFF, 0xE0]),
        }
    }

    #[tokio::test]
    async fn analyze_forwards_token_and_decodes_metrics() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze/"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "file": "a.jpg",
                "acne": {"class": "mild"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let service = SkinAnalysisService::new(&format!("{}/", server.uri()), Client::new());
        let metrics = service.analyze("tok", &upload(), "image/jpeg").await.unwrap();
        assert_eq!(metrics.file.as_deref(), Some("a.jpg"));
        assert_eq!(metrics.acne.unwrap().class, "mild");
    }

    #[tokio::test]
    async fn analyze_non_success_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let service = SkinAnalysisService::new(&server.uri(), Client::new());
        let err = service.analyze("tok", &upload(), "image/jpeg").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::UpstreamError(_)));
        assert_eq!(err.to_string(), "Skin analysis failed");
    }

    #[tokio::test]
    async fn analyze_without_file_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"acne": null})))
            .mount(&server)
            .await;

        let service = SkinAnalysisService::new(&server.uri(), Client::new());
        let err = service.analyze("tok", &upload(), "image/jpeg").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::MalformedUpstreamResponse(_)));
    }

    #[tokio::test]
    async fn analyze_times_out_as_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"file": "a.jpg"}))
                    .set_delay(std::time::Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let service = SkinAnalysisService::new(&server.uri(), client);
        let err = service.analyze("tok", &upload(), "image/jpeg").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::UpstreamError(_)));
    }

    #[tokio::test]
    async fn yesterday_missing_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/yesterday/"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let service = SkinAnalysisService::new(&server.uri(), Client::new());
        assert!(service.yesterday("tok").await.is_none());
    }

    #[tokio::test]
    async fn yesterday_times_out_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/yesterday/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"file": "y.jpg"}))
                    .set_delay(std::time::Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let service = SkinAnalysisService::new(&server.uri(), client);
        assert!(service.yesterday("tok").await.is_none());
    }

    #[tokio::test]
    async fn yesterday_garbage_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/yesterday/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let service = SkinAnalysisService::new(&server.uri(), Client::new());
        assert!(service.yesterday("tok").await.is_none());
    }

    #[tokio::test]
    async fn yesterday_record_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/yesterday/"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"file": "y.jpg"})))
            .mount(&server)
            .await;

        let service = SkinAnalysisService::new(&server.uri(), Client::new());
        let metrics = service.yesterday("tok").await.unwrap();
        assert_eq!(metrics.file.as_deref(), Some("y.jpg"));
    }
}
