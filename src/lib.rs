// src/lib.rs
use actix_web::web;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod sections;
pub mod services;

use crate::config::Config;
use crate::errors::AnalyzeError;
use crate::handlers::{analyze_skin, health_check, split_sections};
use crate::services::{ChatModel, HuggingFaceChat, ImageProcessor, SkinAnalysisService};

#[derive(Clone)]
pub struct AppState {
    pub skin_service: Arc<SkinAnalysisService>,
    pub llm_service: Arc<dyn ChatModel>,
    pub image_processor: Arc<ImageProcessor>,
}

impl AppState {
    /// Wires the outbound clients. All of them share one connection pool and
    /// the configured per-call timeout.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()?;

        Ok(Self {
            skin_service: Arc::new(SkinAnalysisService::new(
                &config.skin_analysis_api_url,
                client.clone(),
            )),
            llm_service: Arc::new(HuggingFaceChat::new(
                config.huggingface_api_key.clone(),
                &config.huggingface_base_url,
                config.chat_model.clone(),
                config.chat_max_tokens,
                config.chat_temperature,
                client,
            )),
            image_processor: Arc::new(ImageProcessor::new()),
        })
    }
}

/// Registers every route on `cfg`. Shared by the binary and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AnalyzeError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/analyze", web::post().to(analyze_skin))
            .route("/sections", web::post().to(split_sections)),
    )
    .route("/health", web::get().to(health_check));
}
