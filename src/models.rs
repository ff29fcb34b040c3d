// src/models.rs
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-image metrics produced by the skin analysis service.
///
/// Fields this service does not interpret are kept in `extra` so the payload
/// reaches the client unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkinMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_brightest_regions: Option<Vec<BrightRegion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acne: Option<AcneMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blackspot: Option<BlackspotMetrics>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrightRegion {
    pub region: String,
    pub brightness: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcneMetrics {
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackspotMetrics {
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub darkness_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_ratio: Option<f64>,
}

impl SkinMetrics {
    /// Checks the fields the prompt relies on. Returns a description of the
    /// first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.file.as_deref().is_none_or(str::is_empty) {
            return Err("missing `file`".to_string());
        }
        if let Some(acne) = &self.acne {
            if acne.redness.is_some() && acne.coverage.is_none() {
                return Err("`acne.redness` present without `acne.coverage`".to_string());
            }
        }
        if let Some(bs) = &self.blackspot {
            if bs.darkness_level.is_some() && bs.coverage_ratio.is_none() {
                return Err(
                    "`blackspot.darkness_level` present without `blackspot.coverage_ratio`"
                        .to_string(),
                );
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifestyleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wake_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<Weather>,
    /// Capture date sent by the client; not used when building the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weather {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
}

/// Image part pulled out of the inbound multipart body.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub image: String,
    pub skin_data: SkinMetrics,
    pub yesterday_data: Option<SkinMetrics>,
    pub ai_analysis: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Deserialize)]
pub struct SectionsRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SectionsResponse {
    pub success: bool,
    pub sections: Vec<ParsedSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionCategory {
    Overview,
    Findings,
    Recommendation,
    Tip,
    Routine,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedSection {
    pub title: String,
    pub content: String,
    pub category: SectionCategory,
}

// --- Chat completion API types ---

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}
