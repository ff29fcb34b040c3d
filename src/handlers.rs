// src/handlers.rs
use crate::auth::Session;
use crate::errors::AnalyzeError;
use crate::models::*;
use crate::prompt::build_dermatologist_prompt;
use crate::sections::parse_sections;
use crate::AppState;
use actix_multipart::{Field, Multipart};
use actix_web::{HttpResponse, web};
use bytes::BytesMut;
use chrono::{SubsecRound, Utc};
use futures_util::TryStreamExt;
use uuid::Uuid;

const IMAGE_FIELD: &str = "image";
const LIFESTYLE_FIELD: &str = "lifestyleData";

async fn read_field(field: &mut Field) -> Result<BytesMut, AnalyzeError> {
    let mut data = BytesMut::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| AnalyzeError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        data.extend_from_slice(&chunk);
    }
    Ok(data)
}

/// Pulls the image part and the raw lifestyle JSON out of the form.
async fn read_form(
    mut payload: Multipart,
) -> Result<(Option<ImageUpload>, Option<String>), AnalyzeError> {
    let mut image = None;
    let mut lifestyle = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AnalyzeError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let content_disposition = field.content_disposition();
        let name = content_disposition.get_name().map(str::to_owned);
        let filename = content_disposition
            .get_filename()
            .unwrap_or("upload")
            .to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());

        match name.as_deref() {
            Some(IMAGE_FIELD) => {
                let data = read_field(&mut field).await?;
                image = Some(ImageUpload {
                    filename,
                    content_type,
                    data: data.freeze(),
                });
            }
            Some(LIFESTYLE_FIELD) => {
                let data = read_field(&mut field).await?;
                let text = String::from_utf8(data.to_vec())
                    .map_err(|e| AnalyzeError::AnalysisFailed(e.to_string()))?;
                lifestyle = Some(text);
            }
            _ => {
                read_field(&mut field).await?;
            }
        }
    }

    Ok((image, lifestyle))
}

/// Runs one analysis: upstream metrics and history, prompt, model call.
pub async fn run_analysis(
    state: &AppState,
    session: &Session,
    upload: &ImageUpload,
    lifestyle: &LifestyleInput,
    request_id: Uuid,
) -> Result<AnalysisResult, AnalyzeError> {
    let mime = state
        .image_processor
        .mime_type(upload.content_type.as_deref(), &upload.data);

    // The two lookups are independent; only today's metrics are required.
    let (today, yesterday) = tokio::join!(
        state
            .skin_service
            .analyze(session.id_token(), upload, &mime),
        state.skin_service.yesterday(session.id_token()),
    );
    let today = today?;

    log::info!(
        "[{}] metrics received (history: {})",
        request_id,
        if yesterday.is_some() { "yes" } else { "no" }
    );

    let image = state.image_processor.to_data_uri(&mime, &upload.data);
    let prompt = build_dermatologist_prompt(yesterday.as_ref(), &today, lifestyle);

    let ai_analysis = state.llm_service.complete(&prompt).await?;

    Ok(AnalysisResult {
        image,
        skin_data: today,
        yesterday_data: yesterday,
        ai_analysis,
        timestamp: Utc::now().trunc_subsecs(3),
    })
}

pub async fn analyze_skin(
    session: Session,
    payload: Multipart,
    data: web::Data<AppState>,
) -> Result<HttpResponse, AnalyzeError> {
    let request_id = Uuid::new_v4();
    log::info!("[{}] analysis requested by {}", request_id, session.email);

    let (image, lifestyle) = read_form(payload).await?;
    let image = image.ok_or_else(|| AnalyzeError::BadRequest("No image provided".to_string()))?;

    let lifestyle: LifestyleInput = match lifestyle {
        Some(raw) => serde_json::from_str(&raw)?,
        None => LifestyleInput::default(),
    };

    let analysis = run_analysis(&data, &session, &image, &lifestyle, request_id).await?;

    Ok(HttpResponse::Ok().json(AnalyzeResponse {
        success: true,
        analysis,
    }))
}

pub async fn split_sections(body: web::Json<SectionsRequest>) -> HttpResponse {
    HttpResponse::Ok().json(SectionsResponse {
        success: true,
        sections: parse_sections(&body.text),
    })
}

pub async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "skinsight",
        "version": env!("CARGO_PKG_VERSION"),
        "model": data.llm_service.model_name()
    }))
}
