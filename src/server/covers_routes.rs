//! Cover generation HTTP route.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::error::ApiError;
use super::state::GuardedCoverRequestor;
use crate::analysis::AnalysisResult;
use crate::covers::CoverImage;

/// Request body for cover generation.
///
/// Every field is optional on the wire; only `topic` is required to be
/// non-empty, which the requestor checks.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GenerateCoversBody {
    pub topic: String,
    pub mood: String,
    pub genre: String,
    pub audience: String,
    pub keywords: Vec<String>,
}

impl From<GenerateCoversBody> for AnalysisResult {
    fn from(body: GenerateCoversBody) -> Self {
        AnalysisResult {
            topic: body.topic,
            mood: body.mood,
            genre: body.genre,
            audience: body.audience,
            keywords: body.keywords,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CoverPayload {
    pub title: String,
    /// Base64 PNG bytes, no data-URL prefix.
    pub image: String,
}

impl From<CoverImage> for CoverPayload {
    fn from(cover: CoverImage) -> Self {
        CoverPayload {
            title: cover.title,
            image: BASE64.encode(&cover.image_bytes),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GenerateCoversResponse {
    pub success: bool,
    pub covers: Vec<CoverPayload>,
}

/// POST /generate-covers - Generate cover images from an analysis
pub async fn generate_covers(
    State(requestor): State<GuardedCoverRequestor>,
    body: Result<Json<GenerateCoversBody>, JsonRejection>,
) -> Result<Json<GenerateCoversResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        warn!("Rejected cover request body: {}", rejection.body_text());
        ApiError::new(rejection.status(), "invalid_body", "Invalid request body")
            .with_details(rejection.body_text())
    })?;

    let analysis = AnalysisResult::from(body);
    info!(
        "Generating covers for topic {:?} ({})",
        analysis.topic,
        requestor.mode().label()
    );

    let covers = requestor.generate(&analysis).await?;

    Ok(Json(GenerateCoversResponse {
        success: true,
        covers: covers.into_iter().map(CoverPayload::from).collect(),
    }))
}
