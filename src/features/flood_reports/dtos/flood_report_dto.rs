use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::flood_reports::models::{FloodReport, FloodSeverity, RiskLevel};

/// Submit report request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct SubmitReportDto {
    /// Latitude of the flooded spot
    #[schema(example = 1.23)]
    pub latitude: f64,
    /// Longitude of the flooded spot
    #[schema(example = 4.56)]
    pub longitude: f64,
    /// Photo of the flood
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

/// Response DTO for a flood report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FloodReportResponseDto {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: Option<String>,
    /// Path of the photo, relative to the server root (e.g. `/uploads/<uuid>.jpg`)
    pub image_url: String,
    pub severity: FloodSeverity,
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
}

impl From<FloodReport> for FloodReportResponseDto {
    fn from(r: FloodReport) -> Self {
        Self {
            id: r.id,
            latitude: r.latitude,
            longitude: r.longitude,
            location_name: r.location_name,
            image_url: r.image_ref,
            severity: r.severity,
            risk_level: r.risk_level,
            created_at: r.created_at,
        }
    }
}
