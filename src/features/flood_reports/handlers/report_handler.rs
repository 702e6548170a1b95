use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::{AppError, Result};
use crate::features::flood_reports::dtos::{FloodReportResponseDto, SubmitReportDto};
use crate::features::flood_reports::services::{ImageUpload, IngestionService, ReportSubmission};
use crate::shared::types::{ApiResponse, Meta};

/// Submit a flood report
///
/// Accepts multipart/form-data with:
/// - `latitude`: decimal degrees (required)
/// - `longitude`: decimal degrees (required)
/// - `image`: photo of the flood (required)
#[utoipa::path(
    post,
    path = "/api/report",
    tag = "flood_reports",
    request_body(
        content = SubmitReportDto,
        content_type = "multipart/form-data",
        description = "Coordinates and photo of the flooded spot",
    ),
    responses(
        (status = 201, description = "Report created", body = ApiResponse<FloodReportResponseDto>),
        (status = 400, description = "Missing or invalid latitude, longitude or image"),
        (status = 413, description = "Photo too large"),
        (status = 500, description = "Photo could not be stored or report could not be saved")
    )
)]
pub async fn submit_report(
    State(service): State<Arc<IngestionService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FloodReportResponseDto>>)> {
    let mut submission = ReportSubmission::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "latitude" => submission.latitude = Some(read_coordinate(field, "latitude").await?),
            "longitude" => submission.longitude = Some(read_coordinate(field, "longitude").await?),
            "image" => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "unnamed".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read image data: {}", e))
                })?;

                submission.image = Some(ImageUpload { file_name, data });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let report = service.submit(submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(report.into()), None, None)),
    ))
}

/// Parse a text field as a coordinate
async fn read_coordinate(field: Field<'_>, name: &str) -> Result<f64> {
    let text = field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {} field: {}", name, e)))?;

    text.trim()
        .parse::<f64>()
        .map_err(|_| AppError::Validation(format!("{} must be a number", name)))
}

/// List all flood reports, newest first
#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "flood_reports",
    responses(
        (status = 200, description = "All flood reports, newest first", body = ApiResponse<Vec<FloodReportResponseDto>>),
        (status = 500, description = "Reports could not be loaded")
    )
)]
pub async fn list_reports(
    State(service): State<Arc<IngestionService>>,
) -> Result<Json<ApiResponse<Vec<FloodReportResponseDto>>>> {
    let reports = service.list_all().await?;
    let total = reports.len() as i64;
    let dtos: Vec<FloodReportResponseDto> = reports.into_iter().map(|r| r.into()).collect();

    Ok(Json(ApiResponse::success(
        Some(dtos),
        None,
        Some(Meta { total }),
    )))
}
