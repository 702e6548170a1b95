use utoipa::{Modify, OpenApi};

use crate::features::flood_reports::{
    dtos as flood_reports_dtos, handlers as flood_reports_handlers,
    models as flood_reports_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        flood_reports_handlers::submit_report,
        flood_reports_handlers::list_reports,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Flood reports
            flood_reports_models::FloodSeverity,
            flood_reports_models::RiskLevel,
            flood_reports_dtos::SubmitReportDto,
            flood_reports_dtos::FloodReportResponseDto,
            ApiResponse<flood_reports_dtos::FloodReportResponseDto>,
            ApiResponse<Vec<flood_reports_dtos::FloodReportResponseDto>>,
        )
    ),
    tags(
        (name = "flood_reports", description = "Crowd-sourced flood reports (public)"),
    ),
    info(
        title = "SeeFlood API",
        version = "0.1.0",
        description = "Crowd-sourced flood report ingestion",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
