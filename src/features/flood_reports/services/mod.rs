mod ingestion_service;
mod report_repository;

pub use ingestion_service::{ImageUpload, IngestionService, ReportSubmission};
pub use report_repository::{PgReportRepository, ReportRepository};
