//! In-memory stand-ins for the ingestion pipeline's collaborators

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use std::sync::Mutex;

use crate::core::error::{AppError, Result};
use crate::features::flood_reports::models::{CreateFloodReport, FloodReport, FloodSeverity};
use crate::features::flood_reports::services::{ImageUpload, ReportRepository};
use crate::modules::classifier::{ClassifierError, SeverityClassifier};
use crate::modules::storage::StoredImage;

/// A small non-empty photo upload
pub fn photo(file_name: &str) -> ImageUpload {
    ImageUpload {
        file_name: file_name.to_string(),
        data: Bytes::from_static(b"\xff\xd8\xff\xe0 not really a jpeg"),
    }
}

/// Classifier that answers with a fixed label or is unreachable
pub enum StubClassifier {
    Label(&'static str),
    Unavailable,
}

#[async_trait]
impl SeverityClassifier for StubClassifier {
    async fn classify(&self, _image: &StoredImage) -> std::result::Result<FloodSeverity, ClassifierError> {
        match self {
            StubClassifier::Label(label) => FloodSeverity::from_label(label)
                .ok_or_else(|| ClassifierError::UnknownLabel(label.to_string())),
            StubClassifier::Unavailable => Err(ClassifierError::Status(503)),
        }
    }
}

/// Repository keeping rows in a vector; ids are assigned under the lock
#[derive(Default)]
pub struct InMemoryReportRepository {
    rows: Mutex<Vec<FloodReport>>,
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn save(&self, report: &CreateFloodReport) -> Result<FloodReport> {
        let mut rows = self.rows.lock().unwrap();
        let saved = FloodReport {
            id: rows.len() as i64 + 1,
            latitude: report.latitude,
            longitude: report.longitude,
            location_name: report.location_name.clone(),
            image_ref: report.image_ref.clone(),
            severity: report.severity,
            risk_level: report.risk_level(),
            created_at: Utc::now(),
        };
        rows.push(saved.clone());
        Ok(saved)
    }

    async fn list_all(&self) -> Result<Vec<FloodReport>> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}

/// Repository whose database is always down
pub struct FailingReportRepository;

#[async_trait]
impl ReportRepository for FailingReportRepository {
    async fn save(&self, _report: &CreateFloodReport) -> Result<FloodReport> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn list_all(&self) -> Result<Vec<FloodReport>> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}
