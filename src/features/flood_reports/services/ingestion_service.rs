use axum::body::Bytes;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::flood_reports::models::{CreateFloodReport, FloodReport, FloodSeverity};
use crate::features::flood_reports::services::ReportRepository;
use crate::modules::classifier::SeverityClassifier;
use crate::modules::storage::{BlobStore, StoredImage};

/// Uploaded photo as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Filename supplied by the client; only its extension is kept
    pub file_name: String,
    pub data: Bytes,
}

/// Raw report submission; fields are optional until validated
#[derive(Debug, Clone, Default)]
pub struct ReportSubmission {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image: Option<ImageUpload>,
}

impl ReportSubmission {
    fn validate(self) -> Result<(f64, f64, ImageUpload)> {
        let latitude = require_coordinate("latitude", self.latitude)?;
        let longitude = require_coordinate("longitude", self.longitude)?;

        let image = self
            .image
            .filter(|image| !image.data.is_empty())
            .ok_or_else(|| AppError::Validation("image is required".to_string()))?;

        Ok((latitude, longitude, image))
    }
}

fn require_coordinate(name: &str, value: Option<f64>) -> Result<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(AppError::Validation(format!("{} must be a finite number", name))),
        None => Err(AppError::Validation(format!("{} is required", name))),
    }
}

/// Runs the report ingestion pipeline: store photo, classify, derive risk, persist
pub struct IngestionService {
    blob_store: Arc<dyn BlobStore>,
    classifier: Arc<dyn SeverityClassifier>,
    repository: Arc<dyn ReportRepository>,
}

impl IngestionService {
    pub fn new(
        blob_store: Arc<dyn BlobStore>,
        classifier: Arc<dyn SeverityClassifier>,
        repository: Arc<dyn ReportRepository>,
    ) -> Self {
        Self {
            blob_store,
            classifier,
            repository,
        }
    }

    /// Ingest one report.
    ///
    /// A classifier failure never fails the submission: the report is saved
    /// with severity `none`. Storage and database failures are terminal. When
    /// the database insert fails the stored photo is left behind.
    pub async fn submit(&self, submission: ReportSubmission) -> Result<FloodReport> {
        let (latitude, longitude, image) = submission.validate()?;

        let stored = self.blob_store.store(&image.file_name, &image.data).await?;

        let severity = self.classify_or_default(&stored).await;

        let data = CreateFloodReport::new(latitude, longitude, stored.reference.clone(), severity);
        let report = self.repository.save(&data).await.inspect_err(|e| {
            error!(
                "Flood report not saved, photo {} is orphaned: {}",
                stored.reference, e
            );
        })?;

        info!(
            "Flood report created: id={}, severity={}, risk_level={}, image={}",
            report.id, report.severity, report.risk_level, report.image_ref
        );

        Ok(report)
    }

    /// All reports, newest first
    pub async fn list_all(&self) -> Result<Vec<FloodReport>> {
        self.repository.list_all().await
    }

    async fn classify_or_default(&self, image: &StoredImage) -> FloodSeverity {
        match self.classifier.classify(image).await {
            Ok(severity) => severity,
            Err(e) => {
                warn!(
                    "Classification failed for {}, defaulting to none: {}",
                    image.reference, e
                );
                FloodSeverity::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StorageConfig;
    use crate::features::flood_reports::models::RiskLevel;
    use crate::modules::storage::LocalBlobStore;
    use crate::shared::test_helpers::{
        photo, FailingReportRepository, InMemoryReportRepository, StubClassifier,
    };
    use std::path::Path;

    fn blob_store(dir: &Path) -> Arc<LocalBlobStore> {
        Arc::new(LocalBlobStore::new(StorageConfig {
            upload_dir: dir.to_path_buf(),
            public_path: "/uploads".to_string(),
        }))
    }

    fn service(
        dir: &Path,
        classifier: StubClassifier,
        repository: Arc<dyn ReportRepository>,
    ) -> IngestionService {
        IngestionService::new(blob_store(dir), Arc::new(classifier), repository)
    }

    fn submission(file_name: &str) -> ReportSubmission {
        ReportSubmission {
            latitude: Some(1.23),
            longitude: Some(4.56),
            image: Some(photo(file_name)),
        }
    }

    #[tokio::test]
    async fn test_severe_report_is_red_and_listed_first() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(InMemoryReportRepository::default());
        let light = service(dir.path(), StubClassifier::Label("light"), repository.clone());
        light.submit(submission("old.png")).await.unwrap();

        let severe = service(dir.path(), StubClassifier::Label("severe"), repository);
        let report = severe.submit(submission("a.jpg")).await.unwrap();

        assert_eq!(report.severity, FloodSeverity::Severe);
        assert_eq!(report.risk_level, RiskLevel::Red);
        assert_eq!(report.latitude, 1.23);
        assert_eq!(report.longitude, 4.56);
        assert!(report.image_ref.ends_with(".jpg"));
        assert_eq!(report.location_name, None);

        let listed = severe.list_all().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, report.id);
        assert!(listed
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[tokio::test]
    async fn test_every_label_maps_to_its_risk_level() {
        let dir = tempfile::tempdir().unwrap();
        let cases = [
            ("none", FloodSeverity::None, RiskLevel::None),
            ("very_light", FloodSeverity::VeryLight, RiskLevel::LightYellow),
            ("light", FloodSeverity::Light, RiskLevel::Yellow),
            ("moderate", FloodSeverity::Moderate, RiskLevel::LightRed),
            ("severe", FloodSeverity::Severe, RiskLevel::Red),
        ];

        for (label, severity, risk) in cases {
            let repository = Arc::new(InMemoryReportRepository::default());
            let service = service(dir.path(), StubClassifier::Label(label), repository);
            let report = service.submit(submission("a.jpg")).await.unwrap();
            assert_eq!(report.severity, severity, "label {}", label);
            assert_eq!(report.risk_level, risk, "label {}", label);
        }
    }

    #[tokio::test]
    async fn test_unknown_label_falls_back_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(InMemoryReportRepository::default());
        let service = service(dir.path(), StubClassifier::Label("foo"), repository);

        let report = service.submit(submission("a.jpg")).await.unwrap();

        assert_eq!(report.severity, FloodSeverity::None);
        assert_eq!(report.risk_level, RiskLevel::None);
    }

    #[tokio::test]
    async fn test_classifier_outage_still_persists_report() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(InMemoryReportRepository::default());
        let service = service(dir.path(), StubClassifier::Unavailable, repository.clone());

        let report = service.submit(submission("a.jpg")).await.unwrap();

        assert_eq!(report.severity, FloodSeverity::None);
        assert_eq!(report.risk_level, RiskLevel::None);
        assert_eq!(repository.list_all().await.unwrap(), vec![report]);
    }

    #[tokio::test]
    async fn test_storage_failure_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(InMemoryReportRepository::default());
        let service = service(
            &dir.path().join("missing"),
            StubClassifier::Label("severe"),
            repository.clone(),
        );

        let result = service.submit(submission("a.jpg")).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(repository.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_database_failure_is_surfaced() {
        let dir = tempfile::tempdir().unwrap();
        let service = service(
            dir.path(),
            StubClassifier::Label("severe"),
            Arc::new(FailingReportRepository),
        );

        let result = service.submit(submission("a.jpg")).await;

        assert!(matches!(result, Err(AppError::Database(_))));
        // the photo stays on disk
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_identical_submissions_create_distinct_reports() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(InMemoryReportRepository::default());
        let service = service(dir.path(), StubClassifier::Label("light"), repository);

        let first = service.submit(submission("a.jpg")).await.unwrap();
        let second = service.submit(submission("a.jpg")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_ne!(first.image_ref, second.image_ref);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_before_storage() {
        let dir = tempfile::tempdir().unwrap();
        let repository = Arc::new(InMemoryReportRepository::default());
        let service = service(dir.path(), StubClassifier::Label("severe"), repository.clone());

        let cases = [
            ReportSubmission {
                latitude: None,
                ..submission("a.jpg")
            },
            ReportSubmission {
                longitude: None,
                ..submission("a.jpg")
            },
            ReportSubmission {
                image: None,
                ..submission("a.jpg")
            },
            ReportSubmission {
                image: Some(ImageUpload {
                    file_name: "empty.jpg".to_string(),
                    data: Bytes::new(),
                }),
                ..submission("a.jpg")
            },
            ReportSubmission {
                latitude: Some(f64::NAN),
                ..submission("a.jpg")
            },
        ];

        for case in cases {
            let result = service.submit(case).await;
            assert!(matches!(result, Err(AppError::Validation(_))));
        }

        assert!(repository.list_all().await.unwrap().is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
