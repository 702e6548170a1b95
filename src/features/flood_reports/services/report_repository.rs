use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::flood_reports::models::{CreateFloodReport, FloodReport};

/// Persistence for flood reports. Ids and timestamps are assigned by the store.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert one report and return it with its assigned `id` and `created_at`
    async fn save(&self, report: &CreateFloodReport) -> Result<FloodReport>;

    /// All reports, newest first
    async fn list_all(&self) -> Result<Vec<FloodReport>>;
}

/// Postgres-backed report repository
pub struct PgReportRepository {
    pool: PgPool,
}

impl PgReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportRepository for PgReportRepository {
    async fn save(&self, report: &CreateFloodReport) -> Result<FloodReport> {
        let saved = sqlx::query_as::<_, FloodReport>(
            r#"
            INSERT INTO flood_reports (latitude, longitude, location_name, image_ref, severity, risk_level)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, latitude, longitude, location_name, image_ref, severity, risk_level, created_at
            "#,
        )
        .bind(report.latitude)
        .bind(report.longitude)
        .bind(report.location_name.as_deref())
        .bind(&report.image_ref)
        .bind(report.severity)
        .bind(report.risk_level())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert flood report: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(saved)
    }

    async fn list_all(&self) -> Result<Vec<FloodReport>> {
        sqlx::query_as::<_, FloodReport>(
            r#"
            SELECT id, latitude, longitude, location_name, image_ref, severity, risk_level, created_at
            FROM flood_reports
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list flood reports: {:?}", e);
            AppError::Database(e)
        })
    }
}
