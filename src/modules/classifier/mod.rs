//! Flood classification model client
//!
//! The model is an external, possibly unavailable service. Callers receive a
//! [`ClassifierError`] and decide how to degrade; the ingestion pipeline treats
//! every error as "no flood detected".

mod http_classifier;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::flood_reports::models::FloodSeverity;
use crate::modules::storage::StoredImage;

pub use http_classifier::HttpSeverityClassifier;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Failed to read stored image: {0}")]
    ReadImage(#[from] std::io::Error),

    #[error("Classifier request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Classifier returned status {0}")]
    Status(u16),

    #[error("Malformed classifier response: {0}")]
    Decode(String),

    #[error("Unrecognised severity label: {0:?}")]
    UnknownLabel(String),
}

/// Assigns a flood severity to a stored photo
#[async_trait]
pub trait SeverityClassifier: Send + Sync {
    async fn classify(&self, image: &StoredImage) -> Result<FloodSeverity, ClassifierError>;
}
