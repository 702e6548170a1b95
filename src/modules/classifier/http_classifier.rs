use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::debug;

use super::{ClassifierError, SeverityClassifier};
use crate::core::config::ClassifierConfig;
use crate::features::flood_reports::models::FloodSeverity;
use crate::modules::storage::StoredImage;

/// Multipart field the model server reads the photo from
const IMAGE_FIELD: &str = "file";

/// Body returned by the model's predict endpoint
#[derive(Debug, Deserialize)]
struct PredictionResponse {
    class: String,
}

/// Calls the model server's `/predict` endpoint over HTTP
pub struct HttpSeverityClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpSeverityClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = reqwest::Client::builder()
            .user_agent("SeeFloodCore/1.0")
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            url: config.url,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parse `{"class": "<label>"}` into a severity
    fn parse_prediction(body: &[u8]) -> Result<FloodSeverity, ClassifierError> {
        let prediction: PredictionResponse =
            serde_json::from_slice(body).map_err(|e| ClassifierError::Decode(e.to_string()))?;

        FloodSeverity::from_label(&prediction.class)
            .ok_or(ClassifierError::UnknownLabel(prediction.class))
    }
}

/// MIME type sent alongside the photo, guessed from the stored extension
fn content_type_for(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl SeverityClassifier for HttpSeverityClassifier {
    async fn classify(&self, image: &StoredImage) -> Result<FloodSeverity, ClassifierError> {
        let data = tokio::fs::read(&image.path).await?;

        let part = Part::bytes(data)
            .file_name(image.file_name.clone())
            .mime_str(content_type_for(&image.file_name))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self.client.post(&self.url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifierError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let severity = Self::parse_prediction(&body)?;

        debug!("Classifier labelled {} as {}", image.reference, severity);
        Ok(severity)
    }
}
