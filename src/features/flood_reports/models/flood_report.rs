use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;

/// Flood severity as labelled by the classification model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "flood_severity", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FloodSeverity {
    None,
    VeryLight,
    Light,
    Moderate,
    Severe,
}

impl FloodSeverity {
    /// Parse a model label. Only exact enumeration labels are accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "none" => Some(FloodSeverity::None),
            "very_light" => Some(FloodSeverity::VeryLight),
            "light" => Some(FloodSeverity::Light),
            "moderate" => Some(FloodSeverity::Moderate),
            "severe" => Some(FloodSeverity::Severe),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FloodSeverity::None => "none",
            FloodSeverity::VeryLight => "very_light",
            FloodSeverity::Light => "light",
            FloodSeverity::Moderate => "moderate",
            FloodSeverity::Severe => "severe",
        }
    }

    /// Risk tier shown on the map for this severity
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            FloodSeverity::None => RiskLevel::None,
            FloodSeverity::VeryLight => RiskLevel::LightYellow,
            FloodSeverity::Light => RiskLevel::Yellow,
            FloodSeverity::Moderate => RiskLevel::LightRed,
            FloodSeverity::Severe => RiskLevel::Red,
        }
    }
}

impl std::fmt::Display for FloodSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display/alerting tier derived from severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "risk_level", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    LightYellow,
    Yellow,
    LightRed,
    Red,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::None => write!(f, "none"),
            RiskLevel::LightYellow => write!(f, "light_yellow"),
            RiskLevel::Yellow => write!(f, "yellow"),
            RiskLevel::LightRed => write!(f, "light_red"),
            RiskLevel::Red => write!(f, "red"),
        }
    }
}

impl From<FloodSeverity> for RiskLevel {
    fn from(severity: FloodSeverity) -> Self {
        severity.risk_level()
    }
}

/// Database model for a flood report
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FloodReport {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: Option<String>,
    pub image_ref: String,
    pub severity: FloodSeverity,
    pub risk_level: RiskLevel,
    pub created_at: DateTime<Utc>,
}

/// Data for inserting a new flood report; id and created_at come from the database
#[derive(Debug, Clone)]
pub struct CreateFloodReport {
    pub latitude: f64,
    pub longitude: f64,
    pub location_name: Option<String>,
    pub image_ref: String,
    pub severity: FloodSeverity,
}

impl CreateFloodReport {
    pub fn new(latitude: f64, longitude: f64, image_ref: String, severity: FloodSeverity) -> Self {
        Self {
            latitude,
            longitude,
            location_name: None,
            image_ref,
            severity,
        }
    }

    /// Always derived from `severity`, never stored separately
    pub fn risk_level(&self) -> RiskLevel {
        self.severity.risk_level()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_table() {
        assert_eq!(FloodSeverity::None.risk_level(), RiskLevel::None);
        assert_eq!(FloodSeverity::VeryLight.risk_level(), RiskLevel::LightYellow);
        assert_eq!(FloodSeverity::Light.risk_level(), RiskLevel::Yellow);
        assert_eq!(FloodSeverity::Moderate.risk_level(), RiskLevel::LightRed);
        assert_eq!(FloodSeverity::Severe.risk_level(), RiskLevel::Red);
        assert_eq!(RiskLevel::from(FloodSeverity::Moderate), RiskLevel::LightRed);
    }

    #[test]
    fn test_labels_match_display() {
        for severity in [
            FloodSeverity::None,
            FloodSeverity::VeryLight,
            FloodSeverity::Light,
            FloodSeverity::Moderate,
            FloodSeverity::Severe,
        ] {
            assert_eq!(FloodSeverity::from_label(severity.as_str()), Some(severity));
            assert_eq!(severity.to_string(), severity.as_str());
        }
    }

    #[test]
    fn test_unknown_labels_rejected() {
        assert_eq!(FloodSeverity::from_label("foo"), None);
        assert_eq!(FloodSeverity::from_label("Severe"), None);
        assert_eq!(FloodSeverity::from_label("knee_deep"), None);
        assert_eq!(FloodSeverity::from_label(""), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&FloodSeverity::VeryLight).unwrap();
        assert_eq!(json, "\"very_light\"");

        let json = serde_json::to_string(&RiskLevel::LightRed).unwrap();
        assert_eq!(json, "\"light_red\"");
    }

    #[test]
    fn test_create_derives_risk() {
        let mut report =
            CreateFloodReport::new(1.0, 2.0, "/uploads/x.jpg".into(), FloodSeverity::Light);
        assert_eq!(report.risk_level(), RiskLevel::Yellow);
        assert_eq!(report.location_name, None);

        report.severity = FloodSeverity::Severe;
        assert_eq!(report.risk_level(), RiskLevel::Red);
    }
}
