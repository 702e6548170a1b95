mod flood_report;

pub use flood_report::{CreateFloodReport, FloodReport, FloodSeverity, RiskLevel};
