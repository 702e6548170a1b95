pub mod flood_reports;
