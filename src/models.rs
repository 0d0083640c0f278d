use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One saved photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub date: NaiveDate,
    /// Day name captured when the record was created, e.g. `Monday`.
    pub weekday: String,
    pub label: String,
    pub filename: String,
}

impl LogRecord {
    pub fn new(date: NaiveDate, label: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            date,
            weekday: date.format("%A").to_string(),
            label: label.into(),
            filename: filename.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveResponse {
    pub date: String,
    pub weekday: String,
    pub label: String,
    pub filename: String,
    pub count: u64,
    pub csv_persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

/// Dense, zero-filled form of a count matrix for stacked bar charts.
/// `values[i][j]` is the count for `categories[i]` and `labels[j]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub categories: Vec<String>,
    pub labels: Vec<String>,
    pub values: Vec<Vec<u64>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total: u64,
    pub proportions: Vec<Share>,
    pub by_date: ChartSeries,
    pub by_weekday: ChartSeries,
    pub csv_file: String,
}
