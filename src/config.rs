use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Language used for the CSV header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderLanguage {
    #[default]
    English,
    Korean,
}

impl HeaderLanguage {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::English),
            "ko" | "korean" => Some(Self::Korean),
            _ => None,
        }
    }

    pub fn headers(self) -> [&'static str; 4] {
        match self {
            Self::English => ["date", "weekday", "label", "filename"],
            Self::Korean => ["날짜", "요일", "음식", "파일명"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub dataset_dir: PathBuf,
    pub csv_path: PathBuf,
    pub header_language: HeaderLanguage,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            dataset_dir: PathBuf::from("dataset"),
            csv_path: PathBuf::from("food_log.csv"),
            header_language: HeaderLanguage::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: lookup("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            dataset_dir: lookup("FOOD_LOG_DATASET_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dataset_dir),
            csv_path: lookup("FOOD_LOG_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.csv_path),
            header_language: lookup("FOOD_LOG_HEADER_LANG")
                .and_then(|value| HeaderLanguage::parse(&value))
                .unwrap_or(defaults.header_language),
            max_upload_bytes: lookup("FOOD_LOG_MAX_UPLOAD_BYTES")
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(defaults.max_upload_bytes),
        }
    }
}
