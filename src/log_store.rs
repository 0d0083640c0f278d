use crate::config::HeaderLanguage;
use crate::errors::StoreError;
use crate::models::LogRecord;
use chrono::NaiveDate;
use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::info;

/// Spreadsheet apps need the BOM to detect UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// In-memory record list mirrored to a CSV file on every append.
#[derive(Debug)]
pub struct LogStore {
    path: PathBuf,
    language: HeaderLanguage,
    records: Vec<LogRecord>,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>, language: HeaderLanguage) -> Self {
        Self {
            path: path.into(),
            language,
            records: Vec::new(),
        }
    }

    /// Loads previously persisted records; a missing file is an empty log.
    pub fn open(path: impl Into<PathBuf>, language: HeaderLanguage) -> Result<Self, StoreError> {
        let mut store = Self::new(path, language);
        let bytes = match fs::read(&store.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(store),
            Err(err) => return Err(StoreError::io(&store.path, err)),
        };
        store.records = parse_csv(&bytes).map_err(|reason| StoreError::CorruptLog {
            path: store.path.clone(),
            reason,
        })?;
        info!(
            path = %store.path.display(),
            records = store.records.len(),
            "log rehydrated"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Pushes the record, then rewrites the whole file.
    ///
    /// The in-memory push is kept even when the rewrite fails.
    pub fn append(&mut self, record: LogRecord) -> Result<(), StoreError> {
        self.records.push(record);
        self.persist()
    }

    pub fn all(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let payload = render_csv(self.language, &self.records)
            .map_err(|err| StoreError::io(&self.path, std::io::Error::other(err)))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        fs::write(&self.path, payload).map_err(|err| StoreError::io(&self.path, err))
    }
}

fn render_csv(language: HeaderLanguage, records: &[LogRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(language.headers())?;
    for record in records {
        let date = record.date.to_string();
        writer.write_record([
            date.as_str(),
            record.weekday.as_str(),
            record.label.as_str(),
            record.filename.as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

/// Columns are read by position so either header language loads.
fn parse_csv(bytes: &[u8]) -> Result<Vec<LogRecord>, String> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body);

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let line = index + 2;
        let row = row.map_err(|err| format!("line {line}: {err}"))?;
        if row.len() != 4 {
            return Err(format!("line {line}: expected 4 columns, found {}", row.len()));
        }
        let date = NaiveDate::parse_from_str(&row[0], "%Y-%m-%d")
            .map_err(|err| format!("line {line}: bad date '{}': {err}", &row[0]))?;
        records.push(LogRecord {
            date,
            weekday: row[1].to_string(),
            label: row[2].to_string(),
            filename: row[3].to_string(),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn append_rewrites_file_with_bom_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("food_log.csv");
        let mut store = LogStore::new(&path, HeaderLanguage::English);

        store.append(LogRecord::new(day(1), "apple", "a.jpg")).unwrap();
        store.append(LogRecord::new(day(2), "banana, ripe", "b.jpg")).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(
            text,
            "date,weekday,label,filename\n\
             2024-01-01,Monday,apple,a.jpg\n\
             2024-01-02,Tuesday,\"banana, ripe\",b.jpg\n"
        );
    }

    #[test]
    fn reopened_log_matches_memory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("food_log.csv");
        let mut store = LogStore::new(&path, HeaderLanguage::Korean);
        for (d, label) in [(1, "김치"), (3, "라면"), (3, "김치")] {
            let filename = crate::paths::new_image_filename();
            store.append(LogRecord::new(day(d), label, filename)).unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.trim_start_matches('\u{feff}').starts_with("날짜,요일,음식,파일명"));

        let reopened = LogStore::open(&path, HeaderLanguage::English).unwrap();
        assert_eq!(reopened.all(), store.all());
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogStore::open(dir.path().join("absent.csv"), HeaderLanguage::English).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn malformed_file_is_reported_not_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("food_log.csv");
        fs::write(&path, "date,weekday,label,filename\nyesterday,Monday,apple,a.jpg\n").unwrap();

        let err = LogStore::open(&path, HeaderLanguage::English).unwrap_err();
        assert!(matches!(err, StoreError::CorruptLog { .. }));
    }

    #[test]
    fn failed_rewrite_keeps_in_memory_record() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the file path makes the write fail.
        let path = dir.path().join("food_log.csv");
        fs::create_dir(&path).unwrap();
        let mut store = LogStore::new(&path, HeaderLanguage::English);

        let err = store
            .append(LogRecord::new(day(1), "apple", "a.jpg"))
            .unwrap_err();
        assert!(matches!(err, StoreError::StorageIo { .. }));
        assert_eq!(store.len(), 1);
    }
}
