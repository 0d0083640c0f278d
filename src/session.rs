use crate::config::Config;
use crate::counts::CountIndex;
use crate::errors::StoreError;
use crate::image_store::ImageStore;
use crate::log_store::LogStore;
use crate::models::{LogRecord, StatsResponse};
use crate::paths::validate_label;
use crate::stats::build_stats;
use chrono::{Local, NaiveDate};
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq)]
pub struct SaveOutcome {
    pub record: LogRecord,
    pub count: u64,
    /// False when the CSV rewrite failed; the record is still in memory.
    pub csv_persisted: bool,
}

/// Everything one running app instance knows about saved food.
#[derive(Debug)]
pub struct Session {
    images: ImageStore,
    log: LogStore,
    counts: CountIndex,
    csv_file: String,
}

impl Session {
    pub fn new(images: ImageStore, log: LogStore) -> Self {
        let counts = CountIndex::rebuild(log.all());
        let csv_file = log
            .path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            images,
            log,
            counts,
            csv_file,
        }
    }

    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let log = LogStore::open(&config.csv_path, config.header_language)?;
        Ok(Self::new(ImageStore::new(&config.dataset_dir), log))
    }

    pub fn save(&mut self, label: Option<&str>, image: Option<&[u8]>) -> Result<SaveOutcome, StoreError> {
        self.save_on(Local::now().date_naive(), label, image)
    }

    pub fn save_on(
        &mut self,
        date: NaiveDate,
        label: Option<&str>,
        image: Option<&[u8]>,
    ) -> Result<SaveOutcome, StoreError> {
        let label = label.unwrap_or_default();
        validate_label(label)?;
        let image = image
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| StoreError::validation("image is required"))?;

        let filename = self.images.save(label, image)?;
        let record = LogRecord::new(date, label, filename);

        let csv_persisted = match self.log.append(record.clone()) {
            Ok(()) => true,
            Err(err) => {
                error!("log file out of sync with memory: {err}");
                false
            }
        };
        let count = self.counts.increment(label);

        info!(label, filename = %record.filename, count, "food saved");
        Ok(SaveOutcome {
            record,
            count,
            csv_persisted,
        })
    }

    pub fn records(&self) -> &[LogRecord] {
        self.log.all()
    }

    pub fn counts(&self) -> &CountIndex {
        &self.counts
    }

    pub fn csv_file(&self) -> &str {
        &self.csv_file
    }

    pub fn stats(&self) -> StatsResponse {
        build_stats(self.log.all(), &self.counts, &self.csv_file)
    }
}
