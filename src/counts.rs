use crate::models::LogRecord;
use std::collections::HashMap;

/// Running per-label totals, remembering the order labels first appeared.
#[derive(Debug, Clone, Default)]
pub struct CountIndex {
    order: Vec<String>,
    counts: HashMap<String, u64>,
}

impl CountIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild<'a>(records: impl IntoIterator<Item = &'a LogRecord>) -> Self {
        let mut index = Self::new();
        for record in records {
            index.increment(&record.label);
        }
        index
    }

    pub fn increment(&mut self, label: &str) -> u64 {
        if !self.counts.contains_key(label) {
            self.order.push(label.to_string());
        }
        let count = self.counts.entry(label.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn get(&self, label: &str) -> u64 {
        self.counts.get(label).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.values().all(|count| *count == 0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// `(label, count)` pairs in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.order
            .iter()
            .map(|label| (label.as_str(), self.get(label)))
    }
}
