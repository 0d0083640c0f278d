use crate::counts::CountIndex;
use crate::models::{ChartSeries, LogRecord, Share, StatsResponse};
use std::collections::{BTreeMap, BTreeSet};

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Sparse (row, label) -> count table. Pairs never seen are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountMatrix {
    rows: Vec<(String, BTreeMap<String, u64>)>,
}

impl CountMatrix {
    pub fn row_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|(key, _)| key.as_str())
    }

    pub fn labels(&self) -> Vec<String> {
        let labels: BTreeSet<&String> = self.rows.iter().flat_map(|(_, row)| row.keys()).collect();
        labels.into_iter().cloned().collect()
    }

    pub fn get(&self, row: &str, label: &str) -> Option<u64> {
        self.rows
            .iter()
            .find(|(key, _)| key == row)
            .and_then(|(_, counts)| counts.get(label).copied())
    }

    pub fn total(&self) -> u64 {
        self.rows.iter().flat_map(|(_, row)| row.values()).sum()
    }

    pub fn to_series(&self) -> ChartSeries {
        let labels = self.labels();
        let values = self
            .rows
            .iter()
            .map(|(_, row)| {
                labels
                    .iter()
                    .map(|label| row.get(label).copied().unwrap_or(0))
                    .collect()
            })
            .collect();
        ChartSeries {
            categories: self.rows.iter().map(|(key, _)| key.clone()).collect(),
            labels,
            values,
        }
    }
}

fn group_by<K: Ord>(records: &[LogRecord], key: impl Fn(&LogRecord) -> (K, String)) -> CountMatrix {
    let mut grouped: BTreeMap<K, (String, BTreeMap<String, u64>)> = BTreeMap::new();
    for record in records {
        let (sort_key, row_key) = key(record);
        let (_, row) = grouped
            .entry(sort_key)
            .or_insert_with(|| (row_key, BTreeMap::new()));
        *row.entry(record.label.clone()).or_insert(0) += 1;
    }
    CountMatrix {
        rows: grouped.into_values().collect(),
    }
}

/// Rows ascend by date.
pub fn by_date(records: &[LogRecord]) -> CountMatrix {
    group_by(records, |record| (record.date, record.date.to_string()))
}

/// Rows follow the calendar week from Monday; names outside it sort last.
/// Uses the weekday stored on each record.
pub fn by_weekday(records: &[LogRecord]) -> CountMatrix {
    group_by(records, |record| {
        let rank = WEEKDAYS
            .iter()
            .position(|day| *day == record.weekday)
            .unwrap_or(WEEKDAYS.len());
        ((rank, record.weekday.clone()), record.weekday.clone())
    })
}

pub fn proportions(counts: &CountIndex) -> Vec<Share> {
    let total = counts.total();
    counts
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(label, count)| Share {
            label: label.to_string(),
            count,
            percent: count as f64 * 100.0 / total as f64,
        })
        .collect()
}

pub fn build_stats(records: &[LogRecord], counts: &CountIndex, csv_file: &str) -> StatsResponse {
    StatsResponse {
        total: records.len() as u64,
        proportions: proportions(counts),
        by_date: by_date(records).to_series(),
        by_weekday: by_weekday(records).to_series(),
        csv_file: csv_file.to_string(),
    }
}
