use std::collections::BTreeMap;

use lookout_core::models::RecordStats;
use lookout_core::{Record, Severity};

/// Aggregate `records` by category and severity.
///
/// Every name in `categories` and every severity appears in the maps, zero
/// or not. `recent` holds the last `recent_k` records, oldest first.
pub fn compute_stats<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    categories: &[&str],
    recent_k: usize,
) -> RecordStats {
    let mut by_type: BTreeMap<String, usize> =
        categories.iter().map(|c| (c.to_string(), 0)).collect();
    let mut by_level: BTreeMap<Severity, usize> = Severity::ALL.iter().map(|s| (*s, 0)).collect();

    let records: Vec<&Record> = records.into_iter().collect();
    for record in &records {
        *by_type.entry(record.category().to_string()).or_insert(0) += 1;
        if let Some(level) = record.level {
            *by_level.entry(level).or_insert(0) += 1;
        }
    }

    let skip = records.len().saturating_sub(recent_k);
    RecordStats {
        total: records.len(),
        by_type,
        by_level,
        recent: records.iter().skip(skip).map(|r| (*r).clone()).collect(),
        session_duration: None,
    }
}
