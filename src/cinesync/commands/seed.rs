use crate::commands::{flag_total_failure, CmdMessage, CmdResult};
use crate::error::{Result, SyncError};
use crate::model::{FieldValue, Record};
use crate::reconcile::{reconcile_records, ReconcileOptions};
use crate::store::EntityStore;
use std::fs;
use std::path::Path;

/// Read desired records from a JSON array of flat objects.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path).map_err(|e| {
        SyncError::Api(format!("Cannot read records file {}: {}", path.display(), e))
    })?;
    let records: Vec<Record> = serde_json::from_str(&content)?;
    Ok(records)
}

/// Lowercase every text key, for collections whose keys are case-insensitive
/// (user emails). Trailing and leading blanks go too.
pub fn fold_key_case(records: &mut [Record], key_field: &str) {
    for record in records {
        let folded = match record.get(key_field) {
            Some(FieldValue::Text(key)) => key.trim().to_lowercase(),
            _ => continue,
        };
        record.set(key_field, FieldValue::Text(folded));
    }
}

pub fn run<S: EntityStore>(
    store: &mut S,
    records: &[Record],
    options: ReconcileOptions,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if records.is_empty() {
        result.add_message(CmdMessage::info("No records to seed."));
        return Ok(result);
    }

    let report = reconcile_records(store, records, options);
    let mut result = result.with_report(report);
    flag_total_failure(&mut result);
    Ok(result)
}
