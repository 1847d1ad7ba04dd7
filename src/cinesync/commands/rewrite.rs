use crate::commands::{flag_total_failure, CmdMessage, CmdResult};
use crate::error::{Result, SyncError};
use crate::model::TextTarget;
use crate::reconcile::{reconcile_texts, ReconcileOptions};
use crate::text::TextStore;
use std::fs;
use std::path::Path;

/// Read text targets from a JSON array of `{path, replacements}` objects.
pub fn load_targets(path: &Path) -> Result<Vec<TextTarget>> {
    let content = fs::read_to_string(path).map_err(|e| {
        SyncError::Api(format!("Cannot read targets file {}: {}", path.display(), e))
    })?;
    let targets: Vec<TextTarget> = serde_json::from_str(&content)?;
    Ok(targets)
}

pub fn run<T: TextStore>(
    files: &mut T,
    targets: &[TextTarget],
    options: ReconcileOptions,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if targets.is_empty() {
        result.add_message(CmdMessage::info("No text targets given."));
        return Ok(result);
    }

    let report = reconcile_texts(files, targets, options);
    let mut result = result.with_report(report);
    flag_total_failure(&mut result);
    Ok(result)
}
