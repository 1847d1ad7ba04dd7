use crate::commands::{CmdMessage, CmdResult};
use crate::config::{SyncConfig, CONFIG_FILENAME};
use crate::error::Result;
use std::path::Path;

pub fn show(config: &SyncConfig) -> Result<CmdResult> {
    Ok(CmdResult::default().with_config(config.clone()))
}

/// Write the default configuration into `dir` unless one already exists.
pub fn init(dir: &Path) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        result.add_message(CmdMessage::info(format!(
            "{} already exists, leaving it untouched.",
            path.display()
        )));
        return Ok(result);
    }

    let config = SyncConfig::default();
    config.save(dir)?;
    result.add_message(CmdMessage::success(format!("Wrote {}", path.display())));
    Ok(result.with_config(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    #[test]
    fn init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();

        let first = init(dir.path()).unwrap();
        assert_eq!(first.messages[0].level, MessageLevel::Success);
        assert_eq!(SyncConfig::load(dir.path()).unwrap(), SyncConfig::default());

        let second = init(dir.path()).unwrap();
        assert_eq!(second.messages[0].level, MessageLevel::Info);
        assert!(second.config.is_none());
    }
}
