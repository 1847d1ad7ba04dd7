use crate::config::SyncConfig;
use crate::report::RunReport;

pub mod config;
pub mod host;
pub mod rewrite;
pub mod seed;
pub mod verify;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub report: Option<RunReport>,
    pub host: Option<String>,
    pub config: Option<SyncConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_report(mut self, report: RunReport) -> Self {
        self.report = Some(report);
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// True when any message is an error: a failed check or a total failure.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}

/// Adds an error message when the report shows nothing got through.
pub(crate) fn flag_total_failure(result: &mut CmdResult) {
    let failure = result
        .report
        .as_ref()
        .and_then(|r| r.total_failure().map(|kind| (kind, r.counts.total())));
    if let Some((kind, count)) = failure {
        result.add_message(CmdMessage::error(format!(
            "All {} targets were skipped ({}).",
            count, kind
        )));
    }
}
