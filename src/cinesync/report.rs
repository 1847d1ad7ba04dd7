//! # Run Report
//!
//! The outcome of one reconciliation run: one entry per target, in the order
//! the targets were supplied, plus counts per classification.
//!
//! A report is created empty when a run starts, appended to once per target,
//! and handed back to the caller. It is never persisted by the engine, but it
//! serializes to JSON and renders as plain text through `Display`.

use crate::diff::{FieldDelta, ReplacementHit};
use crate::error::SyncError;
use crate::reconcile::TargetKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    Updated,
    Unchanged,
    Skipped,
}

impl Outcome {
    pub fn symbol(&self) -> char {
        match self {
            Outcome::Created => '+',
            Outcome::Updated => '*',
            Outcome::Unchanged => '=',
            Outcome::Skipped => '!',
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Created => "created",
            Outcome::Updated => "updated",
            Outcome::Unchanged => "unchanged",
            Outcome::Skipped => "skipped",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    InvalidIdentifier,
    StoreUnavailable,
    DuplicateIdentifier,
    NotFound,
    WriteDenied,
    FileNotFound,
    Failed,
}

impl fmt::Display for SkipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SkipKind::InvalidIdentifier => "invalid identifier",
            SkipKind::StoreUnavailable => "store unavailable",
            SkipKind::DuplicateIdentifier => "duplicate identifier",
            SkipKind::NotFound => "not found",
            SkipKind::WriteDenied => "write denied",
            SkipKind::FileNotFound => "file not found",
            SkipKind::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkipReason {
    pub kind: SkipKind,
    pub severity: Severity,
    pub message: String,
}

impl SkipReason {
    pub fn new(kind: SkipKind, message: impl Into<String>) -> Self {
        let severity = match kind {
            SkipKind::InvalidIdentifier | SkipKind::WriteDenied | SkipKind::FileNotFound => {
                Severity::Warning
            }
            _ => Severity::Error,
        };
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }

    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::new(SkipKind::InvalidIdentifier, message)
    }

    pub fn file_not_found(label: &str) -> Self {
        Self::new(SkipKind::FileNotFound, format!("{} not found", label))
    }
}

impl From<&SyncError> for SkipReason {
    fn from(err: &SyncError) -> Self {
        let kind = match err {
            SyncError::InvalidIdentifier(_) => SkipKind::InvalidIdentifier,
            SyncError::StoreUnavailable(_) => SkipKind::StoreUnavailable,
            SyncError::DuplicateIdentifier(_) => SkipKind::DuplicateIdentifier,
            SyncError::NotFound(_) => SkipKind::NotFound,
            SyncError::WriteDenied { .. } => SkipKind::WriteDenied,
            _ => SkipKind::Failed,
        };
        Self::new(kind, err.to_string())
    }
}

/// What an entry changed, or why it was skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Detail {
    None,
    Fields(FieldDelta),
    Replacements(Vec<ReplacementHit>),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    /// Zero-based position of the target in the input list.
    pub position: usize,
    pub identifier: String,
    pub outcome: Outcome,
    pub detail: Detail,
}

impl ReportEntry {
    pub fn new(position: usize, identifier: impl Into<String>, outcome: Outcome, detail: Detail) -> Self {
        Self {
            position,
            identifier: identifier.into(),
            outcome,
            detail,
        }
    }

    pub fn skipped(position: usize, identifier: impl Into<String>, reason: SkipReason) -> Self {
        Self::new(position, identifier, Outcome::Skipped, Detail::Skipped(reason))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match &self.detail {
            Detail::Skipped(reason) => Some(reason),
            _ => None,
        }
    }

    /// Identifier for display; targets without one are shown by position.
    pub fn label(&self) -> String {
        if self.identifier.trim().is_empty() {
            format!("#{}", self.position + 1)
        } else {
            self.identifier.clone()
        }
    }

    /// Trailing note: changed fields, applied replacements, or skip message.
    pub fn note(&self) -> String {
        match &self.detail {
            Detail::None => String::new(),
            Detail::Fields(delta) if self.outcome == Outcome::Updated => {
                format!(" (fields: {})", delta.fields().join(", "))
            }
            Detail::Fields(_) => String::new(),
            Detail::Replacements(hits) => {
                let total: usize = hits.iter().map(|h| h.occurrences).sum();
                let noun = if total == 1 { "replacement" } else { "replacements" };
                format!(" ({} {})", total, noun)
            }
            Detail::Skipped(reason) => format!(": {}", reason.message),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl Counts {
    pub fn total(&self) -> usize {
        self.created + self.updated + self.unchanged + self.skipped
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub kind: TargetKind,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub counts: Counts,
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    pub fn new(kind: TargetKind, dry_run: bool) -> Self {
        Self {
            kind,
            dry_run,
            started_at: Utc::now(),
            finished_at: None,
            counts: Counts::default(),
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: ReportEntry) {
        match entry.outcome {
            Outcome::Created => self.counts.created += 1,
            Outcome::Updated => self.counts.updated += 1,
            Outcome::Unchanged => self.counts.unchanged += 1,
            Outcome::Skipped => self.counts.skipped += 1,
        }
        self.entries.push(entry);
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn outcomes(&self) -> Vec<Outcome> {
        self.entries.iter().map(|e| e.outcome).collect()
    }

    pub fn has_changes(&self) -> bool {
        self.counts.created + self.counts.updated > 0
    }

    /// Every target skipped for the same kind of reason.
    ///
    /// This is what a dead connection looks like: the run still completes,
    /// but nothing got through.
    pub fn total_failure(&self) -> Option<SkipKind> {
        let mut kinds = self.entries.iter().map(|e| e.skip_reason().map(|r| r.kind));
        let first = kinds.next()??;
        kinds.all(|k| k == Some(first)).then_some(first)
    }

    pub fn summary(&self) -> String {
        let prefix = if self.dry_run { "Dry run. " } else { "Done. " };
        format!(
            "{}Created: {}. Updated: {}. Unchanged: {}. Skipped: {}.",
            prefix,
            self.counts.created,
            self.counts.updated,
            self.counts.unchanged,
            self.counts.skipped
        )
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(
                f,
                "{} {:<9}  {}{}",
                entry.outcome.symbol(),
                entry.outcome,
                entry.label(),
                entry.note()
            )?;
        }
        if !self.entries.is_empty() {
            writeln!(f)?;
        }
        write!(f, "{}", self.summary())?;
        if let Some(kind) = self.total_failure() {
            write!(f, "\nAll {} targets skipped: {}.", self.counts.total(), kind)?;
        }
        Ok(())
    }
}
