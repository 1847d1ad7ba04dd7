//! # Reconciler
//!
//! Drives a list of desired targets through the diff engine and an adapter,
//! classifying each one and collecting the results in a [`RunReport`].
//!
//! ## Per-target state machine
//!
//! ```text
//!              ┌── identifier empty ─────────────────────────► SKIPPED
//!              │
//!   PENDING ───┼── absent ──► insert ──┬── ok ───────────────► CREATED
//!              │                       └── duplicate ─► re-fetch ─┐
//!              │                                                  ▼
//!              └── present ──► diff ──┬── empty ─────────────► UNCHANGED
//!                                     └── apply ──┬── ok ────► UPDATED
//!                                                 └── err ───► SKIPPED
//! ```
//!
//! Targets are processed strictly in input order, one at a time. A failing
//! target is recorded as SKIPPED with its reason and the loop moves on; no
//! adapter error ever aborts a run.

use crate::diff::{field_diff, substring_diff, FieldDelta};
use crate::error::{Result, SyncError};
use crate::model::{Record, TextTarget};
use crate::report::{Detail, Outcome, ReportEntry, RunReport, SkipKind, SkipReason};
use crate::store::EntityStore;
use crate::text::TextStore;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Selects the diff algorithm for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// Records in an entity store, compared field by field.
    Field,
    /// Text files, rewritten by literal substring replacement.
    Substring,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Classify exactly as a real run would, but stage every insert, patch
    /// and write in memory instead of touching the adapter.
    pub dry_run: bool,
    /// Only insert missing records; existing ones are left as they are.
    pub create_only: bool,
}

/// The adapter a run talks to.
pub enum Adapter<'a> {
    Entity(&'a mut dyn EntityStore),
    Text(&'a mut dyn TextStore),
}

impl Adapter<'_> {
    pub fn kind(&self) -> TargetKind {
        match self {
            Adapter::Entity(_) => TargetKind::Field,
            Adapter::Text(_) => TargetKind::Substring,
        }
    }
}

/// One unit of desired state.
#[derive(Debug, Clone, PartialEq)]
pub enum Desired {
    Record(Record),
    Text(TextTarget),
}

impl Desired {
    pub fn kind(&self) -> TargetKind {
        match self {
            Desired::Record(_) => TargetKind::Field,
            Desired::Text(_) => TargetKind::Substring,
        }
    }
}

/// Reconcile `desired` against `adapter` using the `kind` algorithm.
///
/// Returns an error only when the inputs break the calling contract: the
/// adapter or one of the targets does not match `kind`. Everything that can
/// go wrong with an individual target ends up in the report instead.
pub fn reconcile(
    adapter: Adapter<'_>,
    desired: &[Desired],
    kind: TargetKind,
    options: ReconcileOptions,
) -> Result<RunReport> {
    if adapter.kind() != kind {
        return Err(SyncError::Contract(format!(
            "{:?} reconciliation needs a {:?} adapter",
            kind,
            adapter.kind()
        )));
    }
    if let Some(position) = desired.iter().position(|d| d.kind() != kind) {
        return Err(SyncError::Contract(format!(
            "target #{} is not a {:?} target",
            position + 1,
            kind
        )));
    }

    let report = match adapter {
        Adapter::Entity(store) => {
            let records: Vec<&Record> = desired
                .iter()
                .filter_map(|d| match d {
                    Desired::Record(r) => Some(r),
                    Desired::Text(_) => None,
                })
                .collect();
            reconcile_records(store, records, options)
        }
        Adapter::Text(files) => {
            let targets: Vec<&TextTarget> = desired
                .iter()
                .filter_map(|d| match d {
                    Desired::Text(t) => Some(t),
                    Desired::Record(_) => None,
                })
                .collect();
            reconcile_texts(files, targets, options)
        }
    };
    Ok(report)
}

/// Field-diff run over an entity store.
pub fn reconcile_records<'r, S, I>(store: &mut S, records: I, options: ReconcileOptions) -> RunReport
where
    S: EntityStore + ?Sized,
    I: IntoIterator<Item = &'r Record>,
{
    let mut report = RunReport::new(TargetKind::Field, options.dry_run);
    if options.dry_run {
        let mut staged = StagedStore::new(&*store);
        push_records(&mut staged, records, options, &mut report);
    } else {
        push_records(store, records, options, &mut report);
    }
    report.finish()
}

fn push_records<'r, S, I>(store: &mut S, records: I, options: ReconcileOptions, report: &mut RunReport)
where
    S: EntityStore + ?Sized,
    I: IntoIterator<Item = &'r Record>,
{
    for (position, record) in records.into_iter().enumerate() {
        let entry = reconcile_record(store, position, record, options);
        log_entry(&entry);
        report.push(entry);
    }
}

/// Substring-diff run over text files.
pub fn reconcile_texts<'t, T, I>(files: &mut T, targets: I, options: ReconcileOptions) -> RunReport
where
    T: TextStore + ?Sized,
    I: IntoIterator<Item = &'t TextTarget>,
{
    let mut report = RunReport::new(TargetKind::Substring, options.dry_run);
    if options.dry_run {
        let mut staged = StagedText::new(&*files);
        push_texts(&mut staged, targets, &mut report);
    } else {
        push_texts(files, targets, &mut report);
    }
    report.finish()
}

fn push_texts<'t, T, I>(files: &mut T, targets: I, report: &mut RunReport)
where
    T: TextStore + ?Sized,
    I: IntoIterator<Item = &'t TextTarget>,
{
    for (position, target) in targets.into_iter().enumerate() {
        let entry = reconcile_text(files, position, target);
        log_entry(&entry);
        report.push(entry);
    }
}

/// Dry-run view of an entity store: reads fall through to the real store,
/// writes land in memory so later targets see them.
struct StagedStore<'s, S: ?Sized> {
    inner: &'s S,
    staged: HashMap<String, Record>,
}

impl<'s, S: EntityStore + ?Sized> StagedStore<'s, S> {
    fn new(inner: &'s S) -> Self {
        Self {
            inner,
            staged: HashMap::new(),
        }
    }
}

impl<S: EntityStore + ?Sized> EntityStore for StagedStore<'_, S> {
    fn key_field(&self) -> &str {
        self.inner.key_field()
    }

    fn find(&self, identifier: &str) -> Result<Option<Record>> {
        match self.staged.get(identifier) {
            Some(record) => Ok(Some(record.clone())),
            None => self.inner.find(identifier),
        }
    }

    fn insert(&mut self, record: &Record) -> Result<String> {
        let key_field = self.key_field();
        let identifier = record
            .identifier(key_field)
            .ok_or_else(|| SyncError::InvalidIdentifier(record.label(key_field)))?
            .to_string();
        if self.find(&identifier)?.is_some() {
            return Err(SyncError::DuplicateIdentifier(identifier));
        }
        self.staged.insert(identifier.clone(), record.clone());
        Ok(identifier)
    }

    fn apply_delta(&mut self, identifier: &str, delta: &FieldDelta) -> Result<()> {
        let mut record = self
            .find(identifier)?
            .ok_or_else(|| SyncError::NotFound(identifier.to_string()))?;
        record.apply(delta);
        self.staged.insert(identifier.to_string(), record);
        Ok(())
    }
}

/// Dry-run view of the text files, keyed by path.
struct StagedText<'s, T: ?Sized> {
    inner: &'s T,
    staged: HashMap<PathBuf, String>,
}

impl<'s, T: TextStore + ?Sized> StagedText<'s, T> {
    fn new(inner: &'s T) -> Self {
        Self {
            inner,
            staged: HashMap::new(),
        }
    }
}

impl<T: TextStore + ?Sized> TextStore for StagedText<'_, T> {
    fn read(&self, path: &Path) -> Result<Option<String>> {
        match self.staged.get(path) {
            Some(content) => Ok(Some(content.clone())),
            None => self.inner.read(path),
        }
    }

    fn write(&mut self, path: &Path, content: &str) -> Result<()> {
        self.staged.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }
}

fn reconcile_record<S: EntityStore + ?Sized>(
    store: &mut S,
    position: usize,
    desired: &Record,
    options: ReconcileOptions,
) -> ReportEntry {
    let key_field = store.key_field().to_string();
    let Some(identifier) = desired.identifier(&key_field) else {
        let reason = SkipReason::invalid_identifier(format!("missing or empty `{}`", key_field));
        return ReportEntry::skipped(position, desired.label(&key_field), reason);
    };

    debug!(identifier, "looking up record");
    let existing = match store.find(identifier) {
        Ok(existing) => existing,
        Err(e) => return ReportEntry::skipped(position, identifier, SkipReason::from(&e)),
    };

    let existing = match existing {
        Some(existing) => existing,
        None => match store.insert(desired) {
            Ok(_) => {
                let detail = Detail::Fields(FieldDelta::creation(desired));
                return ReportEntry::new(position, identifier, Outcome::Created, detail);
            }
            Err(SyncError::DuplicateIdentifier(_)) => {
                debug!(identifier, "lost insert race, re-fetching");
                match store.find(identifier) {
                    Ok(Some(existing)) => existing,
                    Ok(None) => {
                        let reason = SkipReason::new(
                            SkipKind::DuplicateIdentifier,
                            format!("{} was reported as duplicate but cannot be found", identifier),
                        );
                        return ReportEntry::skipped(position, identifier, reason);
                    }
                    Err(e) => {
                        return ReportEntry::skipped(position, identifier, SkipReason::from(&e))
                    }
                }
            }
            Err(e) => return ReportEntry::skipped(position, identifier, SkipReason::from(&e)),
        },
    };

    if options.create_only {
        return ReportEntry::new(position, identifier, Outcome::Unchanged, Detail::None);
    }

    let delta = field_diff(desired, &existing);
    if delta.is_empty() {
        return ReportEntry::new(position, identifier, Outcome::Unchanged, Detail::None);
    }
    if let Err(e) = store.apply_delta(identifier, &delta) {
        return ReportEntry::skipped(position, identifier, SkipReason::from(&e));
    }
    ReportEntry::new(position, identifier, Outcome::Updated, Detail::Fields(delta))
}

fn reconcile_text<T: TextStore + ?Sized>(
    files: &mut T,
    position: usize,
    target: &TextTarget,
) -> ReportEntry {
    let label = target.label();
    if target.path.as_os_str().is_empty() {
        let reason = SkipReason::invalid_identifier("empty path");
        return ReportEntry::skipped(position, label, reason);
    }

    let original = match files.read(&target.path) {
        Ok(Some(content)) => content,
        Ok(None) => return ReportEntry::skipped(position, &label, SkipReason::file_not_found(&label)),
        Err(e) => return ReportEntry::skipped(position, label, SkipReason::from(&e)),
    };

    let delta = substring_diff(&original, &target.replacements);
    if !delta.is_changed() {
        return ReportEntry::new(position, label, Outcome::Unchanged, Detail::None);
    }
    if let Err(e) = files.write(&target.path, &delta.content) {
        return ReportEntry::skipped(position, label, SkipReason::from(&e));
    }
    ReportEntry::new(position, label, Outcome::Updated, Detail::Replacements(delta.hits))
}

fn log_entry(entry: &ReportEntry) {
    match entry.skip_reason() {
        Some(reason) => warn!(
            target_id = %entry.label(),
            kind = %reason.kind,
            "skipped: {}",
            reason.message
        ),
        None => info!(target_id = %entry.label(), outcome = %entry.outcome, "reconciled"),
    }
}
