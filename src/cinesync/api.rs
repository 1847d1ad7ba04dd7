//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients.
//!
//! It dispatches to `commands/*.rs`, carries the run options and the loaded
//! configuration, and returns structured `CmdResult`s. It never prints.
//!
//! `SyncApi<S: EntityStore, T: TextStore>` is generic over both adapters:
//! - Production: `SyncApi<JsonCollection, FsText>`
//! - Testing: `SyncApi<MemoryCollection, MemoryText>`

use crate::commands;
use crate::config::SyncConfig;
use crate::error::Result;
use crate::model::{Record, TextTarget};
use crate::reconcile::{self, Adapter, Desired, ReconcileOptions, TargetKind};
use crate::report::RunReport;
use crate::store::EntityStore;
use crate::text::TextStore;
use std::path::Path;

pub struct SyncApi<S: EntityStore, T: TextStore> {
    store: S,
    files: T,
    config: SyncConfig,
    options: ReconcileOptions,
}

impl<S: EntityStore, T: TextStore> SyncApi<S, T> {
    pub fn new(store: S, files: T, config: SyncConfig) -> Self {
        Self {
            store,
            files,
            config,
            options: ReconcileOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    pub fn seed(&mut self, records: &[Record]) -> Result<commands::CmdResult> {
        commands::seed::run(&mut self.store, records, self.options)
    }

    pub fn rewrite(&mut self, targets: &[TextTarget]) -> Result<commands::CmdResult> {
        commands::rewrite::run(&mut self.files, targets, self.options)
    }

    pub fn current_host(&self) -> Result<commands::CmdResult> {
        commands::host::show(&self.files, &self.config.host)
    }

    pub fn set_host(&mut self, new_host: &str) -> Result<commands::CmdResult> {
        commands::host::set(&mut self.files, &self.config.host, new_host, self.options)
    }

    pub fn verify(&self) -> Result<commands::CmdResult> {
        commands::verify::run(&self.files, &self.config.host)
    }

    /// Generic entry point: `kind` picks the adapter and the diff algorithm.
    pub fn reconcile(&mut self, desired: &[Desired], kind: TargetKind) -> Result<RunReport> {
        let adapter = match kind {
            TargetKind::Field => Adapter::Entity(&mut self.store),
            TargetKind::Substring => Adapter::Text(&mut self.files),
        };
        reconcile::reconcile(adapter, desired, kind, self.options)
    }

    pub fn config(&self) -> Result<commands::CmdResult> {
        commands::config::show(&self.config)
    }

    pub fn init(&self, dir: &Path) -> Result<commands::CmdResult> {
        commands::config::init(dir)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn files(&self) -> &T {
        &self.files
    }
}

pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};
