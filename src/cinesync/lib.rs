//! # Cinesync Architecture
//!
//! Cinesync is a **declarative reconciliation library** for the cinema app's
//! operational data: seed documents (movies, showrooms, admin accounts) and the
//! network host baked into frontend and backend configuration files. The CLI
//! is one client of it.
//!
//! Given a desired state, it computes the minimal change against the live
//! state, applies it, and reports exactly what changed. It never deletes or
//! nulls anything the desired state does not mention.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints reports, sets exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs) + Commands (commands/*.rs)              │
//! │  - seed, rewrite, host, verify, config                      │
//! │  - Return structured CmdResult values, never print          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Reconciler (reconcile.rs) → Diff Engine (diff.rs)          │
//! │  - Per-target state machine, Run Report (report.rs)         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Adapters                                                   │
//! │  - store/: EntityStore (JsonCollection, MemoryCollection)   │
//! │  - text/:  TextStore (FsText, MemoryText)                   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Targets are processed one at a time, in input order.
//! - One failing target never aborts a run; it is reported as skipped.
//! - Reconciling the same desired state twice yields no changes the second
//!   time.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: seed / rewrite / host / verify / config operations
//! - [`reconcile`]: The reconciliation state machine
//! - [`diff`]: Field and substring diffing
//! - [`report`]: Run reports
//! - [`store`]: Entity store abstraction and implementations
//! - [`text`]: Text file abstraction and implementations
//! - [`model`]: Records, field values, text targets
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
mod atomic;
pub mod commands;
pub mod config;
pub mod diff;
pub mod error;
pub mod model;
pub mod reconcile;
pub mod report;
pub mod store;
pub mod text;
