//! Network host propagation.
//!
//! The frontend env file is the source of truth for the current host. Moving
//! to a new host is a substring reconciliation over every configured file,
//! the env file included, so a second run with the same host is a no-op.

use crate::commands::{flag_total_failure, CmdMessage, CmdResult};
use crate::config::HostConfig;
use crate::error::{Result, SyncError};
use crate::reconcile::{reconcile_texts, ReconcileOptions};
use crate::text::TextStore;
use std::net::Ipv4Addr;
use tracing::debug;

/// The host currently recorded in the env file, if any.
pub fn current_host<T: TextStore + ?Sized>(files: &T, host: &HostConfig) -> Result<Option<String>> {
    let Some(content) = files.read(&host.env_file)? else {
        debug!(path = %host.env_file.display(), "env file not found");
        return Ok(None);
    };
    Ok(setting(&content, &host.env_key).map(str::to_string))
}

/// Value of a `KEY=value` line, up to the first whitespace.
pub(crate) fn setting<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let value = line.trim_start().strip_prefix(key)?.strip_prefix('=')?;
        value.split_whitespace().next()
    })
}

/// Accepts a dotted-quad IPv4 address or `localhost`.
pub fn validate_host(candidate: &str) -> Result<()> {
    if candidate == "localhost" || candidate.parse::<Ipv4Addr>().is_ok() {
        return Ok(());
    }
    Err(SyncError::Api(format!(
        "Invalid host format: {} (expected xxx.xxx.xxx.xxx or 'localhost')",
        candidate
    )))
}

pub fn show<T: TextStore>(files: &T, host: &HostConfig) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    match current_host(files, host)? {
        Some(current) => Ok(result.with_host(current)),
        None => {
            result.add_message(CmdMessage::warning(format!(
                "No {} found in {}",
                host.env_key,
                host.env_file.display()
            )));
            Ok(result)
        }
    }
}

pub fn set<T: TextStore>(
    files: &mut T,
    host: &HostConfig,
    new_host: &str,
    options: ReconcileOptions,
) -> Result<CmdResult> {
    validate_host(new_host)?;
    host.validate()?;

    let current = current_host(files, host)?.ok_or_else(|| {
        SyncError::Api(format!(
            "Could not find current host: ensure {} exists with {} set",
            host.env_file.display(),
            host.env_key
        ))
    })?;

    let mut result = CmdResult::default();
    if current == new_host {
        result.add_message(CmdMessage::info(format!(
            "Host is already set to {}",
            new_host
        )));
        return Ok(result.with_host(current));
    }

    let targets = host.targets_for(&current, new_host);
    let report = reconcile_texts(files, &targets, options);
    let changed = report.has_changes();
    let mut result = result.with_report(report).with_host(new_host);
    flag_total_failure(&mut result);

    if changed && !options.dry_run {
        result.add_message(CmdMessage::success(format!(
            "Host updated from {} to {}",
            current, new_host
        )));
        result.add_message(CmdMessage::info(
            "Remember to restart the backend server and the frontend dev server, and update firewall rules if needed.",
        ));
    }
    Ok(result)
}
