//! Read-only drift check for the network host setup.
//!
//! Confirms the frontend env file names a host and port, the backend CORS
//! origins admit the frontend on that host, and the Next.js config allows
//! LAN dev origins. Nothing is written; every failed check is an error
//! message.

use crate::commands::host::setting;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::HostConfig;
use crate::error::Result;
use crate::text::TextStore;

const FRONTEND_PORT: u16 = 3000;
const DEV_ORIGINS_SETTING: &str = "allowedDevOrigins";

pub fn run<T: TextStore>(files: &T, host: &HostConfig) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    let env = match files.read(&host.env_file)? {
        Some(content) => content,
        None => {
            result.add_message(CmdMessage::error(format!(
                "Env file {} not found.",
                host.env_file.display()
            )));
            result.add_message(CmdMessage::info("Run `cinesync host <ip>` once it exists."));
            return Ok(result);
        }
    };
    let (current, port) = match (setting(&env, &host.env_key), setting(&env, &host.port_key)) {
        (Some(current), Some(port)) => (current.to_string(), port.to_string()),
        _ => {
            result.add_message(CmdMessage::error(format!(
                "{} needs both {} and {}.",
                host.env_file.display(),
                host.env_key,
                host.port_key
            )));
            return Ok(result);
        }
    };
    result.add_message(CmdMessage::success(format!(
        "Env file: API at {}:{}",
        current, port
    )));

    check_cors(files, host, &current, &mut result)?;
    check_dev_origins(files, host, &mut result)?;

    if result.has_errors() {
        result.add_message(CmdMessage::warning("Some checks failed."));
    } else {
        result.add_message(CmdMessage::success("All checks passed."));
        result.add_message(CmdMessage::info(format!(
            "Frontend: http://{}:{}  Backend: http://{}:{}",
            current, FRONTEND_PORT, current, port
        )));
    }
    Ok(result.with_host(current))
}

fn check_cors<T: TextStore>(
    files: &T,
    host: &HostConfig,
    current: &str,
    result: &mut CmdResult,
) -> Result<()> {
    let Some(content) = files.read(&host.cors_file)? else {
        result.add_message(CmdMessage::error(format!(
            "CORS: {} not found.",
            host.cors_file.display()
        )));
        return Ok(());
    };
    let Some(origins) = content.lines().find_map(|line| {
        line.trim_start()
            .strip_prefix(host.cors_key.as_str())?
            .trim_start()
            .strip_prefix('=')
            .map(str::trim)
    }) else {
        result.add_message(CmdMessage::error(format!(
            "CORS: {} is not set in {}.",
            host.cors_key,
            host.cors_file.display()
        )));
        return Ok(());
    };

    let wanted = format!("{}:{}", current, FRONTEND_PORT);
    let local = format!("localhost:{}", FRONTEND_PORT);
    if origins.contains(&wanted) || origins.contains(&local) {
        result.add_message(CmdMessage::success(format!("CORS: allows {}", wanted)));
    } else {
        result.add_message(CmdMessage::error(format!(
            "CORS: missing {} (current: {})",
            wanted, origins
        )));
    }
    Ok(())
}

fn check_dev_origins<T: TextStore>(files: &T, host: &HostConfig, result: &mut CmdResult) -> Result<()> {
    match files.read(&host.next_config)? {
        None => result.add_message(CmdMessage::error(format!(
            "Dev origins: {} not found.",
            host.next_config.display()
        ))),
        Some(content) if content.contains(DEV_ORIGINS_SETTING) => {
            result.add_message(CmdMessage::success("Dev origins: configured for network access"))
        }
        Some(_) => result.add_message(CmdMessage::error(format!(
            "Dev origins: add {} to {}.",
            DEV_ORIGINS_SETTING,
            host.next_config.display()
        ))),
    }
    Ok(())
}
