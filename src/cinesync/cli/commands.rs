use super::print::{eprint_messages, print_config, print_json, print_messages, print_report};
use super::setup::{Cli, Commands};
use cinesync::api::{CmdResult, SyncApi};
use cinesync::commands::{rewrite, seed};
use cinesync::config::{SyncConfig, CONFIG_FILENAME};
use cinesync::error::Result;
use cinesync::reconcile::ReconcileOptions;
use cinesync::store::fs::JsonCollection;
use cinesync::store::EntityStore;
use cinesync::text::fs::FsText;
use clap::Parser;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CINESYNC_LOG";

struct AppContext {
    api: SyncApi<JsonCollection, FsText>,
    root: PathBuf,
    json: bool,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = match &cli.root {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };
    let config = load_config(&root)?;
    let options = ReconcileOptions {
        dry_run: cli.dry_run,
        create_only: matches!(
            cli.command,
            Commands::Seed {
                create_only: true,
                ..
            }
        ),
    };

    let (collection, key) = match &cli.command {
        Commands::Seed {
            collection, key, ..
        } => (collection.clone(), key.clone()),
        // The store is only touched by `seed`.
        _ => (default_collection(&config), None),
    };
    // An explicit --key opts out of the configured case folding.
    let fold_case = key.is_none() && config.folds_case(&collection);
    let mut ctx = init_context(root, config, &collection, key, options, cli.json);

    let result = match cli.command {
        Commands::Seed { file, .. } => handle_seed(&mut ctx, &file, fold_case)?,
        Commands::Rewrite { file } => handle_rewrite(&mut ctx, &file)?,
        Commands::Host { new_host: None } => ctx.api.current_host()?,
        Commands::Host {
            new_host: Some(host),
        } => ctx.api.set_host(&host)?,
        Commands::Verify => ctx.api.verify()?,
        Commands::Config => ctx.api.config()?,
        Commands::Init => ctx.api.init(&ctx.root)?,
    };

    render(&ctx, &result)?;
    if result.has_errors() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Project config wins; the user-wide config is the fallback.
fn load_config(root: &Path) -> Result<SyncConfig> {
    if root.join(CONFIG_FILENAME).exists() {
        debug!(dir = %root.display(), "using project config");
        return SyncConfig::load(root);
    }
    if let Some(dirs) = ProjectDirs::from("com", "cinesync", "cinesync") {
        let global = dirs.config_dir();
        if global.join(CONFIG_FILENAME).exists() {
            debug!(dir = %global.display(), "using user config");
            return SyncConfig::load(global);
        }
    }
    Ok(SyncConfig::default())
}

fn default_collection(config: &SyncConfig) -> String {
    config
        .collections
        .first()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "movies".to_string())
}

fn init_context(
    root: PathBuf,
    config: SyncConfig,
    collection: &str,
    key: Option<String>,
    options: ReconcileOptions,
    json: bool,
) -> AppContext {
    let key_field = key.unwrap_or_else(|| config.key_field_for(collection).to_string());
    let store = JsonCollection::open(&config.data_dir_in(&root), collection, &key_field);
    debug!(path = %store.path().display(), key = %key_field, "collection opened");

    let files = FsText::new(root.clone());
    let api = SyncApi::new(store, files, config).with_options(options);
    AppContext { api, root, json }
}

fn resolve(ctx: &AppContext, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        ctx.root.join(file)
    }
}

fn handle_seed(ctx: &mut AppContext, file: &Path, fold_case: bool) -> Result<CmdResult> {
    let mut records = seed::load_records(&resolve(ctx, file))?;
    if fold_case {
        let key_field = ctx.api.store().key_field().to_string();
        seed::fold_key_case(&mut records, &key_field);
    }
    ctx.api.seed(&records)
}

fn handle_rewrite(ctx: &mut AppContext, file: &Path) -> Result<CmdResult> {
    let targets = rewrite::load_targets(&resolve(ctx, file))?;
    ctx.api.rewrite(&targets)
}

fn render(ctx: &AppContext, result: &CmdResult) -> Result<()> {
    if ctx.json {
        if let Some(report) = &result.report {
            print_json(report)?;
        } else if let Some(config) = &result.config {
            print_config(config)?;
        } else if let Some(host) = &result.host {
            print_json(&serde_json::json!({ "host": host }))?;
        }
        eprint_messages(&result.messages);
        return Ok(());
    }

    if let Some(report) = &result.report {
        print_report(report);
    }
    if let Some(config) = &result.config {
        print_config(config)?;
    }
    if let Some(host) = &result.host {
        if result.report.is_none() {
            println!("Current host: {}", host);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
