use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "cinesync", bin_name = "cinesync", version = get_version())]
#[command(
    about = "Reconcile seed data and configuration files for the cinema app",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Report what would change without writing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print the run report as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert missing documents and patch changed fields in a collection
    Seed {
        /// Collection name (e.g. movies, showrooms, users)
        collection: String,

        /// JSON file with an array of documents
        file: PathBuf,

        /// Field identifying documents (defaults to the configured key)
        #[arg(long)]
        key: Option<String>,

        /// Only insert missing documents, never update existing ones
        #[arg(long)]
        create_only: bool,
    },

    /// Apply literal replacements to text files
    Rewrite {
        /// JSON file with an array of {path, replacements} targets
        file: PathBuf,
    },

    /// Show the current network host, or move every config file to a new one
    Host {
        /// New host (IPv4 address or localhost)
        new_host: Option<String>,
    },

    /// Check that the env file, backend CORS and Next.js config agree on the host
    Verify,

    /// Show the effective configuration
    Config,

    /// Write a default cinesync.json into the project root
    Init,
}
