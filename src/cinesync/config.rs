use crate::atomic::write_atomic;
use crate::error::{Result, SyncError};
use crate::model::{Replacement, TextTarget};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "cinesync.json";
pub const HOST_PLACEHOLDER: &str = "{host}";
const DEFAULT_DATA_DIR: &str = ".cinesync/data";
const DEFAULT_KEY_FIELD: &str = "title";
const PROPERTIES_FILE: &str = "backend/src/main/resources/application.properties";

/// A named collection and the field that identifies its documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionConfig {
    pub name: String,
    pub key_field: String,

    /// Match keys case-insensitively by lowercasing them before seeding.
    #[serde(default)]
    pub fold_case: bool,
}

impl CollectionConfig {
    fn new(name: &str, key_field: &str) -> Self {
        Self {
            name: name.to_string(),
            key_field: key_field.to_string(),
            fold_case: false,
        }
    }

    fn folded(mut self) -> Self {
        self.fold_case = true;
        self
    }
}

/// A file that embeds the network host, and the literal snippets it embeds
/// it in. Each pattern carries a `{host}` placeholder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostTarget {
    pub path: PathBuf,
    pub patterns: Vec<String>,
}

impl HostTarget {
    fn new(path: &str, patterns: &[&str]) -> Self {
        Self {
            path: PathBuf::from(path),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HostConfig {
    /// Env file holding the current host; it is the source of truth.
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,

    #[serde(default = "default_env_key")]
    pub env_key: String,

    #[serde(default = "default_host_targets")]
    pub targets: Vec<HostTarget>,

    /// Env key for the backend port, checked by `verify`.
    #[serde(default = "default_port_key")]
    pub port_key: String,

    /// Backend properties file and the key listing allowed CORS origins.
    #[serde(default = "default_cors_file")]
    pub cors_file: PathBuf,

    #[serde(default = "default_cors_key")]
    pub cors_key: String,

    /// Frontend dev-server config that must allow LAN origins.
    #[serde(default = "default_next_config")]
    pub next_config: PathBuf,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
            env_key: default_env_key(),
            targets: default_host_targets(),
            port_key: default_port_key(),
            cors_file: default_cors_file(),
            cors_key: default_cors_key(),
            next_config: default_next_config(),
        }
    }
}

impl HostConfig {
    /// Text targets that move every configured file from `old` to `new`.
    pub fn targets_for(&self, old: &str, new: &str) -> Vec<TextTarget> {
        self.targets
            .iter()
            .map(|target| {
                let replacements = target
                    .patterns
                    .iter()
                    .map(|p| {
                        Replacement::new(
                            p.replace(HOST_PLACEHOLDER, old),
                            p.replace(HOST_PLACEHOLDER, new),
                        )
                    })
                    .collect();
                TextTarget::new(target.path.clone(), replacements)
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.env_key.trim().is_empty() {
            return Err(SyncError::Config("host.env_key cannot be empty".to_string()));
        }
        for target in &self.targets {
            if let Some(p) = target
                .patterns
                .iter()
                .find(|p| !p.contains(HOST_PLACEHOLDER))
            {
                return Err(SyncError::Config(format!(
                    "pattern `{}` for {} has no {} placeholder",
                    p,
                    target.path.display(),
                    HOST_PLACEHOLDER
                )));
            }
        }
        Ok(())
    }
}

/// Configuration for cinesync, stored in `cinesync.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    /// Where collections live, relative to the project root unless absolute
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_collections")]
    pub collections: Vec<CollectionConfig>,

    #[serde(default)]
    pub host: HostConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_collections() -> Vec<CollectionConfig> {
    vec![
        CollectionConfig::new("movies", "title"),
        CollectionConfig::new("showrooms", "_id"),
        CollectionConfig::new("users", "email").folded(),
    ]
}

fn default_env_file() -> PathBuf {
    PathBuf::from("cinema-frontend/.env.local")
}

fn default_env_key() -> String {
    "NEXT_PUBLIC_API_HOST".to_string()
}

fn default_port_key() -> String {
    "NEXT_PUBLIC_API_PORT".to_string()
}

fn default_cors_file() -> PathBuf {
    PathBuf::from(PROPERTIES_FILE)
}

fn default_cors_key() -> String {
    "spring.web.cors.allowed-origins".to_string()
}

fn default_next_config() -> PathBuf {
    PathBuf::from("cinema-frontend/next.config.ts")
}

fn default_host_targets() -> Vec<HostTarget> {
    let controller_dir = "backend/src/main/java/edu/uga/csci4050/cinema/controller";
    let mut targets = vec![
        HostTarget::new(
            "cinema-frontend/.env.local",
            &["NEXT_PUBLIC_API_HOST={host}"],
        ),
        HostTarget::new(
            "cinema-frontend/src/config/apiConfig.ts",
            &[r#"const API_HOST = process.env.NEXT_PUBLIC_API_HOST || "{host}";"#],
        ),
        HostTarget::new(
            PROPERTIES_FILE,
            &["http://{host}:3000", "http://{host}:8080"],
        ),
    ];
    for controller in [
        "BookingController",
        "TicketController",
        "ShowroomController",
        "PromotionController",
    ] {
        targets.push(HostTarget::new(
            &format!("{}/{}.java", controller_dir, controller),
            &[r#""http://{host}:3000""#],
        ));
    }
    targets
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            collections: default_collections(),
            host: HostConfig::default(),
        }
    }
}

impl SyncConfig {
    /// `cinesync.json` in `dir`; defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                SyncError::Config(format!("{}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Pretty-printed, replacing any previous file atomically.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(self)?;
        write_atomic(&dir.join(CONFIG_FILENAME), &content)?;
        Ok(())
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }

    /// Key field for a collection; unknown collections are keyed by title.
    pub fn key_field_for(&self, collection: &str) -> &str {
        self.collection(collection)
            .map(|c| c.key_field.as_str())
            .unwrap_or(DEFAULT_KEY_FIELD)
    }

    pub fn folds_case(&self, collection: &str) -> bool {
        self.collection(collection).is_some_and(|c| c.fold_case)
    }

    pub fn data_dir_in(&self, root: &Path) -> PathBuf {
        if self.data_dir.is_absolute() {
            self.data_dir.clone()
        } else {
            root.join(&self.data_dir)
        }
    }
}
