//! Execution context and persisted configuration.
//!
//! Supports HOSTFETCH_DIR / HOSTFETCH_DEBUG env overrides for testing.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::DEFAULT_REMOTE_URL;
use crate::merge::MergeStrategy;

/// Debug flag: interval unit becomes seconds and the execution directory
/// becomes the working directory.
pub const DEBUG_ENV: &str = "HOSTFETCH_DEBUG";

/// Execution-directory override (e.g. in tests).
pub const DIR_ENV: &str = "HOSTFETCH_DIR";

/// Process-wide context, computed once at startup and immutable after.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Directory holding generated artifacts, conf.toml, and resource
    /// overrides. The executable's directory in normal operation.
    pub exec_dir: PathBuf,
    pub debug: bool,
}

impl AppContext {
    /// Resolve the context from the environment (respects HOSTFETCH_DIR and
    /// HOSTFETCH_DEBUG).
    pub fn init() -> Result<Self> {
        let debug = std::env::var_os(DEBUG_ENV).is_some();
        let exec_dir = if let Some(dir) = std::env::var_os(DIR_ENV) {
            PathBuf::from(dir)
        } else if debug {
            std::env::current_dir().context("resolve working directory")?
        } else {
            std::env::current_exe()
                .context("resolve executable path")?
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        Ok(Self { exec_dir, debug })
    }

    /// Context for testing: a temp dir as the execution directory, debug on.
    pub fn for_test(dir: impl AsRef<Path>) -> Self {
        Self {
            exec_dir: dir.as_ref().to_path_buf(),
            debug: true,
        }
    }

    /// Path of a generated artifact (hosts.txt, hosts.json, index.html).
    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.exec_dir.join(name)
    }

    fn conf_file(&self) -> PathBuf {
        self.exec_dir.join("conf.toml")
    }
}

/// Client-mode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConf {
    /// Fetch interval in minutes (seconds under debug).
    pub interval: u64,
    /// Remote hosts source URL.
    pub url: String,
    /// Merge strategy applied to the hosts file.
    pub strategy: MergeStrategy,
}

impl Default for ClientConf {
    fn default() -> Self {
        Self {
            interval: 60,
            url: DEFAULT_REMOTE_URL.to_string(),
            strategy: MergeStrategy::Filter,
        }
    }
}

/// Server-mode settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConf {
    /// Publish interval in minutes (seconds under debug).
    pub interval: u64,
    /// Listen port for the artifact endpoint.
    pub port: u16,
}

impl Default for ServerConf {
    fn default() -> Self {
        Self {
            interval: 60,
            port: 9898,
        }
    }
}

/// Persisted conf.toml, colocated with the executable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConf {
    pub client: ClientConf,
    pub server: ServerConf,
}

impl FetchConf {
    /// Load conf.toml (with shared lock when the file exists). A missing file
    /// yields the defaults and writes them back for the operator to edit.
    pub fn load(ctx: &AppContext) -> Result<FetchConf> {
        let path = ctx.conf_file();
        if path.is_file() {
            let mut file = fs::OpenOptions::new().read(true).open(&path)?;
            fs2::FileExt::lock_shared(&file)?;
            use std::io::Read;
            let mut s = String::new();
            file.read_to_string(&mut s)?;
            let conf: FetchConf =
                toml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
            Ok(conf)
        } else {
            let conf = FetchConf::default();
            if let Err(e) = conf.save(ctx) {
                tracing::warn!("could not write default conf.toml: {e:#}");
            }
            Ok(conf)
        }
    }

    /// Save conf.toml (with exclusive lock). Creates parent dirs if needed.
    pub fn save(&self, ctx: &AppContext) -> Result<()> {
        let path = ctx.conf_file();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p)?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        fs2::FileExt::lock_exclusive(&file)?;
        let s = toml::to_string_pretty(self)?;
        use std::io::Write;
        file.write_all(s.as_bytes())?;
        Ok(())
    }
}
