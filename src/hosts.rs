//! System hosts file access (platform paths, whole-file read/write).
//!
//! The hosts file is owned by the operating system and the user; this module
//! only ever performs read-modify-write cycles on it, with no locking against
//! concurrent external editors.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, Result};

/// Hosts path override (e.g. in tests).
pub const HOSTS_FILE_ENV: &str = "HOSTFETCH_HOSTS_FILE";

#[cfg(windows)]
fn platform_hosts_path() -> PathBuf {
    let root = std::env::var("SystemRoot").unwrap_or_else(|_| r"C:\Windows".to_string());
    PathBuf::from(root).join(r"System32\drivers\etc\hosts")
}

#[cfg(not(windows))]
fn platform_hosts_path() -> PathBuf {
    PathBuf::from("/etc/hosts")
}

/// Path of the system hosts file for this platform.
pub fn system_hosts_path() -> PathBuf {
    platform_hosts_path()
}

/// Handle on a hosts file at a fixed path.
#[derive(Debug, Clone)]
pub struct HostsFile {
    path: PathBuf,
}

impl HostsFile {
    /// The system hosts file. If HOSTFETCH_HOSTS_FILE is set (e.g. in tests),
    /// uses that path instead.
    pub fn system() -> Self {
        if let Ok(path) = std::env::var(HOSTS_FILE_ENV) {
            return Self::at(path);
        }
        Self::at(platform_hosts_path())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the entire file.
    pub fn read(&self) -> Result<String> {
        fs::read_to_string(&self.path)
            .map_err(|e| map_fs_error(&self.path, "read hosts file", e))
    }

    /// Replace the entire file with `content`.
    pub fn write(&self, content: &str) -> Result<()> {
        fs::write(&self.path, content)
            .map_err(|e| map_fs_error(&self.path, "write hosts file", e))
    }

    /// Probe for read+write access without modifying anything. Insufficient
    /// privilege yields a `Permission` error with an actionable message.
    pub fn check_rw_permission(&self) -> Result<()> {
        match fs::OpenOptions::new().read(true).write(true).open(&self.path) {
            Ok(_) => Ok(()),
            Err(e) => Err(map_fs_error(&self.path, "open hosts file", e)),
        }
    }
}

fn map_fs_error(path: &Path, context: &str, e: io::Error) -> FetchError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        FetchError::Permission {
            path: path.to_path_buf(),
            source: e,
        }
    } else {
        FetchError::io(format!("{context} {}", path.display()), e)
    }
}
