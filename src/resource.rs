//! Bundled resources with disk overrides.
//!
//! Resources (the domain list, the index template) are resolved through an
//! ordered provider chain: a file colocated with the executable wins, the
//! compiled-in default is the fallback. Providers signal "not found" with
//! `Ok(None)` so the caller can fall through.

use std::io;
use std::path::PathBuf;

use crate::config::AppContext;
use crate::error::{FetchError, Result};

/// Domain list resource name.
pub const DOMAINS_FILE: &str = "domains.json";

/// Index page template resource name.
pub const INDEX_TEMPLATE_FILE: &str = "index.template";

static BUNDLED: &[(&str, &[u8])] = &[
    (DOMAINS_FILE, include_bytes!("../assets/domains.json")),
    (INDEX_TEMPLATE_FILE, include_bytes!("../assets/index.template")),
];

/// A source of named resources. `Ok(None)` means "not here, try the next".
pub trait ResourceProvider {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>>;
}

/// Reads resources from a directory on disk.
pub struct DirProvider {
    dir: PathBuf,
}

impl DirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ResourceProvider for DirProvider {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.dir.join(name);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FetchError::io(format!("read {}", path.display()), e)),
        }
    }
}

/// Serves the compiled-in defaults.
pub struct BundledProvider;

impl ResourceProvider for BundledProvider {
    fn load(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(BUNDLED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, bytes)| bytes.to_vec()))
    }
}

/// Try each provider in order; the first hit wins.
pub fn load_with(providers: &[&dyn ResourceProvider], name: &str) -> Result<Vec<u8>> {
    for provider in providers {
        if let Some(bytes) = provider.load(name)? {
            return Ok(bytes);
        }
    }
    Err(FetchError::io(
        format!("load resource {name}"),
        io::Error::new(io::ErrorKind::NotFound, "no provider has it"),
    ))
}

/// Resource from the execution directory if present, else the bundled copy.
pub fn exec_or_bundled(ctx: &AppContext, name: &str) -> Result<Vec<u8>> {
    let dir = DirProvider::new(&ctx.exec_dir);
    load_with(&[&dir, &BundledProvider], name)
}
