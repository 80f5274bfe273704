//! Artifacts derived from a resolution batch: hosts.json, hosts.txt, and
//! the rendered index page.

use std::fmt::Write as _;

use chrono::Local;

use crate::error::{FetchError, Result};
use crate::merge::{BLOCK_BEGIN, BLOCK_END};
use crate::resolver::DomainRecord;

/// Published hosts.txt of the reference deployment; default client source
/// and the update URL stamped into generated blocks.
pub const DEFAULT_REMOTE_URL: &str = "https://hosts.gitcdn.top/hosts.txt";

/// Token in the index template replaced with the fetch timestamp.
pub const TIME_PLACEHOLDER: &str = "<!--time-->";

pub const HOSTS_JSON: &str = "hosts.json";
pub const HOSTS_TXT: &str = "hosts.txt";
pub const INDEX_HTML: &str = "index.html";

/// One resolution cycle's records plus the moment they were fetched.
/// Immutable once built; a new cycle builds a new batch from scratch.
#[derive(Debug, Clone)]
pub struct ResolutionBatch {
    pub records: Vec<DomainRecord>,
    /// Local time, `YYYY-MM-DD HH:MM:SS`.
    pub fetched_at: String,
}

impl ResolutionBatch {
    pub fn new(records: Vec<DomainRecord>) -> Self {
        Self {
            records,
            fetched_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Batch with a caller-supplied timestamp (tests).
    pub fn with_timestamp(records: Vec<DomainRecord>, fetched_at: impl Into<String>) -> Self {
        Self {
            records,
            fetched_at: fetched_at.into(),
        }
    }

    /// JSON array of `[address, domain]` pairs, in resolution order.
    pub fn to_json(&self) -> Result<String> {
        let pairs: Vec<[&str; 2]> = self
            .records
            .iter()
            .map(|r| [r.address.as_str(), r.domain.as_str()])
            .collect();
        serde_json::to_string(&pairs).map_err(|e| FetchError::parse("serialize hosts.json", e))
    }

    /// Sentinel-delimited hosts text block: one padded line per record, then
    /// the fetch-time and update-url footer, then a trailing blank line.
    pub fn to_hosts_text(&self, update_url: &str) -> String {
        let mut out = String::new();
        out.push_str(BLOCK_BEGIN);
        out.push('\n');
        for record in &self.records {
            // Address column padded to 28, matching the published artifacts.
            let _ = writeln!(out, "{:<28}{}", record.address, record.domain);
        }
        let _ = writeln!(out, "# last fetch time: {}", self.fetched_at);
        let _ = writeln!(out, "# update url: {update_url}");
        out.push_str(BLOCK_END);
        out.push_str("\n\n");
        out
    }

    /// Render the index page: the template with its timestamp token filled.
    pub fn render_index(&self, template: &str) -> String {
        template.replacen(TIME_PLACEHOLDER, &self.fetched_at, 1)
    }
}
