//! Shared test helpers.

#![allow(dead_code)]

use tempfile::TempDir;

use hostfetch::artifact::ResolutionBatch;
use hostfetch::resolver::DomainRecord;

/// Create a temp directory for use as the execution dir / hosts file home.
/// Uses current dir (workspace) so sandbox allows full access.
pub fn temp_exec_dir() -> TempDir {
    tempfile::Builder::new()
        .prefix("hostfetch_test_")
        .tempdir_in(std::env::current_dir().unwrap_or_else(|_| std::path::Path::new(".").into()))
        .expect("temp dir")
}

pub fn record(address: &str, domain: &str) -> DomainRecord {
    DomainRecord {
        address: address.to_string(),
        domain: domain.to_string(),
    }
}

/// A small fixed batch for merge/artifact tests.
pub fn sample_batch() -> ResolutionBatch {
    ResolutionBatch::with_timestamp(
        vec![
            record("140.82.112.3", "github.com"),
            record("185.199.108.133", "raw.githubusercontent.com"),
        ],
        "2024-05-01 10:00:00",
    )
}

/// A valid fetched payload as the remote publishes it.
pub fn sample_payload() -> String {
    sample_batch().to_hosts_text("https://hosts.gitcdn.top/hosts.txt")
}
