//! Client mode: fetch the published hosts payload and merge it into the
//! system hosts file.

use async_trait::async_trait;
use tracing::info;

use crate::error::{FetchError, Result};
use crate::hosts::HostsFile;
use crate::merge::{self, MergeStrategy};
use crate::scheduler::CycleTask;

/// One client fetch-and-merge cycle, reused across ticks.
pub struct ClientCycle {
    hosts: HostsFile,
    url: String,
    strategy: MergeStrategy,
    http: reqwest::Client,
}

impl ClientCycle {
    pub fn new(hosts: HostsFile, url: String, strategy: MergeStrategy) -> Self {
        Self {
            hosts,
            url,
            strategy,
            http: reqwest::Client::new(),
        }
    }

    /// Read the hosts file, fetch the remote payload, merge, write back.
    /// The payload is validated before the file is touched; any failure
    /// leaves the hosts file as it was.
    pub async fn fetch_and_merge(&self) -> Result<()> {
        let current = self.hosts.read()?;
        let payload = self.fetch_payload().await?;
        let merged = merge::merge(&current, &payload, self.strategy)?;
        self.hosts.write(&merged)?;
        Ok(())
    }

    async fn fetch_payload(&self) -> Result<String> {
        let resp = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| FetchError::network("fetch remote hosts", e))?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(FetchError::Network(format!(
                "fetch remote hosts: unexpected status {status}"
            )));
        }

        resp.text()
            .await
            .map_err(|e| FetchError::network("read remote hosts body", e))
    }
}

#[async_trait]
impl CycleTask for ClientCycle {
    async fn run_cycle(&self) -> anyhow::Result<()> {
        self.fetch_and_merge().await?;
        info!(url = %self.url, path = %self.hosts.path().display(), "hosts file updated");
        Ok(())
    }
}
