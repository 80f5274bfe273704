//! Server mode: resolve the domain list and publish artifacts.

pub mod http;

use async_trait::async_trait;
use tracing::info;

use crate::artifact::{ResolutionBatch, DEFAULT_REMOTE_URL, HOSTS_JSON, HOSTS_TXT, INDEX_HTML};
use crate::config::AppContext;
use crate::error::{FetchError, Result};
use crate::resolver;
use crate::resource::{self, DOMAINS_FILE, INDEX_TEMPLATE_FILE};
use crate::scheduler::CycleTask;

/// One server resolve-and-publish cycle, reused across ticks.
pub struct ServerCycle {
    ctx: AppContext,
}

impl ServerCycle {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Domain list: file colocated with the executable, else the bundled
    /// default. A JSON array of domain-name strings.
    pub fn load_domains(&self) -> Result<Vec<String>> {
        let raw = resource::exec_or_bundled(&self.ctx, DOMAINS_FILE)?;
        serde_json::from_slice(&raw).map_err(|e| FetchError::parse("parse domains.json", e))
    }

    /// Resolve every domain and write the three artifacts into the execution
    /// directory. A failure in any step aborts only this cycle.
    pub async fn publish(&self) -> Result<ResolutionBatch> {
        let domains = self.load_domains()?;
        let records = resolver::resolve_domains(&domains).await;
        let batch = ResolutionBatch::new(records);
        self.write_artifacts(&batch)?;
        Ok(batch)
    }

    fn write_artifacts(&self, batch: &ResolutionBatch) -> Result<()> {
        self.write_artifact(HOSTS_JSON, batch.to_json()?.as_bytes())?;
        self.write_artifact(HOSTS_TXT, batch.to_hosts_text(DEFAULT_REMOTE_URL).as_bytes())?;

        let template = resource::exec_or_bundled(&self.ctx, INDEX_TEMPLATE_FILE)?;
        let template = String::from_utf8_lossy(&template);
        self.write_artifact(INDEX_HTML, batch.render_index(&template).as_bytes())?;
        Ok(())
    }

    fn write_artifact(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.ctx.artifact_path(name);
        std::fs::write(&path, bytes)
            .map_err(|e| FetchError::io(format!("write {}", path.display()), e))
    }
}

#[async_trait]
impl CycleTask for ServerCycle {
    async fn run_cycle(&self) -> anyhow::Result<()> {
        let batch = self.publish().await?;
        info!(
            resolved = batch.records.len(),
            dir = %self.ctx.exec_dir.display(),
            "artifacts published"
        );
        Ok(())
    }
}
