//! Read-only HTTP endpoint for the generated artifacts.
//!
//! Serves whatever the publish cycle last wrote to disk; the filesystem is
//! the only hand-off between the two, so a request racing a write may see a
//! partial file. Accepted as benign given the write frequency.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use http::{Response, StatusCode};
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::Request;
use hyper_util::rt::TokioExecutor;
use hyper_util::server::conn::auto::Builder as HttpBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error};

use crate::artifact::{HOSTS_JSON, HOSTS_TXT, INDEX_HTML};

/// Serves `/`, `/hosts.txt`, and `/hosts.json` from the artifact directory;
/// every other path is redirected to `/`.
pub struct ArtifactServer {
    listener: TcpListener,
    dir: PathBuf,
}

impl ArtifactServer {
    /// Bind the listener. Failure here is a fatal startup error for server
    /// mode.
    pub async fn bind(addr: SocketAddr, dir: PathBuf) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("bind artifact endpoint on {addr}"))?;
        Ok(Self { listener, dir })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context("listener local addr")
    }

    /// Accept-and-serve loop. Runs until the task is dropped; independent of
    /// the publish scheduler.
    pub async fn run(self) {
        loop {
            let (stream, _) = match self.listener.accept().await {
                Ok(s) => s,
                Err(e) => {
                    error!("accept error: {e}");
                    continue;
                }
            };
            let dir = self.dir.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let dir = dir.clone();
                    async move {
                        Ok::<_, std::convert::Infallible>(handle_request(&dir, req.uri().path()))
                    }
                });
                if let Err(e) = HttpBuilder::new(TokioExecutor::new())
                    .serve_connection(hyper_util::rt::TokioIo::new(stream), service)
                    .await
                {
                    debug!("connection error: {e:#}");
                }
            });
        }
    }
}

fn handle_request(dir: &Path, path: &str) -> Response<Full<Bytes>> {
    let (file, content_type) = match path {
        "/" => (INDEX_HTML, "text/html; charset=utf-8"),
        "/hosts.txt" => (HOSTS_TXT, "text/plain; charset=utf-8"),
        "/hosts.json" => (HOSTS_JSON, "application/json"),
        _ => {
            return Response::builder()
                .status(StatusCode::MOVED_PERMANENTLY)
                .header("Location", "/")
                .body(Full::from(Bytes::new()))
                .unwrap()
        }
    };

    match std::fs::read(dir.join(file)) {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", content_type)
            .body(Full::from(bytes))
            .unwrap(),
        Err(e) => {
            error!(file = %file, "artifact read failed: {e}");
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header("Content-Type", "text/plain; charset=utf-8")
                .body(Full::from("artifact unavailable\n"))
                .unwrap()
        }
    }
}
