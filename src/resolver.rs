//! Domain-to-IPv4 resolution.

use std::net::SocketAddr;

use serde::Serialize;
use tokio::net::lookup_host;
use tracing::warn;

/// One successfully resolved domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainRecord {
    pub address: String,
    pub domain: String,
}

/// Resolve `domain` to its first IPv4 address via the system resolver.
/// IPv6-only results count as a miss.
pub async fn resolve_ipv4(domain: &str) -> Option<String> {
    match lookup_host((domain, 80)).await {
        Ok(mut addrs) => addrs
            .find(SocketAddr::is_ipv4)
            .map(|a| a.ip().to_string()),
        Err(_) => None,
    }
}

/// Resolve each domain in turn, keeping input order among the survivors.
/// A failed or IPv4-less lookup skips that domain with a warning; one broken
/// domain never aborts the batch. Duplicates are resolved as given.
pub async fn resolve_domains(domains: &[String]) -> Vec<DomainRecord> {
    let mut records = Vec::with_capacity(domains.len());
    for domain in domains {
        match lookup_host((domain.as_str(), 80)).await {
            Ok(mut addrs) => match addrs.find(SocketAddr::is_ipv4) {
                Some(addr) => records.push(DomainRecord {
                    address: addr.ip().to_string(),
                    domain: domain.clone(),
                }),
                None => warn!(domain = %domain, "lookup returned no IPv4 address, skipping"),
            },
            Err(e) => warn!(domain = %domain, error = %e, "host lookup failed, skipping"),
        }
    }
    records
}
