//! Client mode end to end against an in-process artifact endpoint.

mod common;

use std::net::SocketAddr;

use hostfetch::client::ClientCycle;
use hostfetch::error::FetchError;
use hostfetch::hosts::HostsFile;
use hostfetch::merge::MergeStrategy;
use hostfetch::serve::http::ArtifactServer;

async fn start_server(dir: &std::path::Path) -> SocketAddr {
    let server = ArtifactServer::bind(
        SocketAddr::from(([127, 0, 0, 1], 0)),
        dir.to_path_buf(),
    )
    .await
    .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

#[tokio::test]
async fn fetches_merges_and_stays_stable_across_cycles() {
    let dir = common::temp_exec_dir();
    std::fs::write(dir.path().join("hosts.txt"), common::sample_payload()).unwrap();
    let addr = start_server(dir.path()).await;

    let hosts_path = dir.path().join("hosts");
    std::fs::write(&hosts_path, "127.0.0.1\tlocalhost\n10.0.0.1 nas.lan\n").unwrap();

    let cycle = ClientCycle::new(
        HostsFile::at(&hosts_path),
        format!("http://{addr}/hosts.txt"),
        MergeStrategy::Filter,
    );

    cycle.fetch_and_merge().await.unwrap();
    let after_first = std::fs::read_to_string(&hosts_path).unwrap();
    assert!(after_first.contains("127.0.0.1\tlocalhost"));
    assert!(after_first.contains("10.0.0.1 nas.lan"));
    assert!(after_first.contains("github.com"));

    cycle.fetch_and_merge().await.unwrap();
    let after_second = std::fs::read_to_string(&hosts_path).unwrap();
    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn block_strategy_keeps_a_single_managed_block() {
    let dir = common::temp_exec_dir();
    std::fs::write(dir.path().join("hosts.txt"), common::sample_payload()).unwrap();
    let addr = start_server(dir.path()).await;

    let hosts_path = dir.path().join("hosts");
    std::fs::write(&hosts_path, "127.0.0.1\tlocalhost\n").unwrap();

    let cycle = ClientCycle::new(
        HostsFile::at(&hosts_path),
        format!("http://{addr}/hosts.txt"),
        MergeStrategy::Block,
    );

    cycle.fetch_and_merge().await.unwrap();
    cycle.fetch_and_merge().await.unwrap();

    let content = std::fs::read_to_string(&hosts_path).unwrap();
    assert_eq!(content.matches("# fetch-github-hosts begin").count(), 1);
    assert_eq!(content.matches("# fetch-github-hosts end").count(), 1);
}

#[tokio::test]
async fn invalid_payload_leaves_the_hosts_file_unwritten() {
    let dir = common::temp_exec_dir();
    std::fs::write(dir.path().join("hosts.json"), "[]").unwrap();
    let addr = start_server(dir.path()).await;

    let hosts_path = dir.path().join("hosts");
    let original = "127.0.0.1\tlocalhost\n";
    std::fs::write(&hosts_path, original).unwrap();

    // hosts.json is served with 200 but has no sentinel structure.
    let cycle = ClientCycle::new(
        HostsFile::at(&hosts_path),
        format!("http://{addr}/hosts.json"),
        MergeStrategy::Filter,
    );

    let err = cycle.fetch_and_merge().await.unwrap_err();
    assert!(matches!(err, FetchError::Validation(_)));
    assert_eq!(std::fs::read_to_string(&hosts_path).unwrap(), original);
}

#[tokio::test]
async fn network_failure_is_a_network_error() {
    let dir = common::temp_exec_dir();
    let hosts_path = dir.path().join("hosts");
    std::fs::write(&hosts_path, "").unwrap();

    // Nothing listens here.
    let cycle = ClientCycle::new(
        HostsFile::at(&hosts_path),
        "http://127.0.0.1:1/hosts.txt".to_string(),
        MergeStrategy::Filter,
    );

    let err = cycle.fetch_and_merge().await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}
