//! Per-domain failures skip the domain without aborting the batch.

use hostfetch::resolver::{resolve_domains, resolve_ipv4};

#[tokio::test]
async fn failed_lookup_is_skipped_and_order_is_preserved() {
    let domains = vec![
        "localhost".to_string(),
        "host-that-cannot-exist.invalid".to_string(),
        "localhost".to_string(),
    ];

    let records = resolve_domains(&domains).await;

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.domain == "localhost"));
    assert_eq!(records[0].address, "127.0.0.1");
    assert_eq!(records[1].address, "127.0.0.1");
}

#[tokio::test]
async fn all_failures_yield_an_empty_batch() {
    let domains = vec!["nope.invalid".to_string()];
    assert!(resolve_domains(&domains).await.is_empty());
}

#[tokio::test]
async fn resolve_ipv4_prefers_the_first_ipv4_result() {
    let addr = resolve_ipv4("localhost").await.expect("localhost resolves");
    assert_eq!(addr, "127.0.0.1");
}
