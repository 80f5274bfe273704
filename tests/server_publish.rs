//! Server cycle: domain list in, three artifacts out.

mod common;

use hostfetch::config::AppContext;
use hostfetch::error::FetchError;
use hostfetch::serve::ServerCycle;

#[tokio::test]
async fn publish_writes_all_three_artifacts() {
    let dir = common::temp_exec_dir();
    std::fs::write(
        dir.path().join("domains.json"),
        r#"["localhost", "host-that-cannot-exist.invalid"]"#,
    )
    .unwrap();
    let ctx = AppContext::for_test(dir.path());

    let batch = ServerCycle::new(ctx).publish().await.unwrap();

    // The unresolvable domain is dropped, not fatal.
    assert_eq!(batch.records.len(), 1);
    assert_eq!(batch.records[0].domain, "localhost");

    let json = std::fs::read_to_string(dir.path().join("hosts.json")).unwrap();
    assert_eq!(json, r#"[["127.0.0.1","localhost"]]"#);

    let text = std::fs::read_to_string(dir.path().join("hosts.txt")).unwrap();
    assert!(text.contains(&format!("{:<28}{}", "127.0.0.1", "localhost")));
    assert!(text.starts_with("# fetch-github-hosts begin\n"));
    assert!(text.ends_with("# fetch-github-hosts end\n\n"));

    let index = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(!index.contains("<!--time-->"));
    assert!(index.contains(&batch.fetched_at));
}

#[tokio::test]
async fn malformed_domain_list_is_a_parse_error() {
    let dir = common::temp_exec_dir();
    std::fs::write(dir.path().join("domains.json"), "{not json").unwrap();
    let ctx = AppContext::for_test(dir.path());

    let err = ServerCycle::new(ctx).publish().await.unwrap_err();
    assert!(matches!(err, FetchError::Parse { .. }));
}

#[test]
fn bundled_domain_list_is_used_when_no_override_exists() {
    let dir = common::temp_exec_dir();
    let ctx = AppContext::for_test(dir.path());

    let domains = ServerCycle::new(ctx).load_domains().unwrap();
    assert!(domains.iter().any(|d| d == "github.com"));
}
