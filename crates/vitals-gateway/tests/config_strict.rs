#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use vitals_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
server:
  listen: "0.0.0.0:8080"
metrics:
  tagz: { application: "demo" } # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_CONFIG");
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.server.listen, "0.0.0.0:8080");
    assert!(cfg.metrics.tags.is_empty());
    assert_eq!(cfg.metrics.disabled, vec!["http_server_requests".to_string()]);
    assert!(cfg.metrics.http_requests);
    assert!(!cfg.health.show_details);
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
server:
  listen: "127.0.0.1:9100"
metrics:
  tags: { application: "demo", env: "dev" }
  disabled: []
  http_requests: false
health:
  show_details: true
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.server.listen_addr().unwrap().port(), 9100);
    assert_eq!(cfg.metrics.tags["application"], "demo");
    assert_eq!(cfg.metrics.tags["env"], "dev");
    assert!(cfg.metrics.disabled.is_empty());
    assert!(!cfg.metrics.http_requests);
    assert!(cfg.health.show_details);
}

#[test]
fn wrong_version() {
    let err = config::load_from_str("version: 2\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn bad_listen_and_tag_key() {
    let err = config::load_from_str("version: 1\nserver: { listen: \"nope\" }\n")
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_CONFIG");

    let err = config::load_from_str("version: 1\nmetrics: { tags: { \"app-name\": x } }\n")
        .expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_CONFIG");
}

#[test]
fn missing_file() {
    let err = config::load_from_file("/definitely/not/here/vitals.yaml").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_CONFIG");
}
