//! Loading relay configuration from disk.

use std::io::Write;

use tictactoe_relay::{RelayConfig, RelayServer};
use tempfile::NamedTempFile;

#[test]
fn test_config_file_round_trip() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
listen_addr = "127.0.0.1:0"
allow_reset = false
outbound_buffer = 4
"#
    )
    .unwrap();

    let config = RelayConfig::from_file(file.path()).unwrap();

    assert_eq!(config.listen_addr(), "127.0.0.1:0");
    assert!(!*config.allow_reset());
    assert!(*config.enforce_turns());
    assert_eq!(config.outbound_capacity(), 4);
}

#[test]
fn test_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = RelayConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("read"));
}

#[test]
fn test_unknown_type_is_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "enforce_turns = \"sometimes\"").unwrap();

    assert!(RelayConfig::from_file(file.path()).is_err());
}

#[tokio::test]
async fn test_bind_from_loaded_config() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "listen_addr = \"127.0.0.1:0\"").unwrap();
    let config = RelayConfig::from_file(file.path()).unwrap();

    let server = RelayServer::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    assert!(addr.ip().is_loopback());
    assert_ne!(addr.port(), 0);
}

#[tokio::test]
async fn test_bind_failure_reports_address() {
    let taken = RelayServer::bind(RelayConfig::default().with_listen_addr("127.0.0.1:0"))
        .await
        .unwrap();
    let addr = taken.local_addr().unwrap().to_string();

    let err = RelayServer::bind(RelayConfig::default().with_listen_addr(addr.clone()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains(&addr));
}
