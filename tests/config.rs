use std::io::Write;

use assert_matches::assert_matches;
use tempfile::NamedTempFile;

use cymol_db::config::{ClientConfig, ConfigLoader, EUTILS_HOST, TransportErrorPolicy};
use cymol_db::error::{CymolError, ErrorKind};

fn config_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn no_path_uses_defaults() {
    let config = ConfigLoader::resolve(None).unwrap();
    assert_eq!(config, ClientConfig::default());
    assert!(config.user_agent.starts_with("cymol-db/"));
}

#[test]
fn file_overrides_selected_fields() {
    let file = config_file(
        r#"{
            "rcsb": { "scheme": "https", "host": "mirror.example.org", "port": 8443 },
            "timeout_secs": 30,
            "transport_errors": "silent"
        }"#,
    );
    let config = ConfigLoader::resolve(file.path().to_str()).unwrap();
    assert_eq!(config.rcsb.base_url(), "https://mirror.example.org:8443");
    assert_eq!(config.eutils.host, EUTILS_HOST);
    assert_eq!(config.timeout_secs, Some(30));
    assert_eq!(config.transport_errors, TransportErrorPolicy::Silent);
}

#[test]
fn endpoint_defaults_scheme_and_port() {
    let file = config_file(r#"{ "eutils": { "host": "localhost" } }"#);
    let config = ConfigLoader::resolve(file.path().to_str()).unwrap();
    assert_eq!(config.eutils.base_url(), "http://localhost:80");
}

#[test]
fn missing_file_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = ConfigLoader::resolve(path.to_str()).unwrap_err();
    assert_matches!(err, CymolError::ConfigRead(ref p) if *p == path);
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn malformed_json_is_parse_error() {
    let file = config_file("{ \"timeout_secs\": ");
    let err = ConfigLoader::resolve(file.path().to_str()).unwrap_err();
    assert_matches!(err, CymolError::ConfigParse(_));
}

#[test]
fn unsupported_scheme_is_rejected() {
    let file = config_file(r#"{ "rcsb": { "scheme": "ftp", "host": "www.rcsb.org" } }"#);
    let err = ConfigLoader::resolve(file.path().to_str()).unwrap_err();
    assert_matches!(err, CymolError::ConfigParse(ref message) if message.contains("ftp"));
}

#[test]
fn empty_host_is_rejected() {
    let file = config_file(r#"{ "eutils": { "host": "  " } }"#);
    assert!(ConfigLoader::resolve(file.path().to_str()).is_err());
}

#[test]
fn https_endpoint_without_port_uses_443() {
    let file = config_file(r#"{ "rcsb": { "scheme": "https", "host": "www.rcsb.org" } }"#);
    let config = ConfigLoader::resolve(file.path().to_str()).unwrap();
    assert_eq!(config.rcsb.port(), 443);
    assert_eq!(config.rcsb.base_url(), "https://www.rcsb.org:443");
    assert_eq!(config.eutils.base_url(), "http://eutils.ncbi.nlm.nih.gov:80");
}
