use std::fs;

use assert_matches::assert_matches;

use kegg_tools::config::{Config, ConfigLoader};
use kegg_tools::error::KeggError;

#[test]
fn load_settings_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kegg-tools.json");
    fs::write(
        &path,
        r#"{"cache_dir": "/tmp/kegg-cache", "organism": "mmu", "timeout_secs": 5}"#,
    )
    .unwrap();

    let settings = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(settings.cache_dir.as_str(), "/tmp/kegg-cache");
    assert_eq!(settings.organism.as_deref(), Some("mmu"));
    assert_eq!(settings.timeout_secs, 5);
    assert_eq!(settings.base_url, "https://rest.kegg.jp");
}

#[test]
fn explicit_missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    assert_matches!(
        ConfigLoader::resolve(path.to_str()),
        Err(KeggError::ConfigRead(_))
    );
}

#[test]
fn malformed_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kegg-tools.json");
    fs::write(&path, r#"{"timeout_secs": "soon"}"#).unwrap();
    assert_matches!(
        ConfigLoader::resolve(path.to_str()),
        Err(KeggError::ConfigParse(_))
    );
}

#[test]
fn invalid_values_are_rejected() {
    let config = Config {
        organism: Some("mouse".to_string()),
        ..Config::default()
    };
    assert_matches!(
        ConfigLoader::resolve_config(config),
        Err(KeggError::InvalidField { field: "pathway organism", .. })
    );

    let config = Config {
        base_url: Some("rest.kegg.jp".to_string()),
        ..Config::default()
    };
    assert_matches!(
        ConfigLoader::resolve_config(config),
        Err(KeggError::InvalidField { field: "base url", .. })
    );
}
