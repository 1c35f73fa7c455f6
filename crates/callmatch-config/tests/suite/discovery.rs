use callmatch_config::{discover_config_path, load_for_workspace, CallmatchConfig, ConfigError};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().expect("tempdir");
    let (config, path, diagnostics) = load_for_workspace(dir.path()).expect("load");
    assert_eq!(config, CallmatchConfig::default());
    assert_eq!(path, None);
    assert!(diagnostics.is_empty());
}

#[test]
fn visible_file_wins_over_hidden_file() {
    let dir = tempdir().expect("tempdir");
    std::fs::write(dir.path().join(".callmatch.toml"), "[merge]\nfield_name = \"HIDDEN\"\n")
        .expect("write");
    assert_eq!(
        discover_config_path(dir.path()),
        Some(dir.path().join(".callmatch.toml"))
    );

    std::fs::write(dir.path().join("callmatch.toml"), "[merge]\nfield_name = \"VISIBLE\"\n")
        .expect("write");
    let (config, path, _) = load_for_workspace(dir.path()).expect("load");
    assert_eq!(path, Some(dir.path().join("callmatch.toml")));
    assert_eq!(config.merge.field_name, "VISIBLE");
}

#[test]
fn stub_roots_are_relative_to_the_config_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("callmatch.toml");
    std::fs::write(&path, "[jdk]\nstub_roots = [\"stubs\", \"/opt/jdk-stubs\"]\n").expect("write");

    let config = CallmatchConfig::load_from_path(&path).expect("load");
    assert_eq!(
        config.jdk.stub_roots,
        vec![
            dir.path().join("stubs"),
            std::path::PathBuf::from("/opt/jdk-stubs")
        ]
    );
}

#[test]
fn unreadable_path_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = CallmatchConfig::load_from_path(dir.path().join("absent.toml"))
        .expect_err("file does not exist");
    assert!(matches!(err, ConfigError::Io { .. }));
}
