use callmatch_config::{
    CallmatchConfig, ConfigError, ConfigValidationError, ConfigWarning, DEFAULT_MATCHER_CLASS,
};
use pretty_assertions::assert_eq;

#[test]
fn empty_text_is_the_default_config() {
    let (config, diagnostics) =
        CallmatchConfig::load_from_str_with_diagnostics("").expect("config should parse");
    assert_eq!(config, CallmatchConfig::default());
    assert!(diagnostics.is_empty());
    assert_eq!(config.matchers.matcher_class, DEFAULT_MATCHER_CLASS);
    assert_eq!(config.merge.field_name, "CALL_MATCHER");
    assert!(config.jdk.builtin_stubs);
}

#[test]
fn every_section_is_read() {
    let text = r#"
[logging]
level = "debug"
json = true
stderr = false

[matchers]
matcher_class = "org.example.Matchers"

[merge]
field_name = "ANY_COLLECTION"

[jdk]
builtin_stubs = false
stub_roots = ["stubs"]
"#;
    let (config, diagnostics) =
        CallmatchConfig::load_from_str_with_diagnostics(text).expect("config should parse");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert!(!config.logging.stderr);
    assert_eq!(config.matchers.matcher_class, "org.example.Matchers");
    assert_eq!(config.merge.field_name, "ANY_COLLECTION");
    assert!(!config.jdk.builtin_stubs);
    assert_eq!(config.jdk.stub_roots, vec![std::path::PathBuf::from("stubs")]);
}

#[test]
fn reports_unknown_keys_with_full_paths() {
    let text = r#"
typo = 1

[merge]
feild_name = "X"

[jdk]
builtin = true
"#;
    let (_config, diagnostics) =
        CallmatchConfig::load_from_str_with_diagnostics(text).expect("config should parse");
    assert_eq!(
        diagnostics.unknown_keys,
        vec!["jdk.builtin", "merge.feild_name", "typo"]
    );
    assert!(diagnostics.is_ok());
}

#[test]
fn invalid_names_are_errors() {
    let text = r#"
[matchers]
matcher_class = "org..Matchers"

[merge]
field_name = "2FAST"
"#;
    let (_config, diagnostics) =
        CallmatchConfig::load_from_str_with_diagnostics(text).expect("config should parse");
    assert!(!diagnostics.is_ok());
    assert_eq!(
        diagnostics.errors,
        vec![
            ConfigValidationError::InvalidValue {
                toml_path: "matchers.matcher_class".to_string(),
                message: "`org..Matchers` is not a qualified Java class name".to_string(),
            },
            ConfigValidationError::InvalidValue {
                toml_path: "merge.field_name".to_string(),
                message: "`2FAST` is not a Java identifier".to_string(),
            },
        ]
    );
}

#[test]
fn bad_logging_level_is_a_warning() {
    let text = r#"
[logging]
level = "warn,callmatch=foo"
"#;
    let (_config, diagnostics) =
        CallmatchConfig::load_from_str_with_diagnostics(text).expect("config should parse");
    assert!(diagnostics.is_ok());
    assert!(matches!(
        diagnostics.warnings.as_slice(),
        [ConfigWarning::LoggingLevelInvalid { .. }]
    ));
}

#[test]
fn type_errors_fail_to_load() {
    let err = CallmatchConfig::load_from_str_with_diagnostics("[logging]\njson = \"yes\"\n")
        .expect_err("json must be a boolean");
    assert!(matches!(err, ConfigError::Toml(_)));
}
