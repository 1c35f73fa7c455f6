use crate::diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
use crate::{CallmatchConfig, LoggingConfig};

impl CallmatchConfig {
    /// Check semantic invariants, reporting every problem in one pass.
    #[must_use]
    pub fn validate(&self) -> ValidationDiagnostics {
        let mut out = ValidationDiagnostics::default();

        validate_logging(self, &mut out);
        validate_matchers(self, &mut out);
        validate_merge(self, &mut out);

        out
    }
}

fn validate_logging(config: &CallmatchConfig, out: &mut ValidationDiagnostics) {
    let normalized = LoggingConfig::normalize_level_directives(&config.logging.level);
    if !config.logging.level.trim().is_empty()
        && tracing_subscriber::EnvFilter::try_new(normalized.clone()).is_err()
    {
        out.warnings.push(ConfigWarning::LoggingLevelInvalid {
            value: config.logging.level.clone(),
            normalized,
        });
    }
}

fn validate_matchers(config: &CallmatchConfig, out: &mut ValidationDiagnostics) {
    let class = &config.matchers.matcher_class;
    if !class.split('.').all(is_java_identifier) {
        out.errors.push(ConfigValidationError::InvalidValue {
            toml_path: "matchers.matcher_class".to_string(),
            message: format!("`{class}` is not a qualified Java class name"),
        });
    }
}

fn validate_merge(config: &CallmatchConfig, out: &mut ValidationDiagnostics) {
    let name = &config.merge.field_name;
    if !is_java_identifier(name) {
        out.errors.push(ConfigValidationError::InvalidValue {
            toml_path: "merge.field_name".to_string(),
            message: format!("`{name}` is not a Java identifier"),
        });
    }
}

fn is_java_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
