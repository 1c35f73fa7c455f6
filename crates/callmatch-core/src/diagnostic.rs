use crate::TextRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// A problem anchored at a range of source text.
///
/// `code` is a stable message key; hosts render `message` or look the key up in
/// their own bundles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
    pub range: TextRange,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>, range: TextRange) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            range,
        }
    }

    pub fn warning(code: &'static str, message: impl Into<String>, range: TextRange) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            range,
        }
    }
}
