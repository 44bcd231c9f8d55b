use crate::error::ModelError;
use serde::Serialize;
use std::fmt;
use tracing::warn;

/// A single problem found while loading or validating a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Where the issue occurred (e.g. `entityType:Customer`, `operation:Rate`)
    pub location: String,
    /// Machine-readable kind (e.g. `MissingKey`, `UnknownType`)
    pub kind: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        location: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            location: location.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.kind, self.location, self.message)
    }
}

/// Emit every issue as a structured warning.
pub fn log_issues(issues: &[ValidationIssue]) {
    for issue in issues {
        warn!(
            location = %issue.location,
            kind = %issue.kind,
            message = %issue.message,
            "Model validation issue"
        );
    }
}

/// Turn a non-empty issue list into [`ModelError::Validation`].
pub fn fail_if_issues(issues: Vec<ValidationIssue>) -> Result<(), ModelError> {
    if issues.is_empty() {
        return Ok(());
    }
    log_issues(&issues);
    Err(ModelError::Validation(issues))
}
