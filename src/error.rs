//! Error types for model registration, type resolution and parameter
//! configuration.

use crate::model::EdmTypeKind;
use crate::validator::ValidationIssue;
use thiserror::Error;

/// Argument name reported when a binding parameter has an unsupported type.
pub const PARAMETER_TYPE_ARG: &str = "parameterType";

/// Argument name reported for empty parameter or operation names.
pub const NAME_ARG: &str = "name";

/// Errors raised while building or querying a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A caller passed an argument the model cannot accept.
    ///
    /// `param_name` identifies the offending argument. This signals a
    /// programming error in the model declaration, not a runtime condition.
    #[error("{message} (Parameter '{param_name}')")]
    InvalidArgument {
        param_name: &'static str,
        message: String,
    },

    /// A declared type does not resolve to anything registered in the model.
    #[error("The type '{0}' is not registered in the model.")]
    UnknownType(String),

    /// Text could not be parsed as a type reference.
    #[error("Invalid type reference '{input}': {reason}")]
    InvalidTypeReference { input: String, reason: String },

    /// The same full name was registered as two different kinds.
    #[error("The type '{name}' is already registered as {existing}, cannot register it as {requested}.")]
    KindConflict {
        name: String,
        existing: EdmTypeKind,
        requested: EdmTypeKind,
    },

    #[error("The operation '{operation}' already has a parameter named '{parameter}'.")]
    DuplicateParameter { operation: String, parameter: String },

    #[error("An operation named '{0}' is already registered.")]
    DuplicateOperation(String),

    #[error("The function '{0}' must declare a return type.")]
    MissingReturnType(String),

    /// A model document failed validation; every issue found is attached.
    #[error("model validation failed with {} issue(s)", .0.len())]
    Validation(Vec<ValidationIssue>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML model document")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON model document")]
    Json(#[from] serde_json::Error),
}

impl ModelError {
    pub(crate) fn invalid_argument(param_name: &'static str, message: impl Into<String>) -> Self {
        ModelError::InvalidArgument {
            param_name,
            message: message.into(),
        }
    }

    /// The binding parameter rejection, naming the offending type by its full name.
    pub(crate) fn invalid_binding_parameter_type(full_name: &str) -> Self {
        ModelError::invalid_argument(
            PARAMETER_TYPE_ARG,
            format!("The type '{full_name}' must be an entity type."),
        )
    }

    pub(crate) fn invalid_type_reference(input: &str, reason: impl Into<String>) -> Self {
        ModelError::InvalidTypeReference {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Name of the failing argument for [`ModelError::InvalidArgument`].
    #[must_use]
    pub fn param_name(&self) -> Option<&'static str> {
        match self {
            ModelError::InvalidArgument { param_name, .. } => Some(*param_name),
            _ => None,
        }
    }
}
