//! # Operation parameters
//!
//! Classifies the declared type of an action/function parameter and infers
//! whether the parameter is optional.
//!
//! - [`BindingParameter`] is the first parameter of a bound operation. Its type
//!   must be an entity type, or a collection of an entity type. Anything else is
//!   rejected at construction with [`ModelError::InvalidArgument`] on
//!   `parameterType`.
//! - [`NonbindingParameter`] accepts any descriptor, including an absent one,
//!   and exposes [`NonbindingParameter::optional_parameter`].
//!
//! ## Nullability
//!
//! | Descriptor | Optional |
//! |---|---|
//! | `int` | no |
//! | `double?`, `string` | yes |
//! | `Color` | no |
//! | `Color?` | yes |
//! | entity, complex | yes |
//! | collection | same as its element |
//! | unresolved | no |

use crate::error::{ModelError, NAME_ARG};
use crate::model::{EdmTypeKind, TypeConfiguration};
use tracing::debug;

/// Common read access to configured parameters.
pub trait ParameterConfiguration {
    fn name(&self) -> &str;

    /// Resolved descriptor, `None` when the declared type was not registered.
    fn type_configuration(&self) -> Option<&TypeConfiguration>;

    /// Whether null is a legal value for this parameter.
    fn optional_parameter(&self) -> bool;
}

/// Infer parameter optionality from a descriptor.
///
/// Collections defer to their element; the wrapper itself never adds
/// nullability. An absent descriptor carries no nullability information.
#[must_use]
pub fn infer_optional(parameter_type: Option<&TypeConfiguration>) -> bool {
    match parameter_type {
        None => false,
        Some(TypeConfiguration::Collection(collection)) => {
            infer_optional(Some(collection.element_type()))
        }
        Some(other) => other.is_nullable(),
    }
}

fn validate_name(name: String) -> Result<String, ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::invalid_argument(
            NAME_ARG,
            "The parameter name cannot be empty.",
        ));
    }
    Ok(name)
}

/// The parameter a bound operation is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingParameter {
    name: String,
    parameter_type: TypeConfiguration,
}

impl BindingParameter {
    /// Create a binding parameter over an entity (or entity collection) descriptor.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidArgument`] on `parameterType` when the descriptor
    /// does not classify as an entity, naming the descriptor's full name, or on
    /// `name` when the name is empty.
    pub fn new(
        name: impl Into<String>,
        parameter_type: TypeConfiguration,
    ) -> Result<Self, ModelError> {
        let name = validate_name(name.into())?;

        if parameter_type.element_or_self_kind() != EdmTypeKind::Entity {
            debug!(
                parameter = %name,
                type_name = %parameter_type.full_name(),
                kind = %parameter_type.element_or_self_kind(),
                "Rejected binding parameter type"
            );
            return Err(ModelError::invalid_binding_parameter_type(
                &parameter_type.full_name(),
            ));
        }

        Ok(BindingParameter {
            name,
            parameter_type,
        })
    }

    #[must_use]
    pub fn parameter_type(&self) -> &TypeConfiguration {
        &self.parameter_type
    }

    /// Bound to an entity set rather than a single entity.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.parameter_type.kind() == EdmTypeKind::Collection
    }
}

impl ParameterConfiguration for BindingParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_configuration(&self) -> Option<&TypeConfiguration> {
        Some(&self.parameter_type)
    }

    fn optional_parameter(&self) -> bool {
        infer_optional(Some(&self.parameter_type))
    }
}

/// Any operation parameter other than the binding parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonbindingParameter {
    name: String,
    parameter_type: Option<TypeConfiguration>,
    optional_parameter: bool,
}

impl NonbindingParameter {
    /// Create a non-binding parameter; optionality is inferred once here.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidArgument`] on `name` when the name is empty.
    pub fn new(
        name: impl Into<String>,
        parameter_type: Option<TypeConfiguration>,
    ) -> Result<Self, ModelError> {
        let name = validate_name(name.into())?;
        let optional_parameter = infer_optional(parameter_type.as_ref());

        debug!(
            parameter = %name,
            type_name = ?parameter_type.as_ref().map(TypeConfiguration::full_name),
            optional = optional_parameter,
            "Configured non-binding parameter"
        );

        Ok(NonbindingParameter {
            name,
            parameter_type,
            optional_parameter,
        })
    }

    #[must_use]
    pub fn parameter_type(&self) -> Option<&TypeConfiguration> {
        self.parameter_type.as_ref()
    }

    #[must_use]
    pub fn optional_parameter(&self) -> bool {
        self.optional_parameter
    }
}

impl ParameterConfiguration for NonbindingParameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_configuration(&self) -> Option<&TypeConfiguration> {
        self.parameter_type.as_ref()
    }

    fn optional_parameter(&self) -> bool {
        self.optional_parameter
    }
}
