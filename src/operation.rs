//! Actions and functions registered on a [`ModelBuilder`].
//!
//! An [`OperationBuilder`] collects declared types and resolves them only in
//! [`OperationBuilder::build`], so every failure surfaces in one place.

use crate::error::{ModelError, NAME_ARG};
use crate::model::{ModelBuilder, TypeConfiguration, TypeRef};
use crate::parameter::{BindingParameter, NonbindingParameter, ParameterConfiguration};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// May have side effects; return type optional.
    #[default]
    Action,
    /// Side-effect free; must return a value.
    Function,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Action => write!(f, "Action"),
            OperationKind::Function => write!(f, "Function"),
        }
    }
}

/// A configured action or function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationConfiguration {
    name: String,
    kind: OperationKind,
    binding_parameter: Option<BindingParameter>,
    parameters: Vec<NonbindingParameter>,
    return_type: Option<TypeConfiguration>,
}

impl OperationConfiguration {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding_parameter.is_some()
    }

    #[must_use]
    pub fn binding_parameter(&self) -> Option<&BindingParameter> {
        self.binding_parameter.as_ref()
    }

    /// Non-binding parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[NonbindingParameter] {
        &self.parameters
    }

    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&NonbindingParameter> {
        self.parameters.iter().find(|p| p.name() == name)
    }

    #[must_use]
    pub fn return_type(&self) -> Option<&TypeConfiguration> {
        self.return_type.as_ref()
    }
}

/// Fluent builder for an [`OperationConfiguration`].
///
/// # Example
///
/// ```rust
/// use edmbuilder::model::ModelBuilder;
///
/// let mut builder = ModelBuilder::with_namespace("Contoso.Models");
/// builder.entity_type("Customer").unwrap();
///
/// builder
///     .action("Rate")
///     .set_binding_parameter("customer", "Customer".parse().unwrap())
///     .parameter("rating", "int".parse().unwrap())
///     .parameter("comment", "string".parse().unwrap())
///     .build()
///     .unwrap();
///
/// let rate = builder.operation("Rate").unwrap();
/// assert!(rate.is_bound());
/// assert!(!rate.parameter("rating").unwrap().optional_parameter());
/// assert!(rate.parameter("comment").unwrap().optional_parameter());
/// ```
pub struct OperationBuilder<'a> {
    model: &'a mut ModelBuilder,
    name: String,
    kind: OperationKind,
    binding: Option<(String, TypeRef)>,
    parameters: Vec<(String, TypeRef)>,
    returns: Option<TypeRef>,
}

impl<'a> OperationBuilder<'a> {
    pub(crate) fn new(model: &'a mut ModelBuilder, name: String, kind: OperationKind) -> Self {
        OperationBuilder {
            model,
            name,
            kind,
            binding: None,
            parameters: Vec::new(),
            returns: None,
        }
    }

    /// Bind the operation; the type must resolve to an entity or entity collection.
    #[must_use]
    pub fn set_binding_parameter(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.binding = Some((name.into(), type_ref));
        self
    }

    /// Append a non-binding parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, type_ref: TypeRef) -> Self {
        self.parameters.push((name.into(), type_ref));
        self
    }

    #[must_use]
    pub fn returns(mut self, type_ref: TypeRef) -> Self {
        self.returns = Some(type_ref);
        self
    }

    /// Resolve every declared type and register the operation.
    ///
    /// # Errors
    ///
    /// - [`ModelError::InvalidArgument`] for an empty operation name or a
    ///   binding type that is not an entity
    /// - [`ModelError::UnknownType`] for a parameter or return type that does
    ///   not resolve
    /// - [`ModelError::DuplicateParameter`] / [`ModelError::DuplicateOperation`]
    /// - [`ModelError::MissingReturnType`] for a function without a return type
    pub fn build(self) -> Result<&'a OperationConfiguration, ModelError> {
        let OperationBuilder {
            model,
            name,
            kind,
            binding,
            parameters,
            returns,
        } = self;

        if name.trim().is_empty() {
            return Err(ModelError::invalid_argument(
                NAME_ARG,
                "The operation name cannot be empty.",
            ));
        }

        let mut seen = HashSet::new();
        let mut check_unique = |parameter: &str| {
            if seen.insert(parameter.to_string()) {
                Ok(())
            } else {
                Err(ModelError::DuplicateParameter {
                    operation: name.clone(),
                    parameter: parameter.to_string(),
                })
            }
        };

        let binding_parameter = match binding {
            Some((parameter, type_ref)) => {
                check_unique(&parameter)?;
                Some(model.binding_parameter(&parameter, &type_ref)?)
            }
            None => None,
        };

        let mut resolved = Vec::with_capacity(parameters.len());
        for (parameter, type_ref) in parameters {
            check_unique(&parameter)?;
            let parameter_type = model.resolve(&type_ref)?;
            resolved.push(NonbindingParameter::new(parameter, Some(parameter_type))?);
        }

        let return_type = match returns {
            Some(type_ref) => Some(model.resolve(&type_ref)?),
            None if kind == OperationKind::Function => {
                return Err(ModelError::MissingReturnType(name));
            }
            None => None,
        };

        let operation = OperationConfiguration {
            name,
            kind,
            binding_parameter,
            parameters: resolved,
            return_type,
        };
        let name = operation.name.clone();
        model.add_operation(operation)?;
        let model: &'a ModelBuilder = model;
        model
            .operation(&name)
            .ok_or(ModelError::DuplicateOperation(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(s: &str) -> TypeRef {
        s.parse().unwrap()
    }

    fn model() -> ModelBuilder {
        let mut b = ModelBuilder::with_namespace("Contoso.Models");
        b.entity_type("Customer").unwrap();
        b.complex_type("Address").unwrap();
        b.enum_type("Color", ["Red", "Green"]).unwrap();
        b
    }

    #[test]
    fn test_unbound_action_with_mixed_parameters() {
        let mut b = model();
        let op = b
            .action("Paint")
            .parameter("color", ty("Color?"))
            .parameter("layers", ty("int"))
            .parameter("targets", ty("IList<Address>"))
            .build()
            .unwrap();
        assert!(!op.is_bound());
        assert_eq!(op.kind(), OperationKind::Action);
        let optional: Vec<bool> = op.parameters().iter().map(|p| p.optional_parameter()).collect();
        assert_eq!(optional, vec![true, false, true]);
        assert!(op.return_type().is_none());
    }

    #[test]
    fn test_bound_function_to_entity_collection() {
        let mut b = model();
        let op = b
            .function("TopCustomers")
            .set_binding_parameter("customers", ty("IEnumerable<Customer>"))
            .parameter("count", ty("int"))
            .returns(ty("IEnumerable<Customer>"))
            .build()
            .unwrap();
        assert!(op.binding_parameter().unwrap().is_collection());
        assert_eq!(
            op.return_type().unwrap().full_name(),
            "Collection(Contoso.Models.Customer)"
        );
    }

    #[test]
    fn test_binding_to_complex_type_fails() {
        let mut b = model();
        let err = b
            .action("Ship")
            .set_binding_parameter("address", ty("Address"))
            .build()
            .unwrap_err();
        assert_eq!(err.param_name(), Some("parameterType"));
        assert!(err.to_string().contains("'Contoso.Models.Address'"));
        assert!(b.operation("Ship").is_none());
    }

    #[test]
    fn test_duplicate_parameter_including_binding() {
        let mut b = model();
        let err = b
            .action("Rate")
            .set_binding_parameter("customer", ty("Customer"))
            .parameter("customer", ty("int"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateParameter { parameter, .. } if parameter == "customer"));
    }

    #[test]
    fn test_unknown_parameter_type() {
        let mut b = model();
        let err = b
            .action("Rate")
            .parameter("order", ty("Order"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ModelError::UnknownType(t) if t == "Order"));
    }

    #[test]
    fn test_duplicate_operation_and_missing_return() {
        let mut b = model();
        b.action("Reset").build().unwrap();
        assert!(matches!(
            b.action("Reset").build(),
            Err(ModelError::DuplicateOperation(_))
        ));
        assert!(matches!(
            b.function("Count").build(),
            Err(ModelError::MissingReturnType(_))
        ));
        assert!(b.action(" ").build().unwrap_err().param_name() == Some("name"));
        assert_eq!(b.operations().len(), 1);
    }
}
