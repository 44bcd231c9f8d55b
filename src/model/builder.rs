use super::configuration::{
    CollectionTypeConfiguration, ComplexTypeConfiguration, EntityTypeConfiguration,
    EnumTypeConfiguration, PropertyConfiguration, TypeConfiguration,
};
use super::types::{is_qualified_identifier, EdmTypeKind, PrimitiveKind, TypeName, TypeRef};
use crate::error::{ModelError, NAME_ARG};
use crate::operation::{OperationBuilder, OperationConfiguration, OperationKind};
use crate::parameter::{BindingParameter, NonbindingParameter};
use crate::runtime_config::RuntimeConfig;
use crate::validator::ValidationIssue;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "Default";

#[derive(Debug, Clone)]
enum RegisteredType {
    Entity(Arc<EntityTypeConfiguration>),
    Complex(Arc<ComplexTypeConfiguration>),
    Enum(Arc<EnumTypeConfiguration>),
}

impl RegisteredType {
    fn kind(&self) -> EdmTypeKind {
        match self {
            RegisteredType::Entity(_) => EdmTypeKind::Entity,
            RegisteredType::Complex(_) => EdmTypeKind::Complex,
            RegisteredType::Enum(_) => EdmTypeKind::Enum,
        }
    }

    fn name(&self) -> &TypeName {
        match self {
            RegisteredType::Entity(e) => e.name(),
            RegisteredType::Complex(c) => c.name(),
            RegisteredType::Enum(e) => e.name(),
        }
    }

    fn descriptor(&self) -> TypeConfiguration {
        match self {
            RegisteredType::Entity(e) => TypeConfiguration::Entity(Arc::clone(e)),
            RegisteredType::Complex(c) => TypeConfiguration::Complex(Arc::clone(c)),
            RegisteredType::Enum(e) => e.descriptor(),
        }
    }
}

/// Registry of metadata types and operations.
///
/// Types are keyed by full name (`Namespace.Name`). Registration hands out
/// `&mut` access through copy-on-write `Arc`s, so descriptors obtained before a
/// later edit keep the definition they were resolved against.
///
/// # Example
///
/// ```rust
/// use edmbuilder::model::{ModelBuilder, TypeRef};
///
/// let mut builder = ModelBuilder::with_namespace("Contoso.Models");
/// builder.entity_type("Customer").unwrap().property("Id", "int".parse().unwrap()).has_key("Id");
/// builder.complex_type("Address").unwrap();
/// builder.enum_type("Color", ["Red", "Green", "Blue"]).unwrap();
///
/// let color: TypeRef = "Color?".parse().unwrap();
/// let parameter = builder.nonbinding_parameter("color", &color).unwrap();
/// assert!(parameter.optional_parameter());
/// ```
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    namespace: String,
    types: BTreeMap<String, RegisteredType>,
    operations: Vec<OperationConfiguration>,
}

impl Default for ModelBuilder {
    fn default() -> Self {
        ModelBuilder::with_namespace(DEFAULT_NAMESPACE)
    }
}

impl ModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unqualified type names registered on this builder land in `namespace`.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        ModelBuilder {
            namespace: namespace.into(),
            types: BTreeMap::new(),
            operations: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        ModelBuilder::with_namespace(config.namespace.clone())
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Register (or fetch) an entity type.
    ///
    /// # Errors
    ///
    /// [`ModelError::KindConflict`] when the name is registered as another kind,
    /// [`ModelError::InvalidArgument`] on `name` when it is not a valid type name.
    pub fn entity_type(&mut self, name: &str) -> Result<&mut EntityTypeConfiguration, ModelError> {
        let type_name = self.type_name(name)?;
        let full_name = type_name.full_name();
        let registered = self.register(type_name, EdmTypeKind::Entity, |n| {
            RegisteredType::Entity(Arc::new(EntityTypeConfiguration::new(n)))
        });
        match registered {
            RegisteredType::Entity(e) => Ok(Arc::make_mut(e)),
            other => Err(ModelError::KindConflict {
                name: full_name,
                existing: other.kind(),
                requested: EdmTypeKind::Entity,
            }),
        }
    }

    /// Register (or fetch) a complex type.
    pub fn complex_type(
        &mut self,
        name: &str,
    ) -> Result<&mut ComplexTypeConfiguration, ModelError> {
        let type_name = self.type_name(name)?;
        let full_name = type_name.full_name();
        let registered = self.register(type_name, EdmTypeKind::Complex, |n| {
            RegisteredType::Complex(Arc::new(ComplexTypeConfiguration::new(n)))
        });
        match registered {
            RegisteredType::Complex(c) => Ok(Arc::make_mut(c)),
            other => Err(ModelError::KindConflict {
                name: full_name,
                existing: other.kind(),
                requested: EdmTypeKind::Complex,
            }),
        }
    }

    /// Register (or fetch) an enum type and append `members` in order.
    pub fn enum_type<I, S>(
        &mut self,
        name: &str,
        members: I,
    ) -> Result<&mut EnumTypeConfiguration, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let type_name = self.type_name(name)?;
        let full_name = type_name.full_name();
        let registered = self.register(type_name, EdmTypeKind::Enum, |n| {
            RegisteredType::Enum(Arc::new(EnumTypeConfiguration::new(n)))
        });
        match registered {
            RegisteredType::Enum(e) => {
                let definition = Arc::make_mut(e);
                for member in members {
                    definition.member(member);
                }
                Ok(definition)
            }
            other => Err(ModelError::KindConflict {
                name: full_name,
                existing: other.kind(),
                requested: EdmTypeKind::Enum,
            }),
        }
    }

    // Names must be usable in a type reference, otherwise the type could never be resolved.
    fn type_name(&self, name: &str) -> Result<TypeName, ModelError> {
        let name = name.trim();
        if !is_qualified_identifier(name) || PrimitiveKind::from_alias(name).is_some() {
            return Err(ModelError::invalid_argument(
                NAME_ARG,
                format!("'{name}' is not a valid type name."),
            ));
        }
        Ok(TypeName::parse(name, &self.namespace))
    }

    fn register(
        &mut self,
        type_name: TypeName,
        kind: EdmTypeKind,
        create: impl FnOnce(TypeName) -> RegisteredType,
    ) -> &mut RegisteredType {
        self.types.entry(type_name.full_name()).or_insert_with(|| {
            debug!(type_name = %type_name, kind = %kind, "Registered type");
            create(type_name)
        })
    }

    /// Full names of all registered types, in sorted order.
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    fn find_registered(&self, name: &str) -> Option<&RegisteredType> {
        if let Some(found) = self.types.get(name) {
            return Some(found);
        }
        if let Some(found) = self.types.get(&format!("{}.{name}", self.namespace)) {
            return Some(found);
        }
        if name.contains('.') {
            return None;
        }
        // unqualified: accept only an unambiguous match across namespaces
        let mut matches = self.types.values().filter(|t| t.name().name == name);
        let first = matches.next()?;
        if matches.next().is_some() {
            debug!(type_name = %name, "Ambiguous unqualified type name");
            return None;
        }
        Some(first)
    }

    /// Resolve a declared type to its descriptor.
    ///
    /// - primitives always resolve;
    /// - named types resolve by full name, namespace-qualified name, or an
    ///   unambiguous short name;
    /// - `T?` resolves `T` and takes its nullable variant;
    /// - collections resolve their element, keeping element nullability.
    ///
    /// Nested nullable wrappers, nullable collections and nested collections
    /// do not resolve.
    #[must_use]
    pub fn get_type_configuration_or_none(&self, type_ref: &TypeRef) -> Option<TypeConfiguration> {
        let resolved = match type_ref {
            TypeRef::Primitive(kind) => Some(TypeConfiguration::primitive(*kind)),
            TypeRef::Named(name) => self.find_registered(name).map(RegisteredType::descriptor),
            TypeRef::Nullable(inner) => match inner.as_ref() {
                TypeRef::Nullable(_) | TypeRef::Collection(..) => None,
                other => self
                    .get_type_configuration_or_none(other)
                    .and_then(|base| base.nullable_variant()),
            },
            TypeRef::Collection(shape, element) => {
                if element.underlying_type_or_self().is_collection() {
                    None
                } else {
                    self.get_type_configuration_or_none(element)
                        .and_then(|e| CollectionTypeConfiguration::new(*shape, e).ok())
                        .map(TypeConfiguration::Collection)
                }
            }
        };

        if resolved.is_none() {
            debug!(type_ref = %type_ref, "Type did not resolve");
        }
        resolved
    }

    /// Like [`get_type_configuration_or_none`](Self::get_type_configuration_or_none)
    /// but reports the missing type.
    pub fn resolve(&self, type_ref: &TypeRef) -> Result<TypeConfiguration, ModelError> {
        self.get_type_configuration_or_none(type_ref)
            .ok_or_else(|| ModelError::UnknownType(type_ref.to_string()))
    }

    /// Resolve `type_ref` and build a binding parameter over it.
    ///
    /// An unresolved type is rejected the same way as a non-entity type, with
    /// the declared type named in the message.
    pub fn binding_parameter(
        &self,
        name: &str,
        type_ref: &TypeRef,
    ) -> Result<BindingParameter, ModelError> {
        let parameter_type = self.get_type_configuration_or_none(type_ref).ok_or_else(|| {
            ModelError::invalid_binding_parameter_type(&self.declared_full_name(type_ref))
        })?;
        BindingParameter::new(name, parameter_type)
    }

    /// Resolve `type_ref` and build a non-binding parameter over it.
    ///
    /// An unresolved type still yields a parameter; it reports not optional.
    pub fn nonbinding_parameter(
        &self,
        name: &str,
        type_ref: &TypeRef,
    ) -> Result<NonbindingParameter, ModelError> {
        NonbindingParameter::new(name, self.get_type_configuration_or_none(type_ref))
    }

    // Named types are qualified with the builder namespace for messages.
    fn declared_full_name(&self, type_ref: &TypeRef) -> String {
        match type_ref {
            TypeRef::Named(name) if !name.contains('.') => format!("{}.{name}", self.namespace),
            other => other.to_string(),
        }
    }

    /// Start configuring an action.
    pub fn action(&mut self, name: impl Into<String>) -> OperationBuilder<'_> {
        OperationBuilder::new(self, name.into(), OperationKind::Action)
    }

    /// Start configuring a function.
    pub fn function(&mut self, name: impl Into<String>) -> OperationBuilder<'_> {
        OperationBuilder::new(self, name.into(), OperationKind::Function)
    }

    pub(crate) fn add_operation(
        &mut self,
        operation: OperationConfiguration,
    ) -> Result<(), ModelError> {
        if self.operation(operation.name()).is_some() {
            return Err(ModelError::DuplicateOperation(operation.name().to_string()));
        }
        info!(
            operation = %operation.name(),
            kind = %operation.kind(),
            bound = operation.is_bound(),
            parameter_count = operation.parameters().len(),
            "Registered operation"
        );
        self.operations.push(operation);
        Ok(())
    }

    #[must_use]
    pub fn operations(&self) -> &[OperationConfiguration] {
        &self.operations
    }

    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&OperationConfiguration> {
        self.operations.iter().find(|op| op.name() == name)
    }

    /// Check structural declarations against the registry.
    ///
    /// Reports entity types without keys, keys naming undeclared properties,
    /// keys typed as a nullable wrapper or a non-scalar type, and property
    /// types that do not resolve.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for registered in self.types.values() {
            match registered {
                RegisteredType::Entity(entity) => {
                    let location = format!("entityType:{}", entity.name());
                    self.validate_properties(&location, entity.properties(), &mut issues);
                    self.validate_keys(&location, entity, &mut issues);
                }
                RegisteredType::Complex(complex) => {
                    let location = format!("complexType:{}", complex.name());
                    self.validate_properties(&location, complex.properties(), &mut issues);
                }
                RegisteredType::Enum(_) => {}
            }
        }

        issues
    }

    fn validate_properties(
        &self,
        location: &str,
        properties: &[PropertyConfiguration],
        issues: &mut Vec<ValidationIssue>,
    ) {
        for property in properties {
            if self.get_type_configuration_or_none(&property.type_ref).is_none() {
                issues.push(ValidationIssue::new(
                    format!("{location}/{}", property.name),
                    "UnknownType",
                    format!(
                        "The type '{}' of property '{}' is not registered in the model.",
                        property.type_ref, property.name
                    ),
                ));
            }
        }
    }

    fn validate_keys(
        &self,
        location: &str,
        entity: &EntityTypeConfiguration,
        issues: &mut Vec<ValidationIssue>,
    ) {
        if entity.keys().is_empty() {
            issues.push(ValidationIssue::new(
                location,
                "MissingKey",
                format!("The entity type '{}' does not declare a key.", entity.name()),
            ));
            return;
        }

        for key in entity.keys() {
            let Some(property) = entity.properties().iter().find(|p| &p.name == key) else {
                issues.push(ValidationIssue::new(
                    location,
                    "UnknownKeyProperty",
                    format!("The key property '{key}' is not declared on the entity type."),
                ));
                continue;
            };

            // keys are primitives or enums without a nullable wrapper; string keys are fine
            let valid = !matches!(property.type_ref, TypeRef::Nullable(_))
                && self
                    .get_type_configuration_or_none(&property.type_ref)
                    .is_some_and(|t| matches!(t.kind(), EdmTypeKind::Primitive | EdmTypeKind::Enum));
            if !valid {
                issues.push(ValidationIssue::new(
                    format!("{location}/{key}"),
                    "InvalidKeyType",
                    format!(
                        "The key property '{key}' has type '{}'; keys must be primitive or enum types without a nullable wrapper.",
                        property.type_ref
                    ),
                ));
            }
        }
    }
}
