use super::types::{CollectionShape, EdmTypeKind, PrimitiveKind, TypeName, TypeRef};
use crate::error::ModelError;
use std::fmt;
use std::sync::Arc;

/// A structural property declared on an entity or complex type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyConfiguration {
    pub name: String,
    pub type_ref: TypeRef,
}

/// Registered entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTypeConfiguration {
    name: TypeName,
    keys: Vec<String>,
    properties: Vec<PropertyConfiguration>,
}

impl EntityTypeConfiguration {
    pub(crate) fn new(name: TypeName) -> Self {
        EntityTypeConfiguration {
            name,
            keys: Vec::new(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyConfiguration] {
        &self.properties
    }

    /// Declare (or redeclare) a structural property.
    pub fn property(&mut self, name: impl Into<String>, type_ref: TypeRef) -> &mut Self {
        upsert_property(&mut self.properties, name.into(), type_ref);
        self
    }

    /// Add a key property name. Keys are checked by model validation.
    pub fn has_key(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if !self.keys.contains(&name) {
            self.keys.push(name);
        }
        self
    }
}

/// Registered complex (structured, keyless) type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexTypeConfiguration {
    name: TypeName,
    properties: Vec<PropertyConfiguration>,
}

impl ComplexTypeConfiguration {
    pub(crate) fn new(name: TypeName) -> Self {
        ComplexTypeConfiguration {
            name,
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    #[must_use]
    pub fn properties(&self) -> &[PropertyConfiguration] {
        &self.properties
    }

    pub fn property(&mut self, name: impl Into<String>, type_ref: TypeRef) -> &mut Self {
        upsert_property(&mut self.properties, name.into(), type_ref);
        self
    }
}

fn upsert_property(properties: &mut Vec<PropertyConfiguration>, name: String, type_ref: TypeRef) {
    match properties.iter_mut().find(|p| p.name == name) {
        Some(existing) => existing.type_ref = type_ref,
        None => properties.push(PropertyConfiguration { name, type_ref }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    pub name: String,
    pub value: i64,
}

/// Registered enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumTypeConfiguration {
    name: TypeName,
    members: Vec<EnumMember>,
}

impl EnumTypeConfiguration {
    pub(crate) fn new(name: TypeName) -> Self {
        EnumTypeConfiguration {
            name,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &TypeName {
        &self.name
    }

    #[must_use]
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Append a member; its value follows the previous member's value.
    pub fn member(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        if self.members.iter().any(|m| m.name == name) {
            return self;
        }
        let value = self.members.last().map_or(0, |m| m.value + 1);
        self.members.push(EnumMember { name, value });
        self
    }

    /// Descriptor for the enum itself (not nullable).
    #[must_use]
    pub fn descriptor(self: &Arc<Self>) -> TypeConfiguration {
        TypeConfiguration::Enum(EnumTypeReference {
            definition: Arc::clone(self),
            nullable: false,
        })
    }

    /// Descriptor for the nullable wrapper of this enum (`Color?`).
    #[must_use]
    pub fn nullable_variant(self: &Arc<Self>) -> TypeConfiguration {
        TypeConfiguration::Enum(EnumTypeReference {
            definition: Arc::clone(self),
            nullable: true,
        })
    }
}

/// An enum definition together with the nullability it is used with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumTypeReference {
    pub definition: Arc<EnumTypeConfiguration>,
    pub nullable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveTypeConfiguration {
    pub kind: PrimitiveKind,
    pub nullable: bool,
}

impl PrimitiveTypeConfiguration {
    /// Reference-like primitives are nullable without a wrapper.
    #[must_use]
    pub const fn new(kind: PrimitiveKind) -> Self {
        PrimitiveTypeConfiguration {
            kind,
            nullable: kind.is_reference_like(),
        }
    }
}

/// A collection over a single element descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionTypeConfiguration {
    shape: CollectionShape,
    element: Box<TypeConfiguration>,
}

impl CollectionTypeConfiguration {
    /// Collections of collections are not representable in the model.
    pub fn new(shape: CollectionShape, element: TypeConfiguration) -> Result<Self, ModelError> {
        if element.kind() == EdmTypeKind::Collection {
            return Err(ModelError::invalid_argument(
                "elementType",
                format!(
                    "The type '{}' cannot be used as a collection element.",
                    element.full_name()
                ),
            ));
        }
        Ok(CollectionTypeConfiguration {
            shape,
            element: Box::new(element),
        })
    }

    #[must_use]
    pub fn shape(&self) -> CollectionShape {
        self.shape
    }

    #[must_use]
    pub fn element_type(&self) -> &TypeConfiguration {
        &self.element
    }
}

/// Type descriptor: the model's resolved view of a declared type.
///
/// Descriptors are cheap to clone; registered definitions are shared via `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeConfiguration {
    Primitive(PrimitiveTypeConfiguration),
    Enum(EnumTypeReference),
    Entity(Arc<EntityTypeConfiguration>),
    Complex(Arc<ComplexTypeConfiguration>),
    Collection(CollectionTypeConfiguration),
}

impl TypeConfiguration {
    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeConfiguration::Primitive(PrimitiveTypeConfiguration::new(kind))
    }

    #[must_use]
    pub fn kind(&self) -> EdmTypeKind {
        match self {
            TypeConfiguration::Primitive(_) => EdmTypeKind::Primitive,
            TypeConfiguration::Enum(_) => EdmTypeKind::Enum,
            TypeConfiguration::Entity(_) => EdmTypeKind::Entity,
            TypeConfiguration::Complex(_) => EdmTypeKind::Complex,
            TypeConfiguration::Collection(_) => EdmTypeKind::Collection,
        }
    }

    /// `Edm.Int32`, `Contoso.Models.Customer`, `Collection(Edm.String)`.
    #[must_use]
    pub fn full_name(&self) -> String {
        match self {
            TypeConfiguration::Primitive(p) => p.kind.full_name(),
            TypeConfiguration::Enum(e) => e.definition.name().full_name(),
            TypeConfiguration::Entity(e) => e.name().full_name(),
            TypeConfiguration::Complex(c) => c.name().full_name(),
            TypeConfiguration::Collection(c) => {
                format!("Collection({})", c.element_type().full_name())
            }
        }
    }

    /// Whether a null value of this exact type is legal.
    ///
    /// Entity and complex types are reference-like and always nullable. A
    /// collection is never null itself; its element decides element nullability.
    #[must_use]
    pub fn is_nullable(&self) -> bool {
        match self {
            TypeConfiguration::Primitive(p) => p.nullable,
            TypeConfiguration::Enum(e) => e.nullable,
            TypeConfiguration::Entity(_) | TypeConfiguration::Complex(_) => true,
            TypeConfiguration::Collection(_) => false,
        }
    }

    /// The nullable wrapper of this descriptor.
    ///
    /// Returns `None` for collections, which have no nullable wrapper.
    #[must_use]
    pub fn nullable_variant(&self) -> Option<TypeConfiguration> {
        match self {
            TypeConfiguration::Primitive(p) => Some(TypeConfiguration::Primitive(
                PrimitiveTypeConfiguration {
                    kind: p.kind,
                    nullable: true,
                },
            )),
            TypeConfiguration::Enum(e) => Some(e.definition.nullable_variant()),
            TypeConfiguration::Entity(_) | TypeConfiguration::Complex(_) => Some(self.clone()),
            TypeConfiguration::Collection(_) => None,
        }
    }

    #[must_use]
    pub fn element_type(&self) -> Option<&TypeConfiguration> {
        match self {
            TypeConfiguration::Collection(c) => Some(c.element_type()),
            _ => None,
        }
    }

    /// Kind used for binding checks: a collection is classified by its element.
    #[must_use]
    pub fn element_or_self_kind(&self) -> EdmTypeKind {
        self.element_type().unwrap_or(self).kind()
    }

    #[must_use]
    pub fn as_entity(&self) -> Option<&Arc<EntityTypeConfiguration>> {
        match self {
            TypeConfiguration::Entity(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for TypeConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())?;
        if self.kind() != EdmTypeKind::Collection && self.is_nullable() {
            write!(f, " (nullable)")?;
        }
        Ok(())
    }
}
