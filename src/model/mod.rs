//! # Model Module
//!
//! The metadata model: declared type references, resolved type descriptors
//! and the [`ModelBuilder`] registry that maps one to the other.
//!
//! ## Overview
//!
//! - `types` - type kinds, EDM primitives and parsed [`TypeRef`]s
//! - `configuration` - resolved descriptors ([`TypeConfiguration`]) and the
//!   entity/complex/enum definitions behind them
//! - `builder` - the registry, type resolution and operation registration
//! - `load` - building a registry from a YAML or JSON model document
//!
//! ## Example
//!
//! ```rust
//! use edmbuilder::model::{EdmTypeKind, ModelBuilder};
//!
//! let mut builder = ModelBuilder::with_namespace("Contoso.Models");
//! builder.entity_type("Customer").unwrap();
//!
//! let customers = builder
//!     .get_type_configuration_or_none(&"IEnumerable<Customer>".parse().unwrap())
//!     .unwrap();
//! assert_eq!(customers.element_or_self_kind(), EdmTypeKind::Entity);
//! ```

mod builder;
mod configuration;
mod load;
mod types;

pub use builder::{ModelBuilder, DEFAULT_NAMESPACE};
pub use configuration::{
    CollectionTypeConfiguration, ComplexTypeConfiguration, EntityTypeConfiguration, EnumMember,
    EnumTypeConfiguration, EnumTypeReference, PrimitiveTypeConfiguration, PropertyConfiguration,
    TypeConfiguration,
};
pub use load::{
    build_model, load_model, load_model_from_str, load_model_with_config, DocumentFormat,
    EntityTypeDocument, EnumTypeDocument, ModelDocument, OperationDocument, ParameterDocument,
    StructuredTypeDocument,
};
pub use types::{
    CollectionShape, EdmTypeKind, PrimitiveKind, TypeName, TypeRef, EDM_NAMESPACE,
    MAX_TYPE_NESTING,
};
