//! # edmbuilder
//!
//! Core of an OData-style model builder: a registry of entity, complex and
//! enum types, actions and functions configured over them, and the rules that
//! classify operation parameters.
//!
//! ## Overview
//!
//! - **[`model`]** - type references, resolved type descriptors, the
//!   [`ModelBuilder`] registry and model document loading
//! - **[`parameter`]** - binding and non-binding parameters with nullability
//!   inference
//! - **[`operation`]** - action/function configuration
//! - **[`validator`]** - structural issues found while loading a model
//! - **[`error`]** - the [`ModelError`] type
//! - **[`logging`]** / **[`runtime_config`]** - environment-driven setup
//! - **[`cli`]** - the `edmbuilder` command line
//!
//! ## Parameter classification
//!
//! A binding parameter must be an entity type or a collection of one. A
//! non-binding parameter accepts any type and is optional when its type (or
//! the element type of a collection) admits null:
//!
//! ```rust
//! use edmbuilder::model::ModelBuilder;
//!
//! let mut builder = ModelBuilder::with_namespace("Contoso.Models");
//! builder.entity_type("Customer").unwrap();
//! builder.complex_type("Address").unwrap();
//! builder.enum_type("Color", ["Red", "Green"]).unwrap();
//!
//! let optional = |declared: &str| {
//!     builder
//!         .nonbinding_parameter("p", &declared.parse().unwrap())
//!         .unwrap()
//!         .optional_parameter()
//! };
//! assert!(!optional("int"));
//! assert!(optional("double?"));
//! assert!(!optional("Color"));
//! assert!(optional("IEnumerable<Color?>"));
//! assert!(optional("Address"));
//!
//! let err = builder
//!     .binding_parameter("address", &"Address".parse().unwrap())
//!     .unwrap_err();
//! assert_eq!(err.param_name(), Some("parameterType"));
//! assert!(err.to_string().contains("'Contoso.Models.Address'"));
//! ```

pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod operation;
pub mod parameter;
pub mod runtime_config;
pub mod validator;

pub use error::ModelError;
pub use model::{load_model, load_model_from_str, ModelBuilder, TypeConfiguration, TypeRef};
pub use operation::{OperationBuilder, OperationConfiguration, OperationKind};
pub use parameter::{BindingParameter, NonbindingParameter, ParameterConfiguration};
