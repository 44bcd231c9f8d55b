use super::builder::ModelBuilder;
use super::types::TypeRef;
use crate::error::ModelError;
use crate::operation::OperationKind;
use crate::runtime_config::RuntimeConfig;
use crate::validator::{fail_if_issues, log_issues, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Serialization format of a model document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` are YAML, everything else is read as JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                DocumentFormat::Yaml
            }
            _ => DocumentFormat::Json,
        }
    }
}

/// Top-level model document.
///
/// ```yaml
/// namespace: Contoso.Models
/// entityTypes:
///   - name: Customer
///     key: [Id]
///     properties:
///       Id: int
///       Name: string
/// complexTypes:
///   - name: Address
///     properties:
///       City: string
/// enumTypes:
///   - name: Color
///     members: [Red, Green, Blue]
/// operations:
///   - name: Rate
///     kind: action
///     binding: { name: customer, type: Customer }
///     parameters:
///       - { name: rating, type: int }
///       - { name: color, type: Color? }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelDocument {
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub entity_types: Vec<EntityTypeDocument>,
    #[serde(default)]
    pub complex_types: Vec<StructuredTypeDocument>,
    #[serde(default)]
    pub enum_types: Vec<EnumTypeDocument>,
    #[serde(default)]
    pub operations: Vec<OperationDocument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityTypeDocument {
    pub name: String,
    #[serde(default)]
    pub key: Vec<String>,
    /// Property name to declared type
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuredTypeDocument {
    pub name: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumTypeDocument {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OperationDocument {
    pub name: String,
    #[serde(default)]
    pub kind: OperationKind,
    #[serde(default)]
    pub binding: Option<ParameterDocument>,
    #[serde(default)]
    pub parameters: Vec<ParameterDocument>,
    #[serde(default)]
    pub returns: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

/// Load a model document from disk using configuration from the environment.
///
/// # Errors
///
/// [`ModelError::Io`] when the file cannot be read, [`ModelError::Yaml`] /
/// [`ModelError::Json`] when it cannot be deserialized, [`ModelError::Validation`] when the model has issues.
pub fn load_model(path: impl AsRef<Path>) -> Result<ModelBuilder, ModelError> {
    load_model_with_config(path, &RuntimeConfig::from_env())
}

/// Load a model document from disk with an explicit configuration.
pub fn load_model_with_config(
    path: impl AsRef<Path>,
    config: &RuntimeConfig,
) -> Result<ModelBuilder, ModelError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Loading model document");
    let content = std::fs::read_to_string(path)?;
    let document = parse_document(&content, DocumentFormat::from_path(path))?;
    build_model(&document, config)
}

/// Load an in-memory model document using the default configuration.
pub fn load_model_from_str(
    content: &str,
    format: DocumentFormat,
) -> Result<ModelBuilder, ModelError> {
    let document = parse_document(content, format)?;
    build_model(&document, &RuntimeConfig::default())
}

fn parse_document(content: &str, format: DocumentFormat) -> Result<ModelDocument, ModelError> {
    let document = match format {
        DocumentFormat::Yaml => serde_yaml::from_str(content)?,
        DocumentFormat::Json => serde_json::from_str(content)?,
    };
    Ok(document)
}

fn parse_type(
    location: &str,
    input: &str,
    issues: &mut Vec<ValidationIssue>,
) -> Option<TypeRef> {
    match input.parse() {
        Ok(type_ref) => Some(type_ref),
        Err(err) => {
            issues.push(ValidationIssue::new(location, "InvalidTypeReference", err.to_string()));
            None
        }
    }
}

/// Build a registry from a parsed document.
///
/// Types are registered before operations, so operations may reference any
/// type in the document. Every problem is collected before failing.
/// Structural issues from [`ModelBuilder::validate`] fail the build only when
/// `config.strict` is set; otherwise they are logged.
///
/// # Errors
///
/// [`ModelError::Validation`] carrying every issue found.
pub fn build_model(
    document: &ModelDocument,
    config: &RuntimeConfig,
) -> Result<ModelBuilder, ModelError> {
    let namespace = document
        .namespace
        .clone()
        .unwrap_or_else(|| config.namespace.clone());
    let mut builder = ModelBuilder::with_namespace(namespace);
    let mut issues = Vec::new();

    for entity in &document.entity_types {
        let location = format!("entityType:{}", entity.name);
        let properties: Vec<(String, Option<TypeRef>)> = entity
            .properties
            .iter()
            .map(|(name, ty)| {
                let location = format!("{location}/{name}");
                (name.clone(), parse_type(&location, ty, &mut issues))
            })
            .collect();
        match builder.entity_type(&entity.name) {
            Ok(definition) => {
                for (name, type_ref) in properties {
                    if let Some(type_ref) = type_ref {
                        definition.property(name, type_ref);
                    }
                }
                for key in &entity.key {
                    definition.has_key(key.clone());
                }
            }
            Err(err) => issues.push(ValidationIssue::new(location, issue_kind(&err), err.to_string())),
        }
    }

    for complex in &document.complex_types {
        let location = format!("complexType:{}", complex.name);
        let properties: Vec<(String, Option<TypeRef>)> = complex
            .properties
            .iter()
            .map(|(name, ty)| {
                let location = format!("{location}/{name}");
                (name.clone(), parse_type(&location, ty, &mut issues))
            })
            .collect();
        match builder.complex_type(&complex.name) {
            Ok(definition) => {
                for (name, type_ref) in properties {
                    if let Some(type_ref) = type_ref {
                        definition.property(name, type_ref);
                    }
                }
            }
            Err(err) => issues.push(ValidationIssue::new(location, issue_kind(&err), err.to_string())),
        }
    }

    for enumeration in &document.enum_types {
        if let Err(err) = builder.enum_type(&enumeration.name, enumeration.members.iter().cloned()) {
            issues.push(ValidationIssue::new(
                format!("enumType:{}", enumeration.name),
                issue_kind(&err),
                err.to_string(),
            ));
        }
    }

    for operation in &document.operations {
        issues.extend(add_operation(&mut builder, operation));
    }

    let structural = builder.validate();
    if config.strict {
        issues.extend(structural);
    } else {
        log_issues(&structural);
    }

    fail_if_issues(issues)?;

    info!(
        namespace = %builder.namespace(),
        types = builder.type_names().count(),
        operations = builder.operations().len(),
        "Model loaded"
    );
    Ok(builder)
}

fn add_operation(builder: &mut ModelBuilder, document: &OperationDocument) -> Vec<ValidationIssue> {
    let location = format!("operation:{}", document.name);
    let mut type_issues = Vec::new();

    let binding = document.binding.as_ref().and_then(|binding| {
        let location = format!("{location}/{}", binding.name);
        parse_type(&location, &binding.type_name, &mut type_issues)
            .map(|type_ref| (binding.name.clone(), type_ref))
    });
    let parameters: Vec<(String, Option<TypeRef>)> = document
        .parameters
        .iter()
        .map(|p| {
            let location = format!("{location}/{}", p.name);
            (p.name.clone(), parse_type(&location, &p.type_name, &mut type_issues))
        })
        .collect();
    let returns = document
        .returns
        .as_ref()
        .and_then(|r| parse_type(&location, r, &mut type_issues));

    // an operation with an unparsable type is not registered
    if !type_issues.is_empty() {
        return type_issues;
    }

    let mut operation = match document.kind {
        OperationKind::Action => builder.action(document.name.clone()),
        OperationKind::Function => builder.function(document.name.clone()),
    };
    if let Some((name, type_ref)) = binding {
        operation = operation.set_binding_parameter(name, type_ref);
    }
    for (name, type_ref) in parameters {
        if let Some(type_ref) = type_ref {
            operation = operation.parameter(name, type_ref);
        }
    }
    if let Some(type_ref) = returns {
        operation = operation.returns(type_ref);
    }

    match operation.build() {
        Ok(_) => Vec::new(),
        Err(err) => vec![ValidationIssue::new(location, issue_kind(&err), err.to_string())],
    }
}

fn issue_kind(err: &ModelError) -> &'static str {
    match err {
        ModelError::InvalidArgument { .. } => "InvalidArgument",
        ModelError::KindConflict { .. } => "KindConflict",
        ModelError::UnknownType(_) => "UnknownType",
        ModelError::DuplicateParameter { .. } => "DuplicateParameter",
        ModelError::DuplicateOperation(_) => "DuplicateOperation",
        ModelError::MissingReturnType(_) => "MissingReturnType",
        _ => "InvalidOperation",
    }
}
