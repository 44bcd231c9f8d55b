use crate::error::ModelError;
use crate::model::{load_model_with_config, EdmTypeKind, ModelBuilder, TypeConfiguration, TypeRef};
use crate::operation::{OperationConfiguration, OperationKind};
use crate::parameter::ParameterConfiguration;
use crate::runtime_config::RuntimeConfig;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Command-line interface for the model builder
#[derive(Parser, Debug)]
#[command(name = "edmbuilder", version)]
#[command(about = "Inspect and validate EDM model documents", long_about = None)]
pub struct Cli {
    /// Enable debug logging with source locations
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List operations and the classification of their parameters
    Inspect {
        /// Path to the model document (YAML or JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// Print a JSON report instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Classify a single declared type against the model
    Classify {
        /// Path to the model document (YAML or JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// Declared type, e.g. `int?`, `Customer`, `IEnumerable<Color?>`
        #[arg(short = 't', long = "type")]
        type_ref: String,

        /// Check the type as a binding parameter
        #[arg(long, default_value_t = false)]
        binding: bool,

        /// Print a JSON report instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Validate a model document
    Validate {
        /// Path to the model document (YAML or JSON)
        #[arg(short, long)]
        model: PathBuf,
    },
}

#[derive(Debug, Serialize)]
struct ParameterReport {
    name: String,
    #[serde(rename = "type")]
    type_name: Option<String>,
    optional: bool,
}

impl ParameterReport {
    fn from_parameter(parameter: &dyn ParameterConfiguration) -> Self {
        ParameterReport {
            name: parameter.name().to_string(),
            type_name: parameter.type_configuration().map(TypeConfiguration::full_name),
            optional: parameter.optional_parameter(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OperationReport {
    name: String,
    kind: OperationKind,
    binding: Option<ParameterReport>,
    parameters: Vec<ParameterReport>,
    returns: Option<String>,
}

impl From<&OperationConfiguration> for OperationReport {
    fn from(operation: &OperationConfiguration) -> Self {
        OperationReport {
            name: operation.name().to_string(),
            kind: operation.kind(),
            binding: operation
                .binding_parameter()
                .map(|b| ParameterReport::from_parameter(b)),
            parameters: operation
                .parameters()
                .iter()
                .map(|p| ParameterReport::from_parameter(p))
                .collect(),
            returns: operation.return_type().map(TypeConfiguration::full_name),
        }
    }
}

#[derive(Debug, Serialize)]
struct InspectReport {
    namespace: String,
    types: Vec<String>,
    operations: Vec<OperationReport>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyReport {
    declared: String,
    resolved: bool,
    kind: Option<EdmTypeKind>,
    element_kind: Option<EdmTypeKind>,
    full_name: Option<String>,
    optional: bool,
}

/// Parse arguments from the process and execute, writing to stdout.
///
/// # Errors
///
/// Returns an error if the model cannot be loaded, a declared type cannot be
/// parsed, a `--binding` type is not an entity, or validation finds issues.
pub fn run_cli(cli: Cli) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}

/// Execute a parsed command, writing its report to `out`.
pub fn execute(cli: Cli, out: &mut dyn Write) -> Result<()> {
    let config = RuntimeConfig::from_env();
    debug!(command = ?cli.command, namespace = %config.namespace, strict = config.strict, "Running command");

    match cli.command {
        Commands::Inspect { model, json } => {
            let builder = load(&model, &config)?;
            inspect(&builder, json, out)
        }
        Commands::Classify {
            model,
            type_ref,
            binding,
            json,
        } => {
            let builder = load(&model, &config)?;
            classify(&builder, &type_ref, binding, json, out)
        }
        Commands::Validate { model } => validate(&model, &config, out),
    }
}

fn load(path: &Path, config: &RuntimeConfig) -> Result<ModelBuilder> {
    load_model_with_config(path, config)
        .with_context(|| format!("Failed to load model from {}", path.display()))
}

fn inspect(builder: &ModelBuilder, json: bool, out: &mut dyn Write) -> Result<()> {
    let report = InspectReport {
        namespace: builder.namespace().to_string(),
        types: builder.type_names().map(str::to_string).collect(),
        operations: builder.operations().iter().map(OperationReport::from).collect(),
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Namespace: {}", report.namespace)?;
    writeln!(out, "Types: {}", report.types.join(", "))?;
    for operation in &report.operations {
        let returns = operation
            .returns
            .as_ref()
            .map(|r| format!(" -> {r}"))
            .unwrap_or_default();
        writeln!(out, "{} {}{returns}", operation.kind, operation.name)?;
        if let Some(binding) = &operation.binding {
            write_parameter(out, "binding", binding)?;
        }
        for parameter in &operation.parameters {
            write_parameter(out, "param", parameter)?;
        }
    }
    Ok(())
}

fn write_parameter(out: &mut dyn Write, role: &str, parameter: &ParameterReport) -> Result<()> {
    writeln!(
        out,
        "  {role} {}: {} (optional: {})",
        parameter.name,
        parameter.type_name.as_deref().unwrap_or("<unresolved>"),
        parameter.optional
    )?;
    Ok(())
}

fn classify(
    builder: &ModelBuilder,
    declared: &str,
    binding: bool,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let type_ref: TypeRef = declared
        .parse()
        .with_context(|| format!("Invalid type reference '{declared}'"))?;

    let parameter: Box<dyn ParameterConfiguration> = if binding {
        Box::new(builder.binding_parameter("value", &type_ref)?)
    } else {
        Box::new(builder.nonbinding_parameter("value", &type_ref)?)
    };

    let resolved = parameter.type_configuration();
    let report = ClassifyReport {
        declared: type_ref.to_string(),
        resolved: resolved.is_some(),
        kind: resolved.map(TypeConfiguration::kind),
        element_kind: resolved.map(TypeConfiguration::element_or_self_kind),
        full_name: resolved.map(TypeConfiguration::full_name),
        optional: parameter.optional_parameter(),
    };

    if json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    match (&report.full_name, report.kind) {
        (Some(full_name), Some(kind)) => {
            writeln!(out, "{}: {kind} {full_name}", report.declared)?;
        }
        _ => writeln!(out, "{}: not registered in the model", report.declared)?,
    }
    writeln!(out, "optional: {}", report.optional)?;
    Ok(())
}

fn validate(path: &Path, config: &RuntimeConfig, out: &mut dyn Write) -> Result<()> {
    match load_model_with_config(path, config) {
        Ok(builder) => {
            writeln!(
                out,
                "✅ Model is valid: {} types, {} operations",
                builder.type_names().count(),
                builder.operations().len()
            )?;
            Ok(())
        }
        Err(ModelError::Validation(issues)) => {
            for issue in &issues {
                writeln!(out, "❌ {issue}")?;
            }
            bail!("Model validation failed with {} issue(s)", issues.len())
        }
        Err(err) => {
            Err(err).with_context(|| format!("Failed to load model from {}", path.display()))
        }
    }
}
