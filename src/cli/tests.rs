//! Unit tests for CLI commands

use crate::cli::{execute, Cli, Commands};
use clap::Parser;
use std::io::Write;

const MODEL: &str = r#"
namespace: Contoso.Models
entityTypes:
  - name: Customer
    key: [Id]
    properties:
      Id: int
complexTypes:
  - name: Address
enumTypes:
  - name: Color
    members: [Red, Green]
operations:
  - name: Rate
    binding: { name: customer, type: Customer }
    parameters:
      - { name: rating, type: int }
      - { name: colors, type: "IEnumerable<Color?>" }
"#;

fn model_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(MODEL.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    execute(cli, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_classify_command_parses() {
    let cli = Cli::try_parse_from([
        "edmbuilder",
        "classify",
        "--model",
        "model.yaml",
        "--type",
        "Color?",
        "--binding",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Commands::Classify {
            model,
            type_ref,
            binding,
            json,
        } => {
            assert_eq!(model.to_string_lossy(), "model.yaml");
            assert_eq!(type_ref, "Color?");
            assert!(binding);
            assert!(json);
        }
        _ => panic!("Expected Classify command"),
    }
}

#[test]
fn test_verbose_is_global() {
    let cli = Cli::try_parse_from(["edmbuilder", "validate", "-m", "m.json", "-v"]).unwrap();
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Validate { .. }));
}

#[test]
fn test_model_argument_is_required() {
    assert!(Cli::try_parse_from(["edmbuilder", "inspect"]).is_err());
    assert!(Cli::try_parse_from(["edmbuilder", "classify", "--model", "m.yaml"]).is_err());
}

#[test]
fn test_inspect_text_output() {
    let file = model_file();
    let path = file.path().to_str().unwrap();
    let output = run(&["edmbuilder", "inspect", "--model", path]).unwrap();
    assert!(output.contains("Namespace: Contoso.Models"));
    assert!(output.contains("Action Rate"));
    assert!(output.contains("binding customer: Contoso.Models.Customer (optional: true)"));
    assert!(output.contains("param rating: Edm.Int32 (optional: false)"));
    assert!(output.contains("param colors: Collection(Contoso.Models.Color) (optional: true)"));
}

#[test]
fn test_classify_json_output() {
    let file = model_file();
    let path = file.path().to_str().unwrap();
    let output = run(&[
        "edmbuilder",
        "classify",
        "--model",
        path,
        "--type",
        "ICollection<Color>",
        "--json",
    ])
    .unwrap();
    let report: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(report["kind"], "collection");
    assert_eq!(report["elementKind"], "enum");
    assert_eq!(report["fullName"], "Collection(Contoso.Models.Color)");
    assert_eq!(report["optional"], false);
}

#[test]
fn test_classify_binding_rejects_complex_type() {
    let file = model_file();
    let path = file.path().to_str().unwrap();
    let err = run(&[
        "edmbuilder",
        "classify",
        "--model",
        path,
        "--type",
        "Address",
        "--binding",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("'Contoso.Models.Address'"));
}

#[test]
fn test_classify_unregistered_type() {
    let file = model_file();
    let path = file.path().to_str().unwrap();
    let output = run(&["edmbuilder", "classify", "--model", path, "--type", "Order"]).unwrap();
    assert!(output.contains("not registered"));
    assert!(output.contains("optional: false"));
}

#[test]
fn test_validate_reports_issues() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(br#"{ "entityTypes": [{ "name": "Order" }] }"#)
        .unwrap();
    let path = file.path().to_str().unwrap();
    assert!(run(&["edmbuilder", "validate", "--model", path]).is_err());

    let good = model_file();
    let output = run(&["edmbuilder", "validate", "--model", good.path().to_str().unwrap()]).unwrap();
    assert!(output.contains("Model is valid: 3 types, 1 operations"));
}
