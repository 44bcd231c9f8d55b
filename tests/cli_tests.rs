#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::io::Write;
use std::process::Command;

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
"#;

fn model_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn edmbuilder() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_edmbuilder"));
    cmd.env_remove("EDMB_NAMESPACE")
        .env_remove("EDMB_STRICT")
        .env("EDMB_LOG_LEVEL", "error");
    cmd
}

#[test]
fn test_cli_inspect_json() {
    let file = model_file(MODEL);
    let output = edmbuilder()
        .args(["inspect", "--json", "--model"])
        .arg(file.path())
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["namespace"], "Contoso.Models");
    let rate = &report["operations"][0];
    assert_eq!(rate["name"], "Rate");
    assert_eq!(rate["kind"], "action");
    assert_eq!(rate["binding"]["type"], "Contoso.Models.Customer");
    assert_eq!(rate["parameters"][0]["optional"], false);
}

#[test]
fn test_cli_classify_nullable_enum() {
    let file = model_file(MODEL);
    let output = edmbuilder()
        .args(["classify", "--type", "Color?", "--model"])
        .arg(file.path())
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Enum Contoso.Models.Color"), "stdout: {stdout}");
    assert!(stdout.contains("optional: true"));
}

#[test]
fn test_cli_classify_binding_failure_exits_non_zero() {
    let file = model_file(MODEL);
    let output = edmbuilder()
        .args(["classify", "--binding", "--type", "Address", "--model"])
        .arg(file.path())
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'Contoso.Models.Address'"), "stderr: {stderr}");
}

#[test]
fn test_cli_validate() {
    let good = model_file(MODEL);
    let status = edmbuilder()
        .args(["validate", "--model"])
        .arg(good.path())
        .status()
        .expect("run cli");
    assert!(status.success());

    let bad = model_file("entityTypes:\n  - name: Order\n");
    let output = edmbuilder()
        .args(["validate", "--model"])
        .arg(bad.path())
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("MissingKey"));
}
