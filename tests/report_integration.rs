//! JSON shape of reports as seen by consumers.

use std::path::PathBuf;

use codeprobe::report::to_json;
use codeprobe::{analyze_code, Engine, PackageQuery, SourceUnit};
use serde_json::Value;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn missing_package_manager() -> PackageQuery {
    PackageQuery::with_command("codeprobe-no-such-package-manager", ["list", "--format=json"])
}

#[test]
fn code_report_json_shape() {
    let report = analyze_code("import os\nclass A:\n    def run(self):\n        os.remove(x)\n");
    let json: Value = serde_json::from_str(&to_json(&report).unwrap()).unwrap();

    assert_eq!(json["success"], true);
    assert!(json.get("error").is_none());

    let facts = &json["facts"];
    assert_eq!(facts["success"], true);
    assert_eq!(facts["imports"][0], "import os");
    assert_eq!(facts["calls"][0]["kind"], "attribute");
    assert_eq!(facts["calls"][0]["object"], "os");
    assert_eq!(facts["calls"][0]["attribute"], "remove");
    assert_eq!(facts["classes"][0]["name"], "A");
    assert_eq!(facts["classes"][0]["methods"][0], "run");
    assert!(facts["variables"].as_array().unwrap().is_empty());
    assert!(facts["function_calls"].as_array().unwrap().is_empty());
    assert_eq!(facts["attributes"], serde_json::json!(["os.remove"]));

    let findings = &json["findings"];
    assert_eq!(findings["success"], true);
    assert_eq!(findings["detectors"][0]["detector"], "bare-except");
    assert_eq!(findings["anti_patterns"]["bare_except"], false);
    assert!(findings["class_issues"].as_array().unwrap().is_empty());
    assert_eq!(findings["quality"]["follows_pep8"], true);
}

#[test]
fn finding_json_fields() {
    let report = analyze_code("def f(data=[]): pass");
    let json = serde_json::to_value(&report).unwrap();
    let finding = &json["findings"]["detectors"][1]["findings"][0];
    assert_eq!(finding["kind"], "mutable-default-argument");
    assert_eq!(finding["severity"], "error");
    assert_eq!(finding["line"], 1);
    assert_eq!(finding["column"], 7);
    assert_eq!(finding["snippet"], "data=[]");
}

#[test]
fn failed_code_report_json_shape() {
    let report = analyze_code("def f(:");
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().starts_with("SyntaxError"));
    assert_eq!(json["facts"]["success"], false);
    assert!(json["facts"].get("imports").is_none());
    assert!(json["facts"].get("function_calls").is_none());
    assert_eq!(json["findings"]["success"], false);
}

#[test]
fn full_report_keeps_environment_after_syntax_error() {
    let project = testdata_path().join("project");
    let engine = Engine::default();
    let unit = SourceUnit::inline("class (:");

    let environment = engine.analyze_dependencies_with(&project, &missing_package_manager());
    let code = engine.analyze_unit(&unit);
    let report = codeprobe::aggregate(code.facts, code.findings, environment);

    assert!(!report.success);
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["facts"]["success"], false);
    assert_eq!(json["environment"]["success"], true);
    assert_eq!(
        json["environment"]["manifests_found"],
        serde_json::json!(["requirements.txt", "pyproject.toml"])
    );
    assert_eq!(json["environment"]["installed_packages"]["success"], false);
    assert!(json["environment"]["installed_packages"].get("packages").is_none());
}

#[test]
fn full_report_with_missing_project() {
    let engine = Engine::default();
    let unit = SourceUnit::inline("x = 1\n");
    let report = engine.analyze(&unit, &testdata_path().join("no-such-project"));

    assert!(!report.success);
    assert!(report.facts.success);
    assert!(report.findings.success);
    assert!(!report.environment.success);
    assert!(report.environment.error().unwrap().starts_with("NotFound"));
}
