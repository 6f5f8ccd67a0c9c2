//! End-to-end tests for svecl CLI commands.
//!
//! These tests run the binary against real files. Tests that compile use a
//! stand-in `compiler.js` and are skipped when node is not installed.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// A temporary project directory.
struct TestProject {
    temp_dir: TempDir,
}

impl TestProject {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directory");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    fn path(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// Write the stand-in compiler and return its distribution directory.
    fn distribution(&self) -> PathBuf {
        self.write("svelte-dist/compiler.js", COMPILER_JS);
        self.path().join("svelte-dist")
    }
}

/// Stand-in for the `compiler.js` of a Svelte distribution.
const COMPILER_JS: &str = r#"
exports.VERSION = '4.2.0-test';
exports.compile = function (source, options) {
  if (!source.trim().endsWith('>')) {
    const error = new Error('Expected >');
    error.name = 'ParseError';
    error.code = 'unexpected-eof';
    error.start = { line: 1, column: source.length, character: source.length };
    error.frame = '1: ' + source;
    throw error;
  }
  return {
    js: { code: 'export default "' + options.filename + '";', map: { version: 3, mappings: 'AAAA' } },
    warnings: [],
  };
};
"#;

fn node_available() -> bool {
    let available = std::process::Command::new("node")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success());
    if !available {
        eprintln!("node not found in PATH, skipping");
    }
    available
}

fn svecl() -> Command {
    Command::cargo_bin("svecl").expect("Failed to find svecl binary")
}

const IMPORT_MAP: &str = r#"{
    "imports": {
        "svelte": "./node_modules/svelte/index.mjs",
        "svelte/": "./node_modules/svelte/",
        "lodash": "./node_modules/lodash-es"
    }
}"#;

// =============================================================================
// Help and arguments
// =============================================================================

#[test]
fn test_help() {
    svecl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: svecl"))
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("resolve"));
}

#[test]
fn test_version_flag() {
    svecl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_arg() {
    svecl().arg("--oops").assert().failure();
}

#[test]
fn test_invalid_compiler_option() {
    let project = TestProject::new();
    let component = project.write("App.svelte", "<h1>hi</h1>");

    svecl()
        .arg("compile")
        .arg(&component)
        .args(["--option", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}

// =============================================================================
// Resolve
// =============================================================================

#[test]
fn test_resolve_specifiers() {
    let project = TestProject::new();
    let map = project.write("js/importmap.json", IMPORT_MAP);
    let js_dir = project.path().join("js");

    let expected_svelte = js_dir.join("node_modules/svelte/index.mjs");
    let expected_lodash = js_dir.join("node_modules/lodash-es/index.js");

    svecl()
        .arg("resolve")
        .arg("--import-map")
        .arg(&map)
        .args(["svelte", "lodash", "./local.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "svelte -> {}",
            expected_svelte.display()
        )))
        .stdout(predicate::str::contains(format!(
            "lodash -> {}",
            expected_lodash.display()
        )))
        .stdout(predicate::str::contains("(default resolution)"));
}

#[test]
fn test_resolve_unknown_specifier_fails() {
    let project = TestProject::new();
    let map = project.write("importmap.json", IMPORT_MAP);

    svecl()
        .arg("resolve")
        .arg("--import-map")
        .arg(&map)
        .arg("react")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unable to resolve specifier 'react'"));
}

#[test]
fn test_resolve_rejects_scopes() {
    let project = TestProject::new();
    let map = project.write(
        "importmap.json",
        r#"{ "imports": {}, "scopes": { "/admin/": { "x": "./x.js" } } }"#,
    );

    svecl()
        .arg("resolve")
        .arg("--import-map")
        .arg(&map)
        .arg("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("scopes are not supported"));
}

#[test]
fn test_resolve_missing_import_map() {
    svecl()
        .args(["resolve", "--import-map", "/nonexistent/importmap.json", "svelte"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

// =============================================================================
// Compile and check
// =============================================================================

#[test]
fn test_compile_rejects_non_component() {
    let project = TestProject::new();
    let script = project.write("main.js", "console.log(1);");

    svecl()
        .arg("compile")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a Svelte component"));
}

#[test]
fn test_check_rejects_non_component() {
    let project = TestProject::new();
    let component = project.write("App.svelte", "<h1>hi</h1>");
    let script = project.write("main.js", "console.log(1);");

    svecl()
        .arg("check")
        .arg(&component)
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("main.js is not a Svelte component"));
}

#[test]
fn test_compile_missing_svelte_distribution() {
    let project = TestProject::new();
    let component = project.write("App.svelte", "<h1>hi</h1>");
    let empty = project.path().join("svelte-dist");
    fs::create_dir_all(&empty).unwrap();

    svecl()
        .arg("compile")
        .arg(&component)
        .arg("--svelte")
        .arg(&empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Svelte compiler not found"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_compile_component() {
    if !node_available() {
        return;
    }
    let project = TestProject::new();
    let dist = project.distribution();
    let component = project.write("App.svelte", "<h1>Hello</h1>");
    let outfile = project.path().join("dist/App.js");

    svecl()
        .arg("compile")
        .arg(&component)
        .arg("--svelte")
        .arg(&dist)
        .arg("--outfile")
        .arg(&outfile)
        .assert()
        .success()
        .stderr(predicate::str::contains("Compiled"));

    let code = fs::read_to_string(&outfile).unwrap();
    assert!(code.starts_with("export default \"App.svelte\";\n"));
    assert!(code.contains("//# sourceMappingURL=data:application/json"));
}

#[test]
fn test_compile_parse_error_json() {
    if !node_available() {
        return;
    }
    let project = TestProject::new();
    let dist = project.distribution();
    let component = project.write("Broken.svelte", "<h1>Hello");

    let output = svecl()
        .arg("compile")
        .arg(&component)
        .arg("--svelte")
        .arg(&dist)
        .arg("--json")
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let result: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(result["code"].is_null());
    assert_eq!(result["messages"].as_array().unwrap().len(), 1);
    assert_eq!(result["messages"][0]["type"], "error");
    assert_eq!(result["messages"][0]["message"], "Expected >");
    assert_eq!(result["messages"][0]["code"], "unexpected-eof");
}

#[test]
fn test_compile_json_to_outfile() {
    if !node_available() {
        return;
    }
    let project = TestProject::new();
    let dist = project.distribution();
    let component = project.write("App.svelte", "<h1>Hello</h1>");
    let outfile = project.path().join("out/result.json");

    svecl()
        .arg("compile")
        .arg(&component)
        .arg("--svelte")
        .arg(&dist)
        .arg("--json")
        .arg("--outfile")
        .arg(&outfile)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let result: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&outfile).unwrap()).unwrap();
    assert!(result["code"].as_str().unwrap().contains("sourceMappingURL"));
    assert_eq!(result["messages"], serde_json::json!([]));
}

#[test]
fn test_check_reports_errors() {
    if !node_available() {
        return;
    }
    let project = TestProject::new();
    let dist = project.distribution();
    let good = project.write("Good.svelte", "<h1>Hello</h1>");
    let broken = project.write("Broken.svelte", "<h1>Hello");

    svecl()
        .arg("check")
        .arg(&good)
        .arg(&broken)
        .arg("--svelte")
        .arg(&dist)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Expected >"))
        .stderr(predicate::str::contains("Checked 2 component(s)"))
        .stderr(predicate::str::contains("1 error(s)"));
}
