//! Command-line behaviour: argument parsing and exit statuses

use clap::Parser;
use declcheck::cli::commands::{EXIT_CLEAN, EXIT_DIAGNOSTICS, EXIT_FATAL};
use declcheck::cli::{Args, Command};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new(declaration: &str, source: &str) -> Self {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("index.d.ts"), declaration).unwrap();
        let package = dir.path().join("pkg");
        fs::create_dir(&package).unwrap();
        fs::write(package.join("package.json"), r#"{"name": "pkg", "main": "main.js"}"#).unwrap();
        fs::write(package.join("main.js"), source).unwrap();
        fs::write(dir.path().join("declcheck.toml"), "loader = \"static\"\nuse_colors = false\n").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn args(&self, extra: &[&str]) -> Args {
        let mut argv: Vec<String> = vec![
            "declcheck".to_string(),
            "--dts".to_string(),
            display(&self.path("index.d.ts")),
            "--js".to_string(),
            display(&self.path("pkg")),
            "--config".to_string(),
            display(&self.path("declcheck.toml")),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn test_required_arguments() {
    assert!(Args::try_parse_from(["declcheck"]).is_err());
    assert!(Args::try_parse_from(["declcheck", "--dts", "a.d.ts"]).is_err());
    assert!(Args::try_parse_from(["declcheck", "--dts", "a.d.ts", "--snapshot", "a.json"]).is_ok());
    assert!(Args::try_parse_from(["declcheck", "--init"]).is_ok());
}

#[test]
fn test_quiet_conflicts_with_verbose() {
    let result = Args::try_parse_from([
        "declcheck", "--dts", "a.d.ts", "--js", "a.js", "--quiet", "--verbose",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_value_enums() {
    let args = Args::try_parse_from([
        "declcheck", "--dts", "a.d.ts", "--js", "a.js", "--mode", "non-npm", "--loader", "node", "-o", "json",
    ])
    .unwrap();
    assert!(args.mode.is_some());
    assert!(args.loader.is_some());
    assert!(args.output.is_some());

    assert!(Args::try_parse_from(["declcheck", "--dts", "a.d.ts", "--js", "a.js", "--mode", "pypi"]).is_err());
}

#[test]
fn test_clean_check_exits_zero() {
    let fixture = Fixture::new("export const bar: string;\n", "exports.bar = 'x';\n");
    let report = fixture.path("report.txt");

    let code = Command::from_args(fixture.args(&["--output-file", &display(&report)])).run();
    assert_eq!(code, EXIT_CLEAN);
    assert!(fs::read_to_string(&report)
        .unwrap()
        .contains("pkg: declaration matches the JavaScript module"));
}

#[test]
fn test_mismatch_exits_one_with_json_report() {
    let fixture = Fixture::new(
        "export const foo: number;\nexport const bar: string;\n",
        "exports.bar = 'x';\n",
    );
    let report = fixture.path("report.json");

    let code = Command::from_args(fixture.args(&["--output", "json", "--output-file", &display(&report)])).run();
    assert_eq!(code, EXIT_DIAGNOSTICS);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["module_name"], "pkg");
    let diagnostics = json["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["kind"], "DtsPropertyNotInJs");
}

#[test]
fn test_disable_flag_clears_findings() {
    let fixture = Fixture::new("export const foo: number;\n", "exports.other = 1;\n");
    let report = fixture.path("report.csv");

    let code = Command::from_args(fixture.args(&[
        "--disable",
        "DtsPropertyNotInJs",
        "--disable",
        "JsPropertyNotInDts",
        "--output",
        "csv",
        "--output-file",
        &display(&report),
    ]))
    .run();
    assert_eq!(code, EXIT_CLEAN);
}

#[test]
fn test_fatal_errors_exit_two() {
    let fixture = Fixture::new("export const foo: number;\n", "exports.foo = 1;\n");

    // Missing registry file
    let code = Command::from_args(fixture.args(&["--registry", &display(&fixture.path("nope.json"))])).run();
    assert_eq!(code, EXIT_FATAL);

    // Unknown diagnostic kind
    let code = Command::from_args(fixture.args(&["--disable", "NotAKind"])).run();
    assert_eq!(code, EXIT_FATAL);
}

#[test]
fn test_registry_file_applies_npm_rules() {
    let fixture = Fixture::new("export const foo: number;\n", "exports.foo = 1;\n");
    let registry = fixture.path("registry.json");
    fs::write(&registry, r#"{"exists": false}"#).unwrap();
    let report = fixture.path("report.json");

    let code = Command::from_args(fixture.args(&[
        "--registry",
        &display(&registry),
        "--output",
        "json",
        "--output-file",
        &display(&report),
    ]))
    .run();
    assert_eq!(code, EXIT_DIAGNOSTICS);
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["diagnostics"][0]["kind"], "NoMatchingNpmPackage");
}
