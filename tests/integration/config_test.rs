//! Configuration layering as seen by library callers

use declcheck::config::{load_config_with_env_prefix, CliArgs, FileConfig};
use declcheck::models::config::{LoaderKind, OutputFormat};
use declcheck::models::registry::CheckMode;
use declcheck::Checker;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_file_then_env_then_cli() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("declcheck.toml");
    fs::write(
        &config_path,
        r#"
            output_format = "csv"
            loader = "node"
            mode = "non-npm"
            disabled_kinds = ["NoDefaultExport"]

            [squat_exemptions]
            "maps" = true
        "#,
    )
    .unwrap();

    std::env::set_var("DCINTEG_LOADER", "static");
    std::env::set_var("DCINTEG_SQUAT_EXEMPT", "charts");

    let settings = load_config_with_env_prefix(
        CliArgs {
            output_format: Some(OutputFormat::Json),
            config: Some(config_path),
            ..Default::default()
        },
        "DCINTEG",
    )
    .unwrap();

    std::env::remove_var("DCINTEG_LOADER");
    std::env::remove_var("DCINTEG_SQUAT_EXEMPT");

    assert_eq!(settings.output_format, OutputFormat::Json);
    assert_eq!(settings.loader, LoaderKind::Static);
    assert_eq!(settings.mode, Some(CheckMode::NonNpm));
    assert_eq!(settings.squat_exemptions.get("maps"), Some(&true));
    assert_eq!(settings.squat_exemptions.get("charts"), Some(&true));

    assert!(Checker::new(&settings).is_ok());
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempdir().unwrap();
    let result = load_config_with_env_prefix(
        CliArgs {
            config: Some(dir.path().join("missing.toml")),
            ..Default::default()
        },
        "DCMISSING",
    );
    assert!(result.is_err());
}

#[test]
fn test_generated_default_config_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(".declcheck.toml");
    FileConfig::with_path(&path).create_default().unwrap();

    let settings = load_config_with_env_prefix(
        CliArgs {
            config: Some(path),
            ..Default::default()
        },
        "DCDEFAULT",
    )
    .unwrap();
    assert_eq!(settings.loader, LoaderKind::Auto);
    assert_eq!(settings.output_format, OutputFormat::Text);
    assert!(settings.disabled_kinds.is_empty());
}
