//! Loading JavaScript modules from disk

use declcheck::loader::{create_loader, snapshot, AutoLoader, ModuleLoader, NodeLoader, StaticLoader};
use declcheck::models::config::LoaderKind;
use declcheck::models::module::ValueKind;
use declcheck::utils::resolve_entry;
use declcheck::{CheckInput, Checker, ErrorKind, Settings};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_static_loader_end_to_end() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("index.js");
    fs::write(
        &entry,
        "function create() {}\ncreate.version = '2';\nmodule.exports = create;\n",
    )
    .unwrap();

    let module = StaticLoader.load(&entry).unwrap();
    assert_eq!(module.exports.kind, ValueKind::Function);

    let input = CheckInput::new("create", "export const version: string;\n", module);
    let kinds: Vec<ErrorKind> = Checker::default()
        .check(&input)
        .unwrap()
        .diagnostics
        .iter()
        .map(|d| d.kind)
        .collect();
    assert_eq!(kinds, vec![ErrorKind::JsCallable, ErrorKind::NeedsExportEquals]);
}

#[test]
fn test_package_directory_resolution() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("lib")).unwrap();
    fs::write(dir.path().join("package.json"), r#"{"name": "x", "main": "lib/main"}"#).unwrap();
    fs::write(dir.path().join("lib").join("main.js"), "exports.a = 1;\n").unwrap();

    let entry = resolve_entry(dir.path()).unwrap();
    assert_eq!(entry, dir.path().join("lib").join("main.js"));

    let module = StaticLoader.load(&entry).unwrap();
    assert_eq!(module.exports.enumerable_keys().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_auto_loader_falls_back_to_static() {
    let dir = tempdir().unwrap();
    let entry = dir.path().join("index.js");
    fs::write(&entry, "exports.run = function () {};\n").unwrap();

    let loader = AutoLoader::new(NodeLoader::new(dir.path().join("no-such-node")));
    let module = loader.load(&entry).unwrap();
    assert_eq!(module.exports.enumerable_keys().collect::<Vec<_>>(), vec!["run"]);
}

#[test]
fn test_create_loader_respects_settings() {
    let settings = Settings {
        loader: LoaderKind::Static,
        ..Settings::default()
    };
    assert_eq!(create_loader(&settings).name(), "static");
    assert_eq!(create_loader(&Settings::default()).name(), "auto");
}

#[test]
fn test_snapshot_drives_check() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("snapshot.json");
    fs::write(
        &path,
        r#"{"kind": "class", "constructible": true, "keys": [{"name": "create"}, {"name": "internal", "enumerable": false}]}"#,
    )
    .unwrap();

    let exports = snapshot::load_snapshot(&path).unwrap();
    let module = declcheck::LoadedModule::new(exports, declcheck::SourceText::Unavailable);
    let input = CheckInput::new(
        "client",
        "declare class Client {\n    static create: () => Client;\n}\nexport = Client;\n",
        module,
    );
    assert!(Checker::default().check(&input).unwrap().is_clean());
}
