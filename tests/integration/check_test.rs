//! End-to-end checks through the library API

use declcheck::{
    compare, CheckInput, CheckMode, Checker, DeclCheckError, DeclaredShapeExtractor, ErrorKind,
    LoadedModule, RegistryInfo, RuntimeValue, Settings, SourceText,
};
use declcheck::models::module::OwnKey;
use declcheck::parsers::DefaultExportEvidence;

fn module(value: RuntimeValue, source: &str) -> LoadedModule {
    LoadedModule::new(value, SourceText::Available(source.to_string()))
}

fn kinds(input: &CheckInput) -> Vec<ErrorKind> {
    Checker::default()
        .check(input)
        .unwrap()
        .diagnostics
        .into_iter()
        .map(|d| d.kind)
        .collect()
}

#[test]
fn test_missing_declared_property() {
    let declaration = "export const foo: number;\nexport const bar: string;\n";
    let input = CheckInput::new(
        "pkg",
        declaration,
        module(RuntimeValue::object([OwnKey::enumerable("bar")]), "exports.bar = 'x';"),
    );

    let report = Checker::default().check(&input).unwrap();
    assert_eq!(report.diagnostics.len(), 1);

    let diagnostic = &report.diagnostics[0];
    assert_eq!(diagnostic.kind, ErrorKind::DtsPropertyNotInJs);
    assert!(diagnostic
        .message
        .starts_with("The declaration doesn't match the JavaScript module 'pkg'. Reason:\n"));
    assert!(diagnostic.message.contains("'foo'"));

    let position = diagnostic.position.unwrap();
    assert_eq!(position.start, 0);
    assert_eq!(position.line_col(declaration), (1, 1));
}

#[test]
fn test_property_findings_in_both_directions() {
    let input = CheckInput::new(
        "pkg",
        "export function a(): void;\n",
        module(RuntimeValue::object([OwnKey::enumerable("b")]), "exports.b = 1;"),
    );
    assert_eq!(
        kinds(&input),
        vec![ErrorKind::DtsPropertyNotInJs, ErrorKind::JsPropertyNotInDts]
    );
}

#[test]
fn test_matching_shapes_produce_nothing() {
    let input = CheckInput::new(
        "pkg",
        "export function parse(text: string): unknown;\nexport const version: string;\nexport interface Options {}\n",
        module(
            RuntimeValue::object([OwnKey::enumerable("parse"), OwnKey::enumerable("version")]),
            "exports.parse = p; exports.version = '1';",
        ),
    );
    let report = Checker::default().check(&input).unwrap();
    assert!(report.is_clean());
}

#[test]
fn test_callable_replaced_export_needs_export_equals() {
    let input = CheckInput::new(
        "pkg",
        "export const version: string;\n",
        module(
            RuntimeValue::function([OwnKey::enumerable("version")]),
            "function main() {}\nmain.version = '1';\nmodule.exports = main;\n",
        ),
    );
    assert_eq!(
        kinds(&input),
        vec![ErrorKind::JsCallable, ErrorKind::NeedsExportEquals]
    );
}

#[test]
fn test_export_equals_declaration_matches_callable_module() {
    let input = CheckInput::new(
        "pkg",
        "declare function main(): void;\ndeclare namespace main {\n    const version: string;\n}\nexport = main;\n",
        module(
            RuntimeValue::function([OwnKey::enumerable("version")]),
            "module.exports = main;",
        ),
    );
    assert!(kinds(&input).is_empty());
}

#[test]
fn test_callable_declaration_against_plain_object() {
    let input = CheckInput::new(
        "pkg",
        "declare function main(): void;\nexport = main;\n",
        module(RuntimeValue::object([]), "module.exports = {};"),
    );
    assert_eq!(kinds(&input), vec![ErrorKind::DtsCallable]);
}

#[test]
fn test_default_export_without_evidence() {
    let declaration = "export const a: number;\nexport default function main(): void;\n";
    let input = CheckInput::new(
        "pkg",
        declaration,
        module(RuntimeValue::object([OwnKey::enumerable("a")]), "exports.a = 1;"),
    );

    let report = Checker::default().check(&input).unwrap();
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, ErrorKind::NoDefaultExport);
    let position = report.diagnostics[0].position.unwrap();
    assert_eq!(position.line_col(declaration), (2, 1));
}

#[test]
fn test_default_export_suppressed_by_source_markers() {
    let declaration = "export default function main(): void;\n";
    for source in [
        "exports.default = main;",
        "Object.defineProperty(exports, '__esModule', { value: true });",
        "// uses babel-plugin-add-module-exports\nmodule.exports = main;",
        "module.exports = require('./lib');",
    ] {
        let input = CheckInput::new("pkg", declaration, module(RuntimeValue::object([]), source));
        assert!(kinds(&input).is_empty(), "not suppressed by {:?}", source);
    }
}

#[test]
fn test_default_export_unavailable_source_is_not_flagged() {
    let input = CheckInput::new(
        "pkg",
        "export default function main(): void;\n",
        LoadedModule::new(RuntimeValue::object([]), SourceText::Unavailable),
    );
    assert!(kinds(&input).is_empty());

    let input = CheckInput::new(
        "pkg",
        "export default function main(): void;\n",
        module(RuntimeValue::object([]), "Too Many Requests"),
    );
    assert!(kinds(&input).is_empty());
}

#[test]
fn test_default_export_inside_ambient_wrapper() {
    let input = CheckInput::new(
        "pkg",
        "declare module \"pkg\" {\n    export default function main(): void;\n}\n",
        module(RuntimeValue::object([]), "exports.x = 1;"),
    );
    let found = kinds(&input);
    assert!(!found.contains(&ErrorKind::NoDefaultExport));
}

#[test]
fn test_no_default_export_allow_list() {
    let mut settings = Settings::default();
    settings
        .no_default_export_exemptions
        .insert("legacy".to_string(), true);
    let checker = Checker::new(&settings).unwrap();

    let input = CheckInput::new(
        "legacy",
        "export default function main(): void;\n",
        module(RuntimeValue::object([]), "exports.x = 1;"),
    );
    let report = checker.check(&input).unwrap();
    assert!(!report
        .diagnostics
        .iter()
        .any(|d| d.kind == ErrorKind::NoDefaultExport));
}

#[test]
fn test_check_is_idempotent() {
    let input = CheckInput::new(
        "pkg",
        "export const a: number;\nexport default function f(): void;\n",
        module(
            RuntimeValue::function([OwnKey::enumerable("b")]),
            "module.exports = function () {};",
        ),
    );
    let checker = Checker::default();
    let first = checker.check(&input).unwrap();
    let second = checker.check(&input).unwrap();
    assert_eq!(first, second);
    assert!(first.diagnostics.len() >= 4);
}

#[test]
fn test_disabled_kinds_are_filtered() {
    let settings = Settings {
        disabled_kinds: vec!["jspropertynotindts".to_string()],
        ..Settings::default()
    };
    let input = CheckInput::new(
        "pkg",
        "export const a: number;\n",
        module(
            RuntimeValue::object([OwnKey::enumerable("a"), OwnKey::enumerable("extra")]),
            "exports.a = 1; exports.extra = 2;",
        ),
    );
    let report = Checker::new(&settings).unwrap().check(&input).unwrap();
    assert!(report.is_clean());
}

#[test]
fn test_unknown_disabled_kind_is_rejected() {
    let settings = Settings {
        disabled_kinds: vec!["NotAKind".to_string()],
        ..Settings::default()
    };
    assert!(matches!(
        Checker::new(&settings),
        Err(DeclCheckError::UnknownErrorKind { .. })
    ));
}

#[test]
fn test_missing_inputs_are_fatal() {
    let no_module = CheckInput {
        module_name: "pkg".to_string(),
        declaration: Some("export const a: number;".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        Checker::default().check(&no_module),
        Err(DeclCheckError::MissingInput { .. })
    ));

    let no_declaration = CheckInput {
        module_name: "pkg".to_string(),
        module: Some(module(RuntimeValue::object([]), "")),
        ..Default::default()
    };
    assert!(Checker::default().check(&no_declaration).is_err());
}

#[test]
fn test_registry_findings_come_first() {
    let input = CheckInput::new(
        "pkg",
        "// Type definitions for pkg 2.0\nexport const a: number;\n",
        module(RuntimeValue::object([]), "module.exports = {};"),
    )
    .with_registry(RegistryInfo::published(["1.0.0", "1.1.0"]), false);

    let report = Checker::default().check(&input).unwrap();
    assert_eq!(report.mode, CheckMode::Npm);
    assert_eq!(
        report.diagnostics.iter().map(|d| d.kind).collect::<Vec<_>>(),
        vec![ErrorKind::NoMatchingNpmVersion, ErrorKind::DtsPropertyNotInJs]
    );
    assert!(report.diagnostics[0].message.contains("1.0.0, 1.1.0"));
}

#[test]
fn test_non_npm_header_selects_mode() {
    let declaration = "// Type definitions for non-npm package pkg 1.0\nexport const a: number;\n";
    let make = |exempt| {
        CheckInput::new(
            "pkg",
            declaration,
            module(RuntimeValue::object([OwnKey::enumerable("a")]), "exports.a = 1;"),
        )
        .with_registry(RegistryInfo::published(["1.0.0"]), exempt)
    };

    let report = Checker::default().check(&make(false)).unwrap();
    assert_eq!(report.mode, CheckMode::NonNpm);
    assert_eq!(report.diagnostics[0].kind, ErrorKind::NonNpmHasMatchingPackage);

    assert!(Checker::default().check(&make(true)).unwrap().is_clean());
}

#[test]
fn test_explicit_mode_overrides_header() {
    let input = CheckInput::new(
        "pkg",
        "// Type definitions for non-npm package pkg\nexport {};\n",
        module(RuntimeValue::object([]), "module.exports = {};"),
    )
    .with_mode(CheckMode::Npm)
    .with_registry(RegistryInfo::missing(), false);

    let report = Checker::default().check(&input).unwrap();
    assert_eq!(report.diagnostics[0].kind, ErrorKind::NoMatchingNpmPackage);
}

#[test]
fn test_compare_free_function() {
    let extractor = DeclaredShapeExtractor::new(["default", "__esModule", "prototype"]);
    let declared = extractor.extract("pkg", "export const a: number;\n");
    let actual = declcheck::ActualShapeExtractor::new(["default", "__esModule", "prototype"])
        .extract_value("pkg", &RuntimeValue::object([OwnKey::enumerable("a")]));

    let diagnostics = compare(
        "pkg",
        &declared,
        &actual,
        &DefaultExportEvidence::NoMarker,
        CheckMode::Npm,
    );
    assert!(diagnostics.is_empty());
}
