//! Declared-shape extraction from `.d.ts` source text
//!
//! The declaration is parsed with OXC in TypeScript-definition mode and only
//! the module scope is inspected: top-level statements, or the body of a
//! `declare module "name" { ... }` wrapper when the file uses one. When the
//! parser gives up entirely, a textual scan recovers the export-style flags.

use crate::models::diagnostic::Position;
use crate::models::shape::Shape;
use crate::parsers::source_markers;
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use std::collections::HashSet;

/// Type aliases are followed at most this deep when classifying an `export =`
/// target
const MAX_TYPE_DEPTH: usize = 8;

/// Extracts the declared shape of a module from declaration text
pub struct DeclarationParser {
    ignored_properties: HashSet<String>,
}

impl DeclarationParser {
    pub fn new<I, S>(ignored_properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_properties: ignored_properties.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the declared shape of `module_name` from `source_text`
    pub fn extract(&self, module_name: &str, source_text: &str) -> Shape {
        let allocator = Allocator::default();
        let source_type = SourceType::from_path("index.d.ts").unwrap_or_default();
        let ret = Parser::new(&allocator, source_text, source_type).parse();

        if ret.panicked {
            tracing::warn!(
                module = module_name,
                errors = ret.errors.len(),
                "declaration could not be parsed, falling back to text scan"
            );
            return self.extract_from_text(module_name, source_text);
        }
        if !ret.errors.is_empty() {
            tracing::warn!(
                module = module_name,
                errors = ret.errors.len(),
                "declaration has syntax errors, using recovered program"
            );
        }

        let mut shape = Shape::new(module_name);
        let body = &ret.program.body[..];

        // Any wrapper in the file takes the default-export check out of play,
        // whether or not it ends up as the module scope
        let ambient = body.iter().any(|stmt| ambient_wrapper_body(stmt).is_some());

        match find_ambient_wrapper(body, module_name) {
            Some((statements, named)) if named || !has_export_statement(body) => {
                tracing::debug!(module = module_name, named, "using ambient module wrapper as module scope");
                let collector = ScopeCollector {
                    parser: self,
                    statements,
                    implicit_export: !has_export_statement(statements),
                    ambient,
                };
                collector.collect(&mut shape);
            }
            wrapper => {
                if wrapper.is_some() {
                    tracing::debug!(module = module_name, "treating ambient module block as an augmentation");
                }
                let collector = ScopeCollector {
                    parser: self,
                    statements: body,
                    implicit_export: false,
                    ambient,
                };
                collector.collect(&mut shape);
            }
        }

        tracing::debug!(
            module = module_name,
            properties = shape.properties().len(),
            callable = shape.is_callable,
            constructible = shape.is_constructible,
            export_equals = shape.uses_export_equals,
            default_marker = shape.has_default_export_marker,
            "extracted declared shape"
        );
        shape
    }

    /// Degraded extraction used when the parser could not produce a program:
    /// only the export-style flags are recovered
    fn extract_from_text(&self, module_name: &str, source_text: &str) -> Shape {
        let mut shape = Shape::new(module_name);
        let scan = source_markers::scan_declaration_text(source_text);
        shape.uses_export_equals = scan.export_equals.is_some();
        if !scan.has_ambient_wrapper {
            if let Some(position) = scan.export_default {
                shape.has_default_export_marker = true;
                shape.default_export_position = Some(position);
            }
        }
        shape
    }

    fn add_property(&self, shape: &mut Shape, name: &str, position: Position) {
        if self.ignored_properties.contains(name) {
            return;
        }
        shape.add_property(name, Some(position));
    }
}

/// Name and body of a `declare module "name" { ... }` statement
fn ambient_wrapper_body<'s, 'a>(stmt: &'s Statement<'a>) -> Option<(&'s str, &'s [Statement<'a>])> {
    let Statement::TSModuleDeclaration(decl) = stmt else {
        return None;
    };
    let TSModuleDeclarationName::StringLiteral(lit) = &decl.id else {
        return None;
    };
    let Some(TSModuleDeclarationBody::TSModuleBlock(block)) = &decl.body else {
        return None;
    };
    Some((lit.value.as_str(), &block.body[..]))
}

/// Statements of the `declare module "..."` wrapper, preferring the one named
/// after the module. The flag tells whether the name matched.
fn find_ambient_wrapper<'s, 'a>(
    statements: &'s [Statement<'a>],
    module_name: &str,
) -> Option<(&'s [Statement<'a>], bool)> {
    let mut first = None;
    for (name, body) in statements.iter().filter_map(ambient_wrapper_body) {
        if name == module_name {
            return Some((body, true));
        }
        if first.is_none() {
            first = Some((body, false));
        }
    }
    first
}

fn has_export_statement(statements: &[Statement<'_>]) -> bool {
    statements.iter().any(|stmt| {
        matches!(
            stmt,
            Statement::ExportNamedDeclaration(_)
                | Statement::ExportDefaultDeclaration(_)
                | Statement::ExportAllDeclaration(_)
                | Statement::TSExportAssignment(_)
        )
    })
}

/// Whether a declaration introduces a runtime value (as opposed to a type)
fn declaration_is_value(decl: &Declaration<'_>) -> bool {
    match decl {
        Declaration::VariableDeclaration(_)
        | Declaration::FunctionDeclaration(_)
        | Declaration::ClassDeclaration(_) => true,
        Declaration::TSEnumDeclaration(e) => !e.r#const,
        Declaration::TSModuleDeclaration(m) => module_is_instantiated(m),
        _ => false,
    }
}

/// A namespace exists at runtime only when it contains values
fn module_is_instantiated(decl: &TSModuleDeclaration<'_>) -> bool {
    match &decl.body {
        Some(TSModuleDeclarationBody::TSModuleBlock(block)) => block.body.iter().any(|stmt| match stmt {
            Statement::ExportNamedDeclaration(export) => export
                .declaration
                .as_ref()
                .is_some_and(declaration_is_value),
            Statement::ExportDefaultDeclaration(_) | Statement::TSExportAssignment(_) => true,
            other => other.as_declaration().is_some_and(declaration_is_value),
        }),
        Some(TSModuleDeclarationBody::TSModuleDeclaration(inner)) => module_is_instantiated(inner),
        None => false,
    }
}

/// Name bound by a declaration, if it binds exactly one
fn declaration_name<'d>(decl: &'d Declaration<'_>) -> Option<&'d str> {
    match decl {
        Declaration::FunctionDeclaration(f) => f.id.as_ref().map(|id| id.name.as_str()),
        Declaration::ClassDeclaration(c) => c.id.as_ref().map(|id| id.name.as_str()),
        Declaration::TSEnumDeclaration(e) => Some(e.id.name.as_str()),
        Declaration::TSInterfaceDeclaration(i) => Some(i.id.name.as_str()),
        Declaration::TSTypeAliasDeclaration(t) => Some(t.id.name.as_str()),
        Declaration::TSModuleDeclaration(m) => match &m.id {
            TSModuleDeclarationName::Identifier(id) => Some(id.name.as_str()),
            TSModuleDeclarationName::StringLiteral(_) => None,
        },
        _ => None,
    }
}

/// Declarations of a scope paired with the span of the statement that holds
/// them (an `export` statement or the bare declaration)
fn scope_declarations<'s, 'a>(
    statements: &'s [Statement<'a>],
) -> impl Iterator<Item = (&'s Declaration<'a>, Position)> + 's {
    statements.iter().filter_map(|stmt| {
        let decl = match stmt {
            Statement::ExportNamedDeclaration(export) => export.declaration.as_ref()?,
            other => other.as_declaration()?,
        };
        Some((decl, Position::from_span(stmt.span())))
    })
}

/// Walks one module scope and records what it exports
struct ScopeCollector<'p, 's, 'a> {
    parser: &'p DeclarationParser,
    statements: &'s [Statement<'a>],
    /// Every value declaration counts as exported (ambient bodies without
    /// explicit exports)
    implicit_export: bool,
    /// The file holds an ambient module wrapper; default exports are not
    /// checked
    ambient: bool,
}

impl<'p, 's, 'a> ScopeCollector<'p, 's, 'a> {
    fn collect(&self, shape: &mut Shape) {
        self.collect_export_style(shape);

        if let Some(target) = self.export_equals_target() {
            shape.uses_export_equals = true;
            match target {
                Some(name) => self.resolve_export_equals(name, shape),
                None => tracing::debug!("export = target is not an identifier, leaving it unresolved"),
            }
            return;
        }

        self.collect_named_exports(shape);
    }

    /// `Some(Some(name))` for `export = name`, `Some(None)` for an `export =`
    /// whose target is not a plain identifier
    fn export_equals_target(&self) -> Option<Option<&'s str>> {
        self.statements.iter().find_map(|stmt| match stmt {
            Statement::TSExportAssignment(assign) => Some(match &assign.expression {
                Expression::Identifier(ident) => Some(ident.name.as_str()),
                _ => None,
            }),
            _ => None,
        })
    }

    fn collect_export_style(&self, shape: &mut Shape) {
        if self.ambient {
            // Defaults in a file with an ambient wrapper resolve differently
            // and are not checked
            return;
        }
        for stmt in self.statements {
            let is_default = match stmt {
                Statement::ExportDefaultDeclaration(_) => true,
                Statement::ExportNamedDeclaration(export) => export
                    .specifiers
                    .iter()
                    .any(|spec| spec.exported.name().as_str() == "default"),
                _ => false,
            };
            if is_default && !shape.has_default_export_marker {
                shape.has_default_export_marker = true;
                shape.default_export_position = Some(Position::from_span(stmt.span()));
            }
        }
    }

    fn collect_named_exports(&self, shape: &mut Shape) {
        for stmt in self.statements {
            let position = Position::from_span(stmt.span());
            match stmt {
                Statement::ExportNamedDeclaration(export) => {
                    if export.export_kind.is_type() {
                        continue;
                    }
                    if let Some(decl) = &export.declaration {
                        self.collect_declaration(decl, position, shape);
                    }
                    for spec in &export.specifiers {
                        if spec.export_kind.is_type() {
                            continue;
                        }
                        let exported = spec.exported.name();
                        let local = spec.local.name();
                        // Re-exports from another module cannot be checked for
                        // value-ness; local names can
                        if export.source.is_none() && !self.names_value(local.as_str()) {
                            continue;
                        }
                        self.parser.add_property(shape, exported.as_str(), position);
                    }
                }
                Statement::ExportAllDeclaration(export) => match &export.exported {
                    Some(name) if !export.export_kind.is_type() => {
                        self.parser.add_property(shape, name.name().as_str(), position);
                    }
                    Some(_) => {}
                    None => tracing::debug!(
                        source = export.source.value.as_str(),
                        "skipping unresolvable `export *`"
                    ),
                },
                other if self.implicit_export => {
                    if let Some(decl) = other.as_declaration() {
                        self.collect_declaration(decl, position, shape);
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_declaration(&self, decl: &Declaration<'a>, position: Position, shape: &mut Shape) {
        if !declaration_is_value(decl) {
            return;
        }
        match decl {
            Declaration::VariableDeclaration(var_decl) => {
                for declarator in &var_decl.declarations {
                    if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                        self.parser.add_property(shape, id.name.as_str(), position);
                    }
                }
            }
            other => {
                if let Some(name) = declaration_name(other) {
                    self.parser.add_property(shape, name, position);
                }
            }
        }
    }

    /// Whether `name` refers to a value in this scope. Names with no local
    /// declaration (imports, globals) are assumed to be values.
    fn names_value(&self, name: &str) -> bool {
        let mut found = false;
        for (decl, _) in scope_declarations(self.statements) {
            let matches = match decl {
                Declaration::VariableDeclaration(var_decl) => var_decl.declarations.iter().any(|d| {
                    matches!(&d.id.kind, BindingPatternKind::BindingIdentifier(id) if id.name.as_str() == name)
                }),
                other => declaration_name(other) == Some(name),
            };
            if matches {
                if declaration_is_value(decl) {
                    return true;
                }
                found = true;
            }
        }
        !found
    }

    /// Apply every declaration merged under the `export =` target's name
    fn resolve_export_equals(&self, name: &str, shape: &mut Shape) {
        let mut resolved = false;
        for (decl, position) in scope_declarations(self.statements) {
            match decl {
                Declaration::FunctionDeclaration(f) if f.id.as_ref().is_some_and(|id| id.name.as_str() == name) => {
                    shape.is_callable = true;
                    resolved = true;
                }
                Declaration::ClassDeclaration(c) if c.id.as_ref().is_some_and(|id| id.name.as_str() == name) => {
                    shape.is_constructible = true;
                    self.collect_static_fields(c, shape);
                    resolved = true;
                }
                Declaration::VariableDeclaration(var_decl) => {
                    for declarator in &var_decl.declarations {
                        let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind else {
                            continue;
                        };
                        if id.name.as_str() != name {
                            continue;
                        }
                        resolved = true;
                        if let Some(annotation) = &declarator.id.type_annotation {
                            self.classify_type(&annotation.type_annotation, position, shape, 0);
                        }
                    }
                }
                Declaration::TSModuleDeclaration(m) if declaration_name(decl) == Some(name) => {
                    resolved = true;
                    self.collect_namespace_members(m, shape);
                }
                Declaration::TSEnumDeclaration(e) if e.id.name.as_str() == name => {
                    resolved = true;
                }
                _ => {}
            }
        }
        if !resolved {
            tracing::debug!(target_name = name, "export = target has no local value declaration");
        }
    }

    fn collect_static_fields(&self, class: &Class<'a>, shape: &mut Shape) {
        for element in &class.body.body {
            // Static methods are non-enumerable at runtime; only fields count
            if let ClassElement::PropertyDefinition(prop) = element {
                if !prop.r#static {
                    continue;
                }
                if let Some(key) = prop.key.static_name() {
                    self.parser
                        .add_property(shape, &key, Position::from_span(prop.span));
                }
            }
        }
    }

    fn collect_namespace_members(&self, decl: &TSModuleDeclaration<'a>, shape: &mut Shape) {
        match &decl.body {
            Some(TSModuleDeclarationBody::TSModuleBlock(block)) => {
                let nested = ScopeCollector {
                    parser: self.parser,
                    statements: &block.body[..],
                    implicit_export: !has_export_statement(&block.body),
                    ambient: true,
                };
                nested.collect_named_exports(shape);
            }
            Some(TSModuleDeclarationBody::TSModuleDeclaration(inner)) => {
                // `namespace A.B {}` exposes `B` on `A`
                if let TSModuleDeclarationName::Identifier(id) = &inner.id {
                    self.parser
                        .add_property(shape, id.name.as_str(), Position::from_span(inner.span));
                }
            }
            None => {}
        }
    }

    fn classify_type(&self, ty: &TSType<'a>, position: Position, shape: &mut Shape, depth: usize) {
        if depth > MAX_TYPE_DEPTH {
            return;
        }
        match ty {
            TSType::TSFunctionType(_) => shape.is_callable = true,
            TSType::TSConstructorType(_) => shape.is_constructible = true,
            TSType::TSTypeLiteral(literal) => self.apply_signatures(&literal.members, shape),
            TSType::TSIntersectionType(intersection) => {
                for member in &intersection.types {
                    self.classify_type(member, position, shape, depth + 1);
                }
            }
            TSType::TSParenthesizedType(inner) => {
                self.classify_type(&inner.type_annotation, position, shape, depth + 1)
            }
            TSType::TSTypeReference(reference) => {
                if let TSTypeName::IdentifierReference(id) = &reference.type_name {
                    self.classify_named_type(id.name.as_str(), position, shape, depth + 1);
                }
            }
            _ => {}
        }
    }

    /// Follow a local interface or type alias
    fn classify_named_type(&self, name: &str, position: Position, shape: &mut Shape, depth: usize) {
        for (decl, _) in scope_declarations(self.statements) {
            match decl {
                Declaration::TSInterfaceDeclaration(iface) if iface.id.name.as_str() == name => {
                    self.apply_signatures(&iface.body.body, shape);
                }
                Declaration::TSTypeAliasDeclaration(alias) if alias.id.name.as_str() == name => {
                    self.classify_type(&alias.type_annotation, position, shape, depth);
                }
                _ => {}
            }
        }
    }

    fn apply_signatures(&self, members: &[TSSignature<'a>], shape: &mut Shape) {
        for member in members {
            match member {
                TSSignature::TSCallSignatureDeclaration(_) => shape.is_callable = true,
                TSSignature::TSConstructSignatureDeclaration(_) => shape.is_constructible = true,
                TSSignature::TSPropertySignature(prop) => {
                    if let Some(key) = prop.key.static_name() {
                        self.parser
                            .add_property(shape, &key, Position::from_span(prop.span));
                    }
                }
                TSSignature::TSMethodSignature(method) => {
                    if let Some(key) = method.key.static_name() {
                        self.parser
                            .add_property(shape, &key, Position::from_span(method.span));
                    }
                }
                _ => {}
            }
        }
    }
}
