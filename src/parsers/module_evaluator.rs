//! Static evaluation of a JavaScript module's exported value
//!
//! Walks the top level of a CommonJS or ES module and tracks what ends up in
//! `module.exports` without running any code. Only direct, top-level
//! assignments are followed; anything computed at runtime degrades to an
//! object with no known keys.

use crate::models::module::{OwnKey, RuntimeValue, ValueKind};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::collections::HashMap;

/// Index into the evaluator's value arena
type ValueId = usize;

/// Visitor that tracks `module.exports` across a program's top level
pub struct ModuleEvaluator {
    values: Vec<RuntimeValue>,
    bindings: HashMap<String, ValueId>,
    module_exports: ValueId,
    /// What the free `exports` identifier currently points at
    exports_alias: ValueId,
    has_esm_syntax: bool,
    esm_keys: Vec<OwnKey>,
}

impl ModuleEvaluator {
    /// Parse `source_text` and evaluate its exported value. Returns the parse
    /// error messages when the source does not parse.
    pub fn evaluate(source_text: &str) -> std::result::Result<RuntimeValue, Vec<String>> {
        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source_text, SourceType::mjs()).parse();

        // Scripts that are not valid module code (sloppy mode, top-level return)
        let ret = if ret.panicked || !ret.errors.is_empty() {
            let script_type = SourceType::from_path("index.cjs").unwrap_or_default();
            let retry = Parser::new(&allocator, source_text, script_type).parse();
            if retry.panicked {
                return Err(retry.errors.iter().map(|e| e.to_string()).collect());
            }
            retry
        } else {
            ret
        };

        Ok(Self::evaluate_program(&ret.program))
    }

    pub fn evaluate_program(program: &Program<'_>) -> RuntimeValue {
        let mut evaluator = Self {
            values: vec![RuntimeValue::object([])],
            bindings: HashMap::new(),
            module_exports: 0,
            exports_alias: 0,
            has_esm_syntax: false,
            esm_keys: Vec::new(),
        };

        // Hoist function declarations before walking statements
        for stmt in &program.body {
            if let Statement::FunctionDeclaration(func) = stmt {
                evaluator.bind_function(func);
            }
        }
        for stmt in &program.body {
            evaluator.visit_statement(stmt);
        }

        evaluator.finish()
    }

    fn finish(mut self) -> RuntimeValue {
        if self.has_esm_syntax {
            tracing::debug!(keys = self.esm_keys.len(), "evaluated ES module namespace");
            return RuntimeValue::object(self.esm_keys).with_es_module(true);
        }
        let value = self.values.swap_remove(self.module_exports);
        tracing::debug!(kind = ?value.kind, keys = value.keys.len(), "evaluated CommonJS exports");
        value
    }

    fn alloc(&mut self, value: RuntimeValue) -> ValueId {
        self.values.push(value);
        self.values.len() - 1
    }

    fn alloc_kind(&mut self, kind: ValueKind) -> ValueId {
        self.alloc(RuntimeValue {
            kind,
            constructible: false,
            keys: Vec::new(),
            es_module: false,
        })
    }

    fn add_key(&mut self, target: ValueId, key: OwnKey) {
        if key.name == "__esModule" {
            self.values[target].es_module = true;
        }
        let keys = &mut self.values[target].keys;
        if !keys.iter().any(|existing| existing.name == key.name) {
            keys.push(key);
        }
    }

    fn add_esm_key(&mut self, name: &str) {
        self.has_esm_syntax = true;
        if !self.esm_keys.iter().any(|key| key.name == name) {
            self.esm_keys.push(OwnKey::enumerable(name));
        }
    }

    fn bind_function(&mut self, func: &Function<'_>) -> ValueId {
        let id = self.alloc(function_value(func));
        if let Some(ident) = &func.id {
            self.bindings.insert(ident.name.to_string(), id);
        }
        id
    }

    fn bind_class(&mut self, class: &Class<'_>) -> ValueId {
        let id = self.alloc(class_value(class));
        if let Some(ident) = &class.id {
            self.bindings.insert(ident.name.to_string(), id);
        }
        id
    }

    fn visit_statement(&mut self, stmt: &Statement<'_>) {
        match stmt {
            Statement::ExpressionStatement(expr_stmt) => {
                self.eval_expression(&expr_stmt.expression);
            }
            Statement::VariableDeclaration(var_decl) => self.visit_variable_declaration(var_decl),
            Statement::ClassDeclaration(class) => {
                self.bind_class(class);
            }
            Statement::ExportNamedDeclaration(decl) => self.visit_export_named_declaration(decl),
            Statement::ExportDefaultDeclaration(_) => self.add_esm_key("default"),
            Statement::ExportAllDeclaration(decl) => {
                if let Some(exported) = &decl.exported {
                    self.add_esm_key(&exported.name());
                } else {
                    // Re-exported names live in another file
                    self.has_esm_syntax = true;
                }
            }
            _ => {}
        }
    }

    fn visit_variable_declaration(&mut self, var_decl: &VariableDeclaration<'_>) {
        for declarator in &var_decl.declarations {
            let BindingPatternKind::BindingIdentifier(ident) = &declarator.id.kind else {
                continue;
            };
            if let Some(init) = &declarator.init {
                if let Some(id) = self.eval_expression(init) {
                    self.bindings.insert(ident.name.to_string(), id);
                }
            }
        }
    }

    fn visit_export_named_declaration(&mut self, decl: &ExportNamedDeclaration<'_>) {
        for specifier in &decl.specifiers {
            self.add_esm_key(&specifier.exported.name());
        }

        match &decl.declaration {
            Some(Declaration::VariableDeclaration(var_decl)) => {
                self.visit_variable_declaration(var_decl);
                for declarator in &var_decl.declarations {
                    if let BindingPatternKind::BindingIdentifier(ident) = &declarator.id.kind {
                        self.add_esm_key(&ident.name);
                    }
                }
            }
            Some(Declaration::FunctionDeclaration(func)) => {
                self.bind_function(func);
                if let Some(ident) = &func.id {
                    self.add_esm_key(&ident.name);
                }
            }
            Some(Declaration::ClassDeclaration(class)) => {
                self.bind_class(class);
                if let Some(ident) = &class.id {
                    self.add_esm_key(&ident.name);
                }
            }
            _ => self.has_esm_syntax = true,
        }
    }

    /// Evaluate an expression to a value in the arena, tracking export
    /// mutations along the way
    fn eval_expression(&mut self, expr: &Expression<'_>) -> Option<ValueId> {
        match expr {
            Expression::AssignmentExpression(assign) => self.visit_assignment_expression(assign),
            Expression::CallExpression(call) => self.visit_call_expression(call),
            Expression::SequenceExpression(seq) => {
                let mut last = None;
                for expr in &seq.expressions {
                    last = self.eval_expression(expr);
                }
                last
            }
            Expression::ParenthesizedExpression(paren) => self.eval_expression(&paren.expression),
            Expression::Identifier(ident) => self.resolve_identifier(&ident.name),
            Expression::FunctionExpression(func) => Some(self.alloc(function_value(func))),
            Expression::ArrowFunctionExpression(_) => {
                let mut value = RuntimeValue::function([]);
                value.constructible = false;
                Some(self.alloc(value))
            }
            Expression::ClassExpression(class) => Some(self.alloc(class_value(class))),
            Expression::ObjectExpression(object) => Some(self.eval_object(object)),
            Expression::ArrayExpression(_) => Some(self.alloc_kind(ValueKind::Array)),
            Expression::NullLiteral(_) => Some(self.alloc_kind(ValueKind::Null)),
            Expression::StringLiteral(_)
            | Expression::NumericLiteral(_)
            | Expression::BooleanLiteral(_)
            | Expression::BigIntLiteral(_)
            | Expression::TemplateLiteral(_) => Some(self.alloc_kind(ValueKind::Primitive)),
            _ => {
                if self.is_module_exports(expr) {
                    return Some(self.module_exports);
                }
                None
            }
        }
    }

    fn resolve_identifier(&mut self, name: &str) -> Option<ValueId> {
        match name {
            "exports" => Some(self.exports_alias),
            "undefined" => Some(self.alloc_kind(ValueKind::Undefined)),
            _ => self.bindings.get(name).copied(),
        }
    }

    fn eval_object(&mut self, object: &ObjectExpression<'_>) -> ValueId {
        let id = self.alloc(RuntimeValue::object([]));
        for property in &object.properties {
            match property {
                ObjectPropertyKind::ObjectProperty(prop) => {
                    if let Some(name) = prop.key.static_name() {
                        self.add_key(id, OwnKey::enumerable(name));
                    }
                }
                ObjectPropertyKind::SpreadProperty(spread) => {
                    if let Some(source) = self.eval_expression(&spread.argument) {
                        let keys: Vec<OwnKey> = self.values[source]
                            .keys
                            .iter()
                            .filter(|key| key.enumerable)
                            .cloned()
                            .collect();
                        for key in keys {
                            self.add_key(id, key);
                        }
                    }
                }
            }
        }
        id
    }

    /// `module.exports`
    fn is_module_exports(&self, expr: &Expression<'_>) -> bool {
        match expr {
            Expression::StaticMemberExpression(member) => {
                member.property.name == "exports"
                    && matches!(&member.object, Expression::Identifier(ident) if ident.name == "module")
            }
            Expression::ParenthesizedExpression(paren) => self.is_module_exports(&paren.expression),
            _ => false,
        }
    }

    /// Value an object expression refers to, without allocating
    fn target_of(&self, expr: &Expression<'_>) -> Option<ValueId> {
        if self.is_module_exports(expr) {
            return Some(self.module_exports);
        }
        match expr {
            Expression::Identifier(ident) if ident.name == "exports" => Some(self.exports_alias),
            Expression::Identifier(ident) => self.bindings.get(ident.name.as_str()).copied(),
            Expression::ParenthesizedExpression(paren) => self.target_of(&paren.expression),
            _ => None,
        }
    }

    fn visit_assignment_expression(&mut self, assign: &AssignmentExpression<'_>) -> Option<ValueId> {
        let value = self.eval_expression(&assign.right);

        match &assign.left {
            AssignmentTarget::StaticMemberExpression(member) => {
                let is_module_exports = member.property.name == "exports"
                    && matches!(&member.object, Expression::Identifier(ident) if ident.name == "module");
                if is_module_exports {
                    let id = value.unwrap_or_else(|| self.alloc(RuntimeValue::object([])));
                    tracing::debug!(kind = ?self.values[id].kind, "module.exports replaced");
                    self.module_exports = id;
                } else if let Some(target) = self.target_of(&member.object) {
                    self.add_key(target, OwnKey::enumerable(member.property.name.as_str()));
                }
            }
            AssignmentTarget::ComputedMemberExpression(member) => {
                if let (Expression::StringLiteral(lit), Some(target)) =
                    (&member.expression, self.target_of(&member.object))
                {
                    self.add_key(target, OwnKey::enumerable(lit.value.as_str()));
                }
            }
            AssignmentTarget::AssignmentTargetIdentifier(ident) => {
                let id = value.unwrap_or_else(|| self.alloc(RuntimeValue::object([])));
                if ident.name == "exports" {
                    self.exports_alias = id;
                } else {
                    self.bindings.insert(ident.name.to_string(), id);
                }
            }
            _ => {}
        }
        value
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'_>) -> Option<ValueId> {
        match &call.callee {
            Expression::Identifier(ident) if ident.name == "require" => {
                // Another module's exports; nothing is known about them here
                Some(self.alloc(RuntimeValue::object([])))
            }
            Expression::StaticMemberExpression(member)
                if matches!(&member.object, Expression::Identifier(ident) if ident.name == "Object") =>
            {
                match member.property.name.as_str() {
                    "defineProperty" => self.visit_define_property(call),
                    "assign" => self.visit_object_assign(call),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// `Object.defineProperty(target, "name", descriptor)`
    fn visit_define_property(&mut self, call: &CallExpression<'_>) -> Option<ValueId> {
        let target = call
            .arguments
            .first()
            .and_then(Argument::as_expression)
            .and_then(|expr| self.target_of(expr))?;
        let Some(Argument::StringLiteral(name)) = call.arguments.get(1) else {
            return Some(target);
        };
        let enumerable = match call.arguments.get(2) {
            Some(Argument::ObjectExpression(descriptor)) => descriptor_is_enumerable(descriptor),
            _ => false,
        };
        let key = if enumerable {
            OwnKey::enumerable(name.value.as_str())
        } else {
            OwnKey::hidden(name.value.as_str())
        };
        self.add_key(target, key);
        Some(target)
    }

    /// `Object.assign(target, ...sources)`
    fn visit_object_assign(&mut self, call: &CallExpression<'_>) -> Option<ValueId> {
        let target = call
            .arguments
            .first()
            .and_then(Argument::as_expression)
            .and_then(|expr| self.target_of(expr))?;
        for argument in call.arguments.iter().skip(1) {
            let Some(expr) = argument.as_expression() else {
                continue;
            };
            if let Some(source) = self.eval_expression(expr) {
                let keys: Vec<OwnKey> = self.values[source]
                    .keys
                    .iter()
                    .filter(|key| key.enumerable)
                    .cloned()
                    .collect();
                for key in keys {
                    self.add_key(target, key);
                }
            }
        }
        Some(target)
    }
}

fn function_value(func: &Function<'_>) -> RuntimeValue {
    let mut value = RuntimeValue::function([]);
    value.constructible = !func.r#async && !func.generator;
    value
}

/// Static fields are enumerable own keys of a class; static methods are not
fn class_value(class: &Class<'_>) -> RuntimeValue {
    let keys = class.body.body.iter().filter_map(|element| match element {
        ClassElement::PropertyDefinition(prop) if prop.r#static => {
            prop.key.static_name().map(|name| OwnKey::enumerable(name))
        }
        ClassElement::MethodDefinition(method) if method.r#static => {
            method.key.static_name().map(|name| OwnKey::hidden(name))
        }
        _ => None,
    });
    RuntimeValue::class(keys.collect::<Vec<_>>())
}

fn descriptor_is_enumerable(descriptor: &ObjectExpression<'_>) -> bool {
    descriptor.properties.iter().any(|property| match property {
        ObjectPropertyKind::ObjectProperty(prop) => {
            prop.key.static_name().is_some_and(|name| name == "enumerable")
                && matches!(&prop.value, Expression::BooleanLiteral(lit) if lit.value)
        }
        ObjectPropertyKind::SpreadProperty(_) => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(source: &str) -> RuntimeValue {
        ModuleEvaluator::evaluate(source).unwrap()
    }

    fn keys(value: &RuntimeValue) -> Vec<&str> {
        value.enumerable_keys().collect()
    }

    #[test]
    fn test_exports_properties() {
        let value = evaluate("exports.foo = 1;\nexports.bar = function () {};\nmodule.exports.baz = 2;\n");
        assert_eq!(value.kind, ValueKind::Object);
        assert_eq!(keys(&value), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn test_function_replaces_exports() {
        let value = evaluate(
            "function main() {}\nmain.sync = function () {};\nmodule.exports = main;\nmodule.exports.extra = 1;\n",
        );
        assert_eq!(value.kind, ValueKind::Function);
        assert!(value.is_constructible());
        assert_eq!(keys(&value), vec!["sync", "extra"]);
    }

    #[test]
    fn test_arrow_function_is_not_constructible() {
        let value = evaluate("module.exports = () => 1;");
        assert!(value.is_callable());
        assert!(!value.is_constructible());
    }

    #[test]
    fn test_class_static_members() {
        let value = evaluate(
            "class Client {\n  static version = '1';\n  static create() {}\n  send() {}\n}\nmodule.exports = Client;\n",
        );
        assert_eq!(value.kind, ValueKind::Class);
        assert_eq!(keys(&value), vec!["version"]);
        assert_eq!(value.keys.len(), 2);
    }

    #[test]
    fn test_object_literal_exports() {
        let value = evaluate("const a = 1;\nfunction b() {}\nmodule.exports = { a, b, 'c-d': 3 };\n");
        assert_eq!(value.kind, ValueKind::Object);
        assert_eq!(keys(&value), vec!["a", "b", "c-d"]);
    }

    #[test]
    fn test_exports_alias_after_replacement() {
        let value = evaluate("module.exports = exports = function () {};\nexports.helper = 1;\n");
        assert!(value.is_callable());
        assert_eq!(keys(&value), vec!["helper"]);

        let detached = evaluate("module.exports = function () {};\nexports.lost = 1;\n");
        assert!(keys(&detached).is_empty());
    }

    #[test]
    fn test_define_property() {
        let value = evaluate(
            "Object.defineProperty(exports, '__esModule', { value: true });\n\
             Object.defineProperty(exports, 'shown', { enumerable: true, get: function () { return 1; } });\n\
             Object.defineProperty(exports, 'hidden', { value: 2 });\n",
        );
        assert!(value.es_module);
        assert_eq!(keys(&value), vec!["shown"]);
    }

    #[test]
    fn test_object_assign() {
        let value = evaluate("Object.assign(module.exports, { a: 1 }, { b: 2 });");
        assert_eq!(keys(&value), vec!["a", "b"]);
    }

    #[test]
    fn test_primitive_and_null_exports() {
        assert_eq!(evaluate("module.exports = 'x';").kind, ValueKind::Primitive);
        assert_eq!(evaluate("module.exports = null;").kind, ValueKind::Null);
        assert_eq!(evaluate("module.exports = [1, 2];").kind, ValueKind::Array);
    }

    #[test]
    fn test_es_module_namespace() {
        let value = evaluate(
            "export const a = 1;\nexport function b() {}\nconst c = 3;\nexport { c as renamed };\nexport default a;\n",
        );
        assert!(value.es_module);
        assert_eq!(value.kind, ValueKind::Object);
        assert_eq!(keys(&value), vec!["a", "b", "renamed", "default"]);
    }

    #[test]
    fn test_require_relay_is_opaque() {
        let value = evaluate("module.exports = require('./lib');");
        assert_eq!(value.kind, ValueKind::Object);
        assert!(value.keys.is_empty());
    }
}
