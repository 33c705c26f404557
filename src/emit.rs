//! Rendering of object types, unions and dispatch types.
//!
//! Output layout, top to bottom: optional pragma, banner, object types,
//! separator, per-category unions, aggregate unions, separator, dispatch
//! types, and a commented-out future-based dispatch example.

use std::collections::HashSet;

use crate::ast::{Declaration, Diagnostic, DiagnosticKind, MappedType, ParsedSchema, RootCategory};
use crate::config::{DialectConfig, GenOptions, ResponseTypeSource, SchemaFormat};
use crate::doc_comment::{format_description, indent};
use crate::resolve::CategoryMembership;

const SEPARATOR: &str = "// ----";
const OPTIONAL_SUFFIX: &str = "Optional";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Response wrapper used by one dispatch intersection type.
pub enum DispatchStyle {
    /// `(query: q) => Promise<R>`
    Promise,
    /// `(query: q) => R | error | null`
    Nullable,
    /// `(query: q) => Future<error, R>`
    Future,
}

impl DispatchStyle {
    pub fn type_name(self) -> &'static str {
        match self {
            DispatchStyle::Promise => "Invoke",
            DispatchStyle::Nullable => "Execute",
            DispatchStyle::Future => "InvokeFuture",
        }
    }

    fn wrap(self, response: &str) -> String {
        match self {
            DispatchStyle::Promise => format!("Promise<{response}>"),
            DispatchStyle::Nullable => format!("{response} | error | null"),
            DispatchStyle::Future => format!("Future<error, {response}>"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Alternatives of the two schema-wide unions.
pub struct AggregateUnions {
    /// Every function declaration, in parse order.
    pub functions: Vec<String>,
    /// Every object category a declaration belongs to, first occurrence
    /// first. For C++ headers this is the resolved membership of the object
    /// root: direct constructors and categories deriving from `Object`.
    pub objects: Vec<String>,
}

pub fn aggregate_unions(
    schema: &ParsedSchema,
    membership: &CategoryMembership,
    format: SchemaFormat,
) -> AggregateUnions {
    let functions = schema.functions().map(|d| d.name.clone()).collect();
    let objects = match format {
        SchemaFormat::CppHeader => membership
            .get(RootCategory::Object.name())
            .map(<[String]>::to_vec)
            .unwrap_or_default(),
        SchemaFormat::Tl => result_categories(schema),
    };
    AggregateUnions { functions, objects }
}

// TL has no explicit object root, so every result category stands in.
// Constructors rooted directly at the object root stand for themselves.
fn result_categories(schema: &ParsedSchema) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut objects = Vec::new();
    for declaration in &schema.declarations {
        let name = match RootCategory::from_source(&declaration.result_category) {
            Some(RootCategory::Object) if !declaration.is_function() => &declaration.name,
            Some(_) => continue,
            None => &declaration.result_category,
        };
        if seen.insert(name.as_str()) {
            objects.push(name.clone());
        }
    }
    objects
}

/// Reports function responses that name a category with no union behind it.
///
/// Such names still appear in the aggregate and dispatch types; the
/// reference is vacuous because nothing constructs the category.
pub fn unconstructed_responses(
    schema: &ParsedSchema,
    membership: &CategoryMembership,
    source: ResponseTypeSource,
) -> Vec<Diagnostic> {
    let mut reported: Vec<&str> = Vec::new();
    let mut diagnostics = Vec::new();
    for function in schema.functions() {
        let name = response_name(function, source);
        let known = RootCategory::is_root(name)
            || membership.get(name).is_some()
            || schema.category(name).is_some()
            || schema.declarations.iter().any(|d| d.name == name)
            || MappedType::new(name, 0).is_primitive();
        if known || reported.contains(&name) {
            continue;
        }
        reported.push(name);
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::EmptyUnion,
            name,
            format!("response of '{}' has no constructors", function.name),
        ));
    }
    diagnostics
}

fn response_name(function: &Declaration, source: ResponseTypeSource) -> &str {
    match (source, &function.response_type) {
        (ResponseTypeSource::AnnotationOrCategory, Some(annotated)) => &annotated.name,
        _ => &function.result_category,
    }
}

/// Renders the complete declaration file.
pub fn emit(schema: &ParsedSchema, membership: &CategoryMembership, options: &GenOptions) -> String {
    let emitter = Emitter {
        schema,
        options,
        dialect: options.dialect.config(),
    };
    let aggregates = aggregate_unions(schema, membership, options.schema_format);
    let object_union = RootCategory::Object.name();

    let mut blocks: Vec<String> = Vec::new();
    if emitter.dialect.emit_pragma {
        blocks.push("// @flow".to_string());
    }
    blocks.push(format!("// {}", options.banner));

    let objects = emitter.object_types();
    if !objects.is_empty() {
        blocks.push(objects);
    }
    blocks.push(SEPARATOR.to_string());

    let unions = emitter.category_unions(membership);
    if !unions.is_empty() {
        blocks.push(unions);
    }
    blocks.push(emitter.union(RootCategory::Function.name(), &aggregates.functions, None, false));
    blocks.push(emitter.union(object_union, &aggregates.objects, None, false));
    blocks.push(emitter.union(object_union, &aggregates.objects, None, true));
    blocks.push(SEPARATOR.to_string());

    blocks.push(emitter.dispatch(DispatchStyle::Promise));
    blocks.push(emitter.dispatch(DispatchStyle::Nullable));
    blocks.push(format!(
        "/*\n// Future<Left, Right>\n{}\n\n{}\n*/",
        emitter.dialect.future_import,
        emitter.dispatch(DispatchStyle::Future)
    ));

    let mut out = blocks.join("\n\n");
    out.push('\n');

    tracing::debug!(bytes = out.len(), dialect = ?options.dialect, "emitted declarations");
    out
}

struct Emitter<'a> {
    schema: &'a ParsedSchema,
    options: &'a GenOptions,
    dialect: DialectConfig,
}

impl Emitter<'_> {
    /// Constructors get a full and an optional type; functions only get their
    /// argument type, whose fields are all optional.
    fn object_types(&self) -> String {
        self.schema
            .declarations
            .iter()
            .map(|declaration| {
                if declaration.is_function() {
                    self.object_type(declaration, true, false)
                } else {
                    format!(
                        "{}\n\n{}",
                        self.object_type(declaration, false, false),
                        self.object_type(declaration, true, true)
                    )
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn object_type(&self, declaration: &Declaration, partial: bool, suffixed: bool) -> String {
        let marker = if partial && self.dialect.exact_objects { "|" } else { "" };
        let name_suffix = if suffixed { OPTIONAL_SUFFIX } else { "" };

        let mut lines = Vec::new();
        if !declaration.description.is_empty() {
            lines.push(format_description(&declaration.description));
        }
        lines.push(format!(
            "export type {}{name_suffix} = {{{marker}",
            declaration.name
        ));
        lines.push(format!("  _: '{}',", declaration.name));
        for param in &declaration.parameters {
            if !param.description.is_empty() {
                lines.push(indent(2, &format_description(&param.description)));
            }
            let (question, ty) = if partial {
                ("?", param.ty.render_optional())
            } else {
                ("", param.ty.render())
            };
            lines.push(format!("  {}{question}: {ty},", param.name));
        }
        lines.push(format!("{marker}}}"));
        lines.join("\n")
    }

    fn category_unions(&self, membership: &CategoryMembership) -> String {
        membership
            .iter()
            .filter(|(category, _)| !RootCategory::is_root(category))
            .map(|(category, members)| {
                let description = self
                    .schema
                    .category(category)
                    .map(|c| c.description.as_str())
                    .filter(|d| !d.is_empty());
                format!(
                    "{}\n\n{}",
                    self.union(category, members, description, false),
                    self.union(category, members, description, true)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn union(
        &self,
        name: &str,
        alternatives: &[String],
        description: Option<&str>,
        optional: bool,
    ) -> String {
        let suffix = if optional { OPTIONAL_SUFFIX } else { "" };
        let mut lines = Vec::new();
        if let Some(description) = description {
            lines.push(format_description(description));
        }
        if alternatives.is_empty() {
            lines.push(format!(
                "export type {name}{suffix} = {}",
                self.dialect.empty_union
            ));
            return lines.join("\n");
        }
        lines.push(format!("export type {name}{suffix} ="));
        for alternative in alternatives {
            let rendered = if optional {
                MappedType::new(alternative.as_str(), 0).render_optional()
            } else {
                alternative.clone()
            };
            lines.push(format!("  | {rendered}"));
        }
        lines.join("\n")
    }

    /// Intersection of one call signature per function, so the result type
    /// follows the argument type.
    fn dispatch(&self, style: DispatchStyle) -> String {
        let signatures: Vec<String> = self
            .schema
            .functions()
            .map(|function| {
                format!(
                    "  & ((query: {}) => {})",
                    function.name,
                    style.wrap(&self.response_type(function))
                )
            })
            .collect();

        if signatures.is_empty() {
            return format!("export type {} = {}", style.type_name(), self.dialect.empty_union);
        }
        format!("export type {} =\n{}", style.type_name(), signatures.join("\n"))
    }

    fn response_type(&self, function: &Declaration) -> String {
        match (self.options.response_types, &function.response_type) {
            (ResponseTypeSource::AnnotationOrCategory, Some(annotated)) => annotated.render(),
            _ => function.result_category.clone(),
        }
    }
}
