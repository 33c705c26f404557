pub mod ast;
pub mod config;
pub mod doc_comment;
pub mod emit;
pub mod error;
pub mod parser;
pub mod resolve;
pub mod type_map;

use std::fs;
use std::path::Path;

use serde::Serialize;

use ast::{Diagnostic, DiagnosticKind, ParsedSchema};
pub use config::{Dialect, GenOptions, ResponseTypeSource, SchemaFormat};
pub use error::TypegenError;
pub use parser::{parse_schema, preprocess};
pub use resolve::{resolve_memberships, CategoryMembership};

/// Fallback schema path used by the CLI when no file is given.
pub const DEFAULT_SCHEMA_PATH: &str = "td_api.tl";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of one generator run.
pub struct Generated {
    /// Complete declaration file text.
    pub output: String,
    /// Non-fatal findings, in pipeline order.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
/// Parsed declarations plus their category memberships.
pub struct SchemaModel {
    pub schema: ParsedSchema,
    pub memberships: CategoryMembership,
}

impl SchemaModel {
    /// Serializes the model to JSON text.
    ///
    /// When `pretty` is `true`, output is formatted with indentation.
    pub fn to_json_string(&self, pretty: bool) -> Result<String, TypegenError> {
        if pretty {
            serde_json::to_string_pretty(self)
                .map_err(|e| TypegenError::Serialization(e.to_string()))
        } else {
            serde_json::to_string(self).map_err(|e| TypegenError::Serialization(e.to_string()))
        }
    }
}

/// Parses and resolves schema text without rendering it.
pub fn build_model(source: &str, format: SchemaFormat) -> SchemaModel {
    let schema = match format {
        SchemaFormat::Tl => parse_schema(&preprocess(source), format),
        SchemaFormat::CppHeader => parse_schema(source, format),
    };
    let memberships = resolve_memberships(&schema);
    SchemaModel {
        schema,
        memberships,
    }
}

/// Compiles schema text into Flow or TypeScript declarations.
///
/// Never fails: unmatched declarations are skipped and anomalies are
/// returned as diagnostics.
pub fn generate(source: &str, options: &GenOptions) -> Generated {
    let SchemaModel {
        schema,
        memberships,
    } = build_model(source, options.schema_format);

    let mut diagnostics = schema.diagnostics.clone();
    diagnostics.extend(resolve::empty_categories(&schema, &memberships));

    diagnostics.extend(emit::unconstructed_responses(
        &schema,
        &memberships,
        options.response_types,
    ));

    let aggregates = emit::aggregate_unions(&schema, &memberships, options.schema_format);
    if aggregates.functions.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::EmptyUnion,
            ast::RootCategory::Function.name(),
            "schema declares no functions",
        ));
    }
    if aggregates.objects.is_empty() {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::EmptyUnion,
            ast::RootCategory::Object.name(),
            "schema declares no object categories",
        ));
    }

    let output = emit::emit(&schema, &memberships, options);
    Generated {
        output,
        diagnostics,
    }
}

/// Reads a schema file and compiles it.
pub fn generate_from_path(
    path: impl AsRef<Path>,
    options: &GenOptions,
) -> Result<Generated, TypegenError> {
    let source = fs::read_to_string(path.as_ref())?;
    Ok(generate(&source, options))
}
