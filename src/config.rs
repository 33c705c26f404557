//! Generator options and per-dialect rendering settings.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TypegenError;

pub const DEFAULT_BANNER: &str = "TDLib 1.3.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Output dialect. Both dialects carry identical type content.
pub enum Dialect {
    /// Permissive dialect: Flow, with exact-object markers and a pragma line.
    #[default]
    #[serde(rename = "flow")]
    Flow,
    /// Strict dialect: TypeScript.
    #[serde(rename = "typescript")]
    TypeScript,
}

/// Syntax switches consumed by the emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectConfig {
    /// Wrap optional object types in `{| ... |}`.
    pub exact_objects: bool,
    /// Emit the leading `// @flow` pragma.
    pub emit_pragma: bool,
    /// Import line shown in the commented-out future example.
    pub future_import: &'static str,
    /// Bottom type used for unions with no alternatives.
    pub empty_union: &'static str,
}

impl Dialect {
    pub fn config(self) -> DialectConfig {
        match self {
            Dialect::Flow => DialectConfig {
                exact_objects: true,
                emit_pragma: true,
                future_import: "import type { Future } from 'fluture'",
                empty_union: "empty",
            },
            Dialect::TypeScript => DialectConfig {
                exact_objects: false,
                emit_pragma: false,
                future_import: "import { Future } from 'fluture'",
                empty_union: "never",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Source format of the schema text.
pub enum SchemaFormat {
    /// TL interface description (`td_api.tl`).
    #[default]
    Tl,
    /// Generated C++ API header (`td_api.h`).
    CppHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Where a function's response type comes from in dispatch signatures.
pub enum ResponseTypeSource {
    /// Use the explicit return-type annotation when the declaration has one,
    /// otherwise its declared result category.
    #[default]
    AnnotationOrCategory,
    /// Always use the declared result category.
    ResultCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
/// Options for one generator run.
pub struct GenOptions {
    pub dialect: Dialect,
    pub schema_format: SchemaFormat,
    pub response_types: ResponseTypeSource,
    /// Text of the version comment below the pragma.
    pub banner: String,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            schema_format: SchemaFormat::default(),
            response_types: ResponseTypeSource::default(),
            banner: DEFAULT_BANNER.to_string(),
        }
    }
}

impl GenOptions {
    /// Parses options from JSON text. Missing keys take their defaults.
    pub fn from_json_str(input: &str) -> Result<Self, TypegenError> {
        serde_json::from_str(input).map_err(|e| TypegenError::Config(e.to_string()))
    }

    /// Reads options from a JSON file.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, TypegenError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path)?;
        Self::from_json_str(&input).map_err(|e| match e {
            TypegenError::Config(message) => {
                TypegenError::Config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }
}
