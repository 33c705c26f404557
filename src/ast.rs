//! Declaration model shared by the parser, resolver and emitter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::type_map;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A target-language type reference plus its repetition depth.
pub struct MappedType {
    /// Target primitive name or a forward reference to another declaration.
    pub name: String,
    /// Number of nested "repeated-of" wrappers (`2` renders as `T[][]`).
    pub repetition: usize,
}

impl MappedType {
    pub fn new(name: impl Into<String>, repetition: usize) -> Self {
        Self {
            name: name.into(),
            repetition,
        }
    }

    /// Whether the innermost type is a target primitive rather than a reference.
    pub fn is_primitive(&self) -> bool {
        type_map::is_target_primitive(&self.name)
    }

    /// Renders the type with one `[]` per repetition level.
    pub fn render(&self) -> String {
        format!("{}{}", self.name, "[]".repeat(self.repetition))
    }

    /// Renders the reference used inside optional (partial) types.
    ///
    /// Structural references point at their `Optional` counterpart; the suffix
    /// goes on the innermost name, before the repetition brackets.
    pub fn render_optional(&self) -> String {
        if self.is_primitive() {
            self.render()
        } else {
            format!("{}Optional{}", self.name, "[]".repeat(self.repetition))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One field of a declaration.
pub struct Parameter {
    /// Field name with any trailing escape marker already stripped.
    pub name: String,
    /// Resolved field type.
    pub ty: MappedType,
    /// Field description (may be empty).
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Whether a declaration is a data record or a remote call.
pub enum DeclarationKind {
    Constructor,
    Function,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A concrete constructor or function declaration.
pub struct Declaration {
    pub name: String,
    pub kind: DeclarationKind,
    /// Ordered field list.
    pub parameters: Vec<Parameter>,
    /// Category this declaration belongs to. For TL functions this is the
    /// response type; for C++ header functions it is the root function category.
    pub result_category: String,
    /// Explicit response-type annotation, when the schema format carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<MappedType>,
    pub description: String,
}

impl Declaration {
    pub fn is_function(&self) -> bool {
        self.kind == DeclarationKind::Function
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// An abstract result category (a closed-world union).
pub struct Category {
    pub name: String,
    pub description: String,
    /// Parent category, already canonicalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// The two distinguished categories every schema implicitly has.
pub enum RootCategory {
    Object,
    Function,
}

impl RootCategory {
    /// Canonical name used in the model and the emitted output.
    pub fn name(self) -> &'static str {
        match self {
            RootCategory::Object => "TDObject",
            RootCategory::Function => "TDFunction",
        }
    }

    /// Recognizes both the source spelling and the canonical spelling.
    pub fn from_source(name: &str) -> Option<Self> {
        match name {
            "Object" | "TDObject" => Some(RootCategory::Object),
            "Function" | "TDFunction" => Some(RootCategory::Function),
            _ => None,
        }
    }

    pub fn is_root(name: &str) -> bool {
        Self::from_source(name).is_some()
    }
}

/// Maps the source spelling of a root category to its canonical name and
/// passes every other name through.
pub fn canonical_category(name: &str) -> String {
    match RootCategory::from_source(name) {
        Some(root) => root.name().to_string(),
        None => name.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A declaration or category name was declared more than once.
    DuplicateName,
    /// A union would be emitted with no alternatives.
    EmptyUnion,
    /// A function has no response-type annotation in a format that expects one.
    UnresolvedResponseType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Non-fatal finding collected while compiling a schema.
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Declaration or category the finding is about.
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Parser output: every declaration and category in source order.
pub struct ParsedSchema {
    pub declarations: Vec<Declaration>,
    pub categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedSchema {
    pub fn functions(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| d.is_function())
    }

    pub fn constructors(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(|d| !d.is_function())
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }
}
