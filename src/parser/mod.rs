//! Schema parsing: raw text to [`ParsedSchema`].

/// Extractor for the C++ API header format.
pub mod cpp_header;
/// Tokenizer for TL source text.
pub mod lexer;
/// Recursive-descent parser for TL tokens.
pub mod tl;

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{Category, Declaration, Diagnostic, DiagnosticKind, ParsedSchema};
use crate::config::SchemaFormat;

/// Reserved-word escape appended to field names by the schema generator.
const ESCAPE_MARKER: char = '_';

/// Unfiltered parser output, before duplicate names are collapsed.
#[derive(Debug, Default)]
pub struct RawSchema {
    pub declarations: Vec<Declaration>,
    pub categories: Vec<Category>,
    pub diagnostics: Vec<Diagnostic>,
}

fn known_bad_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^ *vector.+$").expect("valid regex"))
}

/// Blanks out the `vector {t:Type} # [ t ] = Vector t;` combinator line (and
/// anything else starting with `vector`) that upstream TL files carry.
pub fn preprocess(source: &str) -> String {
    known_bad_line_regex().replace_all(source, "").into_owned()
}

pub(crate) fn strip_escape_marker(name: &str) -> &str {
    name.strip_suffix(ESCAPE_MARKER).unwrap_or(name)
}

/// Parses schema text in the given format.
///
/// Never fails; declarations that do not match the grammar are dropped.
/// Duplicate names keep the position of the first occurrence and the content
/// of the last one.
pub fn parse_schema(source: &str, format: SchemaFormat) -> ParsedSchema {
    let raw = match format {
        SchemaFormat::Tl => tl::parse(&lexer::tokenize(source)),
        SchemaFormat::CppHeader => cpp_header::parse(source),
    };

    let mut diagnostics = raw.diagnostics;
    let declarations = dedupe(raw.declarations, |d| &d.name, "declaration", &mut diagnostics);
    let categories = dedupe(raw.categories, |c| &c.name, "category", &mut diagnostics);

    tracing::debug!(
        ?format,
        declarations = declarations.len(),
        categories = categories.len(),
        "parsed schema"
    );

    ParsedSchema {
        declarations,
        categories,
        diagnostics,
    }
}

fn dedupe<T>(
    items: Vec<T>,
    name_of: impl Fn(&T) -> &String,
    what: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        let name = name_of(&item).clone();
        match index.get(&name) {
            Some(&slot) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateName,
                    name.as_str(),
                    format!("{what} declared more than once; the last declaration wins"),
                ));
                out[slot] = item;
            }
            None => {
                index.insert(name, out.len());
                out.push(item);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_drops_vector_lines_only() {
        let source = "vector {t:Type} # [ t ] = Vector t;\n  vector x\nok = Ok;\nchat ids:vector<int53> = Chat;\n";
        let cleaned = preprocess(source);
        assert_eq!(cleaned, "\n\nok = Ok;\nchat ids:vector<int53> = Chat;\n");
    }

    #[test]
    fn escape_marker_is_only_stripped_once_at_the_end() {
        assert_eq!(strip_escape_marker("type_"), "type");
        assert_eq!(strip_escape_marker("user_id"), "user_id");
        assert_eq!(strip_escape_marker("a__"), "a_");
    }

    #[test]
    fn duplicate_declaration_last_write_wins_in_first_position() {
        let schema = parse_schema(
            "a x:int32 = A;\nb = B;\na y:string = A;\n",
            SchemaFormat::Tl,
        );
        let names: Vec<&str> = schema
            .declarations
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(schema.declarations[0].parameters[0].name, "y");
        assert_eq!(schema.diagnostics.len(), 1);
        assert_eq!(schema.diagnostics[0].kind, DiagnosticKind::DuplicateName);
        assert_eq!(schema.diagnostics[0].subject, "a");
    }

    #[test]
    fn duplicate_categories_are_collapsed() {
        let schema = parse_schema(
            "//@class A @description first\n//@class A @description second\n",
            SchemaFormat::Tl,
        );
        assert_eq!(schema.categories.len(), 1);
        assert_eq!(schema.categories[0].description, "second");
    }
}
