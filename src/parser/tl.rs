//! Recursive-descent parser for TL schema tokens.

use crate::ast::{
    canonical_category, Category, Declaration, DeclarationKind, Parameter, RootCategory,
};
use crate::type_map::{is_schema_primitive, map_type};

use super::lexer::{Token, TokenKind};
use super::{strip_escape_marker, RawSchema};

/// Parses a TL token stream into declarations and categories.
///
/// Declarations the grammar does not accept are skipped up to the next `;`.
pub fn parse(tokens: &[Token]) -> RawSchema {
    if tokens.is_empty() {
        return RawSchema::default();
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        section: DeclarationKind::Constructor,
        pending_docs: Vec::new(),
        out: RawSchema::default(),
    };
    parser.run();
    parser.out
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    section: DeclarationKind,
    pending_docs: Vec<String>,
    out: RawSchema,
}

struct RawField {
    name: String,
    type_token: String,
}

impl<'a> Parser<'a> {
    fn run(&mut self) {
        loop {
            match &self.current().kind {
                TokenKind::Eof => break,
                TokenKind::DocComment(text) => {
                    let text = text.clone();
                    self.advance();
                    if is_class_comment(&text) {
                        self.push_category(&text);
                    } else {
                        self.pending_docs.push(text);
                    }
                }
                TokenKind::FunctionsMarker => {
                    self.advance();
                    self.section = DeclarationKind::Function;
                    self.pending_docs.clear();
                }
                TokenKind::TypesMarker => {
                    self.advance();
                    self.section = DeclarationKind::Constructor;
                    self.pending_docs.clear();
                }
                _ => {
                    let start = self.pos;
                    match self.parse_declaration() {
                        Some(declaration) => self.out.declarations.push(declaration),
                        None => {
                            self.pos = start;
                            self.recover();
                        }
                    }
                    self.pending_docs.clear();
                }
            }
        }
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self, offset: usize) -> &TokenKind {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: &TokenKind) -> Option<()> {
        if &self.current().kind == kind {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    fn ident(&mut self) -> Option<String> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Some(name)
            }
            _ => None,
        }
    }

    /// Skips to just past the next `;`, stopping early at documentation or
    /// section markers so the next declaration keeps its comments.
    fn recover(&mut self) {
        loop {
            match self.current().kind {
                TokenKind::Eof
                | TokenKind::DocComment(_)
                | TokenKind::FunctionsMarker
                | TokenKind::TypesMarker => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                _ => self.advance(),
            }
        }
    }

    // declaration := ident field* '=' type ';'
    fn parse_declaration(&mut self) -> Option<Declaration> {
        let line = self.current().line;
        let name = self.ident()?;

        let mut fields = Vec::new();
        while matches!(self.current().kind, TokenKind::Ident(_))
            && matches!(self.peek(1), TokenKind::Colon)
        {
            let field_name = self.ident()?;
            self.eat(&TokenKind::Colon)?;
            let type_token = self.parse_type()?;
            fields.push(RawField {
                name: field_name,
                type_token,
            });
        }

        self.eat(&TokenKind::Equals)?;
        let result = self.parse_type()?;
        self.eat(&TokenKind::Semicolon)?;

        if fields.is_empty() && is_schema_primitive(&name) {
            tracing::trace!(line, name = %name, "skipping builtin declaration");
            return None;
        }

        let result_category = canonical_category(&result);
        let kind = if self.section == DeclarationKind::Function
            || RootCategory::from_source(&result) == Some(RootCategory::Function)
        {
            DeclarationKind::Function
        } else {
            DeclarationKind::Constructor
        };

        let tags = parse_doc_tags(&self.pending_docs.join(" "));
        let parameters = fields
            .into_iter()
            .map(|field| {
                // `@param_description` documents a field literally named `description`.
                let description = find_tag(&tags, &format!("param_{}", field.name))
                    .or_else(|| find_tag(&tags, &field.name))
                    .unwrap_or_default();
                Parameter {
                    name: strip_escape_marker(&field.name).to_string(),
                    ty: map_type(&field.type_token),
                    description,
                }
            })
            .collect();

        Some(Declaration {
            name,
            kind,
            parameters,
            result_category,
            response_type: None,
            description: find_tag(&tags, "description").unwrap_or_default(),
        })
    }

    // type := ident ('<' type '>')?
    fn parse_type(&mut self) -> Option<String> {
        let head = self.ident()?;
        if self.eat(&TokenKind::LAngle).is_none() {
            return Some(head);
        }
        let inner = self.parse_type()?;
        self.eat(&TokenKind::RAngle)?;
        Some(format!("{head}<{inner}>"))
    }

    fn push_category(&mut self, text: &str) {
        let tags = parse_doc_tags(text);
        let Some(name) = find_tag(&tags, "class").filter(|n| !n.is_empty()) else {
            return;
        };
        if RootCategory::is_root(&name) {
            return;
        }
        self.out.categories.push(Category {
            name,
            description: find_tag(&tags, "description").unwrap_or_default(),
            parent: Some(RootCategory::Object.name().to_string()),
        });
    }
}

/// Splits documentation text into `(tag, text)` pairs.
///
/// A tag starts at an `@` that begins the text or follows whitespace.
pub(crate) fn parse_doc_tags(text: &str) -> Vec<(String, String)> {
    let mut tags: Vec<(String, String)> = Vec::new();
    let mut rest = text.trim_start();

    while let Some(after_at) = rest.strip_prefix('@') {
        let tag_len = after_at
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after_at.len());
        let tag = &after_at[..tag_len];
        let body = &after_at[tag_len..];
        let body_end = next_tag_start(body).unwrap_or(body.len());
        tags.push((tag.to_string(), body[..body_end].trim().to_string()));
        rest = &body[body_end..];
    }
    tags
}

/// True when the first tag of a doc line is exactly `@class`.
fn is_class_comment(text: &str) -> bool {
    parse_doc_tags(text)
        .first()
        .is_some_and(|(tag, _)| tag == "class")
}

fn next_tag_start(body: &str) -> Option<usize> {
    body.char_indices()
        .zip(body.chars().skip(1))
        .find(|((_, c), next)| c.is_whitespace() && *next == '@')
        .map(|((i, c), _)| i + c.len_utf8())
}

fn find_tag(tags: &[(String, String)], name: &str) -> Option<String> {
    tags.iter()
        .find(|(tag, _)| tag == name)
        .map(|(_, text)| text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::MappedType;
    use crate::parser::lexer::tokenize;

    fn parse_text(input: &str) -> RawSchema {
        parse(&tokenize(input))
    }

    #[test]
    fn parses_constructor_and_function() {
        let schema = parse_text(
            "message id:int53 text:string = Message;\n---functions---\ngetMessage id:int53 = Message;\n",
        );
        assert_eq!(schema.declarations.len(), 2);

        let message = &schema.declarations[0];
        assert_eq!(message.kind, DeclarationKind::Constructor);
        assert_eq!(message.result_category, "Message");
        assert_eq!(message.parameters[0].name, "id");
        assert_eq!(message.parameters[0].ty, MappedType::new("number", 0));
        assert_eq!(message.parameters[1].ty, MappedType::new("string", 0));

        let get = &schema.declarations[1];
        assert_eq!(get.kind, DeclarationKind::Function);
        assert_eq!(get.result_category, "Message");
        assert!(get.response_type.is_none());
    }

    #[test]
    fn attaches_descriptions() {
        let schema = parse_text(
            "//@description A chat message @id Message identifier\n//@param_description Text of the message\nmessage id:int53 description:string = Message;\n",
        );
        let message = &schema.declarations[0];
        assert_eq!(message.description, "A chat message");
        assert_eq!(message.parameters[0].description, "Message identifier");
        assert_eq!(message.parameters[1].description, "Text of the message");
    }

    #[test]
    fn class_comment_declares_category() {
        let schema = parse_text(
            "//@class ChatType @description Describes the type of a chat\n\n//@description A private chat\nchatTypePrivate user_id:int53 = ChatType;\n",
        );
        assert_eq!(
            schema.categories,
            vec![Category {
                name: "ChatType".into(),
                description: "Describes the type of a chat".into(),
                parent: Some("TDObject".into()),
            }]
        );
        assert_eq!(schema.declarations[0].description, "A private chat");
    }

    #[test]
    fn strips_escape_marker_keeping_order() {
        let schema = parse_text("sticker type_:string emoji:string = Sticker;");
        let names: Vec<&str> = schema.declarations[0]
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["type", "emoji"]);
    }

    #[test]
    fn skips_malformed_and_builtin_declarations() {
        let schema = parse_text(
            "double ? = Double;\nint32 = Int32;\nvector {t:Type} # [ t ] = Vector t;\nboolTrue = Bool;\nok = Ok;\n",
        );
        let names: Vec<&str> = schema
            .declarations
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["boolTrue", "ok"]);
    }

    #[test]
    fn malformed_declaration_keeps_next_docs() {
        let schema = parse_text("broken x: = ;\n//@description Fine\nok = Ok;\n");
        assert_eq!(schema.declarations.len(), 1);
        assert_eq!(schema.declarations[0].description, "Fine");
    }

    #[test]
    fn root_function_result_marks_function() {
        let schema = parse_text("ping = Function;");
        assert_eq!(schema.declarations[0].kind, DeclarationKind::Function);
        assert_eq!(schema.declarations[0].result_category, "TDFunction");
    }

    #[test]
    fn types_marker_switches_back() {
        let schema = parse_text("---functions---\nf = Ok;\n---types---\nok = Ok;\n");
        assert!(schema.declarations[0].is_function());
        assert!(!schema.declarations[1].is_function());
    }

    #[test]
    fn empty_token_stream_yields_empty_schema() {
        let schema = parse(&[]);
        assert!(schema.declarations.is_empty());
        assert!(schema.categories.is_empty());
    }

    #[test]
    fn class_prefixed_tags_stay_documentation() {
        let schema = parse_text(
            "//@classification Internal
//@description Still documented
ok = Ok;
",
        );
        assert!(schema.categories.is_empty());
        assert_eq!(schema.declarations[0].description, "Still documented");
        assert!(is_class_comment("@class ChatType @description Kinds"));
        assert!(!is_class_comment("@classification Internal"));
    }

    #[test]
    fn doc_tags_ignore_inline_at_signs() {
        let tags = parse_doc_tags("@description Mention user@example @name Name");
        assert_eq!(
            tags,
            vec![
                ("description".to_string(), "Mention user@example".to_string()),
                ("name".to_string(), "Name".to_string()),
            ]
        );
    }
}
