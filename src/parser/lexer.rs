//! Tokenizer for TL schema text.

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Text of a `//@` documentation line, without the leading `//`.
    /// `//-` continuation lines are folded into the preceding doc token.
    DocComment(String),
    /// `---functions---`
    FunctionsMarker,
    /// `---types---`
    TypesMarker,
    Ident(String),
    Colon,
    Equals,
    Semicolon,
    LAngle,
    RAngle,
    /// Any other character (`?`, `{`, `#`, ...). Only seen in declarations
    /// the parser does not accept.
    Other(char),
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based source line.
    pub line: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Splits TL source into tokens. Never fails: unknown characters become
/// [`TokenKind::Other`].
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();

    for (idx, raw_line) in input.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();

        if let Some(comment) = trimmed.strip_prefix("//") {
            push_comment(&mut tokens, comment, line);
            continue;
        }
        match trimmed {
            "---functions---" => {
                tokens.push(Token {
                    kind: TokenKind::FunctionsMarker,
                    line,
                });
                continue;
            }
            "---types---" => {
                tokens.push(Token {
                    kind: TokenKind::TypesMarker,
                    line,
                });
                continue;
            }
            _ => {}
        }

        let mut chars = raw_line.char_indices().peekable();
        while let Some((start, ch)) = chars.peek().copied() {
            if ch.is_whitespace() {
                chars.next();
                continue;
            }

            if ch == '/' && raw_line[start..].starts_with("//") {
                // Trailing comments after a declaration are never documentation.
                break;
            }

            if is_ident_char(ch) {
                let mut end = start;
                while let Some((i, c)) = chars.peek().copied() {
                    if !is_ident_char(c) {
                        break;
                    }
                    end = i + c.len_utf8();
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Ident(raw_line[start..end].to_string()),
                    line,
                });
                continue;
            }

            chars.next();
            let kind = match ch {
                ':' => TokenKind::Colon,
                '=' => TokenKind::Equals,
                ';' => TokenKind::Semicolon,
                '<' => TokenKind::LAngle,
                '>' => TokenKind::RAngle,
                other => TokenKind::Other(other),
            };
            tokens.push(Token { kind, line });
        }
    }

    let last_line = tokens.last().map_or(1, |t| t.line);
    tokens.push(Token {
        kind: TokenKind::Eof,
        line: last_line,
    });
    tokens
}

fn push_comment(tokens: &mut Vec<Token>, comment: &str, line: usize) {
    if let Some(doc) = comment.strip_prefix('@') {
        tokens.push(Token {
            kind: TokenKind::DocComment(format!("@{}", doc.trim_end())),
            line,
        });
    } else if let Some(continuation) = comment.strip_prefix('-') {
        if let Some(Token {
            kind: TokenKind::DocComment(text),
            ..
        }) = tokens.last_mut()
        {
            text.push(' ');
            text.push_str(continuation.trim());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_declaration() {
        assert_eq!(
            kinds("user id:int53 names:vector<string> = User;"),
            vec![
                TokenKind::Ident("user".into()),
                TokenKind::Ident("id".into()),
                TokenKind::Colon,
                TokenKind::Ident("int53".into()),
                TokenKind::Ident("names".into()),
                TokenKind::Colon,
                TokenKind::Ident("vector".into()),
                TokenKind::LAngle,
                TokenKind::Ident("string".into()),
                TokenKind::RAngle,
                TokenKind::Equals,
                TokenKind::Ident("User".into()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn folds_continuation_lines_into_doc_comment() {
        let input = "//@description First half\n//-second half\n// plain comment\nok = Ok;";
        let tokens = kinds(input);
        assert_eq!(
            tokens[0],
            TokenKind::DocComment("@description First half second half".into())
        );
        assert_eq!(tokens[1], TokenKind::Ident("ok".into()));
    }

    #[test]
    fn recognizes_section_markers() {
        let tokens = kinds("---functions---\n---types---\n");
        assert_eq!(
            tokens,
            vec![
                TokenKind::FunctionsMarker,
                TokenKind::TypesMarker,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn keeps_unknown_characters() {
        let tokens = kinds("double ? = Double;");
        assert_eq!(tokens[1], TokenKind::Other('?'));
    }

    #[test]
    fn records_line_numbers() {
        let tokens = tokenize("\nok = Ok;\n");
        assert_eq!(tokens[0].line, 2);
    }
}
