//! Structural extraction from the generated C++ API header.

use std::sync::OnceLock;

use regex::Regex;

use crate::ast::{
    canonical_category, Category, Declaration, DeclarationKind, Diagnostic, DiagnosticKind,
    Parameter, RootCategory,
};
use crate::type_map::map_type;

use super::{strip_escape_marker, RawSchema};

fn class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"class ([a-z]\S+?) final : public (\S+?) \{([\s\S]+?)\};").expect("valid regex")
    })
}

fn member_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\S+?) (\S+?_);").expect("valid regex"))
}

fn return_type_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)using ReturnType = (.+?);$").expect("valid regex"))
}

fn base_class_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"class ([A-Z]\S+?): public (\S+?) \{\s+?public:\s*?\};").expect("valid regex")
    })
}

/// Extracts concrete classes and abstract base classes from header text.
pub fn parse(source: &str) -> RawSchema {
    let mut out = RawSchema::default();

    for cap in class_regex().captures_iter(source) {
        let name = cap[1].to_string();
        let parent = canonical_category(&cap[2]);
        let body = &cap[3];

        let kind = if RootCategory::from_source(&parent) == Some(RootCategory::Function) {
            DeclarationKind::Function
        } else {
            DeclarationKind::Constructor
        };

        let parameters = member_regex()
            .captures_iter(body)
            .map(|member| Parameter {
                name: strip_escape_marker(&member[2]).to_string(),
                ty: map_type(&member[1]),
                description: String::new(),
            })
            .collect();

        let response_type = return_type_regex()
            .captures(body)
            .map(|ret| map_type(&ret[1]));
        if kind == DeclarationKind::Function && response_type.is_none() {
            out.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnresolvedResponseType,
                name.as_str(),
                format!("function has no ReturnType annotation; falling back to '{parent}'"),
            ));
        }

        out.declarations.push(Declaration {
            name,
            kind,
            parameters,
            result_category: parent,
            response_type,
            description: String::new(),
        });
    }

    for cap in base_class_regex().captures_iter(source) {
        let name = canonical_category(&cap[1]);
        if RootCategory::is_root(&name) {
            continue;
        }
        out.categories.push(Category {
            name,
            description: String::new(),
            parent: Some(canonical_category(&cap[2])),
        });
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::MappedType;

    const HEADER: &str = r#"
class Object: public TlObject {
 public:
};

class Function: public TlObject {
 public:
};

class error final : public Object {
 public:
  std::int32_t code_;
  std::string message_;

  error();

  static const std::int32_t ID = -1679978726;
  std::int32_t get_id() const final {
    return ID;
  }
};

class ChatType: public Object {
 public:
};

class chatTypePrivate final : public ChatType {
 public:
  std::int64_t user_id_;
  std::vector<object_ptr<chatMember>> members_;
};

class getChat final : public Function {
 public:
  std::int64_t chat_id_;

  using ReturnType = object_ptr<chat>;
};

class close final : public Function {
 public:
};
"#;

    #[test]
    fn extracts_classes_in_order() {
        let schema = parse(HEADER);
        let names: Vec<&str> = schema
            .declarations
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["error", "chatTypePrivate", "getChat", "close"]);
        assert_eq!(schema.declarations[0].result_category, "TDObject");
        assert_eq!(schema.declarations[1].result_category, "ChatType");
    }

    #[test]
    fn extracts_members_without_escape_marker() {
        let schema = parse(HEADER);
        let private = &schema.declarations[1];
        assert_eq!(private.parameters[0].name, "user_id");
        assert_eq!(private.parameters[0].ty, MappedType::new("(number | string)", 0));
        assert_eq!(private.parameters[1].name, "members");
        assert_eq!(private.parameters[1].ty, MappedType::new("chatMember", 1));
    }

    #[test]
    fn functions_carry_return_type_annotation() {
        let schema = parse(HEADER);
        let get_chat = &schema.declarations[2];
        assert_eq!(get_chat.kind, DeclarationKind::Function);
        assert_eq!(get_chat.result_category, "TDFunction");
        assert_eq!(get_chat.response_type, Some(MappedType::new("chat", 0)));
    }

    #[test]
    fn missing_return_type_is_reported() {
        let schema = parse(HEADER);
        assert_eq!(schema.diagnostics.len(), 1);
        assert_eq!(schema.diagnostics[0].kind, DiagnosticKind::UnresolvedResponseType);
        assert_eq!(schema.diagnostics[0].subject, "close");
    }

    #[test]
    fn root_base_classes_are_implicit() {
        let schema = parse(HEADER);
        assert_eq!(
            schema.categories,
            vec![Category {
                name: "ChatType".into(),
                description: String::new(),
                parent: Some("TDObject".into()),
            }]
        );
    }
}
