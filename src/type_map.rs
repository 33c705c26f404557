//! Schema type tokens to target-language types.
//!
//! Both the TL vocabulary (`int53`, `vector<T>`) and the C++ header
//! vocabulary (`std::int64_t`, `std::vector<T>`, `object_ptr<T>`) are
//! understood. Unknown tokens are forward references and pass through.

use crate::ast::MappedType;

pub const NUMBER: &str = "number";
pub const STRING: &str = "string";
pub const BOOLEAN: &str = "boolean";
/// 64-bit integers do not fit losslessly in the target number type.
pub const WIDE_INTEGER: &str = "(number | string)";

const TARGET_PRIMITIVES: &[&str] = &[STRING, NUMBER, BOOLEAN, WIDE_INTEGER];

const REPEATED_WRAPPERS: &[&str] = &["vector<", "std::vector<"];
const POINTER_WRAPPERS: &[&str] = &["object_ptr<"];

/// Maps a schema type token to its target type and repetition depth.
pub fn map_type(token: &str) -> MappedType {
    let mut current = token.trim();
    let mut repetition = 0;
    while let Some(inner) = unwrap(current, REPEATED_WRAPPERS) {
        current = inner;
        repetition += 1;
    }

    let name = match primitive_target(current) {
        Some(target) => target.to_string(),
        None => unwrap(current, POINTER_WRAPPERS).unwrap_or(current).to_string(),
    };
    MappedType { name, repetition }
}

/// Whether `token` is one of the schema primitives the mapper resolves.
pub fn is_schema_primitive(token: &str) -> bool {
    primitive_target(token).is_some()
}

/// Whether `name` is a target primitive (no `Optional` counterpart exists).
pub fn is_target_primitive(name: &str) -> bool {
    TARGET_PRIMITIVES.contains(&name)
}

fn primitive_target(token: &str) -> Option<&'static str> {
    match token {
        "double" | "int32" | "int53" | "std::int32_t" => Some(NUMBER),
        "string" | "bytes" | "std::string" => Some(STRING),
        "int64" | "std::int64_t" => Some(WIDE_INTEGER),
        "Bool" | "bool" => Some(BOOLEAN),
        _ => None,
    }
}

fn unwrap<'a>(token: &'a str, wrappers: &[&str]) -> Option<&'a str> {
    wrappers.iter().find_map(|prefix| {
        token
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix('>'))
            .map(str::trim)
    })
}
