//! Category membership: which declarations and categories each union holds.

use std::collections::HashMap;

use serde::Serialize;

use crate::ast::{Diagnostic, DiagnosticKind, ParsedSchema, RootCategory};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Ordered mapping from category name to its member names.
///
/// Categories appear in the order their first member was parsed and members
/// keep parse order. Categories without members are absent.
pub struct CategoryMembership {
    entries: Vec<(String, Vec<String>)>,
}

impl CategoryMembership {
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, members)| members.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Groups constructors by result category and nested categories by parent.
///
/// Functions are not members of their response category; they only form the
/// function-argument union.
pub fn resolve_memberships(schema: &ParsedSchema) -> CategoryMembership {
    let constructors = schema
        .constructors()
        .map(|d| (d.result_category.as_str(), d.name.as_str()));
    let nested = schema
        .categories
        .iter()
        .filter_map(|c| c.parent.as_deref().map(|parent| (parent, c.name.as_str())));

    let (entries, _) = constructors.chain(nested).fold(
        (Vec::<(String, Vec<String>)>::new(), HashMap::<String, usize>::new()),
        |(mut entries, mut index), (category, member)| {
            match index.get(category) {
                Some(&slot) => entries[slot].1.push(member.to_string()),
                None => {
                    index.insert(category.to_string(), entries.len());
                    entries.push((category.to_string(), vec![member.to_string()]));
                }
            }
            (entries, index)
        },
    );

    tracing::debug!(categories = entries.len(), "resolved category memberships");
    CategoryMembership { entries }
}

/// Reports declared categories that no declaration or category belongs to.
pub fn empty_categories(schema: &ParsedSchema, membership: &CategoryMembership) -> Vec<Diagnostic> {
    schema
        .categories
        .iter()
        .filter(|c| !RootCategory::is_root(&c.name) && membership.get(&c.name).is_none())
        .map(|c| {
            Diagnostic::new(
                DiagnosticKind::EmptyUnion,
                c.name.as_str(),
                "category has no members; no union is emitted",
            )
        })
        .collect()
}
