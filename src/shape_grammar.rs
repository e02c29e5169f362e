use winnow::prelude::*;
use winnow::token::take_while;

use crate::graph_ast::ShapeCategory;
use crate::label::decode;

/// A single node statement recognised by [`classify`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStatement {
    pub id: String,
    /// `None` for a bare id; callers display the id instead.
    pub label: Option<String>,
    pub category: ShapeCategory,
}

/// Shape delimiters in precedence order. Double delimiters come before the
/// single ones they start with.
const SHAPES: [(&str, &str, ShapeCategory); 5] = [
    ("((", "))", ShapeCategory::Terminal),
    ("[[", "]]", ShapeCategory::Subprocess),
    ("{", "}", ShapeCategory::Decision),
    ("[", "]", ShapeCategory::Process),
    ("(", ")", ShapeCategory::Process),
];

pub fn classify(statement: &str) -> Option<NodeStatement> {
    let mut input = strip_class_suffix(statement.trim());
    let id = identifier(&mut input).ok()?.to_string();

    if input.is_empty() {
        return Some(NodeStatement {
            id,
            label: None,
            category: ShapeCategory::Process,
        });
    }

    let (label, category) = SHAPES.iter().find_map(|(open, close, category)| {
        let inner = input.strip_prefix(open)?.strip_suffix(close)?;
        Some((decode(inner), *category))
    })?;

    Some(NodeStatement {
        id,
        label: Some(label),
        category,
    })
}

/// The id a statement starts with, ignoring whatever shape follows it.
///
/// The id must end at whitespace, a shape opener, a `:::` suffix or the end
/// of the statement; `my-node` has no leading id.
pub fn leading_id(statement: &str) -> Option<&str> {
    let mut input = statement.trim();
    let id = identifier(&mut input).ok()?;
    let bounded = input.is_empty()
        || input.starts_with(char::is_whitespace)
        || input.starts_with(['(', '[', '{'])
        || input.starts_with(":::");
    bounded.then_some(id)
}

pub(crate) fn identifier<'s>(input: &mut &'s str) -> winnow::Result<&'s str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

/// Drop a trailing `:::className` annotation.
fn strip_class_suffix(statement: &str) -> &str {
    match statement.rfind(":::") {
        Some(pos)
            if pos > 0
                && statement[pos + 3..]
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '-') =>
        {
            statement[..pos].trim_end()
        }
        _ => statement,
    }
}
