//! Parsing of directive values and interpolated text.

use crate::ast::TextToken;

/// The pieces of a `v-for` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForExpression {
    pub source: String,
    pub alias: String,
    pub iterator1: Option<String>,
    pub iterator2: Option<String>,
}

/// Parses `item in items`, `(item, index) of items` or
/// `(value, key, index) in object`.
///
/// Returns `None` when there is no `in`/`of` separator or either side is
/// empty.
pub fn parse_for(expression: &str) -> Option<ForExpression> {
    let (aliases, source) = split_for(expression)?;
    let source = source.trim();
    let aliases = aliases.trim();
    let aliases = aliases.strip_prefix('(').unwrap_or(aliases);
    let aliases = aliases.strip_suffix(')').unwrap_or(aliases);

    let (alias, iterator1, iterator2) = split_iterators(aliases);
    let alias = alias.trim();
    if alias.is_empty() || source.is_empty() {
        return None;
    }

    Some(ForExpression {
        source: source.to_string(),
        alias: alias.to_string(),
        iterator1: iterator1.map(|s| s.trim().to_string()),
        iterator2: iterator2.map(|s| s.trim().to_string()),
    })
}

/// Splits at the first ` in ` or ` of ` surrounded by whitespace.
fn split_for(expression: &str) -> Option<(&str, &str)> {
    expression
        .char_indices()
        .filter(|(_, c)| *c == 'i' || *c == 'o')
        .find_map(|(i, _)| {
            let keyword = expression.get(i..i + 2)?;
            if keyword != "in" && keyword != "of" {
                return None;
            }
            let before = &expression[..i];
            let after = &expression[i + 2..];
            let separated = before.ends_with(char::is_whitespace)
                && after.starts_with(char::is_whitespace);
            separated.then_some((before, after))
        })
}

/// Peels up to two trailing `, name` segments off an alias list. Segments
/// containing `}` or `]` belong to a destructuring pattern and are left
/// alone.
fn split_iterators(aliases: &str) -> (&str, Option<&str>, Option<&str>) {
    let plain = |segment: &str| !segment.contains(['}', ']']);

    let Some(last) = aliases.rfind(',') else {
        return (aliases, None, None);
    };
    let tail = &aliases[last + 1..];
    if !plain(tail) {
        return (aliases, None, None);
    }

    let head = &aliases[..last];
    if let Some(prev) = head.rfind(',') {
        let middle = &head[prev + 1..];
        if plain(middle) {
            return (&head[..prev], Some(middle), Some(tail));
        }
    }
    (head, Some(tail), None)
}

/// Splits text on `{{ }}` interpolations.
///
/// Returns `None` when the text contains no complete interpolation. An
/// unterminated `{{` is kept as literal text.
pub fn parse_text(text: &str) -> Option<Vec<TextToken>> {
    let mut tokens = Vec::new();
    let mut rest = text;
    let mut has_binding = false;

    while let Some(open) = rest.find("{{") {
        let Some(close) = rest[open + 2..].find("}}") else {
            break;
        };
        if open > 0 {
            tokens.push(TextToken::Literal(rest[..open].to_string()));
        }
        let expression = &rest[open + 2..open + 2 + close];
        tokens.push(TextToken::Binding(expression.trim().to_string()));
        has_binding = true;
        rest = &rest[open + 2 + close + 2..];
    }

    if !rest.is_empty() {
        tokens.push(TextToken::Literal(rest.to_string()));
    }
    has_binding.then_some(tokens)
}
