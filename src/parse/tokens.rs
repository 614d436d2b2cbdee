//! Tag tokens
//!
//! Regex extraction of the tokens carried by `@api` and parameter tags:
//! `{type}` (or `{method}`), `(group)`, the name, and the path.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// `{...}`: parameter type, or the method of an `@api` tag
static TYPE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^}]*)\}").unwrap());

/// `(...)`: parameter group
static GROUP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^)]*)\)").unwrap());

/// Whitespace-preceded name, optionally wrapped in `[...]`
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(\[[^\]\n]*\]|[^\s\[\]{}()]+)").unwrap());

/// Whitespace-preceded path starting with `/`
static PATH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s(/[\w\-.~:{}/%]*)").unwrap());

/// Tokens of an `@api {method} /path Title` line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiTokens {
    /// Lower-cased method
    pub method: Option<String>,
    pub path: Option<String>,
    pub title: Option<String>,
}

/// Split an `@api` line into method, path and title.
///
/// The method only counts when it precedes the path, so `{name}`
/// placeholders inside the path are never taken for it.
pub fn api_tokens(line: &str) -> ApiTokens {
    let path = PATH_PATTERN.captures(line).and_then(|c| c.get(1));
    let method = TYPE_PATTERN
        .captures_iter(line)
        .filter_map(|c| c.get(1))
        .find(|m| path.map_or(true, |p| m.end() < p.start()));

    let title_start = method
        .map(|m| m.end() + 1)
        .into_iter()
        .chain(path.map(|p| p.end()))
        .max()
        .unwrap_or(line.len())
        .min(line.len());

    ApiTokens {
        method: method.map(|m| m.as_str().trim().to_lowercase()),
        path: path.map(|p| p.as_str().to_string()),
        title: non_empty(&line[title_start..]),
    }
}

/// Tokens of a parameter tag line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTokens {
    pub type_name: Option<String>,
    pub group: Option<String>,
    pub name: Option<String>,
    /// Name was written as `[name]`
    pub optional: bool,
    /// Right-hand side of `name=default`
    pub default: Option<String>,
    pub description: Option<String>,
}

fn overlaps(position: usize, span: &Option<Range<usize>>) -> bool {
    span.as_ref().is_some_and(|s| s.contains(&position))
}

/// Split a parameter line into its tokens.
///
/// Type and group only count when they precede the name; the description
/// is whatever follows the right-most counted token.
pub fn param_tokens(line: &str) -> ParamTokens {
    let type_match = TYPE_PATTERN.captures(line).map(|c| (c.get(0), c.get(1)));
    let group_match = GROUP_PATTERN.captures(line).map(|c| (c.get(0), c.get(1)));

    let type_span = type_match.and_then(|(whole, _)| whole.map(|m| m.range()));
    let group_span = group_match.and_then(|(whole, _)| whole.map(|m| m.range()));

    let name_match = NAME_PATTERN
        .captures_iter(line)
        .filter_map(|c| c.get(1))
        .find(|m| !overlaps(m.start(), &type_span) && !overlaps(m.start(), &group_span));

    let precedes_name = |span: &Option<Range<usize>>| match (span, name_match) {
        (Some(s), Some(n)) => s.start < n.start(),
        (Some(_), None) => true,
        (None, _) => false,
    };

    let mut tokens = ParamTokens::default();
    let mut description_start = 0;

    if precedes_name(&type_span) {
        if let Some((Some(whole), Some(inner))) = type_match {
            tokens.type_name = non_empty(inner.as_str());
            description_start = description_start.max(whole.end());
        }
    }
    if precedes_name(&group_span) {
        if let Some((Some(whole), Some(inner))) = group_match {
            tokens.group = non_empty(inner.as_str());
            description_start = description_start.max(whole.end());
        }
    }

    if let Some(name) = name_match {
        description_start = description_start.max(name.end());

        let mut raw = name.as_str();
        if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            tokens.optional = true;
            raw = inner;
        }
        let (name, default) = match raw.split_once('=') {
            Some((name, default)) => (name, Some(default.trim().trim_matches('"'))),
            None => (raw, None),
        };
        tokens.name = non_empty(name);
        tokens.default = default.and_then(non_empty);
    }

    if tokens.name.is_some() {
        tokens.description = non_empty(&line[description_start..]);
    }
    tokens
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
