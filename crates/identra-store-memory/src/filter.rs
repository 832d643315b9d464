//! Filter evaluation for the in-memory store.
//!
//! The engine only ever emits filters of the shape `(attr=pattern)` or a
//! bare `pattern` (which targets the name attribute), with `*` wildcards in
//! the pattern.

use identra_store::StoreError;

/// A parsed `(attr=pattern)` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFilter {
    pub attr: String,
    pub pattern: String,
}

impl ParsedFilter {
    /// Parses a filter string. A bare pattern targets the `name` attribute.
    pub fn parse(filter: &str) -> Result<Self, StoreError> {
        if let Some(inner) = filter.strip_prefix('(') {
            let inner = inner.strip_suffix(')').ok_or_else(|| {
                StoreError::invalid_filter(filter, "unbalanced parenthesis")
            })?;
            let (attr, pattern) = inner
                .split_once('=')
                .ok_or_else(|| StoreError::invalid_filter(filter, "missing '='"))?;
            if attr.is_empty() {
                return Err(StoreError::invalid_filter(filter, "empty attribute"));
            }
            Ok(Self {
                attr: attr.to_string(),
                pattern: pattern.to_string(),
            })
        } else {
            Ok(Self {
                attr: "name".to_string(),
                pattern: filter.to_string(),
            })
        }
    }
}

/// Matches `value` against a pattern containing `*` wildcards.
pub fn glob_match(pattern: &str, value: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == value;
    }

    let mut rest = value;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }

    // Pattern ends with '*' (or matched everything already).
    true
}
