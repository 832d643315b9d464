//! Name normalization helpers shared by the lookup plugins.
//!
//! Domains differ in case sensitivity and in whether a substitute character
//! stands in for spaces, so the same input name may need a different lookup
//! key per domain.

/// A raw input name split into its name part and an optional domain
/// qualifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub name: String,
    pub domain: Option<String>,
}

impl ParsedName {
    pub fn unqualified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: None,
        }
    }

    pub fn qualified(name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: Some(domain.into()),
        }
    }
}

/// Splits `name@domain` into its parts when the suffix names a known domain.
///
/// The check against `known_domains` keeps UPN-shaped names (whose suffix is
/// a realm, not a configured domain) intact. Matching is case-insensitive on
/// the domain part. Empty name or domain parts fall back to the unqualified
/// reading.
pub fn parse_qualified(input: &str, known_domains: &[&str]) -> ParsedName {
    if let Some((name, domain)) = input.rsplit_once('@') {
        if !name.is_empty()
            && !domain.is_empty()
            && known_domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
        {
            return ParsedName::qualified(name, domain.to_ascii_lowercase());
        }
    }
    ParsedName::unqualified(input)
}

/// Applies a domain's case rule: case-sensitive domains keep the name as
/// given, case-insensitive domains fold to lowercase.
pub fn cased_name(name: &str, case_sensitive: bool) -> String {
    if case_sensitive {
        name.to_string()
    } else {
        name.to_lowercase()
    }
}

/// Replaces spaces with the configured override character, the form names
/// are stored under.
pub fn replace_space(name: &str, substitute: Option<char>) -> String {
    match substitute {
        Some(sub) => name.replace(' ', &sub.to_string()),
        None => name.to_string(),
    }
}

/// Undoes [`replace_space`]: turns the override character back into spaces.
pub fn reverse_replace_space(name: &str, substitute: Option<char>) -> String {
    match substitute {
        Some(sub) => name.replace(sub, " "),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAINS: &[&str] = &["corp.example.com", "sub.corp.example.com"];

    #[test]
    fn test_parse_qualified_known_domain() {
        let parsed = parse_qualified("alice@corp.example.com", DOMAINS);
        assert_eq!(
            parsed,
            ParsedName::qualified("alice", "corp.example.com")
        );
    }

    #[test]
    fn test_parse_qualified_case_insensitive_domain() {
        let parsed = parse_qualified("alice@CORP.Example.Com", DOMAINS);
        assert_eq!(parsed.domain.as_deref(), Some("corp.example.com"));
    }

    #[test]
    fn test_parse_unknown_suffix_stays_whole() {
        // A UPN realm that is not a configured domain is part of the name.
        let parsed = parse_qualified("alice@idp.example.net", DOMAINS);
        assert_eq!(parsed, ParsedName::unqualified("alice@idp.example.net"));
    }

    #[test]
    fn test_parse_empty_parts() {
        assert_eq!(
            parse_qualified("@corp.example.com", DOMAINS),
            ParsedName::unqualified("@corp.example.com")
        );
        assert_eq!(parse_qualified("alice@", DOMAINS), ParsedName::unqualified("alice@"));
    }

    #[test]
    fn test_cased_name() {
        assert_eq!(cased_name("Alice", false), "alice");
        assert_eq!(cased_name("Alice", true), "Alice");
    }

    #[test]
    fn test_space_replacement_round_trip() {
        let stored = replace_space("john doe", Some('_'));
        assert_eq!(stored, "john_doe");
        assert_eq!(reverse_replace_space(&stored, Some('_')), "john doe");
    }

    #[test]
    fn test_space_replacement_disabled() {
        assert_eq!(replace_space("john doe", None), "john doe");
        assert_eq!(reverse_replace_space("john_doe", None), "john_doe");
    }
}
