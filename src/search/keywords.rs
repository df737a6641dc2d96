// src/search/keywords.rs

//! Query tokenization
//!
//! A raw query is split on whitespace after folding the ideographic space.
//! Tokens prefixed with `-` become exclusion terms; everything else is an
//! inclusion term. An empty token list means "no query" and callers return
//! an empty result set, not an error.

/// A raw query decomposed into inclusion and exclusion terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub inclusions: Vec<String>,
    pub exclusions: Vec<String>,
}

impl ParsedQuery {
    /// Tokenize a raw query string
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.replace('\u{3000}', " ");

        let mut inclusions = Vec::new();
        let mut exclusions = Vec::new();

        for token in normalized.split_whitespace() {
            match token.strip_prefix('-') {
                // A bare "-" is neither an inclusion nor an exclusion
                Some(rest) if !rest.is_empty() => exclusions.push(rest.to_string()),
                Some(_) => {}
                None => inclusions.push(token.to_string()),
            }
        }

        Self {
            inclusions,
            exclusions,
        }
    }

    /// True when the query carries no terms at all
    pub fn is_empty(&self) -> bool {
        self.inclusions.is_empty() && self.exclusions.is_empty()
    }
}

/// Fold full-width ASCII forms to their half-width equivalents.
///
/// Source attribute tags and queries arrive in mixed widths; comparisons
/// happen on the folded form.
pub(crate) fn fold_width(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{3000}' => ' ',
            '\u{FF01}'..='\u{FF5E}' => {
                // Full-width ! through ~ map linearly onto ASCII
                char::from_u32(c as u32 - 0xFF01 + 0x21).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_inclusions_and_exclusions() {
        let parsed = ParsedQuery::parse("onion beef -garlic");
        assert_eq!(parsed.inclusions, vec!["onion", "beef"]);
        assert_eq!(parsed.exclusions, vec!["garlic"]);
    }

    #[test]
    fn test_parse_empty_query() {
        assert!(ParsedQuery::parse("").is_empty());
        assert!(ParsedQuery::parse("   ").is_empty());
    }

    #[test]
    fn test_ideographic_space_splits_tokens() {
        let parsed = ParsedQuery::parse("onion\u{3000}beef");
        assert_eq!(parsed.inclusions, vec!["onion", "beef"]);
    }

    #[test]
    fn test_bare_dash_is_dropped() {
        let parsed = ParsedQuery::parse("- onion");
        assert_eq!(parsed.inclusions, vec!["onion"]);
        assert!(parsed.exclusions.is_empty());
    }

    #[test]
    fn test_fold_width() {
        assert_eq!(fold_width("\u{FF43}\u{FF4F}\u{FF4F}\u{FF4B}"), "cook");
        assert_eq!(fold_width("cookpad"), "cookpad");
        assert_eq!(fold_width("a\u{3000}b"), "a b");
    }
}
