//! Affiliate link substitution.
//!
//! Applied to the markdown body before rendering, independent of the HTML
//! pipeline. Each rule rewrites at most the first N occurrences so articles
//! do not read like link farms.

use regex::{NoExpand, Regex};

use pressmill_shared::{AffiliateRule, PressmillError, Result};

/// Maximum substitutions per rule per article.
pub const MAX_LINK_OCCURRENCES: usize = 2;

/// Rewrite matches of each rule's pattern into a markdown link, capped at
/// `max_occurrences` per rule. Rules apply in order; a bad pattern is a
/// render error.
pub fn apply_link_rules(
    text: &str,
    rules: &[AffiliateRule],
    max_occurrences: usize,
) -> Result<String> {
    let mut out = text.to_string();
    for rule in rules {
        let re = Regex::new(&rule.pattern).map_err(|e| {
            PressmillError::Render(format!("invalid affiliate pattern {:?}: {e}", rule.pattern))
        })?;
        let link = format!("[{}]({})", rule.name, rule.url);
        out = re
            .replacen(&out, max_occurrences, NoExpand(&link))
            .into_owned();
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, pattern: &str, url: &str) -> AffiliateRule {
        AffiliateRule {
            name: name.into(),
            pattern: pattern.into(),
            url: url.into(),
        }
    }

    #[test]
    fn replaces_first_two_occurrences_only() {
        let rules = [rule("Writesonic", r"\bWritesonic\b", "https://ws.example/?via=x")];
        let text = "Writesonic is fast. Writesonic is cheap. Writesonic is fine.";

        let out = apply_link_rules(text, &rules, MAX_LINK_OCCURRENCES).unwrap();
        let linked = out.matches("[Writesonic](https://ws.example/?via=x)").count();
        assert_eq!(linked, 2);
        assert!(out.ends_with("Writesonic is fine."));
    }

    #[test]
    fn multiple_rules_apply_independently() {
        let rules = [
            rule("Jasper AI", r"\bJasper AI\b", "https://jasper.example"),
            rule("Canva", r"\bCanva\b", "https://canva.example"),
        ];
        let out = apply_link_rules("Jasper AI beats Canva here.", &rules, 2).unwrap();
        assert!(out.contains("[Jasper AI](https://jasper.example)"));
        assert!(out.contains("[Canva](https://canva.example)"));
    }

    #[test]
    fn no_match_leaves_text_untouched() {
        let rules = [rule("Writesonic", r"\bWritesonic\b", "https://ws.example")];
        let text = "Nothing to see here.";
        assert_eq!(apply_link_rules(text, &rules, 2).unwrap(), text);
    }

    #[test]
    fn word_boundary_respected() {
        let rules = [rule("Canva", r"\bCanva\b", "https://canva.example")];
        let out = apply_link_rules("Canvassing is not Canva.", &rules, 2).unwrap();
        assert!(out.starts_with("Canvassing"));
        assert!(out.contains("[Canva](https://canva.example)."));
    }

    #[test]
    fn invalid_pattern_is_render_error() {
        let rules = [rule("Bad", r"\b(unclosed", "https://x.example")];
        let err = apply_link_rules("text", &rules, 2).unwrap_err();
        assert!(err.to_string().contains("invalid affiliate pattern"));
    }
}
