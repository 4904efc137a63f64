//! Intent derivation from a free-text briefing request.
//!
//! Derivation never fails: text that matches no rule falls back to the
//! configured default location and the `General` category.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Focus category of a briefing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Technology,
    Business,
    Sports,
    Health,
    General,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::Technology => "Technology",
            Category::Business => "Business",
            Category::Sports => "Sports",
            Category::Health => "Health",
            Category::General => "General",
        };
        f.write_str(s)
    }
}

/// Ordered keyword rules; the first rule with any matching keyword wins.
const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (&["tech"], Category::Technology),
    (&["business", "finance"], Category::Business),
    (&["sport"], Category::Sports),
    (&["health"], Category::Health),
];

/// What the orchestrator understood from a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub location: String,
    pub category: Category,
}

fn location_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)(?:in|for)\s+([a-zA-Z\s]+?)(?:\s+with|\s+news|$)").ok())
        .as_ref()
}

/// Location named after "in"/"for", up to "with", "news", or end of text.
pub fn derive_location(prompt: &str, default_location: &str) -> String {
    location_pattern()
        .and_then(|re| re.captures(prompt))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|loc| !loc.is_empty())
        .unwrap_or(default_location)
        .to_string()
}

/// Category from the first keyword rule matching the lower-cased prompt.
pub fn derive_category(prompt: &str) -> Category {
    let lower = prompt.to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(Category::General)
}

pub fn derive_intent(prompt: &str, default_location: &str) -> Intent {
    Intent {
        location: derive_location(prompt, default_location),
        category: derive_category(prompt),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_after_for_stops_at_with() {
        assert_eq!(
            derive_location("Morning briefing for Mumbai with tech news", "Mumbai"),
            "Mumbai"
        );
        assert_eq!(
            derive_location("Morning briefing for Pune with sports", "Mumbai"),
            "Pune"
        );
    }

    #[test]
    fn location_after_in_runs_to_end() {
        assert_eq!(
            derive_location("What is happening in New Delhi", "Mumbai"),
            "New Delhi"
        );
    }

    #[test]
    fn location_stops_at_news() {
        assert_eq!(
            derive_location("briefing for Kolkata news today", "Mumbai"),
            "Kolkata"
        );
    }

    #[test]
    fn location_is_case_insensitive_on_keyword() {
        assert_eq!(derive_location("Weather IN Chennai", "Mumbai"), "Chennai");
    }

    #[test]
    fn location_defaults_when_unmatched() {
        assert_eq!(derive_location("daily briefing please", "Mumbai"), "Mumbai");
        assert_eq!(derive_location("", "Mumbai"), "Mumbai");
    }

    #[test]
    fn location_rejects_digits_in_capture() {
        // The capture only admits letters and whitespace.
        assert_eq!(derive_location("briefing for 42", "Mumbai"), "Mumbai");
    }

    #[test]
    fn category_first_rule_wins() {
        assert_eq!(derive_category("tech and business"), Category::Technology);
        assert_eq!(derive_category("Finance and sport"), Category::Business);
        assert_eq!(derive_category("sports and health"), Category::Sports);
        assert_eq!(derive_category("HEALTH update"), Category::Health);
    }

    #[test]
    fn category_defaults_to_general() {
        assert_eq!(derive_category("weather only"), Category::General);
    }

    #[test]
    fn category_matches_substrings() {
        assert_eq!(derive_category("Biotechnology roundup"), Category::Technology);
    }

    #[test]
    fn derive_intent_combines_both() {
        let intent = derive_intent("Briefing for Hyderabad with finance news", "Mumbai");
        assert_eq!(intent.location, "Hyderabad");
        assert_eq!(intent.category, Category::Business);
    }
}
