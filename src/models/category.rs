//! SET (category) resolution from championship names.

use std::collections::BTreeMap;

pub const DEFAULT_CATEGORY: &str = "default";

/// Keyword → SET, matched in this order against the upper-cased championship.
const CHAMPIONSHIP_KEYWORDS: &[(&str, &str)] = &[
    ("WEC", "SET 1"),
    ("FIA", "SET 1"),
    ("CIRCUITCAT", "SET 2"),
    ("KATEYAMA", "SET 2"),
    ("FERRARI", "SET 3"),
    ("MCLAREN", "SET 3"),
    ("ELMS", "SET 5"),
    ("F4", "SET RW"),
    ("E3", "SET RW"),
    ("GSERIES", "SET RW"),
    ("E1", "SET6"),
    ("SCER", "SCER"),
    ("CERVH", "CERVH"),
];

const CATEGORY_COLORS: &[(&str, &str)] = &[
    ("SET 1", "#FF6B6B"),
    ("SET 2", "#4ECDC4"),
    ("SET 3", "#45B7D1"),
    ("MICROSET", "#96CEB4"),
    ("SET RW", "#FFEAA7"),
    ("EVENTS 3", "#DDA0DD"),
    ("EVENTS 4", "#98D8C8"),
    ("EVENTS 5", "#F7DC6F"),
    ("EVENTS 6", "#BB8FCE"),
    ("SCER", "#F8C471"),
    ("CERVH", "#85C1E9"),
    ("SET6", "#F1C40F"),
    ("SET 5", "#27AE60"),
    (DEFAULT_CATEGORY, "#BDC3C7"),
];

/// First keyword contained (case-insensitively) in `championship` wins.
pub fn resolve_category(championship: &str) -> &'static str {
    let upper = championship.trim().to_uppercase();
    if upper.is_empty() {
        return DEFAULT_CATEGORY;
    }

    CHAMPIONSHIP_KEYWORDS
        .iter()
        .find(|(keyword, _)| upper.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

pub fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or("#BDC3C7")
}

pub fn color_map() -> BTreeMap<&'static str, &'static str> {
    CATEGORY_COLORS.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(resolve_category("fia wec 6 hours of spa"), "SET 1");
        assert_eq!(resolve_category("Ferrari Challenge Europe"), "SET 3");
        assert_eq!(resolve_category("Elms - Barcelona"), "SET 5");
    }

    #[test]
    fn first_keyword_in_table_order_wins() {
        // Contains both FIA (SET 1) and F4 (SET RW); FIA is listed first.
        assert_eq!(resolve_category("FIA F4 Spanish Championship"), "SET 1");
    }

    #[test]
    fn unmatched_or_empty_falls_back_to_default() {
        assert_eq!(resolve_category("Club Trackday"), DEFAULT_CATEGORY);
        assert_eq!(resolve_category(""), DEFAULT_CATEGORY);
        assert_eq!(resolve_category("   "), DEFAULT_CATEGORY);
    }

    #[test]
    fn colors_cover_every_category() {
        for (_, category) in CHAMPIONSHIP_KEYWORDS {
            assert_ne!(category_color(category), "", "{category}");
            assert!(color_map().contains_key(category));
        }
        assert_eq!(category_color("unknown"), category_color(DEFAULT_CATEGORY));
    }
}
