//! Plain-text rendering of screen state.

use std::fmt::Write as _;

use client_core::{strength::suggestions_visible, Route};
use shared::domain::{SearchResultItem, StrengthResult};

pub fn strength_panel(result: &StrengthResult) -> String {
    let Some(bucket) = result.bucket else {
        return String::new();
    };

    let mut out = format!("Password Strength: {}\n", bucket.label());
    if suggestions_visible(result) {
        out.push_str("Make your password stronger:\n");
        for criterion in &result.criteria {
            let mark = if criterion.satisfied { '✓' } else { '✗' };
            let _ = writeln!(out, "  {mark} {}", criterion.label);
        }
    }
    out
}

pub fn results(heading: &str, items: &[SearchResultItem]) -> String {
    let mut out = String::new();
    if !heading.is_empty() {
        let _ = writeln!(out, "{heading}");
    }
    for item in items {
        let _ = writeln!(out, "\n{}", item.term);
        let _ = writeln!(out, "  Definition: {}", item.definition);
        if let Some(category) = &item.category {
            let _ = writeln!(out, "  Category: {category}");
        }
        if let Some(examples) = &item.examples {
            let _ = writeln!(out, "  Examples: {examples}");
        }
    }
    out
}

pub fn next_step(route: Route) -> &'static str {
    match route {
        Route::Login => "termsearch login --username <name> --token <token>",
        Route::Register => "termsearch register",
        Route::Search => "termsearch search <term>",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::strength::score;

    #[test]
    fn empty_password_renders_nothing() {
        assert_eq!(strength_panel(&score("")), "");
    }

    #[test]
    fn strong_password_hides_checklist() {
        assert_eq!(strength_panel(&score("Aa1!aaaa")), "Password Strength: STRONG\n");
    }

    #[test]
    fn medium_password_lists_criteria() {
        let panel = strength_panel(&score("Aa1aaaaa"));
        assert!(panel.starts_with("Password Strength: MEDIUM\n"));
        assert!(panel.contains("✓ At least 8 characters"));
        assert!(panel.contains("✗ Contains special character (!@#$%^&*)"));
    }

    #[test]
    fn results_render_optional_fields_only_when_present() {
        let items = vec![
            SearchResultItem {
                term: "osmosis".into(),
                definition: "diffusion of water".into(),
                category: Some("biology".into()),
                examples: None,
            },
            SearchResultItem {
                term: "entropy".into(),
                definition: "measure of disorder".into(),
                category: None,
                examples: Some("melting ice".into()),
            },
        ];
        let out = results("Results for \"o\"", &items);
        assert!(out.starts_with("Results for \"o\"\n"));
        assert!(out.contains("  Category: biology\n"));
        assert!(out.contains("  Examples: melting ice\n"));
        assert_eq!(out.matches("Category").count(), 1);
        assert_eq!(out.matches("Examples").count(), 1);
        let osmosis = out.find("osmosis").expect("osmosis");
        let entropy = out.find("entropy").expect("entropy");
        assert!(osmosis < entropy);
    }
}
