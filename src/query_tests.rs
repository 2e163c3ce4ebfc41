//! Tests for search filtering and suggestions.

use crate::models::{Product, ProductDraft, ProductId};
use crate::query::{filter, suggestions, SUGGESTION_LIMIT};

fn product(id: i64, name: &str, category: &str, sub_category: &str) -> Product {
    Product::from_draft(
        ProductId::Number(id),
        ProductDraft {
            category: category.to_string(),
            sub_category: sub_category.to_string(),
            ..ProductDraft::named(name)
        },
    )
}

fn catalog() -> Vec<Product> {
    vec![
        product(1, "Widget", "Hardware", "Small parts"),
        product(2, "Wide Tape", "Office", "Adhesives"),
        product(3, "Milk", "Dairy", "Fresh"),
        product(4, "Widescreen Monitor", "Electronics", "Displays"),
        product(5, "Wide Angle Lens", "Electronics", "Optics"),
    ]
}

fn names(products: &[&Product]) -> Vec<String> {
    products.iter().map(|p| p.name.clone()).collect()
}

// ── filter ───────────────────────────────────────────────────────────

#[test]
fn filter_matches_name_case_insensitively() {
    let collection = vec![Product {
        quantity: 5,
        ..product(1, "Widget", "General", "Uncategorized")
    }];

    let found = filter("wid", &collection);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0], &collection[0]);

    assert!(filter("zzz", &collection).is_empty());
}

#[test]
fn filter_matches_category_and_sub_category() {
    let collection = catalog();
    assert_eq!(names(&filter("dairy", &collection)), vec!["Milk"]);
    assert_eq!(
        names(&filter("OPTICS", &collection)),
        vec!["Wide Angle Lens"]
    );
}

#[test]
fn filter_preserves_collection_order() {
    let collection = catalog();
    assert_eq!(
        names(&filter("wid", &collection)),
        vec!["Widget", "Wide Tape", "Widescreen Monitor", "Wide Angle Lens"]
    );
}

#[test]
fn filter_with_empty_term_returns_everything() {
    let collection = catalog();
    assert_eq!(filter("", &collection).len(), collection.len());
}

#[test]
fn filter_matches_whitespace_literally() {
    let collection = catalog();
    assert_eq!(
        names(&filter(" ", &collection)),
        vec!["Widget", "Wide Tape", "Widescreen Monitor", "Wide Angle Lens"]
    );
    assert!(filter("  ", &collection).is_empty());
}

#[test]
fn filter_results_are_subset_and_contain_term() {
    let collection = catalog();
    for term in ["w", "ID", "e", "fresh", "x", "lens", " ", "  "] {
        let lower = term.to_lowercase();
        let found = filter(term, &collection);
        for p in &found {
            assert!(collection.contains(*p));
            assert!(
                p.name.to_lowercase().contains(&lower)
                    || p.category.to_lowercase().contains(&lower)
                    || p.sub_category.to_lowercase().contains(&lower),
                "{} should not match {term}",
                p.name
            );
        }
    }
}

#[test]
fn filter_is_repeatable() {
    let collection = catalog();
    assert_eq!(filter("wide", &collection), filter("wide", &collection));
}

// ── suggestions ──────────────────────────────────────────────────────

#[test]
fn suggestions_are_capped_at_limit() {
    let collection = catalog();
    let found = suggestions("wid", &collection, SUGGESTION_LIMIT);
    assert_eq!(found, vec!["Widget", "Wide Tape", "Widescreen Monitor"]);
}

#[test]
fn suggestions_only_look_at_names() {
    let collection = catalog();
    assert!(suggestions("dairy", &collection, SUGGESTION_LIMIT).is_empty());
    assert_eq!(suggestions("MIL", &collection, SUGGESTION_LIMIT), vec!["Milk"]);
}

#[test]
fn suggestions_for_empty_term_are_empty() {
    let collection = catalog();
    assert!(suggestions("", &collection, SUGGESTION_LIMIT).is_empty());
}

#[test]
fn suggestions_match_whitespace_literally() {
    let collection = catalog();
    assert_eq!(
        suggestions(" ", &collection, SUGGESTION_LIMIT),
        vec!["Wide Tape", "Widescreen Monitor", "Wide Angle Lens"]
    );
}

#[test]
fn suggestions_never_exceed_limit_and_come_from_collection() {
    let collection = catalog();
    for limit in 0..=6 {
        for term in ["w", "e", "i", "milk"] {
            let found = suggestions(term, &collection, limit);
            assert!(found.len() <= limit);
            for name in &found {
                assert!(collection.iter().any(|p| &p.name == name));
            }
        }
    }
}
