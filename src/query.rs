//! Search filtering and autocomplete over a product collection.
//!
//! Everything here is pure: the same term and collection always give the same
//! answer, in collection order.

use crate::models::Product;

/// Number of autocomplete suggestions shown by default
pub const SUGGESTION_LIMIT: usize = 3;

/// Derived views for one search term
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchView {
    pub products: Vec<Product>,
    pub suggestions: Vec<String>,
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Up to `limit` product names containing `term`, ignoring case.
///
/// An empty term suggests nothing.
pub fn suggestions(term: &str, products: &[Product], limit: usize) -> Vec<String> {
    if term.is_empty() {
        return Vec::new();
    }
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| contains_ignore_case(&p.name, &needle))
        .map(|p| p.name.clone())
        .take(limit)
        .collect()
}

/// Products whose name, category or sub-category contains `term`, ignoring case.
///
/// An empty term matches every product. Whitespace is matched like any other text.
pub fn filter<'a>(term: &str, products: &'a [Product]) -> Vec<&'a Product> {
    if term.is_empty() {
        return products.iter().collect();
    }
    let needle = term.to_lowercase();
    products
        .iter()
        .filter(|p| matches(p, &needle))
        .collect()
}

fn matches(product: &Product, needle_lower: &str) -> bool {
    contains_ignore_case(&product.name, needle_lower)
        || contains_ignore_case(&product.category, needle_lower)
        || contains_ignore_case(&product.sub_category, needle_lower)
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
