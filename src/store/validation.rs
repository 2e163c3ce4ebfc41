//! Local preconditions checked before anything is sent to the service.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::models::{names_match, Product, ProductDraft, ProductId};

/// Presence and non-negativity rules, in the order they are reported.
pub(crate) fn validate_draft(draft: &ProductDraft) -> Result<(), ValidationError> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::MissingField("name"));
    }
    if draft.category.trim().is_empty() {
        return Err(ValidationError::MissingField("category"));
    }
    if draft.sub_category.trim().is_empty() {
        return Err(ValidationError::MissingField("subCategory"));
    }
    if draft.quantity < 0 {
        return Err(ValidationError::NegativeQuantity(draft.quantity));
    }
    if draft.price.is_nan() || draft.price < 0.0 {
        return Err(ValidationError::NegativePrice(draft.price));
    }
    if draft.unit.trim().is_empty() {
        return Err(ValidationError::EmptyUnit);
    }
    Ok(())
}

/// Rejects `name` if another product (other than `except`) already uses it.
pub(crate) fn ensure_unique_name(
    name: &str,
    products: &[Product],
    except: Option<&ProductId>,
) -> Result<(), ValidationError> {
    let taken = products
        .iter()
        .filter(|p| Some(&p.id) != except)
        .any(|p| names_match(&p.name, name));
    if taken {
        return Err(ValidationError::DuplicateName(name.to_string()));
    }
    Ok(())
}

/// Names that occur more than once, ignoring case
pub(crate) fn duplicate_names(products: &[Product]) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|p| !seen.insert(p.name.to_lowercase()))
        .map(|p| p.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(id: i64, name: &str) -> Product {
        Product::from_draft(ProductId::Number(id), ProductDraft::named(name))
    }

    #[test]
    fn accepts_default_scaffold_with_name() {
        assert_eq!(validate_draft(&ProductDraft::named("Widget")), Ok(()));
    }

    #[test]
    fn rejects_blank_name() {
        let draft = ProductDraft::named("   ");
        assert_eq!(
            validate_draft(&draft),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn rejects_missing_sub_category() {
        let draft = ProductDraft {
            sub_category: String::new(),
            ..ProductDraft::named("Widget")
        };
        assert_eq!(
            validate_draft(&draft),
            Err(ValidationError::MissingField("subCategory"))
        );
    }

    #[test]
    fn zero_quantity_is_allowed() {
        let draft = ProductDraft {
            quantity: 0,
            ..ProductDraft::named("Widget")
        };
        assert_eq!(validate_draft(&draft), Ok(()));
    }

    #[test]
    fn rejects_negative_quantity() {
        let draft = ProductDraft {
            quantity: -1,
            ..ProductDraft::named("Widget")
        };
        assert_eq!(
            validate_draft(&draft),
            Err(ValidationError::NegativeQuantity(-1))
        );
    }

    #[test]
    fn rejects_negative_and_nan_price() {
        let draft = ProductDraft {
            price: -0.5,
            ..ProductDraft::named("Widget")
        };
        assert_eq!(
            validate_draft(&draft),
            Err(ValidationError::NegativePrice(-0.5))
        );

        let draft = ProductDraft {
            price: f64::NAN,
            ..ProductDraft::named("Widget")
        };
        assert!(matches!(
            validate_draft(&draft),
            Err(ValidationError::NegativePrice(_))
        ));
    }

    #[test]
    fn rejects_empty_unit() {
        let draft = ProductDraft {
            unit: String::new(),
            ..ProductDraft::named("Widget")
        };
        assert_eq!(validate_draft(&draft), Err(ValidationError::EmptyUnit));
    }

    #[test]
    fn duplicate_name_ignores_case() {
        let products = vec![stored(1, "Widget")];
        assert_eq!(
            ensure_unique_name("WIDGET", &products, None),
            Err(ValidationError::DuplicateName("WIDGET".to_string()))
        );
        assert_eq!(ensure_unique_name("Gadget", &products, None), Ok(()));
    }

    #[test]
    fn own_name_is_not_a_duplicate() {
        let products = vec![stored(1, "Widget")];
        assert_eq!(
            ensure_unique_name("widget", &products, Some(&ProductId::Number(1))),
            Ok(())
        );
    }

    #[test]
    fn finds_duplicate_names() {
        let products = vec![stored(1, "Widget"), stored(2, "Bolt"), stored(3, "widget")];
        assert_eq!(duplicate_names(&products), vec!["widget".to_string()]);
    }
}
