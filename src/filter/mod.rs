//! Interaction state for the category filter.
//!
//! Two independent reducers drive the widget: [`SelectionState`] owns the
//! chosen chips and [`ComboboxState`] owns the searchable dropdown. The
//! widget composes them by passing the dropdown's committed index into a
//! selection `Add`.

mod combobox;
mod selection;

pub use combobox::{ComboboxAction, ComboboxState};
pub use selection::{SelectionAction, SelectionChange, SelectionState};

use crate::types::CategoryValue;

/// Compute the dropdown candidates.
///
/// Keeps the possible values that are not selected yet and whose `value`
/// starts with `input`, ignoring case. Order follows `possible`.
pub fn candidates<'a>(
    possible: &'a [CategoryValue],
    selected: &[CategoryValue],
    input: &str,
) -> Vec<&'a CategoryValue> {
    possible
        .iter()
        .filter(|item| !selected.iter().any(|s| s.value == item.value))
        .filter(|item| item.matches_prefix(input))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit() -> Vec<CategoryValue> {
        vec![
            CategoryValue::new("Apple", 5, "c1"),
            CategoryValue::new("Apricot", 2, "c2"),
            CategoryValue::new("Banana", 9, "c3"),
        ]
    }

    fn names(items: &[&CategoryValue]) -> Vec<String> {
        items.iter().map(|item| item.value.clone()).collect()
    }

    #[test]
    fn test_candidates_prefix_filter() {
        let possible = fruit();
        let result = candidates(&possible, &[], "ap");
        assert_eq!(names(&result), vec!["Apple", "Apricot"]);
    }

    #[test]
    fn test_candidates_case_insensitive() {
        let possible = fruit();
        assert_eq!(names(&candidates(&possible, &[], "BAN")), vec!["Banana"]);
        assert_eq!(names(&candidates(&possible, &[], "")).len(), 3);
    }

    #[test]
    fn test_candidates_prefix_not_substring() {
        let possible = fruit();
        assert!(candidates(&possible, &[], "nana").is_empty());
    }

    #[test]
    fn test_candidates_exclude_selected() {
        let possible = fruit();
        let selected = vec![possible[0].clone()];
        assert_eq!(
            names(&candidates(&possible, &selected, "")),
            vec!["Apricot", "Banana"]
        );
        assert_eq!(names(&candidates(&possible, &selected, "ap")), vec!["Apricot"]);
    }

    #[test]
    fn test_candidates_empty_possible_values() {
        for input in ["", "a", "zzz"] {
            assert!(candidates(&[], &[], input).is_empty());
        }
    }

    #[test]
    fn test_candidates_subset_and_prefix_property() {
        let possible = fruit();
        for input in ["", "a", "Ap", "apr", "b", "x", "APPLE"] {
            let result = candidates(&possible, &[], input);
            for item in &result {
                assert!(possible.contains(item));
                assert!(item.value.to_lowercase().starts_with(&input.to_lowercase()));
            }
        }
    }
}
