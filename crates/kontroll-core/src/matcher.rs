//! # Set-Reconciliation Matcher
//!
//! Computes which catalog entries exist on the source platform but not on the
//! target platform, plus the detail lookup for the entry the catalog job will
//! create next.
//!
//! ## Matching
//! ```text
//!   source codes ──► normalize ──┐
//!                                ├──► absent from target set? ──► unmatched
//!   target codes ──► normalize ──┘         (HashSet lookup)
//! ```
//! Pure and order-preserving with respect to the source sequence;
//! O(|source| + |target|).

use std::collections::HashSet;

use crate::codes::normalize;
use crate::error::{CoreError, CoreResult};
use crate::types::CatalogEntry;

/// Returns the source codes whose normalized form is absent from the target.
///
/// The returned codes are the *raw* source values (the caller may still need
/// the original spelling for detail lookups); only the comparison is
/// normalized.
pub fn unmatched(source: &[String], target: &[String]) -> Vec<String> {
    let target_set: HashSet<String> = target.iter().map(|code| normalize(code)).collect();

    source
        .iter()
        .filter(|code| !target_set.contains(&normalize(code)))
        .cloned()
        .collect()
}

/// Picks the first unmatched code and resolves its full catalog entry.
///
/// The catalog job creates one missing material per run, always the first
/// unmatched entry in source order.
///
/// ## Errors
/// - [`CoreError::NoUnmatchedProducts`] when both catalogs already agree.
/// - [`CoreError::ProductNotFound`] when the unmatched code has no entry in
///   the source detail set (a feed inconsistency).
pub fn first_unmatched_entry<'a>(
    unmatched_codes: &[String],
    entries: &'a [CatalogEntry],
) -> CoreResult<&'a CatalogEntry> {
    let code = unmatched_codes
        .first()
        .ok_or(CoreError::NoUnmatchedProducts)?;
    let wanted = normalize(code);

    entries
        .iter()
        .find(|entry| normalize(&entry.code) == wanted)
        .ok_or_else(|| CoreError::ProductNotFound(code.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|c| c.to_string()).collect()
    }

    fn entry(code: &str) -> CatalogEntry {
        CatalogEntry {
            code: code.into(),
            description: format!("{code} description"),
            average_cost: 1.5,
            unit_of_measure: Some("un".into()),
            group: None,
            warehouse_codes: vec![16],
        }
    }

    #[test]
    fn test_result_is_subset_of_source() {
        let source = codes(&["A-1", "b-2", " C-3 "]);
        let target = codes(&["B-2"]);

        let result = unmatched(&source, &target);
        for code in &result {
            assert!(source.contains(code));
        }
        assert_eq!(result, codes(&["A-1", " C-3 "]));
    }

    #[test]
    fn test_no_result_normalizes_into_target() {
        let source = codes(&[" ab ", "CD", "ef"]);
        let target = codes(&["AB", "xy"]);

        let target_set: std::collections::HashSet<String> =
            target.iter().map(|c| normalize(c)).collect();
        for code in unmatched(&source, &target) {
            assert!(!target_set.contains(&normalize(&code)));
        }
    }

    #[test]
    fn test_identical_sets_match_fully() {
        let source = codes(&["A", "B", "C"]);
        assert!(unmatched(&source, &source).is_empty());
    }

    #[test]
    fn test_case_and_whitespace_folding() {
        let source = codes(&[" widget-1 "]);
        let target = codes(&["WIDGET-1"]);
        assert!(unmatched(&source, &target).is_empty());
    }

    #[test]
    fn test_order_preserved() {
        let source = codes(&["z", "a", "m"]);
        let result = unmatched(&source, &[]);
        assert_eq!(result, source);
    }

    #[test]
    fn test_first_unmatched_entry_found() {
        let entries = vec![entry("A-1"), entry("B-2")];
        let selected = first_unmatched_entry(&codes(&[" b-2 ", "A-1"]), &entries).unwrap();
        assert_eq!(selected.code, "B-2");
    }

    #[test]
    fn test_first_unmatched_entry_empty() {
        let entries = vec![entry("A-1")];
        let err = first_unmatched_entry(&[], &entries).unwrap_err();
        assert!(matches!(err, CoreError::NoUnmatchedProducts));
    }

    #[test]
    fn test_first_unmatched_entry_missing_detail() {
        let entries = vec![entry("A-1")];
        let err = first_unmatched_entry(&codes(&["GHOST"]), &entries).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(code) if code == "GHOST"));
    }
}
