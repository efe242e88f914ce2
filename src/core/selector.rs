// src/core/selector.rs

use crate::core::models::{MenuItem, SelectionOutcome};
use rand::Rng;

/// Source of the index used when several candidates match a preference.
/// Production uses the thread RNG; tests inject a fixed picker so the
/// chosen item is deterministic.
pub trait IndexPicker: Send + Sync {
    /// Returns an index in `0..len`. `len` is always at least 1.
    fn pick(&self, len: usize) -> usize;
}

pub struct RandomPicker;

impl IndexPicker for RandomPicker {
    fn pick(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }
}

/// Always picks the same index (clamped to the candidate count).
pub struct FixedPicker(pub usize);

impl IndexPicker for FixedPicker {
    fn pick(&self, len: usize) -> usize {
        self.0.min(len - 1)
    }
}

/// Picks one item from a category. Any candidate whose description contains
/// any preference keyword (case-insensitive substring) qualifies; one of the
/// qualifiers is chosen through the picker. With no qualifier the first
/// listed candidate is taken, so a category with items always yields a
/// selection.
pub fn select(
    candidates: &[MenuItem],
    keywords: &[String],
    picker: &dyn IndexPicker,
) -> SelectionOutcome {
    if candidates.is_empty() {
        return SelectionOutcome::Unavailable;
    }

    let matches: Vec<&MenuItem> = candidates
        .iter()
        .filter(|item| {
            let desc = item.description.to_lowercase();
            keywords.iter().any(|kw| desc.contains(&kw.to_lowercase()))
        })
        .collect();

    if matches.is_empty() {
        SelectionOutcome::FallbackFirst(candidates[0].clone())
    } else {
        let chosen = matches[picker.pick(matches.len())];
        SelectionOutcome::Matched(chosen.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::driver::ElementHandle;

    fn items(descs: &[&str]) -> Vec<MenuItem> {
        descs
            .iter()
            .enumerate()
            .map(|(i, d)| MenuItem::new(*d, ElementHandle(i)))
            .collect()
    }

    fn keywords(kws: &[&str]) -> Vec<String> {
        kws.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_empty_candidates_is_unavailable() {
        let outcome = select(&[], &keywords(&["ensalada"]), &FixedPicker(0));
        assert_eq!(outcome, SelectionOutcome::Unavailable);
    }

    #[test]
    fn test_matched_item_contains_a_keyword() {
        let candidates = items(&["Tarta de verdura", "Ensalada Caesar", "Milanesa"]);
        let outcome = select(&candidates, &keywords(&["ensalada"]), &FixedPicker(0));
        match outcome {
            SelectionOutcome::Matched(item) => {
                assert!(item.description.to_lowercase().contains("ensalada"));
            }
            other => panic!("expected Matched, got {:?}", other),
        }
    }

    #[test]
    fn test_match_is_case_insensitive_both_ways() {
        let candidates = items(&["ENSALADA MIXTA"]);
        let outcome = select(&candidates, &keywords(&["Ensalada"]), &FixedPicker(0));
        assert!(matches!(outcome, SelectionOutcome::Matched(_)));
    }

    #[test]
    fn test_fallback_is_first_candidate_in_listing_order() {
        let candidates = items(&["flan", "budin", "gelatina"]);
        let outcome = select(&candidates, &keywords(&["alfajor"]), &FixedPicker(2));
        assert_eq!(outcome, SelectionOutcome::FallbackFirst(candidates[0].clone()));
    }

    #[test]
    fn test_picker_chooses_among_matches_only() {
        let candidates = items(&["agua", "coca zero", "sprite", "pepsi zero"]);
        let kws = keywords(&["coca zero", "pepsi zero"]);
        let first = select(&candidates, &kws, &FixedPicker(0));
        let second = select(&candidates, &kws, &FixedPicker(1));
        assert_eq!(
            first,
            SelectionOutcome::Matched(candidates[1].clone())
        );
        assert_eq!(
            second,
            SelectionOutcome::Matched(candidates[3].clone())
        );
    }

    #[test]
    fn test_preferred_dessert_scenario() {
        let candidates = items(&["alfajor de chocolate", "torta"]);
        let kws = keywords(&["alfajor de chocolate", "cookie"]);
        let outcome = select(&candidates, &kws, &FixedPicker(0));
        assert_eq!(
            outcome,
            SelectionOutcome::Matched(candidates[0].clone())
        );
    }
}
