//! Collision-free credential name allocation

use std::collections::BTreeSet;

/// Allocate the smallest-suffix name not yet taken
///
/// Probes `base1`, `base2`, … in increasing integer order and returns the
/// first candidate absent from `existing`. Terminates after at most
/// `existing.len() + 1` probes: if every candidate up to `base{n}` is taken,
/// those candidates account for all `n` existing names, so `base{n + 1}` is
/// necessarily free. Deterministic for a given input set.
pub fn allocate_name(existing: &BTreeSet<String>, base: &str) -> String {
    for suffix in 1..=existing.len() {
        let candidate = format!("{base}{suffix}");
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
    format!("{base}{}", existing.len() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn first_allocation_starts_at_one() {
        assert_eq!(allocate_name(&BTreeSet::new(), "RotatedKey"), "RotatedKey1");
    }

    #[test]
    fn picks_next_after_contiguous_run() {
        let existing = names(&["RotatedKey1", "RotatedKey2"]);
        assert_eq!(allocate_name(&existing, "RotatedKey"), "RotatedKey3");
    }

    #[test]
    fn fills_the_smallest_gap() {
        let existing = names(&["RotatedKey2", "RotatedKey3"]);
        assert_eq!(allocate_name(&existing, "RotatedKey"), "RotatedKey1");

        let existing = names(&["RotatedKey1", "RotatedKey3"]);
        assert_eq!(allocate_name(&existing, "RotatedKey"), "RotatedKey2");
    }

    #[test]
    fn unrelated_names_do_not_block_allocation() {
        let existing = names(&["legacy-secret", "RotatedKey1", "cert-2024"]);
        assert_eq!(allocate_name(&existing, "RotatedKey"), "RotatedKey2");
    }

    #[test]
    fn worst_case_lands_one_past_the_set_size() {
        // All of base1..base4 taken by the 4 existing names
        let existing = names(&["RotatedKey1", "RotatedKey2", "RotatedKey3", "RotatedKey4"]);
        assert_eq!(allocate_name(&existing, "RotatedKey"), "RotatedKey5");
    }

    #[test]
    fn deterministic_for_equal_sets() {
        let a = names(&["RotatedKey1", "zzz", "aaa"]);
        let b = names(&["aaa", "RotatedKey1", "zzz"]);
        assert_eq!(allocate_name(&a, "RotatedKey"), allocate_name(&b, "RotatedKey"));
    }
}
