use std::cmp::Ordering;

use augur_core::Pattern;

/// Order by rank weight descending, then by id for determinism.
pub fn compare_rank(a: &Pattern, b: &Pattern) -> Ordering {
    b.rank_weight()
        .partial_cmp(&a.rank_weight())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort in place, best pattern first.
pub fn rank(patterns: &mut [Pattern]) {
    patterns.sort_by(compare_rank);
}
