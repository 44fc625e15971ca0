use std::collections::HashSet;

use crate::models::Recommendation;

/// Merges tier output into the final list.
///
/// The first occurrence of a movie wins, so an earlier tier's score and
/// reason take precedence. The sort is stable: equal scores keep tier
/// order.
pub fn rank(candidates: Vec<Recommendation>, limit: usize) -> Vec<Recommendation> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Recommendation> = candidates
        .into_iter()
        .filter(|c| seen.insert(c.movie.id))
        .collect();

    unique.sort_by(|a, b| b.score.total_cmp(&a.score));
    unique.truncate(limit);
    unique
}
