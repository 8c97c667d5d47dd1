use augur_core::models::{CategoryScore, CombinedPrediction};
use augur_core::{Category, Outcome, Pattern};

use crate::guess::guess;

/// Merge ranked patterns into one forecast.
///
/// Weight per pattern is `confidence × (0.5 + 0.5 × success_rate)`, normalized
/// to sum to one. Each category accumulates `weight × vote confidence`; the
/// arg-max wins, ties going to the earlier category. With no votes the
/// neutral prediction is returned.
pub fn combine(patterns: &[Pattern], last: Option<&Outcome>, break_length: usize) -> CombinedPrediction {
    let votes: Vec<(&Pattern, crate::guess::Guess)> = patterns
        .iter()
        .filter_map(|p| guess(p, last, break_length).map(|g| (p, g)))
        .collect();
    if votes.is_empty() {
        return CombinedPrediction::neutral();
    }

    let total_weight: f64 = votes.iter().map(|(p, _)| p.rank_weight()).sum();
    if total_weight <= 0.0 {
        return CombinedPrediction::neutral();
    }

    let mut scores = [0.0f64; 3];
    for (pattern, vote) in &votes {
        let weight = pattern.rank_weight() / total_weight;
        scores[vote.category.index()] += weight * vote.confidence;
    }

    let mut winner = Category::A;
    for category in Category::ALL {
        if scores[category.index()] > scores[winner.index()] {
            winner = category;
        }
    }

    // Votes keep the ranked order, so the first backer is the strongest.
    let backers: Vec<&Pattern> = votes
        .iter()
        .filter(|(_, g)| g.category == winner)
        .map(|(p, _)| *p)
        .collect();
    let Some(primary) = backers.first() else {
        return CombinedPrediction::neutral();
    };

    let reasoning = if backers.len() == 1 {
        primary.description.clone()
    } else {
        format!(
            "{} of {} active patterns agree; strongest: {}",
            backers.len(),
            votes.len(),
            primary.description
        )
    };

    CombinedPrediction {
        category: winner,
        confidence: scores[winner.index()].clamp(0.0, 1.0),
        reasoning,
        pattern_id: primary.id.clone(),
        pattern_kind: Some(primary.kind()),
        contributing: backers.iter().map(|p| p.id.clone()).collect(),
        scores: Category::ALL
            .iter()
            .map(|c| CategoryScore {
                category: *c,
                score: scores[c.index()],
            })
            .collect(),
        is_default: false,
    }
}
