use arbor_core::{Context, Scorer, SelectionPolicy};

/// Highest score wins: scans every enabled candidate and keeps the first
/// strictly-highest score, provided it strictly exceeds the default score.
///
/// Strict comparisons mean ties between candidates go to the earlier one,
/// and a candidate merely matching the default score loses to the default.
#[derive(Debug, Default, Clone, Copy)]
pub struct HighestScoreWins;

impl<C: Context> SelectionPolicy<C> for HighestScoreWins {
    fn select(&self, ctx: &C, candidates: &[&dyn Scorer<C>], default_score: f32) -> Option<usize> {
        let mut best: Option<usize> = None;
        let mut best_score = default_score;

        for (index, candidate) in candidates.iter().enumerate() {
            if candidate.is_disabled() {
                continue;
            }
            let score = candidate.score(ctx);
            if score > best_score {
                best_score = score;
                best = Some(index);
            }
        }

        best
    }
}

/// The first enabled candidate whose score strictly exceeds the default
/// score wins; candidates after it are never scored.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstAboveDefault;

impl<C: Context> SelectionPolicy<C> for FirstAboveDefault {
    fn select(&self, ctx: &C, candidates: &[&dyn Scorer<C>], default_score: f32) -> Option<usize> {
        for (index, candidate) in candidates.iter().enumerate() {
            if candidate.is_disabled() {
                continue;
            }
            if candidate.score(ctx) > default_score {
                return Some(index);
            }
        }

        None
    }
}
