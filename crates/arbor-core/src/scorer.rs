use std::any::Any;

use crate::Context;

/// Something that can express a desirability for the current context.
///
/// Qualifiers, leaf scorers and composite aggregates all implement this; so
/// do the short-lived proxies debug tooling uses to watch a selection
/// without changing it, which is why the trait carries no `'static` bound.
pub trait Scorer<C: Context> {
    /// Desirability of this candidate given the current context.
    fn score(&self, ctx: &C) -> f32;

    /// Disabled scorers are skipped entirely: never scored, never part of an
    /// aggregate.
    fn is_disabled(&self) -> bool {
        false
    }

    /// Score while reporting child evaluations to `observer`.
    ///
    /// Aggregating scorers override this to report each child they actually
    /// evaluate; leaves have nothing to report.
    fn score_observed(&self, ctx: &C, observer: &dyn ScoreObserver<C>) -> f32 {
        let _ = observer;
        self.score(ctx)
    }

    /// Number of child scorers an aggregate holds; leaves report zero.
    /// Debug tooling uses this to mirror graph structure.
    fn child_count(&self) -> usize {
        0
    }

    /// Concrete-type handle for per-type debug visualizers. Implementations
    /// that want custom visualization return `Some(self)`.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
}

/// Receives child evaluations from aggregating scorers.
pub trait ScoreObserver<C: Context> {
    fn scorer_scored(&self, _ctx: &C, _index: usize, _scorer: &dyn Scorer<C>, _score: f32) {}
}
