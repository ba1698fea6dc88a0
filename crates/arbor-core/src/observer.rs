use crate::{
    Action, ActionLocation, AiId, CompositeAction, Context, Qualifier, QualifierSlot,
    ScoreObserver, Scorer, SelectorId,
};

/// Watches a decision walk without taking part in it.
///
/// Every method defaults to a no-op, and methods take `&self` so observers
/// record through interior mutability; [`NoopObserver`] is the zero-cost
/// default for unobserved execution.
pub trait DecisionObserver<C: Context> {
    /// A candidate qualifier was scored during a selection.
    fn qualifier_scored(
        &self,
        _ctx: &C,
        _at: ActionLocation,
        _qualifier: &Qualifier<C>,
        _score: f32,
    ) {
    }

    /// A child scorer inside an aggregating qualifier was scored.
    fn scorer_scored(
        &self,
        _ctx: &C,
        _at: ActionLocation,
        _child: usize,
        _scorer: &dyn Scorer<C>,
        _score: f32,
    ) {
    }

    /// A selector finished selecting.
    fn selection(&self, _ctx: &C, _ai: AiId, _selector: SelectorId, _winner: QualifierSlot) {}

    /// An action ran. Composite children carry their index; terminal leaves
    /// pass `None`.
    fn action_executed(
        &self,
        _ctx: &C,
        _at: ActionLocation,
        _child: Option<usize>,
        _action: &dyn Action<C>,
    ) {
    }

    /// A composite node finished running its children.
    fn composite_executed(&self, _ctx: &C, _at: ActionLocation, _composite: &CompositeAction<C>) {}
}

/// The do-nothing observer.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl<C: Context> DecisionObserver<C> for NoopObserver {}

impl<C: Context> ScoreObserver<C> for NoopObserver {}
