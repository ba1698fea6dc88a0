#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ActionNode, AiId, Context, DecisionObserver, DefaultQualifier, Qualifier, ScoreObserver,
    Scorer, SelectorId,
};

/// Which branch of a selector won a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum QualifierSlot {
    Qualifier(usize),
    Default,
}

/// Addresses one branch of one selector in one AI.
///
/// The decision walk uses locations as the identity of the active action
/// across cycles; debug tooling uses them to address mirror state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionLocation {
    pub ai: AiId,
    pub selector: SelectorId,
    pub slot: QualifierSlot,
}

/// Picks the winning qualifier for a selector.
///
/// Policies receive candidates behind the [`Scorer`] interface and return an
/// index into the slice, or `None` to fall back to the default qualifier.
/// Implementations must skip disabled candidates without scoring them, and
/// should score lazily: candidates after a decided winner are never
/// evaluated.
pub trait SelectionPolicy<C: Context>: 'static {
    fn select(&self, ctx: &C, candidates: &[&dyn Scorer<C>], default_score: f32) -> Option<usize>;
}

/// A decision node choosing among weighted branches.
///
/// Selection never mutates the graph; scorers are free to read whatever
/// mutable state the context exposes.
pub struct Selector<C: Context> {
    id: SelectorId,
    policy: Box<dyn SelectionPolicy<C>>,
    qualifiers: Vec<Qualifier<C>>,
    default_qualifier: DefaultQualifier<C>,
}

impl<C: Context> Selector<C> {
    pub fn new(policy: Box<dyn SelectionPolicy<C>>) -> Self {
        Self {
            id: SelectorId::new(),
            policy,
            qualifiers: Vec::new(),
            default_qualifier: DefaultQualifier::default(),
        }
    }

    pub fn with_id(mut self, id: SelectorId) -> Self {
        self.id = id;
        self
    }

    pub fn with_qualifier(mut self, qualifier: Qualifier<C>) -> Self {
        self.qualifiers.push(qualifier);
        self
    }

    pub fn with_default(mut self, default_qualifier: DefaultQualifier<C>) -> Self {
        self.default_qualifier = default_qualifier;
        self
    }

    pub fn id(&self) -> SelectorId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: SelectorId) {
        self.id = id;
    }

    pub fn policy(&self) -> &dyn SelectionPolicy<C> {
        self.policy.as_ref()
    }

    pub fn qualifiers(&self) -> &[Qualifier<C>] {
        &self.qualifiers
    }

    pub fn qualifiers_mut(&mut self) -> &mut [Qualifier<C>] {
        &mut self.qualifiers
    }

    pub fn add_qualifier(&mut self, qualifier: Qualifier<C>) {
        self.qualifiers.push(qualifier);
    }

    pub fn remove_qualifier(&mut self, index: usize) -> Option<Qualifier<C>> {
        if index < self.qualifiers.len() {
            Some(self.qualifiers.remove(index))
        } else {
            None
        }
    }

    pub fn default_qualifier(&self) -> &DefaultQualifier<C> {
        &self.default_qualifier
    }

    pub fn default_qualifier_mut(&mut self) -> &mut DefaultQualifier<C> {
        &mut self.default_qualifier
    }

    /// Replace the fallback branch. Taken by value: a selector can never be
    /// left without one.
    pub fn set_default_qualifier(&mut self, default_qualifier: DefaultQualifier<C>) {
        self.default_qualifier = default_qualifier;
    }

    /// The action behind a selection result.
    pub fn action_at(&self, slot: QualifierSlot) -> Option<&ActionNode<C>> {
        match slot {
            QualifierSlot::Qualifier(index) => self.qualifiers.get(index)?.action(),
            QualifierSlot::Default => self.default_qualifier.action(),
        }
    }

    /// Select the winning branch.
    pub fn select_slot(&self, ctx: &C) -> QualifierSlot {
        let candidates: Vec<&dyn Scorer<C>> =
            self.qualifiers.iter().map(|q| q as &dyn Scorer<C>).collect();
        self.pick(ctx, &candidates)
    }

    /// Select the winning branch, reporting every score to `observer`.
    ///
    /// Candidates are wrapped in forwarding proxies, so the same policy code
    /// runs as in [`select_slot`](Self::select_slot) and the outcome cannot
    /// differ.
    pub fn select_slot_observed(
        &self,
        ctx: &C,
        ai: AiId,
        observer: &dyn DecisionObserver<C>,
    ) -> QualifierSlot {
        let watched: Vec<WatchedQualifier<'_, C>> = self
            .qualifiers
            .iter()
            .enumerate()
            .map(|(index, qualifier)| WatchedQualifier {
                qualifier,
                at: ActionLocation {
                    ai,
                    selector: self.id,
                    slot: QualifierSlot::Qualifier(index),
                },
                observer,
            })
            .collect();
        let candidates: Vec<&dyn Scorer<C>> =
            watched.iter().map(|w| w as &dyn Scorer<C>).collect();
        self.pick(ctx, &candidates)
    }

    /// Convenience: the selected branch's action.
    pub fn select(&self, ctx: &C) -> Option<&ActionNode<C>> {
        self.action_at(self.select_slot(ctx))
    }

    fn pick(&self, ctx: &C, candidates: &[&dyn Scorer<C>]) -> QualifierSlot {
        match self
            .policy
            .select(ctx, candidates, self.default_qualifier.score())
        {
            Some(index) => QualifierSlot::Qualifier(index),
            None => QualifierSlot::Default,
        }
    }
}

/// Forwarding proxy that reports scores without changing them.
struct WatchedQualifier<'a, C: Context> {
    qualifier: &'a Qualifier<C>,
    at: ActionLocation,
    observer: &'a dyn DecisionObserver<C>,
}

impl<C: Context> Scorer<C> for WatchedQualifier<'_, C> {
    fn is_disabled(&self) -> bool {
        self.qualifier.is_disabled()
    }

    fn score(&self, ctx: &C) -> f32 {
        let children = ChildScores {
            at: self.at,
            observer: self.observer,
        };
        let score = self.qualifier.score_observed(ctx, &children);
        self.observer
            .qualifier_scored(ctx, self.at, self.qualifier, score);
        score
    }
}

struct ChildScores<'a, C: Context> {
    at: ActionLocation,
    observer: &'a dyn DecisionObserver<C>,
}

impl<C: Context> ScoreObserver<C> for ChildScores<'_, C> {
    fn scorer_scored(&self, ctx: &C, index: usize, scorer: &dyn Scorer<C>, score: f32) {
        self.observer.scorer_scored(ctx, self.at, index, scorer, score);
    }
}
