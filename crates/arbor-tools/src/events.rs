use std::cell::RefCell;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbor_core::{
    Action, ActionLocation, AiId, CompositeAction, Context, DecisionObserver, Qualifier,
    QualifierSlot, Scorer, SelectorId,
};

/// One recorded step of a decision walk.
///
/// Intentionally dumb data, so walks can be recorded during simulation and
/// rendered later by tooling.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DecisionEvent {
    QualifierScored {
        at: ActionLocation,
        score: f32,
    },
    ScorerScored {
        at: ActionLocation,
        child: usize,
        score: f32,
    },
    Selected {
        ai: AiId,
        selector: SelectorId,
        winner: QualifierSlot,
    },
    ActionExecuted {
        at: ActionLocation,
        child: Option<usize>,
    },
    CompositeExecuted {
        at: ActionLocation,
    },
}

/// Observer that collects every event in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: RefCell<Vec<DecisionEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn events(&self) -> Vec<DecisionEvent> {
        self.events.borrow().clone()
    }

    /// Drain the recorded events.
    pub fn take(&self) -> Vec<DecisionEvent> {
        self.events.take()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: DecisionEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl<C: Context> DecisionObserver<C> for EventLog {
    fn qualifier_scored(
        &self,
        _ctx: &C,
        at: ActionLocation,
        _qualifier: &Qualifier<C>,
        score: f32,
    ) {
        self.push(DecisionEvent::QualifierScored { at, score });
    }

    fn scorer_scored(
        &self,
        _ctx: &C,
        at: ActionLocation,
        child: usize,
        _scorer: &dyn Scorer<C>,
        score: f32,
    ) {
        self.push(DecisionEvent::ScorerScored { at, child, score });
    }

    fn selection(&self, _ctx: &C, ai: AiId, selector: SelectorId, winner: QualifierSlot) {
        self.push(DecisionEvent::Selected {
            ai,
            selector,
            winner,
        });
    }

    fn action_executed(
        &self,
        _ctx: &C,
        at: ActionLocation,
        child: Option<usize>,
        _action: &dyn Action<C>,
    ) {
        self.push(DecisionEvent::ActionExecuted { at, child });
    }

    fn composite_executed(&self, _ctx: &C, at: ActionLocation, _composite: &CompositeAction<C>) {
        self.push(DecisionEvent::CompositeExecuted { at });
    }
}
