use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use arbor_core::{
    Action, ActionLocation, ActionNode, AiClient, AiId, CompositeAction, Connector, Context,
    DecisionObserver, Qualifier, QualifierSlot, Scorer, Selector, SelectorId, UtilityAi,
};

use crate::HookRegistry;

/// Score comparison used by a [`BreakpointCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CompareOp {
    Above,
    AboveOrEqual,
    Below,
    BelowOrEqual,
}

/// Optional score gate on a breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BreakpointCondition {
    pub op: CompareOp,
    pub threshold: f32,
}

impl BreakpointCondition {
    pub fn holds(&self, score: f32) -> bool {
        match self.op {
            CompareOp::Above => score > self.threshold,
            CompareOp::AboveOrEqual => score >= self.threshold,
            CompareOp::Below => score < self.threshold,
            CompareOp::BelowOrEqual => score <= self.threshold,
        }
    }
}

/// A breakpoint armed on a qualifier: raises a sticky hit flag after the
/// qualifier scores, gated by the condition when one is set and
/// unconditionally otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Breakpoint {
    pub condition: Option<BreakpointCondition>,
}

impl Breakpoint {
    pub fn unconditional() -> Self {
        Self { condition: None }
    }

    pub fn when(op: CompareOp, threshold: f32) -> Self {
        Self {
            condition: Some(BreakpointCondition { op, threshold }),
        }
    }

    fn hits(&self, score: f32) -> bool {
        self.condition
            .map_or(true, |condition| condition.holds(score))
    }
}

/// Debug state recorded for one qualifier slot.
#[derive(Default)]
pub struct QualifierMirror {
    last_score: Cell<Option<f32>>,
    high_scorer: Cell<bool>,
    breakpoint: RefCell<Option<Breakpoint>>,
    breakpoint_hit: Cell<bool>,
    scorers: Vec<ScorerMirror>,
    action: Option<ActionMirror>,
}

impl QualifierMirror {
    pub fn last_score(&self) -> Option<f32> {
        self.last_score.get()
    }

    /// Whether this slot won the most recent selection.
    pub fn is_high_scorer(&self) -> bool {
        self.high_scorer.get()
    }

    pub fn breakpoint(&self) -> Option<Breakpoint> {
        *self.breakpoint.borrow()
    }

    pub fn breakpoint_hit(&self) -> bool {
        self.breakpoint_hit.get()
    }

    /// Mirrors for the child scorers of an aggregating qualifier.
    pub fn scorers(&self) -> &[ScorerMirror] {
        &self.scorers
    }

    pub fn action(&self) -> Option<&ActionMirror> {
        self.action.as_ref()
    }

    fn reset(&self) {
        self.last_score.set(None);
        self.high_scorer.set(false);
        self.breakpoint_hit.set(false);
        for scorer in &self.scorers {
            scorer.last_score.set(None);
        }
        if let Some(action) = &self.action {
            action.executions.set(0);
            for child in &action.children {
                child.set(0);
            }
        }
    }
}

/// Debug state for one child scorer of an aggregating qualifier.
#[derive(Default)]
pub struct ScorerMirror {
    last_score: Cell<Option<f32>>,
}

impl ScorerMirror {
    pub fn last_score(&self) -> Option<f32> {
        self.last_score.get()
    }
}

/// Execution counters for the action behind a qualifier slot.
#[derive(Default)]
pub struct ActionMirror {
    executions: Cell<u64>,
    children: Vec<Cell<u64>>,
}

impl ActionMirror {
    /// Times the node ran: leaf executions, or composite child-batch runs.
    pub fn executions(&self) -> u64 {
        self.executions.get()
    }

    pub fn child_executions(&self, index: usize) -> u64 {
        self.children.get(index).map_or(0, Cell::get)
    }
}

/// Debug state recorded for one selector.
pub struct SelectorMirror {
    qualifiers: Vec<QualifierMirror>,
    default_qualifier: QualifierMirror,
    last_winner: Cell<Option<QualifierSlot>>,
}

impl SelectorMirror {
    pub fn qualifiers(&self) -> &[QualifierMirror] {
        &self.qualifiers
    }

    pub fn default_qualifier(&self) -> &QualifierMirror {
        &self.default_qualifier
    }

    pub fn last_winner(&self) -> Option<QualifierSlot> {
        self.last_winner.get()
    }

    pub fn slot(&self, slot: QualifierSlot) -> Option<&QualifierMirror> {
        match slot {
            QualifierSlot::Qualifier(index) => self.qualifiers.get(index),
            QualifierSlot::Default => Some(&self.default_qualifier),
        }
    }
}

struct AiMirror {
    selectors: HashMap<SelectorId, SelectorMirror>,
}

/// Non-invasive mirror of a decision graph's evaluation state.
///
/// Construction walks an already-functioning, link-resolved AI and mirrors
/// its shape exactly once, following links into other AIs and deduplicating
/// shared sub-graphs by id. As a [`DecisionObserver`] it records last
/// scores, winning branches, breakpoint hits and execution counts; it never
/// alters selection semantics, because observed candidates delegate to the
/// same policy and scorer code that runs unobserved.
pub struct AiVisualizer<C: Context> {
    ais: HashMap<AiId, AiMirror>,
    hooks: HookRegistry<C>,
}

impl<C: Context> AiVisualizer<C> {
    /// Mirror `ai` and every AI reachable through resolved links.
    pub fn new(ai: &Rc<UtilityAi<C>>) -> Self {
        let mut ais = HashMap::new();
        mirror_ai(ai, &mut ais);
        Self {
            ais,
            hooks: HookRegistry::new(),
        }
    }

    /// Per-type custom visualizer hooks.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry<C> {
        &mut self.hooks
    }

    /// Number of distinct AIs mirrored (shared linked AIs count once).
    pub fn mirrored_ais(&self) -> usize {
        self.ais.len()
    }

    pub fn selector(&self, ai: AiId, selector: SelectorId) -> Option<&SelectorMirror> {
        self.ais.get(&ai)?.selectors.get(&selector)
    }

    pub fn qualifier(&self, at: ActionLocation) -> Option<&QualifierMirror> {
        self.selector(at.ai, at.selector)?.slot(at.slot)
    }

    /// Arm a breakpoint on a qualifier slot. Returns `false` when the
    /// location is not part of the mirrored graph.
    pub fn set_breakpoint(&self, at: ActionLocation, breakpoint: Breakpoint) -> bool {
        match self.qualifier(at) {
            Some(mirror) => {
                *mirror.breakpoint.borrow_mut() = Some(breakpoint);
                true
            }
            None => false,
        }
    }

    pub fn clear_breakpoint(&self, at: ActionLocation) {
        if let Some(mirror) = self.qualifier(at) {
            *mirror.breakpoint.borrow_mut() = None;
            mirror.breakpoint_hit.set(false);
        }
    }

    /// Locations whose breakpoint hit since the last
    /// [`clear_hits`](Self::clear_hits).
    pub fn hit_breakpoints(&self) -> Vec<ActionLocation> {
        let mut hits = Vec::new();
        for (&ai, mirror) in &self.ais {
            for (&selector, selector_mirror) in &mirror.selectors {
                for (index, qualifier) in selector_mirror.qualifiers.iter().enumerate() {
                    if qualifier.breakpoint_hit.get() {
                        hits.push(ActionLocation {
                            ai,
                            selector,
                            slot: QualifierSlot::Qualifier(index),
                        });
                    }
                }
                if selector_mirror.default_qualifier.breakpoint_hit.get() {
                    hits.push(ActionLocation {
                        ai,
                        selector,
                        slot: QualifierSlot::Default,
                    });
                }
            }
        }
        hits
    }

    pub fn clear_hits(&self) {
        self.for_each_qualifier(|mirror| mirror.breakpoint_hit.set(false));
    }

    /// Reset all recorded state; armed breakpoints stay armed.
    pub fn reset(&self) {
        for mirror in self.ais.values() {
            for selector_mirror in mirror.selectors.values() {
                selector_mirror.last_winner.set(None);
            }
        }
        self.for_each_qualifier(QualifierMirror::reset);
    }

    fn for_each_qualifier(&self, f: impl Fn(&QualifierMirror)) {
        for mirror in self.ais.values() {
            for selector_mirror in mirror.selectors.values() {
                for qualifier in &selector_mirror.qualifiers {
                    f(qualifier);
                }
                f(&selector_mirror.default_qualifier);
            }
        }
    }
}

impl<C: Context> DecisionObserver<C> for AiVisualizer<C> {
    fn qualifier_scored(&self, ctx: &C, at: ActionLocation, qualifier: &Qualifier<C>, score: f32) {
        if let Some(mirror) = self.qualifier(at) {
            mirror.last_score.set(Some(score));
            let hit = mirror
                .breakpoint
                .borrow()
                .map_or(false, |breakpoint| breakpoint.hits(score));
            if hit {
                mirror.breakpoint_hit.set(true);
            }
        }
        self.hooks.dispatch_scorer(qualifier.scoring(), ctx, score);
    }

    fn scorer_scored(
        &self,
        ctx: &C,
        at: ActionLocation,
        child: usize,
        scorer: &dyn Scorer<C>,
        score: f32,
    ) {
        if let Some(mirror) = self.qualifier(at) {
            if let Some(child_mirror) = mirror.scorers.get(child) {
                child_mirror.last_score.set(Some(score));
            }
        }
        self.hooks.dispatch_scorer(scorer, ctx, score);
    }

    fn selection(&self, _ctx: &C, ai: AiId, selector: SelectorId, winner: QualifierSlot) {
        if let Some(mirror) = self.selector(ai, selector) {
            mirror.last_winner.set(Some(winner));
            for (index, qualifier) in mirror.qualifiers.iter().enumerate() {
                qualifier
                    .high_scorer
                    .set(winner == QualifierSlot::Qualifier(index));
            }
            mirror
                .default_qualifier
                .high_scorer
                .set(winner == QualifierSlot::Default);
        }
    }

    fn action_executed(
        &self,
        ctx: &C,
        at: ActionLocation,
        child: Option<usize>,
        action: &dyn Action<C>,
    ) {
        if let Some(mirror) = self.qualifier(at).and_then(QualifierMirror::action) {
            match child {
                Some(index) => {
                    if let Some(counter) = mirror.children.get(index) {
                        counter.set(counter.get() + 1);
                    }
                }
                None => mirror.executions.set(mirror.executions.get() + 1),
            }
        }
        self.hooks.dispatch_action(action, ctx);
    }

    fn composite_executed(&self, _ctx: &C, at: ActionLocation, _composite: &CompositeAction<C>) {
        if let Some(mirror) = self.qualifier(at).and_then(QualifierMirror::action) {
            mirror.executions.set(mirror.executions.get() + 1);
        }
    }
}

fn mirror_ai<C: Context>(ai: &Rc<UtilityAi<C>>, ais: &mut HashMap<AiId, AiMirror>) {
    if ais.contains_key(&ai.id()) {
        return;
    }

    // Insert before recursing so link cycles terminate.
    let mirror = AiMirror {
        selectors: ai
            .selectors()
            .iter()
            .map(|selector| (selector.id(), mirror_selector(selector)))
            .collect(),
    };
    ais.insert(ai.id(), mirror);

    for selector in ai.selectors() {
        for qualifier in selector.qualifiers() {
            follow_link(qualifier.action(), ais);
        }
        follow_link(selector.default_qualifier().action(), ais);
    }
}

fn follow_link<C: Context>(action: Option<&ActionNode<C>>, ais: &mut HashMap<AiId, AiMirror>) {
    let Some(Connector::Link(link)) = action.and_then(ActionNode::connector) else {
        return;
    };
    if let Some(linked) = link.upgrade() {
        mirror_ai(&linked, ais);
    }
}

fn mirror_selector<C: Context>(selector: &Selector<C>) -> SelectorMirror {
    SelectorMirror {
        qualifiers: selector.qualifiers().iter().map(mirror_qualifier).collect(),
        default_qualifier: QualifierMirror {
            action: selector.default_qualifier().action().map(mirror_action),
            ..QualifierMirror::default()
        },
        last_winner: Cell::new(None),
    }
}

fn mirror_qualifier<C: Context>(qualifier: &Qualifier<C>) -> QualifierMirror {
    QualifierMirror {
        scorers: (0..qualifier.child_count())
            .map(|_| ScorerMirror::default())
            .collect(),
        action: qualifier.action().map(mirror_action),
        ..QualifierMirror::default()
    }
}

fn mirror_action<C: Context>(node: &ActionNode<C>) -> ActionMirror {
    let children = match node {
        ActionNode::Composite(composite) => composite.children().len(),
        _ => 0,
    };
    ActionMirror {
        executions: Cell::new(0),
        children: (0..children).map(|_| Cell::new(0)).collect(),
    }
}

/// Drives an [`AiClient`] through a visualizer.
///
/// A pure decorator over an already-functioning client: selection results,
/// execution order and termination behavior are exactly those of the wrapped
/// client.
pub struct VisualizedClient<C: Context> {
    client: AiClient<C>,
    visualizer: AiVisualizer<C>,
}

impl<C: Context> VisualizedClient<C> {
    /// Wrap a client. Build this after links are resolved so linked AIs are
    /// mirrored too.
    pub fn new(client: AiClient<C>) -> Self {
        let visualizer = AiVisualizer::new(client.ai());
        Self { client, visualizer }
    }

    pub fn execute_once(&mut self, ctx: &mut C) -> Option<ActionLocation> {
        self.client.execute_once_observed(ctx, &self.visualizer)
    }

    pub fn stop(&mut self, ctx: &mut C) {
        self.client.stop(ctx);
    }

    pub fn client(&self) -> &AiClient<C> {
        &self.client
    }

    pub fn visualizer(&self) -> &AiVisualizer<C> {
        &self.visualizer
    }

    pub fn visualizer_mut(&mut self) -> &mut AiVisualizer<C> {
        &mut self.visualizer
    }

    /// Unwrap, dropping all recorded debug state.
    pub fn into_inner(self) -> AiClient<C> {
        self.client
    }
}
