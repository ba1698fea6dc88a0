use std::rc::Rc;

use tracing::{debug, warn};

use crate::{
    ActionLocation, ActionNode, Connector, Context, DecisionObserver, NoopObserver, SelectorId,
    UtilityAi,
};

/// Upper bound on connector hops in one decision walk; an authored connector
/// cycle would otherwise never terminate.
const MAX_HOPS: usize = 64;

/// Per-entity driver: resolves the decision chain once per tick and keeps
/// the identity of the action currently in charge, so a superseded action is
/// notified exactly once.
pub struct AiClient<C: Context> {
    ai: Rc<UtilityAi<C>>,
    active: Option<ActiveAction<C>>,
}

/// The action currently in charge, addressed through its owning AI so it can
/// be re-located for termination even when the walk crossed AI links.
struct ActiveAction<C: Context> {
    ai: Rc<UtilityAi<C>>,
    location: ActionLocation,
}

impl<C: Context> ActiveAction<C> {
    fn node(&self) -> Option<&ActionNode<C>> {
        self.ai
            .selector(self.location.selector)?
            .action_at(self.location.slot)
    }

    fn terminate(&self, ctx: &mut C) {
        if let Some(node) = self.node() {
            node.terminate(ctx);
        }
    }
}

impl<C: Context> AiClient<C> {
    pub fn new(ai: Rc<UtilityAi<C>>) -> Self {
        Self { ai, active: None }
    }

    pub fn ai(&self) -> &Rc<UtilityAi<C>> {
        &self.ai
    }

    /// Where the action currently in charge lives, if any.
    pub fn active(&self) -> Option<ActionLocation> {
        self.active.as_ref().map(|active| active.location)
    }

    /// Run one decision cycle: resolve the chain from the root selector,
    /// notify a superseded action, execute the winner.
    ///
    /// Scorer and action panics are not caught here; they abort this
    /// entity's tick and propagate to the caller.
    pub fn execute_once(&mut self, ctx: &mut C) -> Option<ActionLocation> {
        self.execute_once_observed(ctx, &NoopObserver)
    }

    /// [`execute_once`](Self::execute_once) with every score, selection and
    /// execution reported to `observer`.
    pub fn execute_once_observed(
        &mut self,
        ctx: &mut C,
        observer: &dyn DecisionObserver<C>,
    ) -> Option<ActionLocation> {
        let next = resolve(Rc::clone(&self.ai), ctx, observer);

        let unchanged = matches!(
            (&self.active, &next),
            (Some(previous), Some(new)) if previous.location == new.location
        );
        if !unchanged {
            if let Some(previous) = self.active.take() {
                previous.terminate(ctx);
            }
        }
        self.active = next;

        // Terminal composites already ran during resolution; only a leaf is
        // executed here.
        if let Some(active) = &self.active {
            if let Some(ActionNode::Single(action)) = active.node() {
                action.execute(ctx);
                observer.action_executed(&*ctx, active.location, None, action.as_ref());
            }
        }
        self.active()
    }

    /// Notify and forget the action currently in charge.
    pub fn stop(&mut self, ctx: &mut C) {
        if let Some(previous) = self.active.take() {
            previous.terminate(ctx);
        }
    }
}

/// Resolve the decision chain: composites run their children and continue
/// through their connector, connectors route without executing, and the walk
/// ends at a leaf, at a connector-less composite, or when selection yields
/// no action.
fn resolve<C: Context>(
    start: Rc<UtilityAi<C>>,
    ctx: &mut C,
    observer: &dyn DecisionObserver<C>,
) -> Option<ActiveAction<C>> {
    let mut ai = start;
    let mut selector_id = ai.root_id();

    for _ in 0..MAX_HOPS {
        let mut next: Option<(Rc<UtilityAi<C>>, SelectorId)> = None;
        let mut terminal: Option<ActionLocation> = None;

        {
            let Some(selector) = ai.selector(selector_id) else {
                debug!(
                    ai = %ai.id(),
                    selector = %selector_id,
                    "selection reached a missing selector"
                );
                return None;
            };
            let slot = selector.select_slot_observed(&*ctx, ai.id(), observer);
            observer.selection(&*ctx, ai.id(), selector.id(), slot);
            let at = ActionLocation {
                ai: ai.id(),
                selector: selector_id,
                slot,
            };

            match selector.action_at(slot) {
                None => {}
                Some(ActionNode::Single(_)) => terminal = Some(at),
                Some(ActionNode::Composite(composite)) => {
                    for (index, child) in composite.children().iter().enumerate() {
                        child.execute(ctx);
                        observer.action_executed(&*ctx, at, Some(index), child.as_ref());
                    }
                    observer.composite_executed(&*ctx, at, composite);
                    match composite.connector() {
                        Some(connector) => next = follow(connector, &ai),
                        None => terminal = Some(at),
                    }
                }
                Some(ActionNode::Connector(connector)) => next = follow(connector, &ai),
            }
        }

        if let Some(location) = terminal {
            return Some(ActiveAction { ai, location });
        }
        match next {
            Some((next_ai, next_selector)) => {
                ai = next_ai;
                selector_id = next_selector;
            }
            None => return None,
        }
    }

    warn!(
        ai = %ai.id(),
        "decision walk exceeded {} connector hops; assuming a connector cycle",
        MAX_HOPS
    );
    None
}

fn follow<C: Context>(
    connector: &Connector<C>,
    current: &Rc<UtilityAi<C>>,
) -> Option<(Rc<UtilityAi<C>>, SelectorId)> {
    match connector {
        Connector::Selector(target) => Some((Rc::clone(current), *target)),
        Connector::Link(link) => {
            let ai = link.upgrade()?;
            let root = ai.root_id();
            Some((ai, root))
        }
    }
}
