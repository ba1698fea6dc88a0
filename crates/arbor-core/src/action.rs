use std::any::Any;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::warn;

use crate::{AiId, Context, SelectorId, UtilityAi};

/// An executable effect at a leaf of the decision walk.
pub trait Action<C: Context>: 'static {
    /// Run the action's effect against the context.
    fn execute(&self, ctx: &mut C);

    /// Called when a later decision cycle supersedes this action with a
    /// different one. Actions holding transient state in the context
    /// override this to clean up; the default does nothing.
    fn terminate(&self, _ctx: &mut C) {}

    /// Concrete-type handle for per-type debug visualizers. Implementations
    /// that want custom visualization return `Some(self)`.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }
}

/// The node shapes the decision walk discriminates on.
pub enum ActionNode<C: Context> {
    /// Leaf action: executed once per decision cycle while it stays
    /// selected; reaching it ends the walk.
    Single(Box<dyn Action<C>>),
    /// Runs its children immediately, then optionally hands the walk to a
    /// connector.
    Composite(CompositeAction<C>),
    /// Pure routing: continues the walk without executing anything.
    Connector(Connector<C>),
}

impl<C: Context> ActionNode<C> {
    /// Wrap a leaf action.
    pub fn action(action: impl Action<C>) -> Self {
        Self::Single(Box::new(action))
    }

    /// Route to a sibling selector in the same AI.
    pub fn to_selector(target: SelectorId) -> Self {
        Self::Connector(Connector::Selector(target))
    }

    /// Route into another AI's root selector.
    pub fn to_ai(target: AiId) -> Self {
        Self::Connector(Connector::Link(AiLink::new(target)))
    }

    /// The connector this node continues the walk through, if any.
    pub fn connector(&self) -> Option<&Connector<C>> {
        match self {
            Self::Single(_) => None,
            Self::Composite(composite) => composite.connector(),
            Self::Connector(connector) => Some(connector),
        }
    }

    pub(crate) fn connector_mut(&mut self) -> Option<&mut Connector<C>> {
        match self {
            Self::Single(_) => None,
            Self::Composite(composite) => composite.connector_mut(),
            Self::Connector(connector) => Some(connector),
        }
    }

    /// Notify the node that it has been superseded.
    pub fn terminate(&self, ctx: &mut C) {
        match self {
            Self::Single(action) => action.terminate(ctx),
            Self::Composite(composite) => composite.terminate(ctx),
            Self::Connector(_) => {}
        }
    }
}

impl<C: Context> From<CompositeAction<C>> for ActionNode<C> {
    fn from(composite: CompositeAction<C>) -> Self {
        Self::Composite(composite)
    }
}

/// An ordered list of child actions run as one step of the walk, with an
/// optional connector continuing the walk afterwards.
pub struct CompositeAction<C: Context> {
    children: Vec<Box<dyn Action<C>>>,
    connector: Option<Connector<C>>,
    fan_out_termination: bool,
}

impl<C: Context> CompositeAction<C> {
    /// A composite that does NOT forward `terminate` to its children.
    ///
    /// Children needing cleanup when the composite is superseded belong in a
    /// [`terminable`](Self::terminable) composite instead.
    pub fn new(children: Vec<Box<dyn Action<C>>>) -> Self {
        Self {
            children,
            connector: None,
            fan_out_termination: false,
        }
    }

    /// A composite that fans `terminate` out to every child.
    pub fn terminable(children: Vec<Box<dyn Action<C>>>) -> Self {
        Self {
            fan_out_termination: true,
            ..Self::new(children)
        }
    }

    /// Continue the walk through `connector` after the children have run.
    pub fn with_connector(mut self, connector: Connector<C>) -> Self {
        self.connector = Some(connector);
        self
    }

    pub fn children(&self) -> &[Box<dyn Action<C>>] {
        &self.children
    }

    pub fn connector(&self) -> Option<&Connector<C>> {
        self.connector.as_ref()
    }

    pub(crate) fn connector_mut(&mut self) -> Option<&mut Connector<C>> {
        self.connector.as_mut()
    }

    pub fn fans_out_termination(&self) -> bool {
        self.fan_out_termination
    }

    pub fn terminate(&self, ctx: &mut C) {
        if self.fan_out_termination {
            for child in &self.children {
                child.terminate(ctx);
            }
        }
    }
}

/// Routing target of a connector node.
pub enum Connector<C: Context> {
    /// A sibling selector in the owning AI, referenced by id so a graph with
    /// cycles survives persistence.
    Selector(SelectorId),
    /// The root selector of another AI.
    Link(AiLink<C>),
}

/// Reference to another AI, resolved against a repository after load.
///
/// An unresolved or dead link yields no action forever instead of failing
/// the walk.
pub struct AiLink<C: Context> {
    target: AiId,
    state: RefCell<LinkState<C>>,
}

enum LinkState<C: Context> {
    /// Freshly built or freshly deserialized; not resolved yet.
    Pending,
    /// Resolution failed; the broken-link stand-in.
    Broken,
    Linked(Weak<UtilityAi<C>>),
}

impl<C: Context> AiLink<C> {
    pub fn new(target: AiId) -> Self {
        Self {
            target,
            state: RefCell::new(LinkState::Pending),
        }
    }

    pub fn target(&self) -> AiId {
        self.target
    }

    pub fn is_broken(&self) -> bool {
        matches!(*self.state.borrow(), LinkState::Broken)
    }

    /// The linked AI, if the link has been resolved and the target is still
    /// alive.
    pub fn upgrade(&self) -> Option<Rc<UtilityAi<C>>> {
        match &*self.state.borrow() {
            LinkState::Linked(weak) => weak.upgrade(),
            _ => None,
        }
    }

    pub(crate) fn resolve(&self, found: Option<&Rc<UtilityAi<C>>>) {
        let mut state = self.state.borrow_mut();
        match found {
            Some(ai) => *state = LinkState::Linked(Rc::downgrade(ai)),
            None => {
                warn!(
                    linked = %self.target,
                    "linked AI not found; link degrades to no action"
                );
                *state = LinkState::Broken;
            }
        }
    }

    /// Forget any resolution so only the stable id remains live; part of
    /// preparing a graph for serialization.
    pub(crate) fn reset(&self) {
        *self.state.borrow_mut() = LinkState::Pending;
    }
}
