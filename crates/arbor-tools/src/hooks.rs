use std::any::{Any, TypeId};
use std::collections::HashMap;

use arbor_core::{Action, Context, Scorer};

/// Per-type debug hooks, dispatched after a scorer scores or an action runs.
///
/// The static-registration replacement for reflection-discovered custom
/// visualizers: a concrete type opts in by returning `Some(self)` from its
/// `as_any`, and tooling registers a hook against that type here. Types
/// without a hook (or without `as_any`) are simply skipped.
pub struct HookRegistry<C: Context> {
    scorers: HashMap<TypeId, Box<dyn Fn(&dyn Any, &C, f32)>>,
    actions: HashMap<TypeId, Box<dyn Fn(&dyn Any, &C)>>,
}

impl<C: Context> HookRegistry<C> {
    pub fn new() -> Self {
        Self {
            scorers: HashMap::new(),
            actions: HashMap::new(),
        }
    }

    /// Invoke `hook` whenever a scorer of concrete type `T` produces a
    /// score.
    pub fn on_scorer<T: Any>(&mut self, hook: impl Fn(&T, &C, f32) + 'static) {
        self.scorers.insert(
            TypeId::of::<T>(),
            Box::new(move |any, ctx, score| {
                if let Some(scorer) = any.downcast_ref::<T>() {
                    hook(scorer, ctx, score);
                }
            }),
        );
    }

    /// Invoke `hook` whenever an action of concrete type `T` executes.
    pub fn on_action<T: Any>(&mut self, hook: impl Fn(&T, &C) + 'static) {
        self.actions.insert(
            TypeId::of::<T>(),
            Box::new(move |any, ctx| {
                if let Some(action) = any.downcast_ref::<T>() {
                    hook(action, ctx);
                }
            }),
        );
    }

    pub(crate) fn dispatch_scorer(&self, scorer: &dyn Scorer<C>, ctx: &C, score: f32) {
        if let Some(any) = scorer.as_any() {
            if let Some(hook) = self.scorers.get(&any.type_id()) {
                hook(any, ctx, score);
            }
        }
    }

    pub(crate) fn dispatch_action(&self, action: &dyn Action<C>, ctx: &C) {
        if let Some(any) = action.as_any() {
            if let Some(hook) = self.actions.get(&any.type_id()) {
                hook(any, ctx);
            }
        }
    }
}

impl<C: Context> Default for HookRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
