use std::any::Any;

use arbor_core::{Context, Scorer};

/// Designer-weighted leaf scorer: a weight plus an evaluation over context.
///
/// The evaluation receives the weight so the two ubiquitous authoring shapes
/// stay one-liners: [`fixed`](Self::fixed) ("always worth w") and
/// [`when`](Self::when) ("worth w while the predicate holds").
pub struct ContextualScorer<C: Context> {
    weight: f32,
    disabled: bool,
    eval: Box<dyn Fn(&C, f32) -> f32>,
}

impl<C: Context> ContextualScorer<C> {
    pub fn new(weight: f32, eval: impl Fn(&C, f32) -> f32 + 'static) -> Self {
        Self {
            weight,
            disabled: false,
            eval: Box::new(eval),
        }
    }

    /// Always worth the weight.
    pub fn fixed(weight: f32) -> Self {
        Self::new(weight, |_, weight| weight)
    }

    /// Worth the weight while the predicate holds, zero otherwise.
    pub fn when(weight: f32, predicate: impl Fn(&C) -> bool + 'static) -> Self {
        Self::new(
            weight,
            move |ctx, weight| if predicate(ctx) { weight } else { 0.0 },
        )
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

impl<C: Context> Scorer<C> for ContextualScorer<C> {
    fn score(&self, ctx: &C) -> f32 {
        (self.eval)(ctx, self.weight)
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}
