use crate::{ActionNode, Context, ScoreObserver, Scorer};

/// A scored candidate branch of a [`Selector`](crate::Selector).
///
/// Scoring is delegated to a boxed [`Scorer`] strategy; the qualifier itself
/// contributes the disabled flag and the action taken when it wins.
pub struct Qualifier<C: Context> {
    disabled: bool,
    scoring: Box<dyn Scorer<C>>,
    action: Option<ActionNode<C>>,
}

impl<C: Context> Qualifier<C> {
    pub fn new(scoring: Box<dyn Scorer<C>>) -> Self {
        Self {
            disabled: false,
            scoring,
            action: None,
        }
    }

    pub fn with_action(mut self, action: ActionNode<C>) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn scoring(&self) -> &dyn Scorer<C> {
        self.scoring.as_ref()
    }

    pub fn action(&self) -> Option<&ActionNode<C>> {
        self.action.as_ref()
    }

    pub fn action_mut(&mut self) -> Option<&mut ActionNode<C>> {
        self.action.as_mut()
    }

    pub fn set_action(&mut self, action: Option<ActionNode<C>>) {
        self.action = action;
    }
}

impl<C: Context> Scorer<C> for Qualifier<C> {
    fn score(&self, ctx: &C) -> f32 {
        self.scoring.score(ctx)
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn score_observed(&self, ctx: &C, observer: &dyn ScoreObserver<C>) -> f32 {
        self.scoring.score_observed(ctx, observer)
    }

    fn child_count(&self) -> usize {
        self.scoring.child_count()
    }
}

/// The fallback branch every selector carries.
///
/// Its score is fixed rather than computed, and a selector holds one by
/// value: there is no way to leave a selector without somewhere to land.
pub struct DefaultQualifier<C: Context> {
    score: f32,
    action: Option<ActionNode<C>>,
}

impl<C: Context> DefaultQualifier<C> {
    pub fn new(score: f32) -> Self {
        Self {
            score,
            action: None,
        }
    }

    pub fn with_action(mut self, action: ActionNode<C>) -> Self {
        self.action = Some(action);
        self
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn set_score(&mut self, score: f32) {
        self.score = score;
    }

    pub fn action(&self) -> Option<&ActionNode<C>> {
        self.action.as_ref()
    }

    pub fn action_mut(&mut self) -> Option<&mut ActionNode<C>> {
        self.action.as_mut()
    }

    pub fn set_action(&mut self, action: Option<ActionNode<C>>) {
        self.action = action;
    }
}

impl<C: Context> Default for DefaultQualifier<C> {
    fn default() -> Self {
        Self::new(0.0)
    }
}
