use std::cell::RefCell;

use arbor_core::{
    ActionNode, Context, DefaultQualifier, Qualifier, QualifierSlot, Scorer, SelectionPolicy,
    Selector,
};
use arbor_utility::{ContextualScorer, FirstAboveDefault, HighestScoreWins};

#[derive(Default)]
struct Arena {
    scored: RefCell<Vec<&'static str>>,
}

impl Context for Arena {}

/// Scorer that logs every evaluation so laziness is observable.
struct Tracked {
    name: &'static str,
    score: f32,
    disabled: bool,
}

impl Tracked {
    fn new(name: &'static str, score: f32) -> Self {
        Self {
            name,
            score,
            disabled: false,
        }
    }

    fn disabled(name: &'static str, score: f32) -> Self {
        Self {
            name,
            score,
            disabled: true,
        }
    }
}

impl Scorer<Arena> for Tracked {
    fn score(&self, ctx: &Arena) -> f32 {
        ctx.scored.borrow_mut().push(self.name);
        self.score
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

#[test]
fn highest_score_wins_falls_back_to_default() {
    let ctx = Arena::default();
    let a = Tracked::new("a", 0.5);
    let b = Tracked::new("b", -1.0);
    let candidates: Vec<&dyn Scorer<Arena>> = vec![&a, &b];

    assert_eq!(HighestScoreWins.select(&ctx, &candidates, 1.0), None);
}

#[test]
fn highest_score_wins_picks_the_strict_maximum() {
    let ctx = Arena::default();
    let a = Tracked::new("a", 1.0);
    let b = Tracked::new("b", 3.0);
    let c = Tracked::new("c", 2.0);
    let candidates: Vec<&dyn Scorer<Arena>> = vec![&a, &b, &c];

    assert_eq!(HighestScoreWins.select(&ctx, &candidates, 0.0), Some(1));
}

#[test]
fn highest_score_wins_ties_go_to_the_earlier_candidate() {
    let ctx = Arena::default();
    let a = Tracked::new("a", 3.0);
    let b = Tracked::new("b", 3.0);
    let candidates: Vec<&dyn Scorer<Arena>> = vec![&a, &b];

    assert_eq!(HighestScoreWins.select(&ctx, &candidates, 0.0), Some(0));
}

#[test]
fn matching_the_default_score_loses_to_the_default() {
    let ctx = Arena::default();
    let a = Tracked::new("a", 2.0);
    let b = Tracked::new("b", 2.0);
    let candidates: Vec<&dyn Scorer<Arena>> = vec![&a, &b];

    assert_eq!(HighestScoreWins.select(&ctx, &candidates, 2.0), None);
}

#[test]
fn disabled_candidates_are_never_scored() {
    let ctx = Arena::default();
    let a = Tracked::disabled("a", 100.0);
    let b = Tracked::new("b", 1.0);
    let candidates: Vec<&dyn Scorer<Arena>> = vec![&a, &b];

    assert_eq!(HighestScoreWins.select(&ctx, &candidates, 0.0), Some(1));
    assert_eq!(*ctx.scored.borrow(), vec!["b"]);

    ctx.scored.borrow_mut().clear();
    assert_eq!(FirstAboveDefault.select(&ctx, &candidates, 0.0), Some(1));
    assert_eq!(*ctx.scored.borrow(), vec!["b"]);
}

#[test]
fn first_above_default_returns_the_first_qualifying_candidate() {
    let ctx = Arena::default();
    let a = Tracked::new("a", 0.1);
    let b = Tracked::new("b", 2.0);
    let c = Tracked::new("c", 9.0);
    let candidates: Vec<&dyn Scorer<Arena>> = vec![&a, &b, &c];

    assert_eq!(FirstAboveDefault.select(&ctx, &candidates, 0.5), Some(1));
    // Evaluation is lazy: the third candidate is never scored.
    assert_eq!(*ctx.scored.borrow(), vec!["a", "b"]);
}

#[test]
fn first_above_default_falls_back_when_nothing_qualifies() {
    let ctx = Arena::default();
    let a = Tracked::new("a", 0.5);
    let candidates: Vec<&dyn Scorer<Arena>> = vec![&a];

    assert_eq!(FirstAboveDefault.select(&ctx, &candidates, 0.5), None);
}

#[test]
fn selector_with_zero_qualifiers_selects_the_default() {
    struct Rest;
    impl arbor_core::Action<Arena> for Rest {
        fn execute(&self, _ctx: &mut Arena) {}
    }

    let selector: Selector<Arena> = Selector::new(Box::new(HighestScoreWins))
        .with_default(DefaultQualifier::new(1.0).with_action(ActionNode::action(Rest)));
    let ctx = Arena::default();

    assert_eq!(selector.select_slot(&ctx), QualifierSlot::Default);
    assert!(selector.select(&ctx).is_some());
}

#[test]
fn selector_maps_the_policy_winner_to_its_qualifier() {
    let selector: Selector<Arena> = Selector::new(Box::new(HighestScoreWins))
        .with_qualifier(Qualifier::new(Box::new(ContextualScorer::fixed(1.0))))
        .with_qualifier(Qualifier::new(Box::new(ContextualScorer::fixed(4.0))));
    let ctx = Arena::default();

    assert_eq!(selector.select_slot(&ctx), QualifierSlot::Qualifier(1));
}

#[test]
fn disabled_qualifiers_are_skipped_by_selection() {
    let selector: Selector<Arena> = Selector::new(Box::new(HighestScoreWins))
        .with_qualifier(
            Qualifier::new(Box::new(ContextualScorer::fixed(9.0))).with_disabled(true),
        )
        .with_qualifier(Qualifier::new(Box::new(ContextualScorer::fixed(1.0))));
    let ctx = Arena::default();

    assert_eq!(selector.select_slot(&ctx), QualifierSlot::Qualifier(1));
}
