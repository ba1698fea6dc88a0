use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use arbor_core::{
    Action, ActionLocation, ActionNode, AiClient, AiRepository, Context, Qualifier, QualifierSlot,
    Scorer, Selector, UtilityAi,
};
use arbor_tools::{Breakpoint, CompareOp, VisualizedClient};
use arbor_utility::{CompositePolicy, CompositeScore, ContextualScorer, HighestScoreWins};

#[derive(Default)]
struct Sim {
    log: Vec<&'static str>,
}

impl Context for Sim {}

struct Named(&'static str);

impl Action<Sim> for Named {
    fn execute(&self, ctx: &mut Sim) {
        ctx.log.push(self.0);
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(self)
    }
}

fn fixed_qualifier(weight: f32, name: &'static str) -> Qualifier<Sim> {
    Qualifier::new(Box::new(ContextualScorer::fixed(weight)))
        .with_action(ActionNode::action(Named(name)))
}

fn two_branch_ai() -> UtilityAi<Sim> {
    let root = Selector::new(Box::new(HighestScoreWins))
        .with_qualifier(fixed_qualifier(1.0, "low"))
        .with_qualifier(fixed_qualifier(4.0, "high"));
    UtilityAi::new("watch", root)
}

#[test]
fn records_last_scores_and_the_high_scorer() {
    let ai = two_branch_ai();
    let ai_id = ai.id();
    let root_id = ai.root_id();

    let mut client = VisualizedClient::new(AiClient::new(Rc::new(ai)));
    let mut ctx = Sim::default();
    client.execute_once(&mut ctx);

    let selector = client
        .visualizer()
        .selector(ai_id, root_id)
        .expect("root selector is mirrored");
    assert_eq!(selector.qualifiers()[0].last_score(), Some(1.0));
    assert_eq!(selector.qualifiers()[1].last_score(), Some(4.0));
    assert!(!selector.qualifiers()[0].is_high_scorer());
    assert!(selector.qualifiers()[1].is_high_scorer());
    assert_eq!(selector.last_winner(), Some(QualifierSlot::Qualifier(1)));
    assert_eq!(selector.qualifiers()[1].action().unwrap().executions(), 1);
}

#[test]
fn observation_does_not_change_behavior() {
    let mut plain = AiClient::new(Rc::new(two_branch_ai()));
    let mut watched = VisualizedClient::new(AiClient::new(Rc::new(two_branch_ai())));

    let mut plain_ctx = Sim::default();
    let mut watched_ctx = Sim::default();

    for _ in 0..3 {
        let a = plain.execute_once(&mut plain_ctx);
        let b = watched.execute_once(&mut watched_ctx);
        assert_eq!(a.map(|at| at.slot), b.map(|at| at.slot));
    }

    assert_eq!(plain_ctx.log, watched_ctx.log);
}

#[test]
fn composite_child_scores_are_mirrored() {
    let scoring = CompositeScore::new(
        CompositePolicy::SumOfChildren,
        vec![
            Box::new(ContextualScorer::fixed(2.0)) as Box<dyn Scorer<Sim>>,
            Box::new(ContextualScorer::fixed(3.0)),
        ],
    );
    let root = Selector::new(Box::new(HighestScoreWins)).with_qualifier(
        Qualifier::new(Box::new(scoring)).with_action(ActionNode::action(Named("act"))),
    );
    let ai = UtilityAi::new("squad", root);
    let at = ActionLocation {
        ai: ai.id(),
        selector: ai.root_id(),
        slot: QualifierSlot::Qualifier(0),
    };

    let mut client = VisualizedClient::new(AiClient::new(Rc::new(ai)));
    let mut ctx = Sim::default();
    client.execute_once(&mut ctx);

    let mirror = client.visualizer().qualifier(at).expect("slot is mirrored");
    assert_eq!(mirror.last_score(), Some(5.0));
    assert_eq!(mirror.scorers().len(), 2);
    assert_eq!(mirror.scorers()[0].last_score(), Some(2.0));
    assert_eq!(mirror.scorers()[1].last_score(), Some(3.0));
}

#[test]
fn conditional_breakpoint_hits_only_when_the_condition_holds() {
    let ai = two_branch_ai();
    let low = ActionLocation {
        ai: ai.id(),
        selector: ai.root_id(),
        slot: QualifierSlot::Qualifier(0),
    };
    let high = ActionLocation {
        ai: ai.id(),
        selector: ai.root_id(),
        slot: QualifierSlot::Qualifier(1),
    };

    let mut client = VisualizedClient::new(AiClient::new(Rc::new(ai)));
    assert!(client
        .visualizer()
        .set_breakpoint(low, Breakpoint::when(CompareOp::Above, 3.0)));
    assert!(client
        .visualizer()
        .set_breakpoint(high, Breakpoint::when(CompareOp::Above, 3.0)));

    let mut ctx = Sim::default();
    client.execute_once(&mut ctx);

    let visualizer = client.visualizer();
    assert!(!visualizer.qualifier(low).unwrap().breakpoint_hit());
    assert!(visualizer.qualifier(high).unwrap().breakpoint_hit());
    assert_eq!(visualizer.hit_breakpoints(), vec![high]);

    visualizer.clear_hits();
    assert!(visualizer.hit_breakpoints().is_empty());
}

#[test]
fn unconditional_breakpoint_hits_after_any_score() {
    let ai = two_branch_ai();
    let low = ActionLocation {
        ai: ai.id(),
        selector: ai.root_id(),
        slot: QualifierSlot::Qualifier(0),
    };

    let mut client = VisualizedClient::new(AiClient::new(Rc::new(ai)));
    client
        .visualizer()
        .set_breakpoint(low, Breakpoint::unconditional());

    let mut ctx = Sim::default();
    client.execute_once(&mut ctx);

    assert!(client.visualizer().qualifier(low).unwrap().breakpoint_hit());
}

#[test]
fn shared_linked_ai_is_mirrored_exactly_once() {
    let scan_root = Selector::new(Box::new(HighestScoreWins))
        .with_qualifier(fixed_qualifier(2.0, "scan"));
    let linked = UtilityAi::new("scanner", scan_root);
    let linked_id = linked.id();

    // Two branches route into the same linked AI.
    let root = Selector::new(Box::new(HighestScoreWins))
        .with_qualifier(
            Qualifier::new(Box::new(ContextualScorer::fixed(3.0)))
                .with_action(ActionNode::to_ai(linked_id)),
        )
        .with_qualifier(
            Qualifier::new(Box::new(ContextualScorer::fixed(1.0)))
                .with_action(ActionNode::to_ai(linked_id)),
        );
    let entry = UtilityAi::new("entry", root);
    let entry_id = entry.id();

    let mut repo = AiRepository::new();
    repo.insert(linked);
    repo.insert(entry);
    repo.resolve_links();

    let client = repo.client(entry_id).expect("ai is stored");
    let watched = VisualizedClient::new(client);

    assert_eq!(watched.visualizer().mirrored_ais(), 2);
}

#[test]
fn per_type_hooks_fire_for_scorers_and_actions() {
    struct Flashy {
        value: f32,
    }

    impl Scorer<Sim> for Flashy {
        fn score(&self, _ctx: &Sim) -> f32 {
            self.value
        }

        fn as_any(&self) -> Option<&dyn Any> {
            Some(self)
        }
    }

    let root = Selector::new(Box::new(HighestScoreWins)).with_qualifier(
        Qualifier::new(Box::new(Flashy { value: 7.0 }))
            .with_action(ActionNode::action(Named("glow"))),
    );
    let ai = UtilityAi::new("beacon", root);

    let mut client = VisualizedClient::new(AiClient::new(Rc::new(ai)));

    let scored: Rc<RefCell<Vec<f32>>> = Rc::new(RefCell::new(Vec::new()));
    let scored_sink = Rc::clone(&scored);
    client
        .visualizer_mut()
        .hooks_mut()
        .on_scorer::<Flashy>(move |scorer, _ctx, score| {
            assert_eq!(scorer.value, score);
            scored_sink.borrow_mut().push(score);
        });

    let ran: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
    let ran_sink = Rc::clone(&ran);
    client
        .visualizer_mut()
        .hooks_mut()
        .on_action::<Named>(move |action, _ctx| {
            ran_sink.borrow_mut().push(action.0);
        });

    let mut ctx = Sim::default();
    client.execute_once(&mut ctx);

    assert_eq!(*scored.borrow(), vec![7.0]);
    assert_eq!(*ran.borrow(), vec!["glow"]);
}

#[test]
fn reset_clears_recorded_state_but_keeps_breakpoints() {
    let ai = two_branch_ai();
    let low = ActionLocation {
        ai: ai.id(),
        selector: ai.root_id(),
        slot: QualifierSlot::Qualifier(0),
    };

    let mut client = VisualizedClient::new(AiClient::new(Rc::new(ai)));
    client
        .visualizer()
        .set_breakpoint(low, Breakpoint::unconditional());

    let mut ctx = Sim::default();
    client.execute_once(&mut ctx);

    let visualizer = client.visualizer();
    visualizer.reset();

    let mirror = visualizer.qualifier(low).unwrap();
    assert_eq!(mirror.last_score(), None);
    assert!(!mirror.breakpoint_hit());
    assert!(mirror.breakpoint().is_some());
}
