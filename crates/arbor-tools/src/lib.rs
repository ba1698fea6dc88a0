//! Debug tooling for arbor decision graphs.
//!
//! Everything here observes; nothing here decides. The visualizer mirrors a
//! live graph's shape and records evaluation state as walks happen, event
//! logs capture walks as dumb data for later rendering, and the hook
//! registry dispatches per-type custom visualizers.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod events;
pub mod hooks;
pub mod visualizer;

pub use events::{DecisionEvent, EventLog};
pub use hooks::HookRegistry;
pub use visualizer::{
    ActionMirror, AiVisualizer, Breakpoint, BreakpointCondition, CompareOp, QualifierMirror,
    ScorerMirror, SelectorMirror, VisualizedClient,
};
