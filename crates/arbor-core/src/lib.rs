//! Engine-agnostic utility AI decision-graph kernel.
//!
//! Selectors choose among scored qualifiers; winning actions execute against
//! a caller-supplied context; connector actions route the walk into sibling
//! selectors or linked AIs. The kernel is synchronous and single-threaded:
//! one [`AiClient::execute_once`] call per entity per decision tick.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod ai;
pub mod client;
pub mod context;
pub mod error;
pub mod id;
pub mod observer;
pub mod qualifier;
pub mod repository;
pub mod scorer;
pub mod selector;

pub use action::{Action, ActionNode, AiLink, CompositeAction, Connector};
pub use ai::UtilityAi;
pub use client::AiClient;
pub use context::Context;
pub use error::GraphError;
pub use id::{AiId, SelectorId};
pub use observer::{DecisionObserver, NoopObserver};
pub use qualifier::{DefaultQualifier, Qualifier};
pub use repository::AiRepository;
pub use scorer::{ScoreObserver, Scorer};
pub use selector::{ActionLocation, QualifierSlot, SelectionPolicy, Selector};
