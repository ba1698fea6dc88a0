use thiserror::Error;

use crate::SelectorId;

/// Structural misuse of a decision graph.
///
/// These are programmer errors surfaced synchronously; broken data
/// references (dangling selector ids, unresolved AI links) are not errors —
/// they degrade to "no action" during the walk instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The root selector must always be a member of its AI; re-root first.
    #[error("selector {0} is the root of its AI and cannot be removed")]
    RootRemoval(SelectorId),

    #[error("selector {0} is not a member of this AI")]
    UnknownSelector(SelectorId),
}
