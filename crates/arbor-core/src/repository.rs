use std::collections::HashMap;
use std::rc::Rc;

use crate::{AiClient, AiId, Connector, Context, UtilityAi};

/// Id-keyed store of shared AIs; the lookup root for cross-AI links.
pub struct AiRepository<C: Context> {
    ais: HashMap<AiId, Rc<UtilityAi<C>>>,
}

impl<C: Context> AiRepository<C> {
    pub fn new() -> Self {
        Self {
            ais: HashMap::new(),
        }
    }

    /// Initialize and store an AI. Call
    /// [`resolve_links`](Self::resolve_links) once every AI of the set is
    /// inserted.
    pub fn insert(&mut self, mut ai: UtilityAi<C>) -> AiId {
        ai.initialize();
        let id = ai.id();
        self.ais.insert(id, Rc::new(ai));
        id
    }

    pub fn get(&self, id: AiId) -> Option<&Rc<UtilityAi<C>>> {
        self.ais.get(&id)
    }

    pub fn remove(&mut self, id: AiId) -> Option<Rc<UtilityAi<C>>> {
        self.ais.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.ais.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ais.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = AiId> + '_ {
        self.ais.keys().copied()
    }

    /// Second load phase: resolve every cross-AI link in every stored AI.
    /// Links whose target is missing become broken stand-ins and warn once;
    /// they never fail a decision walk.
    pub fn resolve_links(&self) {
        for ai in self.ais.values() {
            ai.visit_connectors(|connector| {
                if let Connector::Link(link) = connector {
                    link.resolve(self.ais.get(&link.target()));
                }
            });
        }
    }

    /// A per-entity driver for a stored AI.
    pub fn client(&self, id: AiId) -> Option<AiClient<C>> {
        self.ais.get(&id).map(|ai| AiClient::new(Rc::clone(ai)))
    }
}

impl<C: Context> Default for AiRepository<C> {
    fn default() -> Self {
        Self::new()
    }
}
