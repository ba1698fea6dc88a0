use std::collections::HashMap;

use tracing::warn;

use crate::{ActionNode, AiId, Connector, Context, GraphError, Selector, SelectorId};

/// A utility AI: an arena of selectors with a designated root.
///
/// Selector-to-selector references inside the AI are stored as
/// [`SelectorId`]s and resolved through the id map, so a graph with cycles
/// round-trips through persistence intact. The root is always a member: it
/// is installed at construction and the mutation surface refuses to remove
/// it.
pub struct UtilityAi<C: Context> {
    id: AiId,
    name: String,
    selectors: Vec<Selector<C>>,
    root: SelectorId,
    index: HashMap<SelectorId, usize>,
}

impl<C: Context> UtilityAi<C> {
    pub fn new(name: impl Into<String>, root: Selector<C>) -> Self {
        let root_id = root.id();
        let mut ai = Self {
            id: AiId::new(),
            name: name.into(),
            selectors: vec![root],
            root: root_id,
            index: HashMap::new(),
        };
        ai.reindex();
        ai
    }

    pub fn with_id(mut self, id: AiId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> AiId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn root_id(&self) -> SelectorId {
        self.root
    }

    pub fn root_selector(&self) -> &Selector<C> {
        &self.selectors[self.index[&self.root]]
    }

    pub fn selectors(&self) -> &[Selector<C>] {
        &self.selectors
    }

    pub fn selectors_mut(&mut self) -> &mut [Selector<C>] {
        &mut self.selectors
    }

    /// Resolve a selector reference to the live node.
    pub fn selector(&self, id: SelectorId) -> Option<&Selector<C>> {
        let index = *self.index.get(&id)?;
        self.selectors.get(index)
    }

    pub fn selector_mut(&mut self, id: SelectorId) -> Option<&mut Selector<C>> {
        let index = *self.index.get(&id)?;
        self.selectors.get_mut(index)
    }

    pub fn add_selector(&mut self, selector: Selector<C>) -> SelectorId {
        let id = selector.id();
        self.selectors.push(selector);
        self.index.insert(id, self.selectors.len() - 1);
        id
    }

    /// Remove a selector. Removing the root is refused: the AI must always
    /// have a root member.
    pub fn remove_selector(&mut self, id: SelectorId) -> Result<Selector<C>, GraphError> {
        if id == self.root {
            return Err(GraphError::RootRemoval(id));
        }
        let index = *self
            .index
            .get(&id)
            .ok_or(GraphError::UnknownSelector(id))?;
        let removed = self.selectors.remove(index);
        self.reindex();
        Ok(removed)
    }

    /// Swap one selector for another, preserving its position. Replacing the
    /// root re-roots the AI to the replacement.
    pub fn replace_selector(
        &mut self,
        id: SelectorId,
        selector: Selector<C>,
    ) -> Result<Selector<C>, GraphError> {
        let index = *self
            .index
            .get(&id)
            .ok_or(GraphError::UnknownSelector(id))?;
        if id == self.root {
            self.root = selector.id();
        }
        let replaced = std::mem::replace(&mut self.selectors[index], selector);
        self.reindex();
        Ok(replaced)
    }

    pub fn set_root(&mut self, id: SelectorId) -> Result<(), GraphError> {
        if !self.index.contains_key(&id) {
            return Err(GraphError::UnknownSelector(id));
        }
        self.root = id;
        Ok(())
    }

    /// Give the AI and all of its selectors fresh identities, remapping
    /// internal connector references along the way; used when cloning an
    /// authored AI. Links to other AIs are left untouched.
    pub fn regenerate_ids(&mut self) {
        self.id = AiId::new();
        let remap: HashMap<SelectorId, SelectorId> = self
            .selectors
            .iter()
            .map(|selector| (selector.id(), SelectorId::new()))
            .collect();
        for selector in &mut self.selectors {
            let fresh = remap[&selector.id()];
            selector.set_id(fresh);
        }
        self.root = remap[&self.root];
        self.visit_connectors_mut(|connector| {
            if let Connector::Selector(target) = connector {
                if let Some(fresh) = remap.get(target) {
                    *target = *fresh;
                }
            }
        });
        self.reindex();
    }

    /// Reset transient link state so only stable ids remain live; call
    /// before handing the graph to a serialization engine.
    pub fn prepare_for_save(&self) {
        self.visit_connectors(|connector| {
            if let Connector::Link(link) = connector {
                link.reset();
            }
        });
    }

    /// Rebuild the id map after deserialization, warning once for each
    /// selector reference that no longer resolves. Cross-AI links are
    /// resolved separately by the repository.
    pub fn initialize(&mut self) {
        self.reindex();
        let index = &self.index;
        let id = self.id;
        self.visit_connectors(|connector| {
            if let Connector::Selector(target) = connector {
                if !index.contains_key(target) {
                    warn!(
                        ai = %id,
                        selector = %target,
                        "dangling selector reference; connector degrades to no action"
                    );
                }
            }
        });
    }

    pub(crate) fn visit_connectors(&self, mut f: impl FnMut(&Connector<C>)) {
        for selector in &self.selectors {
            for qualifier in selector.qualifiers() {
                if let Some(connector) = qualifier.action().and_then(ActionNode::connector) {
                    f(connector);
                }
            }
            if let Some(connector) = selector
                .default_qualifier()
                .action()
                .and_then(ActionNode::connector)
            {
                f(connector);
            }
        }
    }

    fn visit_connectors_mut(&mut self, mut f: impl FnMut(&mut Connector<C>)) {
        for selector in &mut self.selectors {
            for qualifier in selector.qualifiers_mut() {
                if let Some(connector) = qualifier.action_mut().and_then(ActionNode::connector_mut)
                {
                    f(connector);
                }
            }
            if let Some(connector) = selector
                .default_qualifier_mut()
                .action_mut()
                .and_then(ActionNode::connector_mut)
            {
                f(connector);
            }
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .selectors
            .iter()
            .enumerate()
            .map(|(index, selector)| (selector.id(), index))
            .collect();
    }
}
