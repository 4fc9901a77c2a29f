use indexmap::IndexMap;

use crate::value::Context;

/// A render remembered for replay: what went into which target.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedRender {
    pub target: String,
    pub template_id: String,
    pub data: Option<Context>,
}

/// Renders that should be redrawn when something global changes, such as
/// the active locale.
///
/// Entries are keyed by target. Registering a target again replaces its
/// entry but keeps its original position, so replays happen in the order
/// targets were first registered. Data is captured at registration time and
/// never refreshed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistenceStore {
    entries: IndexMap<String, PersistedRender>,
}

impl PersistenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an entry, returning the one it replaced.
    pub fn insert(&mut self, entry: PersistedRender) -> Option<PersistedRender> {
        self.entries.insert(entry.target.clone(), entry)
    }

    pub fn get<T: AsRef<str>>(&self, target: T) -> Option<&PersistedRender> {
        self.entries.get(target.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &PersistedRender> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
