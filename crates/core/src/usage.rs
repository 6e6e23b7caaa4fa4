use std::collections::BTreeSet;

use crate::id::PassId;

/// Dependency declaration a pass fills in for one manager run.
///
/// Nothing is validated here; ids are resolved when the manager looks them up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassUsage {
    requires: BTreeSet<PassId>,
    provides: BTreeSet<PassId>,
}

impl PassUsage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `id` must run before the declaring pass.
    pub fn require(&mut self, id: PassId) -> &mut Self {
        self.requires.insert(id);
        self
    }

    /// Declare that the declaring pass makes `id` available to others.
    pub fn provide(&mut self, id: PassId) -> &mut Self {
        self.provides.insert(id);
        self
    }

    pub fn requires(&self) -> &BTreeSet<PassId> {
        &self.requires
    }

    pub fn provides(&self) -> &BTreeSet<PassId> {
        &self.provides
    }
}
