use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::PassError;
use crate::id::PassId;

/// Run-scoped cache of pass outputs keyed by pass id.
///
/// Values are shared, so cloning a result (for example to seed a run from a
/// default) does not copy the stored outputs.
#[derive(Clone, Default)]
pub struct PassResult {
    values: HashMap<PassId, Arc<dyn Any + Send + Sync>>,
}

impl PassResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a value was stored for `id`.
    pub fn has(&self, id: PassId) -> bool {
        self.values.contains_key(&id)
    }

    /// Store `value` for `id`, replacing any previous value.
    pub fn set<T: Any + Send + Sync>(&mut self, id: PassId, value: T) {
        self.values.insert(id, Arc::new(value));
    }

    /// Borrow the value stored for `id` as a `T`.
    pub fn get<T: Any + Send + Sync>(&self, id: PassId) -> Result<&T, PassError> {
        let value = self.values.get(&id).ok_or(PassError::ResultMissing(id))?;
        value
            .downcast_ref::<T>()
            .ok_or(PassError::ResultTypeMismatch(id))
    }

    pub fn remove(&mut self, id: PassId) -> bool {
        self.values.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Ids with a stored value, in ascending order.
    pub fn ids(&self) -> Vec<PassId> {
        let mut ids: Vec<PassId> = self.values.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl fmt::Debug for PassResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassResult").field("ids", &self.ids()).finish()
    }
}
