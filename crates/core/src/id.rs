use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a pass type.
///
/// Allocated by the registry in registration order, so ordering by id is
/// ordering by registration. Custom [`PassLookup`](crate::PassLookup)
/// implementations allocate their own with [`PassId::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassId(u32);

impl PassId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
