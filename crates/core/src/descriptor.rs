use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::id::PassId;
use crate::pass::{Pass, PassConstructor};

/// Static description of a pass type, created once at registration.
pub struct PassDescriptor {
    name: String,
    description: String,
    arg_str: String,
    arg_char: Option<char>,
    id: PassId,
    constructor: PassConstructor,
    internal_constructor: Option<PassConstructor>,
    changes: AtomicU64,
    selected: AtomicBool,
}

impl PassDescriptor {
    pub fn new(
        id: PassId,
        name: &str,
        description: &str,
        arg_str: &str,
        arg_char: Option<char>,
        constructor: PassConstructor,
        internal_constructor: Option<PassConstructor>,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            arg_str: arg_str.to_string(),
            arg_char,
            id,
            constructor,
            internal_constructor,
            changes: AtomicU64::new(0),
            selected: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Long command-line token, e.g. `pm-dump`.
    pub fn arg_string(&self) -> &str {
        &self.arg_str
    }

    pub fn arg_char(&self) -> Option<char> {
        self.arg_char
    }

    pub fn id(&self) -> PassId {
        self.id
    }

    pub fn is_pass_id(&self, id: PassId) -> bool {
        self.id == id
    }

    /// Fresh instance for a scheduled slot.
    pub fn construct_pass(&self) -> Box<dyn Pass> {
        (self.constructor)()
    }

    /// Instance used only to harvest the usage declaration.
    pub fn construct_internal_pass(&self) -> Box<dyn Pass> {
        match &self.internal_constructor {
            Some(constructor) => constructor(),
            None => (self.constructor)(),
        }
    }

    pub fn add_changes(&self, changes: u64) {
        self.changes.fetch_add(changes, Ordering::Relaxed);
    }

    /// Cumulative changes reported by successful runs of this pass type.
    pub fn changes(&self) -> u64 {
        self.changes.load(Ordering::Relaxed)
    }

    pub fn is_arg_selected(&self) -> bool {
        self.selected.load(Ordering::Relaxed)
    }

    pub fn set_selected(&self, selected: bool) {
        self.selected.store(selected, Ordering::Relaxed);
    }
}

impl fmt::Debug for PassDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassDescriptor")
            .field("name", &self.name)
            .field("arg_str", &self.arg_str)
            .field("arg_char", &self.arg_char)
            .field("id", &self.id)
            .field("changes", &self.changes())
            .field("selected", &self.is_arg_selected())
            .finish()
    }
}
