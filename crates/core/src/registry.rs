use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::descriptor::PassDescriptor;
use crate::error::PassError;
use crate::id::PassId;
use crate::pass::{Pass, PassConstructor};

/// Lookup capability the pass manager depends on.
pub trait PassLookup: Send + Sync {
    /// Resolve the descriptor registered for `id`.
    fn pass_info(&self, id: PassId) -> Result<Arc<PassDescriptor>, PassError>;

    /// Find a pass by its long command-line token.
    fn find(&self, arg: &str) -> Option<PassId>;
}

/// Owns every registered pass type and allocates their ids.
#[derive(Default)]
pub struct PassRegistry {
    passes: Vec<Arc<PassDescriptor>>,
    by_name: HashMap<String, PassId>,
    by_arg: HashMap<String, PassId>,
}

impl PassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pass type. Names, argument strings and argument chars must
    /// be unique.
    pub fn register<F>(
        &mut self,
        name: &str,
        description: &str,
        arg_str: &str,
        arg_char: Option<char>,
        constructor: F,
    ) -> Result<PassId, PassError>
    where
        F: Fn() -> Box<dyn Pass> + Send + Sync + 'static,
    {
        self.insert(name, description, arg_str, arg_char, Box::new(constructor), None)
    }

    /// Like [`register`](Self::register), with a separate factory for the
    /// instance that only reports usage.
    pub fn register_with_internal<F, G>(
        &mut self,
        name: &str,
        description: &str,
        arg_str: &str,
        arg_char: Option<char>,
        constructor: F,
        internal_constructor: G,
    ) -> Result<PassId, PassError>
    where
        F: Fn() -> Box<dyn Pass> + Send + Sync + 'static,
        G: Fn() -> Box<dyn Pass> + Send + Sync + 'static,
    {
        self.insert(
            name,
            description,
            arg_str,
            arg_char,
            Box::new(constructor),
            Some(Box::new(internal_constructor)),
        )
    }

    fn insert(
        &mut self,
        name: &str,
        description: &str,
        arg_str: &str,
        arg_char: Option<char>,
        constructor: PassConstructor,
        internal_constructor: Option<PassConstructor>,
    ) -> Result<PassId, PassError> {
        if self.by_name.contains_key(name) {
            return Err(PassError::DuplicateName(name.to_string()));
        }
        if self.by_arg.contains_key(arg_str) {
            return Err(PassError::DuplicateArg(arg_str.to_string()));
        }
        if let Some(c) = arg_char {
            if self.passes.iter().any(|p| p.arg_char() == Some(c)) {
                return Err(PassError::DuplicateArg(c.to_string()));
            }
        }

        let id = PassId::new(self.passes.len() as u32);
        self.passes.push(Arc::new(PassDescriptor::new(
            id,
            name,
            description,
            arg_str,
            arg_char,
            constructor,
            internal_constructor,
        )));
        self.by_name.insert(name.to_string(), id);
        self.by_arg.insert(arg_str.to_string(), id);

        debug!("Registered pass: {} (--{}, id {})", name, arg_str, id);
        Ok(id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<PassId> {
        self.by_name.get(name).copied()
    }

    /// Mark a pass as selected on the command line.
    pub fn select(&self, id: PassId) -> Result<(), PassError> {
        self.pass_info(id)?.set_selected(true);
        Ok(())
    }

    pub fn select_arg(&self, arg: &str) -> Result<PassId, PassError> {
        let id = self
            .find(arg)
            .ok_or_else(|| PassError::UnknownArg(arg.to_string()))?;
        self.select(id)?;
        Ok(id)
    }

    pub fn clear_selection(&self) {
        for pass in &self.passes {
            pass.set_selected(false);
        }
    }

    /// All descriptors in id order.
    pub fn descriptors(&self) -> impl Iterator<Item = &Arc<PassDescriptor>> {
        self.passes.iter()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl PassLookup for PassRegistry {
    fn pass_info(&self, id: PassId) -> Result<Arc<PassDescriptor>, PassError> {
        self.passes
            .get(id.as_u32() as usize)
            .cloned()
            .ok_or(PassError::UnknownPass(id))
    }

    fn find(&self, arg: &str) -> Option<PassId> {
        self.by_arg.get(arg).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::PassResult;

    struct NoopPass;

    impl Pass for NoopPass {
        fn run(&mut self, _result: &mut PassResult) -> bool {
            true
        }
    }

    fn noop() -> Box<dyn Pass> {
        Box::new(NoopPass)
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = PassRegistry::new();
        let id = registry
            .register("Noop", "does nothing", "noop", Some('n'), noop)
            .unwrap();

        assert_eq!(registry.len(), 1);
        let info = registry.pass_info(id).unwrap();
        assert_eq!(info.name(), "Noop");
        assert_eq!(info.arg_string(), "noop");
        assert_eq!(info.arg_char(), Some('n'));
        assert!(info.is_pass_id(id));
        assert_eq!(registry.find("noop"), Some(id));
        assert_eq!(registry.find_by_name("Noop"), Some(id));
        assert!(registry.find("missing").is_none());
    }

    #[test]
    fn ids_follow_registration_order() {
        let mut registry = PassRegistry::new();
        let a = registry.register("A", "", "a", None, noop).unwrap();
        let b = registry.register("B", "", "b", None, noop).unwrap();
        assert!(a < b);
        let names: Vec<&str> = registry.descriptors().map(|d| d.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn duplicate_registration() {
        let mut registry = PassRegistry::new();
        registry.register("A", "", "a", Some('a'), noop).unwrap();

        assert!(matches!(
            registry.register("A", "", "other", None, noop),
            Err(PassError::DuplicateName(_))
        ));
        assert!(matches!(
            registry.register("B", "", "a", None, noop),
            Err(PassError::DuplicateArg(_))
        ));
        assert!(matches!(
            registry.register("C", "", "c", Some('a'), noop),
            Err(PassError::DuplicateArg(_))
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let registry = PassRegistry::new();
        assert!(matches!(
            registry.pass_info(PassId::new(9)),
            Err(PassError::UnknownPass(_))
        ));
    }

    #[test]
    fn selection_flags() {
        let mut registry = PassRegistry::new();
        let a = registry.register("A", "", "a", None, noop).unwrap();

        assert!(!registry.pass_info(a).unwrap().is_arg_selected());
        assert_eq!(registry.select_arg("a").unwrap(), a);
        assert!(registry.pass_info(a).unwrap().is_arg_selected());
        assert!(matches!(
            registry.select_arg("zzz"),
            Err(PassError::UnknownArg(_))
        ));

        registry.clear_selection();
        assert!(!registry.pass_info(a).unwrap().is_arg_selected());
    }

    #[test]
    fn change_counter_accumulates() {
        let mut registry = PassRegistry::new();
        let a = registry.register("A", "", "a", None, noop).unwrap();
        let info = registry.pass_info(a).unwrap();
        info.add_changes(3);
        info.add_changes(4);
        assert_eq!(info.changes(), 7);
    }
}
