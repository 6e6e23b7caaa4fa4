use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use libpass_core::{
    ManagerConfig, Pass, PassError, PassId, PassLookup, PassRegistry, PassResult, PassStream,
    PassUsage,
};
use tracing::info;

use crate::metrics::ManagerMetrics;

/// Name the manager registers itself under.
pub const MANAGER_NAME: &str = "PassManager";
pub const MANAGER_DESCRIPTION: &str = "displays the pass manager calculated pass dependency graph";
/// Command-line token that switches a run into the dependency graph dump.
pub const MANAGER_ARG: &str = "pm-dump";

/// Pass instance registered for the manager itself. It declares no usage;
/// selecting it makes [`PassManager::run`] dump the graph instead of
/// executing anything.
pub struct ManagerPass;

impl Pass for ManagerPass {
    fn run(&mut self, _result: &mut PassResult) -> bool {
        true
    }
}

/// Schedules managed passes from their usage declarations and runs them.
pub struct PassManager {
    pub(super) registry: Arc<dyn PassLookup>,
    pub(super) config: ManagerConfig,
    /// Id of the manager's own pass registration.
    pub(super) id: PassId,
    pub(super) managed: BTreeSet<PassId>,
    /// Passes selected for the current run.
    pub(super) selected: BTreeSet<PassId>,
    /// Usage declarations collected by the most recent run.
    pub(super) usages: BTreeMap<PassId, PassUsage>,
    /// Provider index: capability -> passes providing it.
    pub(super) provides: BTreeMap<PassId, BTreeSet<PassId>>,
    pub(super) default_pass: Option<PassId>,
    pub(super) default_result: PassResult,
    pub(super) result: PassResult,
    pub(super) schedule: Vec<PassId>,
    pub(super) stream: PassStream,
    pub(super) metrics: ManagerMetrics,
}

impl PassManager {
    /// Register the manager's own pass (`--pm-dump`) with `registry`.
    pub fn register(registry: &mut PassRegistry) -> Result<PassId, PassError> {
        registry.register(MANAGER_NAME, MANAGER_DESCRIPTION, MANAGER_ARG, None, || {
            Box::new(ManagerPass) as Box<dyn Pass>
        })
    }

    /// Create a manager with default config. The registry must already
    /// contain the manager pass (see [`PassManager::register`]).
    pub fn new(registry: Arc<dyn PassLookup>) -> Result<Self, PassError> {
        Self::with_config(registry, ManagerConfig::default())
    }

    pub fn with_config(
        registry: Arc<dyn PassLookup>,
        config: ManagerConfig,
    ) -> Result<Self, PassError> {
        let id = registry
            .find(MANAGER_ARG)
            .ok_or_else(|| PassError::UnknownArg(MANAGER_ARG.to_string()))?;

        let mut manager = Self {
            registry,
            config,
            id,
            managed: BTreeSet::new(),
            selected: BTreeSet::new(),
            usages: BTreeMap::new(),
            provides: BTreeMap::new(),
            default_pass: None,
            default_result: PassResult::new(),
            result: PassResult::new(),
            schedule: Vec::new(),
            stream: PassStream::stdout(),
            metrics: ManagerMetrics::default(),
        };
        manager.add(id)?;
        Ok(manager)
    }

    /// Put a pass under management. Adding the same id twice is an error.
    pub fn add(&mut self, id: PassId) -> Result<(), PassError> {
        if !self.managed.insert(id) {
            let pass = self.registry.pass_info(id)?;
            return Err(PassError::AlreadyManaged {
                name: pass.name().to_string(),
            });
        }
        info!("Managing pass {}", id);
        Ok(())
    }

    /// Pass to run when nothing was selected on the command line.
    pub fn set_default_pass(&mut self, id: PassId) {
        self.default_pass = Some(id);
    }

    /// Result every run starts from.
    pub fn set_default_result(&mut self, result: PassResult) {
        self.default_result = result;
    }

    /// Output stream handed to every pass and used for the graph dump.
    pub fn set_stream(&mut self, stream: PassStream) {
        self.stream = stream;
    }

    pub fn stream(&self) -> &PassStream {
        &self.stream
    }

    /// Id of the manager's own pass registration.
    pub fn id(&self) -> PassId {
        self.id
    }

    /// Result cache of the most recent run, including partial results of a
    /// failed run.
    pub fn result(&self) -> &PassResult {
        &self.result
    }

    pub fn into_result(self) -> PassResult {
        self.result
    }

    /// Schedule computed by the most recent run.
    pub fn schedule(&self) -> &[PassId] {
        &self.schedule
    }

    pub fn managed(&self) -> &BTreeSet<PassId> {
        &self.managed
    }

    pub fn selected(&self) -> &BTreeSet<PassId> {
        &self.selected
    }

    pub fn usage(&self, id: PassId) -> Option<&PassUsage> {
        self.usages.get(&id)
    }

    /// Passes registered as providers of `capability`.
    pub fn providers(&self, capability: PassId) -> Option<&BTreeSet<PassId>> {
        self.provides.get(&capability)
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn metrics(&self) -> ManagerMetrics {
        self.metrics.clone()
    }
}
