use libpass_core::{PassError, PassId, PassUsage};
use tracing::debug;

use super::PassManager;

impl PassManager {
    /// Rebuild the selected set, the usage index and the provider index from
    /// the managed passes.
    ///
    /// Every managed pass is instantiated once through its internal factory
    /// to report its usage, then dropped.
    pub fn collect(&mut self) -> Result<(), PassError> {
        self.selected.clear();
        self.usages.clear();
        self.provides.clear();

        for &id in &self.managed {
            let pass = self.registry.pass_info(id)?;

            if pass.is_arg_selected() {
                debug!("{}: selected", pass.name());
                if !self.selected.insert(id) {
                    return Err(PassError::AlreadySelected {
                        arg: pass.arg_string().to_string(),
                    });
                }
            }

            let mut usage = PassUsage::new();
            pass.construct_internal_pass().usage(&mut usage);

            for &capability in usage.provides() {
                self.provides.entry(capability).or_default().insert(id);
            }
            self.usages.insert(id, usage);
        }

        Ok(())
    }

    /// Expand the selected passes into an execution order.
    ///
    /// Each selected pass seeds a stack; popped ids are appended to the
    /// schedule and push their requirements followed by the providers
    /// registered for them. Nothing is deduplicated, so a pass reachable along
    /// several paths runs several times. The list is reversed at the end so
    /// prerequisites come first.
    pub(crate) fn build_schedule(&self) -> Result<Vec<PassId>, PassError> {
        let limit = self.config.schedule_limit;
        let mut schedule: Vec<PassId> = Vec::new();
        // parent slot of every schedule entry, for cycle detection
        let mut parents: Vec<Option<usize>> = Vec::new();

        for &seed in &self.selected {
            let mut stack: Vec<(PassId, Option<usize>)> = vec![(seed, None)];

            while let Some((id, parent)) = stack.pop() {
                if schedule.len() >= limit {
                    return Err(PassError::ScheduleLimitExceeded(limit));
                }

                let slot = schedule.len();
                schedule.push(id);
                parents.push(parent);

                let requires = self.usages.get(&id).map(|u| u.requires());
                let providers = self.provides.get(&id);

                let next = requires
                    .into_iter()
                    .flatten()
                    .chain(providers.into_iter().flatten());

                for &child in next {
                    if let Some(cycle) = self.cycle_through(&schedule, &parents, slot, child)? {
                        return Err(PassError::CyclicDependency { cycle });
                    }
                    stack.push((child, Some(slot)));
                }
            }
        }

        schedule.reverse();
        Ok(schedule)
    }

    /// If `child` already sits on the ancestor chain of `slot`, return the
    /// cycle as `A -> B -> A` using pass names.
    fn cycle_through(
        &self,
        schedule: &[PassId],
        parents: &[Option<usize>],
        slot: usize,
        child: PassId,
    ) -> Result<Option<String>, PassError> {
        let mut chain = Vec::new();
        let mut cursor = Some(slot);

        while let Some(current) = cursor {
            chain.push(schedule[current]);
            if schedule[current] == child {
                chain.reverse();
                chain.push(child);

                let mut names = Vec::with_capacity(chain.len());
                for id in chain {
                    names.push(self.pass_name(id)?);
                }
                return Ok(Some(names.join(" -> ")));
            }
            cursor = parents[current];
        }

        Ok(None)
    }

    pub(crate) fn pass_name(&self, id: PassId) -> Result<String, PassError> {
        Ok(self.registry.pass_info(id)?.name().to_string())
    }
}
