use std::time::Instant;

use libpass_core::PassError;
use tracing::{debug, error, info, warn};

use super::PassManager;

impl PassManager {
    /// Select, schedule and execute the managed passes.
    ///
    /// Returns `Ok(false)` when nothing was selected (and no default pass is
    /// configured) or when a pass failed; configuration problems are errors.
    pub fn run(&mut self) -> Result<bool, PassError> {
        self.run_with_flush(|| {})
    }

    /// Like [`run`](Self::run), calling `flush` before every pass execution,
    /// after a failure and once after the last pass.
    pub fn run_with_flush<F: FnMut()>(&mut self, mut flush: F) -> Result<bool, PassError> {
        let swatch = Instant::now();

        self.collect()?;
        debug!("selection: done (took: {:?})", swatch.elapsed());

        if self.selected.is_empty() {
            match self.default_pass {
                Some(id) => {
                    self.selected.insert(id);
                }
                None => {
                    error!("no pass was selected");
                    return Ok(false);
                }
            }
        }

        if self.selected.contains(&self.id) {
            info!("Dumping pass dependency graph for {} passes", self.usages.len());
            self.dump()?;
            flush();
            return Ok(true);
        }

        self.schedule = self.build_schedule()?;
        debug!(
            "scheduling: done, {} slots (took: {:?})",
            self.schedule.len(),
            swatch.elapsed()
        );
        self.metrics.record_schedule(self.schedule.len());

        let status = self.execute(&mut flush)?;
        if status {
            debug!("running passes: done (took: {:?})", swatch.elapsed());
            flush();
        }
        Ok(status)
    }

    /// Drive every schedule slot through the pass lifecycle.
    fn execute(&mut self, flush: &mut dyn FnMut()) -> Result<bool, PassError> {
        self.result = self.default_result.clone();
        let schedule = self.schedule.clone();

        for (slot, &id) in schedule.iter().enumerate() {
            let info = self.registry.pass_info(id)?;

            // only the leading slot may be satisfied by a pre-seeded result
            if slot == 0 && self.result.has(id) {
                debug!("'{}': skipping, result already present!", info.name());
                self.metrics.record_skip();
                continue;
            }

            let pass_start = Instant::now();
            let mut pass = info.construct_pass();
            pass.set_stream(self.stream.clone());
            pass.initialize();

            debug!("'{}': running", info.name());
            flush();

            let status_run = pass.run(&mut self.result);
            let elapsed = pass_start.elapsed();
            debug!("'{}': done (took: {:?})", info.name(), elapsed);

            let status_verify = status_run && pass.verify();
            pass.finalize();

            if !status_run || !status_verify {
                let stage = if status_run { "verify" } else { "run" };
                warn!("'{}': {} failed, aborting schedule at slot {}", info.name(), stage, slot);
                if self.config.record_metrics {
                    self.metrics.record_failure(info.name());
                }
                flush();
                return Ok(false);
            }

            info.add_changes(pass.changes());
            if self.config.record_metrics {
                self.metrics.record_execution(info.name(), elapsed);
            }
        }

        Ok(true)
    }
}
