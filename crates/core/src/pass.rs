use crate::result::PassResult;
use crate::stream::PassStream;
use crate::usage::PassUsage;

/// A unit of work the pass manager can schedule.
///
/// The manager drives every instance through
/// `set_stream → initialize → run → verify → finalize` exactly once and drops
/// it afterwards. `verify` is only called when `run` succeeded.
pub trait Pass {
    /// Declare which passes must run first and which capabilities this pass
    /// provides.
    fn usage(&self, _usage: &mut PassUsage) {}

    /// Receives the manager's output stream before `initialize`.
    fn set_stream(&mut self, _stream: PassStream) {}

    fn initialize(&mut self) {}

    /// Execute the pass, reading prerequisites from and writing outputs to
    /// `result`. Returns `false` on failure.
    fn run(&mut self, result: &mut PassResult) -> bool;

    /// Post-run consistency check. Returns `false` on failure.
    fn verify(&mut self) -> bool {
        true
    }

    fn finalize(&mut self) {}

    /// Number of changes made by the last `run`, added to the descriptor's
    /// cumulative counter after a successful slot.
    fn changes(&self) -> u64 {
        0
    }
}

/// Factory producing fresh pass instances.
pub type PassConstructor = Box<dyn Fn() -> Box<dyn Pass> + Send + Sync>;
