//! Dependency-driven pass scheduling and execution.
//!
//! Passes declare what they require and what they provide through
//! [`PassUsage`]; the [`PassManager`] turns those declarations into a linear
//! schedule and drives every scheduled pass through its lifecycle while
//! threading a shared [`PassResult`] through the run.

pub mod manager;
pub mod metrics;

pub use libpass_core::{
    ManagerConfig, Pass, PassDescriptor, PassError, PassId, PassLookup, PassRegistry, PassResult,
    PassStream, PassUsage,
};
pub use manager::{ManagerPass, PassManager, MANAGER_ARG, MANAGER_DESCRIPTION, MANAGER_NAME};
pub use metrics::ManagerMetrics;
