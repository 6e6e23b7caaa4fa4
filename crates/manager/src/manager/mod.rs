//! The pass manager -- selection, scheduling, execution and graph dump.
//!
//! Split into focused submodules:
//! - `core`: PassManager struct, self-registration, `add` and accessors
//! - `scheduling`: usage collection, provider index and schedule construction
//! - `execution`: the run entry points and the pass lifecycle loop
//! - `dump`: the dependency graph report

mod core;
mod dump;
mod execution;
mod scheduling;

pub use self::core::{ManagerPass, PassManager, MANAGER_ARG, MANAGER_DESCRIPTION, MANAGER_NAME};
