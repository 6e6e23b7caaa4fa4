use thiserror::Error;

use crate::id::PassId;

#[derive(Error, Debug)]
pub enum PassError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pass '{name}' already managed")]
    AlreadyManaged { name: String },

    #[error("already processed '{arg}'")]
    AlreadySelected { arg: String },

    #[error("pass name '{0}' already registered")]
    DuplicateName(String),

    #[error("pass argument '{0}' already registered")]
    DuplicateArg(String),

    #[error("unknown pass id {0}")]
    UnknownPass(PassId),

    #[error("unknown pass argument '{0}'")]
    UnknownArg(String),

    #[error("no result present for pass id {0}")]
    ResultMissing(PassId),

    #[error("result for pass id {0} has an unexpected type")]
    ResultTypeMismatch(PassId),

    #[error("cyclic pass dependency: {cycle}")]
    CyclicDependency { cycle: String },

    #[error("schedule exceeded {0} slots")]
    ScheduleLimitExceeded(usize),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}
