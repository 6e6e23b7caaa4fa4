pub mod config;
pub mod descriptor;
pub mod error;
pub mod id;
pub mod pass;
pub mod registry;
pub mod result;
pub mod stream;
pub mod usage;

pub use config::{load_dotenv, ManagerConfig};
pub use descriptor::PassDescriptor;
pub use error::PassError;
pub use id::PassId;
pub use pass::{Pass, PassConstructor};
pub use registry::{PassLookup, PassRegistry};
pub use result::PassResult;
pub use stream::{PassStream, SharedBuffer};
pub use usage::PassUsage;
