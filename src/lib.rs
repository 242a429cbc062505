//! # SlotInfo - Batch Job Resource Discovery
//!
//! SlotInfo tells a running batch job what it was given. It detects the
//! scheduler it runs under (HTCondor, Slurm or PBS/Torque) and reports the
//! allotted CPUs, memory, disk, queue and wall-clock limit in one
//! normalized record.
//!
//! ## Features
//!
//! - **Scheduler Detection**: Fixed-priority check of HTCondor, Slurm and PBS job variables
//! - **Normalized Units**: Memory and disk in bytes, wall-time in seconds
//! - **Graceful Degradation**: Each field is collected independently and
//!   falls back to environment variables where the scheduler exports them
//! - **Testable Seams**: Environment and query commands are traits
//!
//! ## Quick Start
//!
//! ```no_run
//! use slotinfo::scheduler::ResourceInfoProvider;
//!
//! let info = ResourceInfoProvider::default().collect();
//!
//! println!("Scheduler: {}", info.scheduler);
//! if let Some(mem) = info.memory_bytes() {
//!     println!("Memory: {} bytes", mem);
//! }
//! ```
//!
//! ## Canned Sources
//!
//! ```
//! use slotinfo::scheduler::{slurm, Cpus};
//! use std::collections::HashMap;
//!
//! let env: HashMap<String, String> = HashMap::from([("SLURM_JOB_ID".into(), "7".into())]);
//! let info = slurm::from_scontrol(Ok("JobId=7 NumCPUs=4 TimeLimit=UNLIMITED"), &env);
//!
//! assert_eq!(info.cpus(), Some(&Cpus::Count(4)));
//! assert!(info.is_unlimited());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod report;
pub mod scheduler;

// Re-export commonly used types
pub use config::{OutputFormat, ProviderConfig};
pub use error::{FieldError, Result, SlotInfoError};
pub use scheduler::{JobResourceInfo, ResourceInfoProvider, SchedulerKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use slotinfo::prelude::*;
    //! ```

    pub use crate::config::{OutputFormat, ProviderConfig};
    pub use crate::error::{FieldError, FieldResult, Result, SlotInfoError};
    pub use crate::report::render;
    pub use crate::scheduler::{
        CommandRunner, Cpus, Environment, JobResourceInfo, ResourceInfoProvider, SchedulerKind,
        WallTime,
    };
}
