//! Batch scheduler detection and job resource collection
//!
//! Detects whether the process runs under HTCondor, Slurm or PBS/Torque and
//! reports the job's allotted CPUs, memory, disk, queue and wall-clock limit
//! in one normalized [`JobResourceInfo`]. Collection never fails as a whole:
//! each field either holds a value or the reason it is absent.

pub mod command;
pub mod condor;
pub mod detect;
pub mod env;
pub mod fields;
pub mod info;
pub mod pbs;
pub mod slurm;
pub mod units;

pub use command::{CommandRunner, SystemRunner};
pub use detect::SchedulerKind;
pub use env::{Environment, ProcessEnv};
pub use info::{Cpus, JobResourceInfo, ResourceSummary, WallTime};
pub use units::{parse_duration, parse_memory};

use crate::config::ProviderConfig;
use tracing::debug;

/// Gathers job resources using the strategy matching the detected scheduler
pub struct ResourceInfoProvider<E = ProcessEnv, R = SystemRunner> {
    env: E,
    runner: R,
    config: ProviderConfig,
}

impl ResourceInfoProvider {
    /// Provider over the real process environment and real query commands
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_parts(ProcessEnv, SystemRunner, config)
    }
}

impl Default for ResourceInfoProvider {
    fn default() -> Self {
        Self::new(ProviderConfig::default())
    }
}

impl<E: Environment, R: CommandRunner> ResourceInfoProvider<E, R> {
    /// Provider over a custom environment and command runner
    pub fn with_parts(env: E, runner: R, config: ProviderConfig) -> Self {
        Self {
            env,
            runner,
            config,
        }
    }

    /// Scheduler to collect from: the forced one, or whatever the environment shows
    pub fn scheduler(&self) -> SchedulerKind {
        match self.config.forced {
            Some(kind) => kind,
            None => SchedulerKind::detect(&self.env),
        }
    }

    /// Detect the scheduler and collect the job's resources
    pub fn collect(&self) -> JobResourceInfo {
        let scheduler = self.scheduler();
        debug!(%scheduler, forced = self.config.forced.is_some(), "Collecting job resources");
        self.collect_for(scheduler)
    }

    /// Collect resources with the strategy for `scheduler`
    pub fn collect_for(&self, scheduler: SchedulerKind) -> JobResourceInfo {
        match scheduler {
            SchedulerKind::HTCondor => condor::collect(&self.env),
            SchedulerKind::Slurm => slurm::collect(&self.env, &self.runner, &self.config.scontrol),
            SchedulerKind::Pbs => pbs::collect(&self.env, &self.runner, &self.config.qstat),
            SchedulerKind::Unknown => JobResourceInfo::unknown(),
        }
    }
}
