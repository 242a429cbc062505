//! Configuration settings for SlotInfo
//!
//! Defines the CLI arguments and the runtime configuration of the
//! resource provider.

use crate::scheduler::SchedulerKind;
use clap::{Parser, ValueEnum};

/// Default PBS query command
pub const DEFAULT_QSTAT: &str = "qstat";
/// Default Slurm query command
pub const DEFAULT_SCONTROL: &str = "scontrol";

/// SlotInfo - report the resources allotted to the current batch job
#[derive(Parser, Debug, Clone)]
#[command(name = "slotinfo")]
#[command(author = "SlotInfo Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Report the CPUs, memory, disk, queue and walltime of the current batch job")]
#[command(long_about = r#"
SlotInfo detects the batch scheduler a job runs under and reports the
resources the job was given, normalized to CPUs, bytes and seconds.

Supported schedulers:
  - HTCondor   (machine ad from $_CONDOR_MACHINE_AD)
  - Slurm      (scontrol show job $SLURM_JOB_ID, SLURM_* variables)
  - PBS/Torque (qstat -f $PBS_JOBID, PBS_* variables)

Examples:
  slotinfo                       # Human-readable summary
  slotinfo --format json         # JSON report
  eval "$(slotinfo --format env)" # Export SLOT_* variables
"#)]
pub struct CliArgs {
    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Scheduler to query (auto = detect from the environment)
    #[arg(short = 's', long, value_enum, default_value = "auto")]
    pub scheduler: SchedulerChoice,

    /// PBS qstat command
    #[arg(long, env = "SLOTINFO_QSTAT", default_value = DEFAULT_QSTAT, value_name = "PATH")]
    pub qstat: String,

    /// Slurm scontrol command
    #[arg(long, env = "SLOTINFO_SCONTROL", default_value = DEFAULT_SCONTROL, value_name = "PATH")]
    pub scontrol: String,

    /// Verbose logging (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only the exit code reports the outcome)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Report output format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// JSON report
    Json,
    /// Shell `KEY=value` lines
    Env,
}

/// Scheduler selection on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerChoice {
    /// Detect from the environment
    #[default]
    Auto,
    /// HTCondor
    #[value(name = "htcondor", alias = "condor")]
    HTCondor,
    /// Slurm
    Slurm,
    /// PBS/Torque
    #[value(alias = "torque")]
    Pbs,
}

impl SchedulerChoice {
    /// Scheduler to force, or `None` to detect
    pub fn forced(&self) -> Option<SchedulerKind> {
        match self {
            Self::Auto => None,
            Self::HTCondor => Some(SchedulerKind::HTCondor),
            Self::Slurm => Some(SchedulerKind::Slurm),
            Self::Pbs => Some(SchedulerKind::Pbs),
        }
    }
}

/// Runtime configuration of the resource provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// PBS query command
    pub qstat: String,
    /// Slurm query command
    pub scontrol: String,
    /// Skip detection and use this scheduler
    pub forced: Option<SchedulerKind>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            qstat: DEFAULT_QSTAT.to_string(),
            scontrol: DEFAULT_SCONTROL.to_string(),
            forced: None,
        }
    }
}

impl ProviderConfig {
    /// Build configuration from CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        let qstat = args.qstat.trim();
        let scontrol = args.scontrol.trim();
        if qstat.is_empty() || scontrol.is_empty() {
            return Err("Query command must not be empty".to_string());
        }

        Ok(Self {
            qstat: qstat.to_string(),
            scontrol: scontrol.to_string(),
            forced: args.scheduler.forced(),
        })
    }
}
