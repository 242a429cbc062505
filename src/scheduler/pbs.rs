//! PBS/Torque strategy
//!
//! PBS Torque and PBS Pro need a `qstat -f $PBS_JOBID` call for the full job
//! description. We read:
//!   Resource_List.ncpus    --> CPUs (fallback: PBS_NP)
//!   Resource_List.mem      --> memory with unit suffix
//!   Resource_List.walltime --> wall-clock limit (fallback: PBS_WALLTIME)
//!   queue                  --> job queue

use super::command::CommandRunner;
use super::detect::{SchedulerKind, PBS_JOBID};
use super::env::Environment;
use super::fields::{or_env, queue_name, KeyValues};
use super::info::{Cpus, JobResourceInfo, WallTime};
use super::units::{parse_duration, parse_memory, split_key_value};
use crate::error::{FieldError, Result, SlotInfoError};
use tracing::{debug, warn};

/// CPU count fallback
pub const PBS_NP: &str = "PBS_NP";
/// Wall-time fallback, in seconds or `HH:MM:SS`
pub const PBS_WALLTIME: &str = "PBS_WALLTIME";

const KEY_NCPUS: &str = "Resource_List.ncpus";
const KEY_MEM: &str = "Resource_List.mem";
const KEY_WALLTIME: &str = "Resource_List.walltime";
const KEY_QUEUE: &str = "queue";

/// Collect job resources by querying `qstat`
pub fn collect(
    env: &impl Environment,
    runner: &impl CommandRunner,
    qstat: &str,
) -> JobResourceInfo {
    let output = query(env, runner, qstat);
    if let Err(e) = &output {
        warn!("PBS job query failed: {}", e);
    }
    from_qstat(output.as_deref().map_err(FieldError::unavailable), env)
}

/// Build a record from `qstat -f` output, or from the failure to get it
pub fn from_qstat(
    output: std::result::Result<&str, FieldError>,
    env: &impl Environment,
) -> JobResourceInfo {
    let job = match output {
        Ok(text) => parse_qstat(text),
        Err(reason) => KeyValues::unavailable(reason),
    };

    let info = JobResourceInfo {
        scheduler: SchedulerKind::Pbs,
        job_id: env
            .get(PBS_JOBID)
            .ok_or_else(|| FieldError::MissingKey(PBS_JOBID.to_string())),
        cpus: or_env(
            job.parse(KEY_NCPUS, "integer", |v| v.parse().ok().map(Cpus::Count)),
            env,
            PBS_NP,
            |v| v.parse().ok().map(Cpus::Count),
        ),
        memory_bytes: job.parse(KEY_MEM, "memory quantity", parse_memory),
        disk_bytes: Err(FieldError::NotProvided),
        queue: job.parse(KEY_QUEUE, "queue name", queue_name),
        wall_time: or_env(
            job.parse(KEY_WALLTIME, "HH:MM:SS duration", parse_duration),
            env,
            PBS_WALLTIME,
            parse_wall_fallback,
        )
        .map(WallTime::Limited),
    };

    for (field, reason) in info.missing() {
        debug!(field, %reason, "PBS field absent");
    }
    info
}

fn query(env: &impl Environment, runner: &impl CommandRunner, qstat: &str) -> Result<String> {
    let job_id = env
        .get(PBS_JOBID)
        .ok_or_else(|| SlotInfoError::MissingVariable(PBS_JOBID.to_string()))?;
    runner.run(qstat, &["-f", job_id.trim()])
}

/// The first line is the `Job Id:` header and is skipped
fn parse_qstat(text: &str) -> KeyValues<'_> {
    KeyValues::from_pairs(text.lines().skip(1).filter_map(split_key_value))
}

fn parse_wall_fallback(value: &str) -> Option<u64> {
    value.parse().ok().or_else(|| parse_duration(value))
}
