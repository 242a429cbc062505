//! Slurm strategy
//!
//! Slurm exports most of the allocation to the environment, but the time
//! limit is only available from `scontrol show job $SLURM_JOB_ID`. The query
//! output is read first and the environment is used to fill in gaps:
//!   TimeLimit    --> wall-clock limit (`UNLIMITED` means no limit)
//!   NumCPUs      --> CPUs (fallback: SLURM_JOB_CPUS_PER_NODE, verbatim)
//!   Partition    --> queue (fallback: SLURM_JOB_PARTITION)
//!   MinMemoryCPU --> memory (fallback: SLURM_MEM_PER_CPU, in MB)

use super::command::CommandRunner;
use super::detect::{SchedulerKind, SLURM_JOB_ID};
use super::env::Environment;
use super::fields::{or_env, queue_name, KeyValues};
use super::info::{Cpus, JobResourceInfo, WallTime};
use super::units::{megabytes_to_bytes, parse_duration, parse_memory};
use crate::error::{FieldError, FieldResult, Result, SlotInfoError};
use tracing::{debug, warn};

/// CPU fallback, a per-node descriptor such as `4(x2),8`
pub const SLURM_JOB_CPUS_PER_NODE: &str = "SLURM_JOB_CPUS_PER_NODE";
/// Partition fallback
pub const SLURM_JOB_PARTITION: &str = "SLURM_JOB_PARTITION";
/// Memory fallback, in megabytes
pub const SLURM_MEM_PER_CPU: &str = "SLURM_MEM_PER_CPU";

const KEY_TIME_LIMIT: &str = "TimeLimit";
const KEY_NUM_CPUS: &str = "NumCPUs";
const KEY_PARTITION: &str = "Partition";
const KEY_MIN_MEMORY_CPU: &str = "MinMemoryCPU";

/// Time limit value Slurm uses for jobs without a limit
const UNLIMITED: &str = "UNLIMITED";

/// Collect job resources by querying `scontrol`
pub fn collect(
    env: &impl Environment,
    runner: &impl CommandRunner,
    scontrol: &str,
) -> JobResourceInfo {
    let output = query(env, runner, scontrol);
    if let Err(e) = &output {
        warn!("Slurm job query failed: {}", e);
    }
    from_scontrol(output.as_deref().map_err(FieldError::unavailable), env)
}

/// Build a record from `scontrol show job` output, or from the failure to get it
pub fn from_scontrol(
    output: std::result::Result<&str, FieldError>,
    env: &impl Environment,
) -> JobResourceInfo {
    let job = match output {
        Ok(text) => parse_scontrol(text),
        Err(reason) => KeyValues::unavailable(reason),
    };

    let info = JobResourceInfo {
        scheduler: SchedulerKind::Slurm,
        job_id: env
            .get(SLURM_JOB_ID)
            .ok_or_else(|| FieldError::MissingKey(SLURM_JOB_ID.to_string())),
        cpus: or_env(
            job.parse(KEY_NUM_CPUS, "integer", |v| v.parse().ok().map(Cpus::Count)),
            env,
            SLURM_JOB_CPUS_PER_NODE,
            parse_cpus_descriptor,
        ),
        memory_bytes: or_env(
            job.parse(KEY_MIN_MEMORY_CPU, "memory quantity", parse_memory),
            env,
            SLURM_MEM_PER_CPU,
            |v| v.parse().ok().and_then(megabytes_to_bytes),
        ),
        disk_bytes: Err(FieldError::NotProvided),
        queue: or_env(
            job.parse(KEY_PARTITION, "partition name", queue_name),
            env,
            SLURM_JOB_PARTITION,
            queue_name,
        ),
        wall_time: time_limit(&job),
    };

    for (field, reason) in info.missing() {
        debug!(field, %reason, "Slurm field absent");
    }
    info
}

fn query(env: &impl Environment, runner: &impl CommandRunner, scontrol: &str) -> Result<String> {
    let job_id = env
        .get(SLURM_JOB_ID)
        .ok_or_else(|| SlotInfoError::MissingVariable(SLURM_JOB_ID.to_string()))?;
    runner.run(scontrol, &["show", "job", job_id.trim()])
}

/// Flatten all lines into whitespace-separated `Key=Value` tokens
fn parse_scontrol(text: &str) -> KeyValues<'_> {
    KeyValues::from_pairs(
        text.lines()
            .flat_map(str::split_whitespace)
            .filter_map(|token| token.split_once('=')),
    )
}

fn time_limit(job: &KeyValues<'_>) -> FieldResult<WallTime> {
    let value = job.get(KEY_TIME_LIMIT)?;
    if value == UNLIMITED {
        return Ok(WallTime::Unlimited);
    }
    parse_duration(value)
        .map(WallTime::Limited)
        .ok_or_else(|| FieldError::unparseable(KEY_TIME_LIMIT, value, "HH:MM:SS duration"))
}

/// A plain number becomes a count; anything else is kept as the raw descriptor
fn parse_cpus_descriptor(value: &str) -> Option<Cpus> {
    if value.is_empty() {
        return None;
    }
    Some(match value.parse() {
        Ok(n) => Cpus::Count(n),
        Err(_) => Cpus::Descriptor(value.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::command::CannedRunner;
    use crate::scheduler::env::fixture;
    use std::collections::HashMap;

    const SCONTROL: &str = "\
JobId=4242 JobName=train
   UserId=alice(1000) GroupId=alice(1000) MCS_label=N/A
   JobState=RUNNING Reason=None Dependency=(null)
   RunTime=00:10:00 TimeLimit=01:00:00 TimeMin=N/A
   Partition=gpu AllocNode:Sid=login1:12345
   NumNodes=1 NumCPUs=8 NumTasks=1 CPUs/Task=8 ReqB:S:C:T=0:0:*:*
   MinCPUsNode=8 MinMemoryCPU=2000M MinTmpDiskNode=0

   Command=/home/alice/train.sh
";

    fn job_env() -> HashMap<String, String> {
        fixture(&[(SLURM_JOB_ID, "4242")])
    }

    #[test]
    fn test_collect_from_scontrol() {
        let runner = CannedRunner::new(SCONTROL);
        let info = collect(&job_env(), &runner, "scontrol");

        assert_eq!(info.scheduler, SchedulerKind::Slurm);
        assert_eq!(info.job_id.as_deref(), Ok("4242"));
        assert_eq!(info.wall_seconds(), Some(3600));
        assert_eq!(info.cpus, Ok(Cpus::Count(8)));
        assert_eq!(info.queue(), Some("gpu"));
        assert_eq!(info.memory_bytes(), Some(2000 * 1024 * 1024));
        assert_eq!(info.disk_bytes, Err(FieldError::NotProvided));
        assert_eq!(runner.calls.borrow()[0].1, vec!["show", "job", "4242"]);
    }

    #[test]
    fn test_unlimited_time_limit() {
        let text = SCONTROL.replace("TimeLimit=01:00:00", "TimeLimit=UNLIMITED");
        let info = from_scontrol(Ok(text.as_str()), &job_env());
        assert_eq!(info.wall_seconds(), None);
        assert_eq!(info.wall_time, Ok(WallTime::Unlimited));
        assert!(info.is_unlimited());
    }

    #[test]
    fn test_unparseable_time_limit() {
        let text = SCONTROL.replace("TimeLimit=01:00:00", "TimeLimit=2-00:00:00");
        let info = from_scontrol(Ok(text.as_str()), &job_env());
        assert_eq!(info.wall_seconds(), None);
        assert!(!info.is_unlimited());
        assert!(matches!(info.wall_time, Err(FieldError::Unparseable { .. })));
        assert_eq!(info.cpus, Ok(Cpus::Count(8)));
    }

    #[test]
    fn test_env_fallbacks_when_command_fails() {
        let env = fixture(&[
            (SLURM_JOB_ID, "4242"),
            (SLURM_JOB_CPUS_PER_NODE, "4(x2),8"),
            (SLURM_JOB_PARTITION, "debug"),
            (SLURM_MEM_PER_CPU, "1500"),
        ]);
        let info = collect(&env, &CannedRunner::failing(), "scontrol");

        assert_eq!(info.cpus, Ok(Cpus::Descriptor("4(x2),8".into())));
        assert_eq!(info.queue(), Some("debug"));
        assert_eq!(info.memory_bytes(), Some(1500 * 1024 * 1024));
        assert!(matches!(info.wall_time, Err(FieldError::SourceUnavailable(_))));
    }

    #[test]
    fn test_plain_cpus_fallback_is_a_count() {
        let env = fixture(&[(SLURM_JOB_ID, "1"), (SLURM_JOB_CPUS_PER_NODE, "16")]);
        let info = from_scontrol(Ok("JobId=1"), &env);
        assert_eq!(info.cpus, Ok(Cpus::Count(16)));
    }

    #[test]
    fn test_missing_keys_use_fallbacks() {
        let text = SCONTROL
            .replace("Partition=gpu", "")
            .replace("MinMemoryCPU=2000M", "MinMemoryNode=8G");
        let env = fixture(&[
            (SLURM_JOB_ID, "4242"),
            (SLURM_JOB_PARTITION, "debug"),
            (SLURM_MEM_PER_CPU, "1000"),
        ]);
        let info = from_scontrol(Ok(text.as_str()), &env);
        assert_eq!(info.queue(), Some("debug"));
        assert_eq!(info.memory_bytes(), Some(1000 * 1024 * 1024));
        assert_eq!(info.wall_seconds(), Some(3600));
    }

    #[test]
    fn test_field_isolation() {
        let text = SCONTROL.replace("NumCPUs=8", "NumCPUs=lots");
        let info = from_scontrol(Ok(text.as_str()), &job_env());
        assert_eq!(
            info.cpus,
            Err(FieldError::unparseable(KEY_NUM_CPUS, "lots", "integer"))
        );
        assert_eq!(info.wall_seconds(), Some(3600));
        assert_eq!(info.queue(), Some("gpu"));
        assert_eq!(info.memory_bytes(), Some(2000 * 1024 * 1024));
    }

    #[test]
    fn test_empty_partition_uses_fallback() {
        let env = fixture(&[(SLURM_JOB_ID, "1"), (SLURM_JOB_PARTITION, "debug")]);
        let info = from_scontrol(Ok("JobId=1 Partition= NumCPUs=2"), &env);
        assert_eq!(info.queue(), Some("debug"));
        assert_eq!(info.cpus, Ok(Cpus::Count(2)));

        let info = from_scontrol(Ok("JobId=1 Partition="), &job_env());
        assert!(matches!(info.queue, Err(FieldError::Unparseable { .. })));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let info = from_scontrol(Ok("Partition=a\nPartition=b"), &job_env());
        assert_eq!(info.queue(), Some("b"));
    }

    #[test]
    fn test_idempotent() {
        let runner = CannedRunner::new(SCONTROL);
        let first = collect(&job_env(), &runner, "scontrol");
        let second = collect(&job_env(), &runner, "scontrol");
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first.summary()).unwrap(),
            serde_json::to_string(&second.summary()).unwrap()
        );
    }
}
