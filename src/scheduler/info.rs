//! Normalized job resource record

use super::detect::SchedulerKind;
use crate::error::{FieldError, FieldResult};
use serde::Serialize;
use std::fmt;

/// CPU allotment as reported by the scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cpus {
    /// Plain CPU count
    Count(u64),
    /// Compact per-node descriptor such as `4(x2),8`, reported verbatim
    Descriptor(String),
}

impl fmt::Display for Cpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cpus::Count(n) => write!(f, "{}", n),
            Cpus::Descriptor(s) => f.write_str(s),
        }
    }
}

/// Wall-clock limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WallTime {
    /// Limit in seconds
    Limited(u64),
    /// Scheduler explicitly reports no limit
    Unlimited,
}

/// Resources allotted to the running job.
///
/// Every field is independent: a field that could not be determined holds
/// the reason instead of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobResourceInfo {
    /// Scheduler that produced this record
    pub scheduler: SchedulerKind,
    /// Job identifier
    pub job_id: FieldResult<String>,
    /// CPUs allotted
    pub cpus: FieldResult<Cpus>,
    /// Memory in bytes
    pub memory_bytes: FieldResult<u64>,
    /// Disk in bytes
    pub disk_bytes: FieldResult<u64>,
    /// Queue or partition name
    pub queue: FieldResult<String>,
    /// Wall-clock limit
    pub wall_time: FieldResult<WallTime>,
}

impl JobResourceInfo {
    /// Record with every field absent for the given reason
    pub fn absent(scheduler: SchedulerKind, reason: FieldError) -> Self {
        Self {
            scheduler,
            job_id: Err(reason.clone()),
            cpus: Err(reason.clone()),
            memory_bytes: Err(reason.clone()),
            disk_bytes: Err(reason.clone()),
            queue: Err(reason.clone()),
            wall_time: Err(reason),
        }
    }

    /// Record for an environment with no recognised scheduler
    pub fn unknown() -> Self {
        Self::absent(SchedulerKind::Unknown, FieldError::NotProvided)
    }

    /// CPU allotment, if known
    pub fn cpus(&self) -> Option<&Cpus> {
        self.cpus.as_ref().ok()
    }

    /// Memory in bytes, if known
    pub fn memory_bytes(&self) -> Option<u64> {
        self.memory_bytes.as_ref().ok().copied()
    }

    /// Disk in bytes, if known
    pub fn disk_bytes(&self) -> Option<u64> {
        self.disk_bytes.as_ref().ok().copied()
    }

    /// Queue or partition, if known
    pub fn queue(&self) -> Option<&str> {
        self.queue.as_deref().ok()
    }

    /// Wall-clock limit in seconds; `None` when unlimited or unknown
    pub fn wall_seconds(&self) -> Option<u64> {
        match self.wall_time {
            Ok(WallTime::Limited(secs)) => Some(secs),
            _ => None,
        }
    }

    /// Whether the scheduler explicitly reported no wall-clock limit
    pub fn is_unlimited(&self) -> bool {
        self.wall_time == Ok(WallTime::Unlimited)
    }

    /// Reasons for every absent field, by field name
    pub fn missing(&self) -> Vec<(&'static str, &FieldError)> {
        let fields = [
            ("job_id", self.job_id.as_ref().err()),
            ("cpus", self.cpus.as_ref().err()),
            ("memory_bytes", self.memory_bytes.as_ref().err()),
            ("disk_bytes", self.disk_bytes.as_ref().err()),
            ("queue", self.queue.as_ref().err()),
            ("wall_seconds", self.wall_time.as_ref().err()),
        ];
        fields
            .into_iter()
            .filter_map(|(name, err)| err.map(|e| (name, e)))
            .collect()
    }

    /// Flat view of the record for reporting
    pub fn summary(&self) -> ResourceSummary {
        ResourceSummary {
            scheduler: self.scheduler,
            job_id: self.job_id.as_ref().ok().cloned(),
            cpus: self.cpus().cloned(),
            memory_bytes: self.memory_bytes(),
            disk_bytes: self.disk_bytes(),
            queue: self.queue().map(str::to_string),
            wall_seconds: self.wall_seconds(),
            wall_unlimited: self.is_unlimited(),
        }
    }
}

/// Serializable snapshot of a [`JobResourceInfo`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceSummary {
    /// Scheduler that produced the record
    pub scheduler: SchedulerKind,
    /// Job identifier
    pub job_id: Option<String>,
    /// CPUs allotted
    pub cpus: Option<Cpus>,
    /// Memory in bytes
    pub memory_bytes: Option<u64>,
    /// Disk in bytes
    pub disk_bytes: Option<u64>,
    /// Queue or partition name
    pub queue: Option<String>,
    /// Wall-clock limit in seconds
    pub wall_seconds: Option<u64>,
    /// Scheduler explicitly reports no wall-clock limit
    pub wall_unlimited: bool,
}
