//! HTCondor strategy
//!
//! HTCondor describes the slot in its machine ad, a `Key = Value` text file
//! whose path is exported to the job. We read:
//!   Cpus            --> CPUs assigned to the slot
//!   TotalSlotMemory --> slot memory (MB)
//!   TotalSlotDisk   --> slot sandbox disk (MB, may be fractional)

use super::detect::{SchedulerKind, CONDOR_MACHINE_AD};
use super::env::Environment;
use super::fields::KeyValues;
use super::info::{Cpus, JobResourceInfo};
use super::units::{megabytes_to_bytes, split_key_value, BYTES_PER_MB};
use crate::error::{FieldError, IoResultExt, Result, SlotInfoError};
use std::fs;
use tracing::{debug, warn};

const KEY_CPUS: &str = "Cpus";
const KEY_MEMORY: &str = "TotalSlotMemory";
const KEY_DISK: &str = "TotalSlotDisk";

/// Collect slot resources from the machine ad named by `_CONDOR_MACHINE_AD`
pub fn collect(env: &impl Environment) -> JobResourceInfo {
    match read_machine_ad(env) {
        Ok(text) => from_machine_ad(&text),
        Err(e) => {
            warn!("HTCondor machine ad unavailable: {}", e);
            from_key_values(&KeyValues::unavailable(FieldError::unavailable(&e)))
        }
    }
}

/// Build a record from the text of a machine ad
pub fn from_machine_ad(text: &str) -> JobResourceInfo {
    from_key_values(&parse_ad(text))
}

fn from_key_values(ad: &KeyValues<'_>) -> JobResourceInfo {
    let info = JobResourceInfo {
        scheduler: SchedulerKind::HTCondor,
        job_id: Err(FieldError::NotProvided),
        cpus: ad.parse(KEY_CPUS, "integer", |v| v.parse().ok().map(Cpus::Count)),
        memory_bytes: ad.parse(KEY_MEMORY, "integer megabytes", |v| {
            v.parse().ok().and_then(megabytes_to_bytes)
        }),
        disk_bytes: ad.parse(KEY_DISK, "megabytes", disk_megabytes_to_bytes),
        queue: Err(FieldError::NotProvided),
        wall_time: Err(FieldError::NotProvided),
    };

    for (field, reason) in info.missing() {
        debug!(field, %reason, "HTCondor field absent");
    }
    info
}

fn read_machine_ad(env: &impl Environment) -> Result<String> {
    let path = env
        .get(CONDOR_MACHINE_AD)
        .ok_or_else(|| SlotInfoError::MissingVariable(CONDOR_MACHINE_AD.to_string()))?;
    debug!(path = %path, "Reading HTCondor machine ad");
    fs::read_to_string(&path).with_path(&path)
}

/// Parse ad lines into a lookup; lines without `=` are skipped
fn parse_ad(text: &str) -> KeyValues<'_> {
    KeyValues::from_pairs(
        text.lines()
            .filter_map(split_key_value)
            .map(|(k, v)| (k, unquote(v))),
    )
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Disk is fractional megabytes; bytes are truncated
fn disk_megabytes_to_bytes(value: &str) -> Option<u64> {
    match value.parse::<f64>() {
        Ok(mb) if mb.is_finite() && mb >= 0.0 => Some((mb * BYTES_PER_MB as f64) as u64),
        _ => None,
    }
}
