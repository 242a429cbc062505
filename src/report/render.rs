//! Output renderers for job resource records

use crate::config::OutputFormat;
use crate::error::Result;
use crate::scheduler::JobResourceInfo;
use humansize::{format_size, BINARY};
use std::time::Duration;

const UNKNOWN: &str = "unknown";

/// Render `info` in the requested format
pub fn render(info: &JobResourceInfo, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(info)),
        OutputFormat::Json => render_json(info),
        OutputFormat::Env => Ok(render_env(info)),
    }
}

/// Human-readable summary, one field per line
pub fn render_text(info: &JobResourceInfo) -> String {
    let bytes = |value: Option<u64>| match value {
        Some(b) => format!("{} ({} bytes)", format_size(b, BINARY), b),
        None => UNKNOWN.to_string(),
    };

    let walltime = match info.wall_seconds() {
        Some(secs) => format!(
            "{} ({} s)",
            humantime::format_duration(Duration::from_secs(secs)),
            secs
        ),
        None if info.is_unlimited() => "unlimited".to_string(),
        None => UNKNOWN.to_string(),
    };

    let cpus = info
        .cpus()
        .map(|c| c.to_string())
        .unwrap_or_else(|| UNKNOWN.to_string());

    format!(
        "=== Job Slot ===\n\
         Scheduler: {}\n\
         Job ID:    {}\n\
         CPUs:      {}\n\
         Memory:    {}\n\
         Disk:      {}\n\
         Queue:     {}\n\
         Walltime:  {}\n",
        info.scheduler,
        info.job_id.as_deref().unwrap_or(UNKNOWN),
        cpus,
        bytes(info.memory_bytes()),
        bytes(info.disk_bytes()),
        info.queue().unwrap_or(UNKNOWN),
        walltime,
    )
}

/// Pretty-printed JSON of the record summary
pub fn render_json(info: &JobResourceInfo) -> Result<String> {
    Ok(serde_json::to_string_pretty(&info.summary())?)
}

/// `SLOT_*=value` lines for `eval`; absent fields are omitted
pub fn render_env(info: &JobResourceInfo) -> String {
    let summary = info.summary();
    let mut vars = vec![("SLOT_SCHEDULER", summary.scheduler.name().to_string())];

    if let Some(id) = summary.job_id {
        vars.push(("SLOT_JOB_ID", id));
    }
    if let Some(cpus) = summary.cpus {
        vars.push(("SLOT_CPUS", cpus.to_string()));
    }
    if let Some(mem) = summary.memory_bytes {
        vars.push(("SLOT_MEMORY_BYTES", mem.to_string()));
    }
    if let Some(disk) = summary.disk_bytes {
        vars.push(("SLOT_DISK_BYTES", disk.to_string()));
    }
    if let Some(queue) = summary.queue {
        vars.push(("SLOT_QUEUE", queue));
    }
    if let Some(secs) = summary.wall_seconds {
        vars.push(("SLOT_WALL_SECONDS", secs.to_string()));
    }
    if summary.wall_unlimited {
        vars.push(("SLOT_WALL_UNLIMITED", "1".to_string()));
    }

    vars.into_iter()
        .map(|(key, value)| format!("{}={}\n", key, shell_quote(&value)))
        .collect()
}

/// Quote a value for POSIX shells unless it is obviously safe
fn shell_quote(value: &str) -> String {
    let safe = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_.:/+,".contains(c));
    if safe {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldError;
    use crate::scheduler::{Cpus, SchedulerKind, WallTime};

    fn pbs_record() -> JobResourceInfo {
        JobResourceInfo {
            scheduler: SchedulerKind::Pbs,
            job_id: Ok("1234.pbs-server".into()),
            cpus: Ok(Cpus::Count(8)),
            memory_bytes: Ok(4 * 1024 * 1024 * 1024),
            disk_bytes: Err(FieldError::NotProvided),
            queue: Ok("batch".into()),
            wall_time: Ok(WallTime::Limited(7200)),
        }
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&pbs_record());
        assert!(text.contains("Scheduler: PBS"));
        assert!(text.contains("CPUs:      8"));
        assert!(text.contains("(4294967296 bytes)"));
        assert!(text.contains("Disk:      unknown"));
        assert!(text.contains("Walltime:  2h (7200 s)"));
    }

    #[test]
    fn test_render_text_layout() {
        let text = render_text(&JobResourceInfo::unknown());
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            vec![
                "=== Job Slot ===",
                "Scheduler: Unknown",
                "Job ID:    unknown",
                "CPUs:      unknown",
                "Memory:    unknown",
                "Disk:      unknown",
                "Queue:     unknown",
                "Walltime:  unknown",
            ]
        );
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_render_text_unlimited() {
        let info = JobResourceInfo {
            wall_time: Ok(WallTime::Unlimited),
            ..pbs_record()
        };
        assert!(render_text(&info).contains("Walltime:  unlimited"));
    }

    #[test]
    fn test_render_env() {
        let env = render_env(&pbs_record());
        assert_eq!(
            env,
            "SLOT_SCHEDULER=PBS\n\
             SLOT_JOB_ID=1234.pbs-server\n\
             SLOT_CPUS=8\n\
             SLOT_MEMORY_BYTES=4294967296\n\
             SLOT_QUEUE=batch\n\
             SLOT_WALL_SECONDS=7200\n"
        );
    }

    #[test]
    fn test_render_env_quotes_descriptors() {
        let info = JobResourceInfo {
            cpus: Ok(Cpus::Descriptor("4(x2)".into())),
            queue: Ok("it's".into()),
            ..pbs_record()
        };
        let env = render_env(&info);
        assert!(env.contains("SLOT_CPUS='4(x2)'\n"));
        assert!(env.contains(r"SLOT_QUEUE='it'\''s'"));
    }

    #[test]
    fn test_render_json() {
        let json: serde_json::Value =
            serde_json::from_str(&render(&pbs_record(), OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["scheduler"], "pbs");
        assert_eq!(json["wall_seconds"], 7200);
        assert_eq!(json["cpus"], 8);
        assert_eq!(json["wall_unlimited"], false);
    }
}
