//! Batch scheduler detection

use super::env::Environment;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// HTCondor machine ad path; also the file the HTCondor strategy reads
pub const CONDOR_MACHINE_AD: &str = "_CONDOR_MACHINE_AD";
/// HTCondor job ad path
pub const CONDOR_JOB_AD: &str = "_CONDOR_JOB_AD";
/// Slurm job ID
pub const SLURM_JOB_ID: &str = "SLURM_JOB_ID";
/// PBS/Torque job ID
pub const PBS_JOBID: &str = "PBS_JOBID";

/// Signal variables in priority order; the first one present wins
const SIGNALS: &[(&str, SchedulerKind)] = &[
    (CONDOR_MACHINE_AD, SchedulerKind::HTCondor),
    (CONDOR_JOB_AD, SchedulerKind::HTCondor),
    (SLURM_JOB_ID, SchedulerKind::Slurm),
    (PBS_JOBID, SchedulerKind::Pbs),
];

/// Detected batch scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerKind {
    /// HTCondor
    HTCondor,
    /// Slurm Workload Manager
    Slurm,
    /// PBS/Torque or PBS Pro
    Pbs,
    /// No scheduler detected
    Unknown,
}

impl SchedulerKind {
    /// Detect the scheduler from the given environment.
    ///
    /// Only the presence of a signal variable matters, not its value.
    pub fn detect(env: &impl Environment) -> Self {
        SIGNALS
            .iter()
            .find(|(var, _)| env.contains(var))
            .map(|&(_, kind)| kind)
            .unwrap_or(SchedulerKind::Unknown)
    }

    /// Get scheduler name
    pub fn name(&self) -> &'static str {
        match self {
            SchedulerKind::HTCondor => "HTCondor",
            SchedulerKind::Slurm => "Slurm",
            SchedulerKind::Pbs => "PBS",
            SchedulerKind::Unknown => "Unknown",
        }
    }

    /// Whether a scheduler was recognised
    pub fn is_known(&self) -> bool {
        *self != SchedulerKind::Unknown
    }
}

impl fmt::Display for SchedulerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchedulerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "htcondor" | "condor" => Ok(SchedulerKind::HTCondor),
            "slurm" => Ok(SchedulerKind::Slurm),
            "pbs" | "torque" => Ok(SchedulerKind::Pbs),
            "unknown" => Ok(SchedulerKind::Unknown),
            other => Err(format!("Unknown scheduler: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::env::fixture;

    #[test]
    fn test_detect_single_signal() {
        let cases = [
            (CONDOR_MACHINE_AD, SchedulerKind::HTCondor),
            (CONDOR_JOB_AD, SchedulerKind::HTCondor),
            (SLURM_JOB_ID, SchedulerKind::Slurm),
            (PBS_JOBID, SchedulerKind::Pbs),
        ];
        for (var, expected) in cases {
            assert_eq!(SchedulerKind::detect(&fixture(&[(var, "1")])), expected, "{}", var);
        }
    }

    #[test]
    fn test_detect_nothing_is_unknown() {
        let env = fixture(&[("HOME", "/home/user"), ("SLURM_CPUS_ON_NODE", "4")]);
        assert_eq!(SchedulerKind::detect(&env), SchedulerKind::Unknown);
        assert!(!SchedulerKind::detect(&env).is_known());
    }

    #[test]
    fn test_detect_presence_not_value() {
        assert_eq!(
            SchedulerKind::detect(&fixture(&[(SLURM_JOB_ID, "")])),
            SchedulerKind::Slurm
        );
    }

    #[test]
    fn test_detect_priority() {
        let all = fixture(&[
            (CONDOR_MACHINE_AD, "/tmp/machine.ad"),
            (SLURM_JOB_ID, "42"),
            (PBS_JOBID, "7.server"),
        ]);
        assert_eq!(SchedulerKind::detect(&all), SchedulerKind::HTCondor);

        let slurm_pbs = fixture(&[(SLURM_JOB_ID, "42"), (PBS_JOBID, "7.server")]);
        assert_eq!(SchedulerKind::detect(&slurm_pbs), SchedulerKind::Slurm);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Slurm".parse::<SchedulerKind>(), Ok(SchedulerKind::Slurm));
        assert_eq!("condor".parse::<SchedulerKind>(), Ok(SchedulerKind::HTCondor));
        assert!("lsf".parse::<SchedulerKind>().is_err());
    }
}
