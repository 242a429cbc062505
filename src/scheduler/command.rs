//! External query command execution
//!
//! PBS and Slurm only expose the full job description through their
//! command-line tools. [`CommandRunner`] narrows that down to "run this
//! program, hand back stdout" so strategies can be fed canned output.

use crate::error::{Result, SlotInfoError};
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs a scheduler query command and captures its standard output
pub trait CommandRunner {
    /// Run `program` with `args`; succeed only on exit status 0 with non-empty stdout
    fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        debug!(program, ?args, "Running scheduler query");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| SlotInfoError::spawn(program, e))?;

        if !output.status.success() {
            return Err(SlotInfoError::CommandFailed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if stdout.trim().is_empty() {
            return Err(SlotInfoError::EmptyOutput {
                program: program.to_string(),
            });
        }

        Ok(stdout)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        (**self).run(program, args)
    }
}

/// Runner returning fixed output, for strategy tests
#[cfg(test)]
pub(crate) struct CannedRunner {
    output: Option<String>,
    pub(crate) calls: std::cell::RefCell<Vec<(String, Vec<String>)>>,
}

#[cfg(test)]
impl CannedRunner {
    pub(crate) fn new(output: &str) -> Self {
        Self {
            output: Some(output.to_string()),
            calls: Default::default(),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            output: None,
            calls: Default::default(),
        }
    }
}

#[cfg(test)]
impl CommandRunner for CannedRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        self.calls.borrow_mut().push((
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        match &self.output {
            Some(out) if !out.trim().is_empty() => Ok(out.clone()),
            Some(_) => Err(SlotInfoError::EmptyOutput {
                program: program.to_string(),
            }),
            None => Err(SlotInfoError::CommandFailed {
                program: program.to_string(),
                status: "exit status: 1".to_string(),
                stderr: "Unknown Job Id".to_string(),
            }),
        }
    }
}
