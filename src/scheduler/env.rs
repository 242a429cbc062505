//! Read-only access to the job environment
//!
//! Strategies never touch `std::env` directly; they go through
//! [`Environment`] so tests can supply a fixed set of variables.

use std::collections::HashMap;
use std::env;

/// Source of environment variables
pub trait Environment {
    /// Value of `key`, or `None` if unset
    fn get(&self, key: &str) -> Option<String>;

    /// Whether `key` is set at all, regardless of its value
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// The environment of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var_os(key).map(|v| v.to_string_lossy().into_owned())
    }

    fn contains(&self, key: &str) -> bool {
        env::var_os(key).is_some()
    }
}

impl Environment for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn contains(&self, key: &str) -> bool {
        (**self).contains(key)
    }
}

#[cfg(test)]
pub(crate) fn fixture(vars: &[(&str, &str)]) -> HashMap<String, String> {
    vars.iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
