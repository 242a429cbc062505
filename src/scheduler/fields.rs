//! Per-field extraction helpers shared by the strategies

use super::env::Environment;
use crate::error::{FieldError, FieldResult};
use std::collections::HashMap;
use tracing::debug;

/// Key/value lookup built from a scheduler source, or the reason the source
/// could not be read.
#[derive(Debug, Clone)]
pub struct KeyValues<'a> {
    values: Result<HashMap<&'a str, &'a str>, FieldError>,
}

impl<'a> KeyValues<'a> {
    /// Build from pairs; a later duplicate key replaces an earlier one
    pub fn from_pairs(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: Ok(pairs.into_iter().collect()),
        }
    }

    /// Lookup whose source failed; every key resolves to the same reason
    pub fn unavailable(reason: FieldError) -> Self {
        Self { values: Err(reason) }
    }

    /// Raw value of `key`
    pub fn get(&self, key: &str) -> FieldResult<&'a str> {
        match &self.values {
            Ok(map) => map
                .get(key)
                .copied()
                .ok_or_else(|| FieldError::MissingKey(key.to_string())),
            Err(reason) => Err(reason.clone()),
        }
    }

    /// Value of `key` converted by `parse`; `expected` names the format on failure
    pub fn parse<T>(
        &self,
        key: &str,
        expected: &'static str,
        parse: impl FnOnce(&str) -> Option<T>,
    ) -> FieldResult<T> {
        let value = self.get(key)?;
        parse(value).ok_or_else(|| FieldError::unparseable(key, value, expected))
    }
}

/// A queue or partition name; blank values count as absent
pub fn queue_name(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Keep `primary` if it holds a value, otherwise try environment variable `var`.
///
/// If the variable is unset or does not parse, the primary reason is kept.
pub fn or_env<T>(
    primary: FieldResult<T>,
    env: &impl Environment,
    var: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> FieldResult<T> {
    let reason = match primary {
        Ok(value) => return Ok(value),
        Err(reason) => reason,
    };

    match env.get(var) {
        Some(raw) => match parse(raw.trim()) {
            Some(value) => {
                debug!(var, %reason, "Using environment fallback");
                Ok(value)
            }
            None => {
                debug!(var, value = %raw, "Environment fallback unparseable");
                Err(reason)
            }
        },
        None => Err(reason),
    }
}
