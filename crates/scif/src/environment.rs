// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Environment computation and export.
//!
//! Everything in this module except [`ProcessExporter`] is pure: it computes
//! the variables an app (or the whole filesystem) should see. Only an
//! [`Exporter`] applies such a mapping to a process.

use std::collections::{BTreeMap, BTreeSet};

use crate::Result;
use crate::defaults::ScifSettings;
use crate::lookup::AppLookup;

#[cfg(test)]
#[path = "./environment_test.rs"]
mod environment_test;

/// Variable name to value.
pub type EnvMap = BTreeMap<String, String>;

/// Prefix of every variable scif defines.
pub const ENV_PREFIX: &str = "SCIF_";

/// Variables that may be extended with the host's value instead of replaced.
pub const APPEND_PATHS: [&str; 3] = ["PYTHONPATH", "PATH", "LD_LIBRARY_PATH"];

/// Prompt variable set on every export.
pub const PROMPT_VAR: &str = "PS1";
pub const PROMPT: &str = "scif> ";

/// `SCIF_BASE`, `SCIF_APPS` and `SCIF_DATA`.
pub fn globals(settings: &ScifSettings) -> Vec<(String, String)> {
    vec![
        ("SCIF_BASE".to_string(), settings.base.display().to_string()),
        ("SCIF_APPS".to_string(), settings.apps.display().to_string()),
        ("SCIF_DATA".to_string(), settings.data.display().to_string()),
    ]
}

/// Per-app variables that exist for every known app, e.g.
/// `SCIF_APPBIN_registry=/scif/apps/registry/bin`.
pub fn namespaced(lookup: &AppLookup) -> Vec<(String, String)> {
    lookup
        .pairs()
        .into_iter()
        .map(|(key, value)| {
            (
                format!("{ENV_PREFIX}{}_{}", key.to_uppercase(), lookup.appname),
                value,
            )
        })
        .collect()
}

/// Variables for the active app, e.g. `SCIF_APPBIN=/scif/apps/registry/bin`.
pub fn active(lookup: &AppLookup) -> Vec<(String, String)> {
    lookup
        .pairs()
        .into_iter()
        .map(|(key, value)| (format!("{ENV_PREFIX}{}", key.to_uppercase()), value))
        .collect()
}

/// True for unsuffixed active-app variables such as `SCIF_APPROOT`.
pub fn is_active_key(key: &str) -> bool {
    key.strip_prefix(ENV_PREFIX).is_some_and(|rest| {
        AppLookup::KEYS
            .iter()
            .any(|lookup_key| lookup_key.eq_ignore_ascii_case(rest))
    })
}

/// Extend `value` with the host's value of `key` when allowed.
///
/// Only the variables in [`APPEND_PATHS`] are extended, and only when the
/// host has a non-empty value for them.
pub fn append_path(key: &str, value: &str, allow: bool, host: &EnvMap) -> String {
    if !allow || !APPEND_PATHS.contains(&key) {
        return value.to_string();
    }
    match host.get(key).filter(|existing| !existing.is_empty()) {
        Some(existing) => format!("{value}:{existing}"),
        None => value.to_string(),
    }
}

/// The mapping a process should end up with for a pending environment.
pub fn resolve(env: &EnvMap, allow: bool, host: &EnvMap) -> EnvMap {
    let mut resolved: EnvMap = env
        .iter()
        .map(|(key, value)| (key.clone(), append_path(key, value, allow, host)))
        .collect();
    resolved.insert(PROMPT_VAR.to_string(), PROMPT.to_string());
    resolved
}

/// Parse the `key=value` lines of an `environment.sh`.
///
/// Blank lines and comments are skipped, a leading `export ` is dropped and
/// lines without a key before the first `=` are ignored. Values are taken
/// literally.
pub fn parse_env_file(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() || key.contains(char::is_whitespace) {
                return None;
            }
            Some((key.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Applies a resolved environment somewhere.
pub trait Exporter {
    fn export(&mut self, vars: &EnvMap) -> Result<()>;
}

/// Sets variables on the current process so that children inherit them.
///
/// Variables exported earlier but missing from a later mapping are put back
/// to their host value, or removed. The process environment is global: this
/// must not be used from more than one thread or client at a time.
#[derive(Debug, Default)]
pub struct ProcessExporter {
    host: EnvMap,
    exported: BTreeSet<String>,
}

impl ProcessExporter {
    pub fn new(host: EnvMap) -> Self {
        Self {
            host,
            exported: BTreeSet::new(),
        }
    }
}

impl Exporter for ProcessExporter {
    fn export(&mut self, vars: &EnvMap) -> Result<()> {
        let stale: Vec<String> = self
            .exported
            .iter()
            .filter(|key| !vars.contains_key(*key))
            .cloned()
            .collect();

        for key in stale {
            match self.host.get(&key) {
                // SAFETY: scif runs single threaded; nothing reads the
                // environment concurrently with this call.
                Some(value) => unsafe { std::env::set_var(&key, value) },
                None => unsafe { std::env::remove_var(&key) },
            }
            self.exported.remove(&key);
        }

        for (key, value) in vars {
            if !is_valid_var(key, value) {
                tracing::warn!("Skipping invalid environment variable {key:?}");
                continue;
            }
            tracing::trace!("export {key}={value}");
            // SAFETY: see above.
            unsafe { std::env::set_var(key, value) };
            self.exported.insert(key.clone());
        }
        Ok(())
    }
}

/// Leaves the process untouched; the last mapping is kept for inspection.
#[derive(Debug, Default)]
pub struct NoopExporter {
    pub last: EnvMap,
}

impl Exporter for NoopExporter {
    fn export(&mut self, vars: &EnvMap) -> Result<()> {
        self.last = vars.clone();
        Ok(())
    }
}

fn is_valid_var(key: &str, value: &str) -> bool {
    !key.is_empty() && !key.contains(['=', '\0']) && !value.contains('\0')
}
