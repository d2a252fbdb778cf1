// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Client settings and their defaults, read from `SCIF_*` variables.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::entrypoint::split_entrypoint;

#[cfg(test)]
#[path = "./defaults_test.rs"]
mod defaults_test;

/// Default root of the scientific filesystem.
pub const DEFAULT_BASE: &str = "/scif";

/// Default shell used for runscripts, tests and `scif shell`.
pub const DEFAULT_SHELL: &str = "/bin/bash";

/// Default entrypoint when no app is active.
pub const DEFAULT_ENTRYPOINT: &str = "/bin/bash";

/// Values accepted as "true" for boolean settings.
const TRUTHY: [&str; 5] = ["yes", "true", "t", "1", "y"];

/// Settings that stay fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScifSettings {
    /// The overall base, e.g. `/scif`.
    pub base: PathBuf,
    /// Root for app folders, `<base>/apps` unless overridden.
    pub apps: PathBuf,
    /// Root for app data, `<base>/data` unless overridden.
    pub data: PathBuf,
    /// Shell used to interpret runscripts and tests.
    pub shell: String,
    /// Entrypoint used when no app is active.
    pub entry_point: Vec<String>,
    /// Explicit working directory; when `None` the active app root is used.
    pub entry_folder: Option<PathBuf>,
    /// Whether host values are appended to path-like variables.
    pub allow_append: bool,
}

impl Default for ScifSettings {
    fn default() -> Self {
        Self::with_base(DEFAULT_BASE)
    }
}

impl ScifSettings {
    /// Default settings rooted at `base`.
    pub fn with_base<P: Into<PathBuf>>(base: P) -> Self {
        let base = base.into();
        Self {
            apps: base.join("apps"),
            data: base.join("data"),
            base,
            shell: DEFAULT_SHELL.to_string(),
            entry_point: vec![DEFAULT_ENTRYPOINT.to_string()],
            entry_folder: None,
            allow_append: true,
        }
    }

    /// Read settings from the current process environment.
    pub fn from_env() -> Self {
        let vars: BTreeMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Read settings from a snapshot of environment variables.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_vars(vars: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .filter(|v| !v.is_empty())
                .inspect(|v| tracing::debug!("{key} found as {v}"))
                .cloned()
        };

        let base = PathBuf::from(get("SCIF_BASE").unwrap_or_else(|| DEFAULT_BASE.to_string()));
        let mut settings = Self::with_base(base);

        if let Some(apps) = get("SCIF_APPS") {
            settings.apps = PathBuf::from(apps);
        }
        if let Some(data) = get("SCIF_DATA") {
            settings.data = PathBuf::from(data);
        }
        if let Some(shell) = get("SCIF_SHELL") {
            settings.shell = shell;
        }
        if let Some(entrypoint) = get("SCIF_ENTRYPOINT") {
            match split_entrypoint(&entrypoint) {
                Ok(tokens) if !tokens.is_empty() => settings.entry_point = tokens,
                Ok(_) => {}
                Err(err) => tracing::warn!("Ignoring SCIF_ENTRYPOINT: {err}"),
            }
        }
        settings.entry_folder = get("SCIF_ENTRYFOLDER").map(PathBuf::from);
        if let Some(allow) = get("SCIF_ALLOW_APPEND_PATHS") {
            settings.allow_append = is_truthy(&allow);
        }

        settings
    }
}

/// Interpret a boolean setting the way `SCIF_ALLOW_APPEND_PATHS` is documented.
pub fn is_truthy(value: &str) -> bool {
    let value = value.to_lowercase();
    TRUTHY.contains(&value.as_str())
}
