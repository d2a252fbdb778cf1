// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! The configuration store: every app declared by a recipe or installed
//! under a base, keyed by app name.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::section::AppSettings;
use crate::{Error, Result, recipe};

#[cfg(test)]
#[path = "./config_test.rs"]
mod config_test;

/// Apps and their settings, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub apps: IndexMap<String, AppSettings>,

    /// Sections as written in the recipe, kept by [`Configuration::finish_load`].
    #[serde(skip)]
    declared: Option<IndexMap<String, AppSettings>>,

    /// Recipe file or apps folder this was loaded from (not serialized).
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Configuration {
    /// Load and finish a recipe file.
    pub fn from_recipe<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading recipe {}", path.display());

        if !path.exists() {
            return Err(Error::RecipeNotFound(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path).map_err(|error| Error::ReadFailed {
            path: path.to_path_buf(),
            error,
        })?;

        let mut config = recipe::parse(&text)?;
        config.source = Some(dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
        config.finish_load();
        Ok(config)
    }

    /// Rebuild the configuration of an installed filesystem.
    ///
    /// Every `<apps>/<name>/scif/<name>.scif` recorded at install time is
    /// read back; folders without one are not apps.
    pub fn from_filesystem<P: AsRef<Path>>(apps_root: P) -> Result<Self> {
        let apps_root = apps_root.as_ref();
        let mut config = Self {
            source: Some(apps_root.to_path_buf()),
            ..Self::default()
        };

        if !apps_root.is_dir() {
            tracing::debug!("No apps folder at {}", apps_root.display());
            return Ok(config);
        }

        let entries = std::fs::read_dir(apps_root).map_err(|error| Error::ReadFailed {
            path: apps_root.to_path_buf(),
            error,
        })?;
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        for name in names {
            let recipe_path = apps_root
                .join(&name)
                .join("scif")
                .join(format!("{name}.scif"));
            if !recipe_path.is_file() {
                continue;
            }
            let text = std::fs::read_to_string(&recipe_path).map_err(|error| {
                Error::ReadFailed {
                    path: recipe_path.clone(),
                    error,
                }
            })?;
            let mut installed = recipe::parse(&text)?;
            match installed.apps.shift_remove(&name) {
                Some(settings) => {
                    config.apps.insert(name, settings);
                }
                None => tracing::warn!("{} does not describe {name}", recipe_path.display()),
            }
        }

        if !config.is_empty() {
            tracing::info!("Found configurations for {} scif apps", config.len());
        }
        config.finish_load();
        Ok(config)
    }

    /// Settings for an app, created empty if the name is new.
    pub fn entry(&mut self, name: &str) -> &mut AppSettings {
        self.apps.entry(name.to_string()).or_default()
    }

    pub fn get(&self, name: &str) -> Option<&AppSettings> {
        self.apps.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.apps.contains_key(name)
    }

    /// App names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.apps.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AppSettings)> {
        self.apps.iter()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Known app names resembling `name`, for error hints.
    pub fn similar(&self, name: &str) -> Vec<String> {
        let needle = name.to_lowercase();
        self.apps
            .keys()
            .filter(|candidate| {
                let candidate = candidate.to_lowercase();
                !needle.is_empty() && (candidate.contains(&needle) || needle.contains(&candidate))
            })
            .cloned()
            .collect()
    }

    /// Sections of an app as the recipe declared them, before
    /// [`Configuration::finish_load`] touched them.
    pub fn declared(&self, name: &str) -> Option<&AppSettings> {
        match &self.declared {
            Some(declared) => declared.get(name),
            None => self.apps.get(name),
        }
    }

    /// Prepend each app's `%appenv` lines to its runscript and test, so a
    /// script that runs in a subshell defines the variables before use.
    ///
    /// The declared sections are kept aside and a finished configuration is
    /// not finished again.
    pub fn finish_load(&mut self) {
        if self.declared.is_some() {
            return;
        }
        self.declared = Some(self.apps.clone());
        for settings in self.apps.values_mut() {
            if settings.environ.is_empty() {
                continue;
            }
            let environ = settings.environ.clone();
            for lines in [&mut settings.runscript, &mut settings.test] {
                if !lines.is_empty() {
                    lines.splice(0..0, environ.iter().cloned());
                }
            }
        }
    }
}
