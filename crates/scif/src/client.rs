// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! The client session and its activation state machine.
//!
//! A [`ScifClient`] owns the loaded [`Configuration`], the pending
//! environment and which app (if any) is active. At most one app is active:
//! [`ScifClient::activate`] always deactivates first, and
//! [`ScifClient::deactivate`] puts the entrypoint and entry folder back to the
//! values the client was constructed with.

use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::defaults::ScifSettings;
use crate::environment::{self, EnvMap, Exporter, NoopExporter, ProcessExporter};
use crate::lookup::AppLookup;
use crate::{Error, Result};

#[cfg(test)]
#[path = "./client_test.rs"]
mod client_test;

/// One scif session.
pub struct ScifClient {
    pub(crate) settings: ScifSettings,
    pub(crate) config: Configuration,
    /// Pending environment, before append-path resolution.
    pub(crate) env: EnvMap,
    pub(crate) entry_point: Vec<String>,
    pub(crate) entry_folder: Option<PathBuf>,
    /// Process environment at construction.
    pub(crate) host: EnvMap,
    pub(crate) active_app: Option<String>,
    exporter: Box<dyn Exporter>,
}

impl std::fmt::Debug for ScifClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScifClient")
            .field("base", &self.settings.base)
            .field("apps", &self.config.names())
            .field("active_app", &self.active_app)
            .finish_non_exhaustive()
    }
}

impl ScifClient {
    /// A client that reads its settings from, and exports to, the current
    /// process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars().collect())
    }

    /// Like [`ScifClient::from_env`], with settings read from `host` instead.
    pub fn from_vars(host: EnvMap) -> Self {
        let settings = ScifSettings::from_vars(&host);
        let exporter = ProcessExporter::new(host.clone());
        Self::new(settings, host, Box::new(exporter))
    }

    /// A client that never touches the process environment.
    pub fn detached(settings: ScifSettings, host: EnvMap) -> Self {
        Self::new(settings, host, Box::new(NoopExporter::default()))
    }

    pub fn new(settings: ScifSettings, host: EnvMap, exporter: Box<dyn Exporter>) -> Self {
        tracing::debug!("New client with base {}", settings.base.display());
        let env = environment::globals(&settings).into_iter().collect();
        Self {
            entry_point: settings.entry_point.clone(),
            entry_folder: settings.entry_folder.clone(),
            settings,
            config: Configuration::default(),
            env,
            host,
            active_app: None,
            exporter,
        }
    }

    pub fn settings(&self) -> &ScifSettings {
        &self.settings
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The pending environment, without host paths appended.
    pub fn env(&self) -> &EnvMap {
        &self.env
    }

    pub fn active_app(&self) -> Option<&str> {
        self.active_app.as_deref()
    }

    pub fn entry_point(&self) -> &[String] {
        &self.entry_point
    }

    pub fn entry_folder(&self) -> Option<&Path> {
        self.entry_folder.as_deref()
    }

    /// Load a recipe file or an installed base, replacing any previous
    /// configuration and environment.
    ///
    /// `None` loads the configured base. A path that is neither a file nor a
    /// directory leaves the client with no apps.
    pub fn load(&mut self, path: Option<&Path>) -> Result<()> {
        let path = path.unwrap_or(&self.settings.base);
        let config = if path.is_file() {
            Configuration::from_recipe(path)?
        } else if path.is_dir() {
            let apps_root = if path == self.settings.base.as_path() {
                self.settings.apps.clone()
            } else {
                path.join("apps")
            };
            Configuration::from_filesystem(apps_root)?
        } else {
            tracing::warn!("No recipe or filesystem loaded");
            Configuration::default()
        };
        self.set_config(config)
    }

    /// Replace the configuration and reset the session around it.
    pub fn set_config(&mut self, config: Configuration) -> Result<()> {
        self.config = config;
        self.active_app = None;
        self.entry_point = self.settings.entry_point.clone();
        self.entry_folder = self.settings.entry_folder.clone();
        self.init_env(&[])?;
        tracing::debug!("Found apps {:?}", self.config.names());
        Ok(())
    }

    /// Names of every loaded app, in declaration order.
    pub fn apps(&self) -> Vec<String> {
        self.config.names()
    }

    /// Paths of a loaded app.
    pub fn lookup(&self, name: &str) -> Result<AppLookup> {
        if !self.config.contains(name) {
            return Err(Error::UnknownApp {
                name: name.to_string(),
                similar: self.config.similar(name),
            });
        }
        Ok(AppLookup::new(&self.settings.apps, &self.settings.data, name))
    }

    /// Rebuild the environment with the global variables and the namespaced
    /// variables of `apps` (every loaded app when empty).
    pub fn init_env(&mut self, apps: &[String]) -> Result<()> {
        let names = if apps.is_empty() {
            self.apps()
        } else {
            apps.to_vec()
        };

        let mut env: EnvMap = environment::globals(&self.settings).into_iter().collect();
        for name in &names {
            env.extend(environment::namespaced(&self.lookup(name)?));
        }
        self.env = env;
        Ok(())
    }

    /// Make `name` the active app and export its environment.
    pub fn activate(&mut self, name: &str) -> Result<()> {
        let lookup = self.lookup(name)?;
        self.deactivate()?;
        tracing::info!("Activating {name}");

        self.env.extend(environment::active(&lookup));
        self.env
            .insert("PATH".to_string(), lookup.appbin.display().to_string());
        self.env.insert(
            "LD_LIBRARY_PATH".to_string(),
            lookup.applib.display().to_string(),
        );

        self.entry_point = vec![self.settings.shell.clone()];
        if lookup.apprun.exists() {
            self.entry_point.push(lookup.apprun.display().to_string());
        }

        if lookup.appenv.is_file() {
            let text =
                std::fs::read_to_string(&lookup.appenv).map_err(|error| Error::ReadFailed {
                    path: lookup.appenv.clone(),
                    error,
                })?;
            for (key, value) in environment::parse_env_file(&text) {
                tracing::debug!("Updating {name} environment {key}={value}");
                self.env.insert(key, value);
            }
        }

        if self.settings.entry_folder.is_none() {
            self.entry_folder = Some(lookup.approot);
        }
        self.active_app = Some(name.to_string());
        self.export()
    }

    /// Clear the active app and export the base environment.
    pub fn deactivate(&mut self) -> Result<()> {
        if let Some(name) = self.active_app.take() {
            tracing::debug!("Deactivating {name}");
        }
        self.entry_point = self.settings.entry_point.clone();
        self.entry_folder = self.settings.entry_folder.clone();
        self.init_env(&[])?;
        self.export()
    }

    /// The mapping a child process should see right now.
    pub fn resolved_env(&self) -> EnvMap {
        environment::resolve(&self.env, self.settings.allow_append, &self.host)
    }

    /// Apply the resolved environment through the exporter.
    pub fn export(&mut self) -> Result<()> {
        let resolved = self.resolved_env();
        self.exporter.export(&resolved)
    }

    /// Look up a variable the way a child of this client would see it.
    pub(crate) fn var(&self, resolved: &EnvMap, key: &str) -> Option<String> {
        resolved.get(key).or_else(|| self.host.get(key)).cloned()
    }
}
