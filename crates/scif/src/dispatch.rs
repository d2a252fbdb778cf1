// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Running installed apps: `run`, `exec`, `test` and `shell`.
//!
//! Each of these reloads the installed base, activates the app, adjusts the
//! entrypoint and then blocks on a single child process.

use crate::client::ScifClient;
use crate::entrypoint::parse_entrypoint_list_with;
use crate::{Error, Result, process};

#[cfg(test)]
#[path = "./dispatch_test.rs"]
mod dispatch_test;

impl ScifClient {
    /// Run an app's runscript, or its shell when it has none.
    pub fn run(&mut self, name: &str, args: &[String]) -> Result<()> {
        self.load_installed(name)?;
        self.activate(name)?;
        self.entry_point.extend(args.iter().cloned());
        tracing::debug!("Running app {name}");
        self.execute(name)
    }

    /// Run any executable inside an app's environment.
    pub fn exec(&mut self, name: &str, executable: &str, args: &[String]) -> Result<()> {
        self.load_installed(name)?;
        self.activate(name)?;
        self.entry_point = std::iter::once(executable.to_string())
            .chain(args.iter().cloned())
            .collect();
        tracing::debug!("Executing {executable} for app {name}");
        self.execute(name)
    }

    /// Run an app's test script. An app without one passes.
    pub fn test(&mut self, name: &str, args: &[String]) -> Result<()> {
        self.load_installed(name)?;
        self.activate(name)?;
        let lookup = self.lookup(name)?;
        if !lookup.apptest.exists() {
            tracing::warn!("No tests defined for {name}");
            return Ok(());
        }
        self.entry_point = [self.settings.shell.clone(), lookup.apptest.display().to_string()]
            .into_iter()
            .chain(args.iter().cloned())
            .collect();
        tracing::debug!("Testing app {name}");
        self.execute(name)
    }

    /// Open an interactive shell, inside an app when one is named.
    pub fn shell(&mut self, name: Option<&str>) -> Result<()> {
        match name {
            Some(name) => {
                self.load_installed(name)?;
                self.activate(name)?;
            }
            None => {
                self.load(None)?;
                self.deactivate()?;
            }
        }
        self.entry_point = vec![self.settings.shell.clone()];
        self.execute(name.unwrap_or("scif"))
    }

    fn load_installed(&mut self, name: &str) -> Result<()> {
        self.load(None)?;
        self.lookup(name).map(|_| ())
    }

    /// Spawn the current entrypoint in the entry folder and wait for it.
    fn execute(&mut self, name: &str) -> Result<()> {
        let folder = self
            .entry_folder
            .get_or_insert_with(|| self.settings.base.clone())
            .clone();
        let resolved = self.resolved_env();

        let Some((program, rest)) = self.entry_point.split_first() else {
            return Err(Error::EmptyEntrypoint(name.to_string()));
        };
        let path_var = self.var(&resolved, "PATH");
        let executable = process::find_executable(program, path_var.as_deref(), &folder)?;
        let args = parse_entrypoint_list_with(rest, |key| self.var(&resolved, key));

        tracing::info!("Executing {name}:{} {args:?}", executable.display());
        let status = process::spawn(&executable, &args, &folder, &resolved)?;
        if !status.success() {
            return Err(Error::AppFailed {
                name: name.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}
