// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Installing a recipe onto a base.
//!
//! Install is not transactional: an error stops the run and leaves whatever
//! was already created in place.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use nix::unistd::{AccessFlags, access};
use walkdir::WalkDir;

use crate::client::ScifClient;
use crate::config::Configuration;
use crate::entrypoint::expand_with;
use crate::lookup::AppLookup;
use crate::section::AppSettings;
use crate::{Error, Result, recipe};

#[cfg(test)]
#[path = "./install_test.rs"]
mod install_test;

const EXECUTABLE_MODE: u32 = 0o755;

impl ScifClient {
    /// Install the apps of a recipe file, or all of them when `apps` is empty.
    pub fn install<P: AsRef<Path>>(
        &mut self,
        recipe: P,
        apps: &[String],
        writable: bool,
    ) -> Result<()> {
        let recipe = recipe.as_ref();
        tracing::debug!("Installing recipe {}", recipe.display());

        if !recipe.exists() {
            return Err(Error::RecipeNotFound(recipe.to_path_buf()));
        }
        if writable {
            let base = &self.settings.base;
            if access(base_parent(base), AccessFlags::W_OK).is_err() {
                return Err(Error::NoWriteAccess(base.clone()));
            }
        }

        self.set_config(Configuration::from_recipe(recipe)?)?;
        self.install_base()?;
        self.install_apps(apps)
    }

    /// Create the base, apps and data folders.
    pub fn install_base(&self) -> Result<()> {
        tracing::info!("Installing base to {}", self.settings.base.display());
        for folder in [&self.settings.base, &self.settings.apps, &self.settings.data] {
            create_dir(folder)?;
        }
        Ok(())
    }

    /// Install loaded apps one at a time, then export the base environment.
    ///
    /// An unknown name stops the run; apps before it stay installed.
    pub fn install_apps(&mut self, apps: &[String]) -> Result<()> {
        let apps = if apps.is_empty() {
            self.apps()
        } else {
            apps.to_vec()
        };

        for name in &apps {
            self.install_app(name)?;
        }

        self.init_env(&[])?;
        self.export()
    }

    fn install_app(&mut self, name: &str) -> Result<()> {
        let lookup = self.lookup(name)?;
        let settings = self.config.get(name).cloned().unwrap_or_default();
        tracing::info!("Installing app {name}");

        for folder in [&lookup.appmeta, &lookup.appbin, &lookup.applib, &lookup.appdata] {
            create_dir(folder)?;
        }

        self.activate(name)?;

        if write_script(&settings.runscript, &lookup.apprun, true)? {
            tracing::debug!("+ apprun {name}");
        }
        if write_script(&settings.environ, &lookup.appenv, false)? {
            tracing::debug!("+ appenv {name}");
        }
        if write_script(&settings.help, &lookup.apphelp, false)? {
            tracing::debug!("+ apphelp {name}");
        }
        if write_labels(&settings, &lookup.applabels)? {
            tracing::debug!("+ applabels {name}");
        }
        self.install_files(name, &settings)?;
        self.install_commands(name, &settings, &lookup)?;

        tracing::debug!("+ apprecipe {name}");
        let declared = self.config.declared(name).unwrap_or(&settings);
        write_file(&lookup.apprecipe, &recipe::write_app(name, declared))?;

        if write_script(&settings.test, &lookup.apptest, true)? {
            tracing::debug!("+ apptest {name}");
        }

        self.deactivate()
    }

    /// Copy every `%appfiles` pair, expanding variables against the active
    /// app's environment.
    fn install_files(&self, name: &str, settings: &AppSettings) -> Result<()> {
        if settings.files.is_empty() {
            return Ok(());
        }
        tracing::debug!("+ appfiles {name}");

        let resolved = self.resolved_env();
        for entry in &settings.files {
            let fields: Vec<&str> = entry.split_whitespace().collect();
            let [source, destination] = fields.as_slice() else {
                return Err(Error::InvalidFilesEntry {
                    app: name.to_string(),
                    entry: entry.clone(),
                });
            };
            let source = PathBuf::from(expand_with(source, |key| self.var(&resolved, key)));
            let destination =
                PathBuf::from(expand_with(destination, |key| self.var(&resolved, key)));
            copy_path(&source, &destination)?;
        }
        Ok(())
    }

    /// Run `%appinstall` as one shell script inside the app root.
    fn install_commands(
        &self,
        name: &str,
        settings: &AppSettings,
        lookup: &AppLookup,
    ) -> Result<()> {
        if settings.install.is_empty() {
            return Ok(());
        }
        tracing::debug!("+ appinstall {name}");

        let script = settings.install.join("\n");
        let status = crate::process::run_script(&script, &lookup.approot, &self.resolved_env())?;
        if !status.success() {
            return Err(Error::CommandFailed {
                app: name.to_string(),
                code: status.code(),
            });
        }
        Ok(())
    }
}

/// The folder a new base is created in. A bare relative name lives in the
/// current directory.
fn base_parent(base: &Path) -> &Path {
    match base.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => base,
    }
}

fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|error| Error::WriteFailed {
        path: path.to_path_buf(),
        error,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|error| Error::WriteFailed {
        path: path.to_path_buf(),
        error,
    })
}

/// Write section lines to `path`. Nothing is written for an empty section.
fn write_script(lines: &[String], path: &Path, executable: bool) -> Result<bool> {
    if lines.is_empty() {
        return Ok(false);
    }
    let mut contents = lines.join("\n");
    contents.push('\n');
    write_file(path, &contents)?;

    if executable {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(EXECUTABLE_MODE))
            .map_err(|error| Error::WriteFailed {
                path: path.to_path_buf(),
                error,
            })?;
    }
    Ok(true)
}

/// `%applabels` as a pretty printed JSON object, if any label has a value.
pub(crate) fn render_labels(settings: &AppSettings) -> Result<Option<String>> {
    let labels: IndexMap<String, String> = settings.label_pairs().into_iter().collect();
    if labels.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string_pretty(&labels)?))
}

fn write_labels(settings: &AppSettings, path: &Path) -> Result<bool> {
    match render_labels(settings)? {
        Some(json) => write_file(path, &json).map(|()| true),
        None => Ok(false),
    }
}

/// Copy a file or a directory tree.
///
/// An existing destination directory receives the source under its own name.
fn copy_path(source: &Path, destination: &Path) -> Result<()> {
    if !source.exists() {
        return Err(Error::SourceNotFound(source.to_path_buf()));
    }
    let target = match source.file_name() {
        Some(file_name) if destination.is_dir() => destination.join(file_name),
        _ => destination.to_path_buf(),
    };
    tracing::trace!("copy {} -> {}", source.display(), target.display());

    if source.is_file() {
        if let Some(parent) = target.parent() {
            create_dir(parent)?;
        }
        return copy_file(source, &target);
    }

    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|err| Error::ReadFailed {
            path: source.to_path_buf(),
            error: err.into(),
        })?;
        let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
        let path = target.join(relative);
        if entry.file_type().is_symlink() {
            copy_link(entry.path(), &path)?;
        } else if entry.file_type().is_dir() {
            create_dir(&path)?;
        } else {
            copy_file(entry.path(), &path)?;
        }
    }
    Ok(())
}

fn copy_file(source: &Path, target: &Path) -> Result<()> {
    std::fs::copy(source, target).map_err(|error| Error::WriteFailed {
        path: target.to_path_buf(),
        error,
    })?;
    Ok(())
}

/// Recreate a symlink with the same target, which may dangle.
fn copy_link(source: &Path, target: &Path) -> Result<()> {
    let link = std::fs::read_link(source).map_err(|error| Error::ReadFailed {
        path: source.to_path_buf(),
        error,
    })?;
    std::os::unix::fs::symlink(&link, target).map_err(|error| Error::WriteFailed {
        path: target.to_path_buf(),
        error,
    })
}
