// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Dry-run rendering of what an install would create.

use std::path::Path;

use crate::client::ScifClient;
use crate::config::Configuration;
use crate::install::render_labels;
use crate::lookup::AppLookup;
use crate::section::SectionKind;
use crate::{Error, Result, recipe};

#[cfg(test)]
#[path = "./preview_test.rs"]
mod preview_test;

impl ScifClient {
    /// Describe the install of `recipe` without touching the filesystem or
    /// the environment. All apps are previewed when `apps` is empty.
    pub fn preview<P: AsRef<Path>>(&self, recipe: P, apps: &[String]) -> Result<String> {
        let recipe = recipe.as_ref();
        tracing::debug!("Previewing recipe {}", recipe.display());
        let config = Configuration::from_recipe(recipe)?;

        let settings = &self.settings;
        let mut lines = vec![
            format!("[base] {}", settings.base.display()),
            format!("[apps] {}", settings.apps.display()),
            format!("[data] {}", settings.data.display()),
        ];

        let names = if apps.is_empty() {
            config.names()
        } else {
            apps.to_vec()
        };
        for name in &names {
            let Some(app) = config.get(name) else {
                return Err(Error::UnknownApp {
                    name: name.clone(),
                    similar: config.similar(name),
                });
            };
            let lookup = AppLookup::new(&settings.apps, &settings.data, name);

            lines.push(String::new());
            lines.push(name.clone());
            for (key, path) in [
                ("approot", &lookup.approot),
                ("appdata", &lookup.appdata),
                ("appbin", &lookup.appbin),
                ("applib", &lookup.applib),
            ] {
                lines.push(format!("[{key}] {}", path.display()));
            }

            let scripts = [
                (SectionKind::Runscript, lookup.apprun.as_path()),
                (SectionKind::Environ, lookup.appenv.as_path()),
                (SectionKind::Help, lookup.apphelp.as_path()),
            ];
            for (kind, path) in scripts {
                push_script(&mut lines, kind, name, app.section(kind), path);
            }

            if let Some(labels) = render_labels(app)? {
                lines.push(format!("+ {} {name}", SectionKind::Labels));
                lines.extend(labels.lines().map(str::to_string));
                lines.push(format!("+ {}", lookup.applabels.display()));
            }
            if !app.files.is_empty() {
                lines.push(format!("+ {} {name}", SectionKind::Files));
                lines.extend(app.files.iter().cloned());
            }
            if !app.install.is_empty() {
                lines.push(format!("+ {} {name}", SectionKind::Install));
                lines.extend(app.install.iter().cloned());
                lines.push(format!("+ cd {}", lookup.approot.display()));
            }

            lines.push(format!("+ apprecipe {name}"));
            let declared = config.declared(name).unwrap_or(app);
            lines.extend(recipe::write_app(name, declared).lines().map(str::to_string));
            lines.push(format!("+ {}", lookup.apprecipe.display()));

            push_script(&mut lines, SectionKind::Test, name, &app.test, &lookup.apptest);
        }

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}

fn push_script(
    lines: &mut Vec<String>,
    kind: SectionKind,
    name: &str,
    body: &[String],
    path: &Path,
) {
    if body.is_empty() {
        return;
    }
    lines.push(format!("+ {kind} {name}"));
    lines.extend(body.iter().cloned());
    lines.push(format!("+ {}", path.display()));
}
