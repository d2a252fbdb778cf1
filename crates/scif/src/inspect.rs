// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Read-only views of loaded apps: listing, inspection and help.

use indexmap::IndexMap;
use serde::Serialize;
use strum::{Display, EnumString};

use crate::client::ScifClient;
use crate::section::{AppSettings, SectionKind};
use crate::{Result, recipe};

#[cfg(test)]
#[path = "./inspect_test.rs"]
mod inspect_test;

/// Which sections of an app to inspect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InspectSelection {
    /// Runscript, together with its help.
    pub runscript: bool,
    pub environ: bool,
    pub labels: bool,
    pub install: bool,
    pub files: bool,
    pub test: bool,
    pub all: bool,
}

impl InspectSelection {
    pub fn all() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }

    /// Selected kinds in recipe order.
    pub fn kinds(&self) -> Vec<SectionKind> {
        SectionKind::all()
            .filter(|kind| self.all || self.selects(*kind))
            .collect()
    }

    fn selects(&self, kind: SectionKind) -> bool {
        match kind {
            SectionKind::Runscript | SectionKind::Help => self.runscript,
            SectionKind::Environ => self.environ,
            SectionKind::Labels => self.labels,
            SectionKind::Install => self.install,
            SectionKind::Files => self.files,
            SectionKind::Test => self.test,
        }
    }
}

/// Output format for [`ScifClient::inspect`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

#[derive(Serialize)]
struct InspectDocument<'a> {
    data: InspectData<'a>,
}

#[derive(Serialize)]
struct InspectData<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    attributes: IndexMap<&'static str, &'a [String]>,
}

impl ScifClient {
    /// One loaded app per line; `longlist` adds each app's root folder.
    pub fn list_apps(&self, longlist: bool) -> Result<String> {
        let names = self.apps();
        if names.is_empty() {
            tracing::warn!("No apps installed under {}", self.settings.apps.display());
            return Ok(String::new());
        }

        let width = names.iter().map(String::len).max().unwrap_or_default();
        let mut lines = Vec::with_capacity(names.len());
        for name in &names {
            if longlist {
                let lookup = self.lookup(name)?;
                lines.push(format!("{name:<width$} {}", lookup.approot.display()));
            } else {
                lines.push(name.clone());
            }
        }
        Ok(lines.join("\n") + "\n")
    }

    /// Render the selected sections of an app.
    ///
    /// An app that is not loaded is reported and rendered as nothing.
    pub fn inspect(
        &self,
        name: &str,
        selection: &InspectSelection,
        format: InspectFormat,
    ) -> Result<String> {
        let Some(app) = self.config.get(name) else {
            tracing::warn!("{name} is not an installed application");
            return Ok(String::new());
        };
        let kinds = selection.kinds();
        if kinds.is_empty() {
            tracing::warn!("No metadata selected for {name}");
            return Ok(String::new());
        }

        match format {
            InspectFormat::Text => {
                let selected = select(app, &kinds);
                if selected.is_empty() {
                    tracing::warn!("No metadata defined for {name}");
                }
                Ok(recipe::write_app(name, &selected))
            }
            InspectFormat::Json => {
                let json = serde_json::to_string_pretty(&document(name, app, &kinds))?;
                Ok(json + "\n")
            }
            InspectFormat::Yaml => Ok(serde_yaml::to_string(&document(name, app, &kinds))?),
        }
    }

    /// The `%apphelp` section of an installed app.
    pub fn help(&self, name: &str) -> Result<String> {
        let lookup = self.lookup(name)?;
        let help = self
            .config
            .get(name)
            .map(|app| app.help.as_slice())
            .unwrap_or_default();
        if !lookup.apphelp.exists() || help.is_empty() {
            tracing::info!("No help exists for {name}");
            return Ok(String::new());
        }
        let mut text = help.join("\n");
        text.push('\n');
        Ok(text)
    }
}

/// A copy of `app` holding only the given sections.
fn select(app: &AppSettings, kinds: &[SectionKind]) -> AppSettings {
    let mut selected = AppSettings::default();
    for kind in kinds {
        *selected.section_mut(*kind) = app.section(*kind).to_vec();
    }
    selected
}

fn document<'a>(
    name: &'a str,
    app: &'a AppSettings,
    kinds: &[SectionKind],
) -> InspectDocument<'a> {
    let attributes = kinds
        .iter()
        .map(|kind| (kind.field_name(), app.section(*kind)))
        .collect();
    InspectDocument {
        data: InspectData {
            id: name,
            kind: "app",
            attributes,
        },
    }
}
