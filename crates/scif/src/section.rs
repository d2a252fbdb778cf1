// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Recipe section kinds and the per-app settings they populate.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

#[cfg(test)]
#[path = "./section_test.rs"]
mod section_test;

/// A recipe section kind, e.g. `%apprun`.
///
/// This enum is the single mapping between header names and
/// [`AppSettings`] fields. Variant order is the order sections are
/// written back out to a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum SectionKind {
    #[strum(serialize = "apprun")]
    Runscript,
    #[strum(serialize = "appinstall")]
    Install,
    #[strum(serialize = "appenv")]
    Environ,
    #[strum(serialize = "applabels")]
    Labels,
    #[strum(serialize = "appfiles")]
    Files,
    #[strum(serialize = "apphelp")]
    Help,
    #[strum(serialize = "apptest")]
    Test,
}

impl SectionKind {
    /// All kinds in recipe order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Header text for this kind and app, e.g. `%apprun hello`.
    pub fn header(self, app: &str) -> String {
        format!("%{} {app}", self.as_ref())
    }

    /// Field name used in inspect output.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Runscript => "runscript",
            Self::Install => "install",
            Self::Environ => "environ",
            Self::Labels => "labels",
            Self::Files => "files",
            Self::Help => "help",
            Self::Test => "test",
        }
    }
}

/// Everything a recipe declares for one app.
///
/// Each field holds the raw lines of one section in recipe order.
/// An empty field means the section was not defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub environ: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub help: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runscript: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub install: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
}

impl AppSettings {
    /// Lines of one section.
    pub fn section(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::Runscript => &self.runscript,
            SectionKind::Install => &self.install,
            SectionKind::Environ => &self.environ,
            SectionKind::Labels => &self.labels,
            SectionKind::Files => &self.files,
            SectionKind::Help => &self.help,
            SectionKind::Test => &self.test,
        }
    }

    /// Mutable lines of one section.
    pub fn section_mut(&mut self, kind: SectionKind) -> &mut Vec<String> {
        match kind {
            SectionKind::Runscript => &mut self.runscript,
            SectionKind::Install => &mut self.install,
            SectionKind::Environ => &mut self.environ,
            SectionKind::Labels => &mut self.labels,
            SectionKind::Files => &mut self.files,
            SectionKind::Help => &mut self.help,
            SectionKind::Test => &mut self.test,
        }
    }

    /// Defined (non-empty) sections in recipe order.
    pub fn defined(&self) -> impl Iterator<Item = (SectionKind, &[String])> {
        SectionKind::all()
            .map(|kind| (kind, self.section(kind)))
            .filter(|(_, lines)| !lines.is_empty())
    }

    /// True when no section is defined.
    pub fn is_empty(&self) -> bool {
        self.defined().next().is_none()
    }

    /// Parse `%applabels` lines into key/value pairs.
    ///
    /// A line is `key=value` or `key value`; lines without a value are skipped.
    pub fn label_pairs(&self) -> Vec<(String, String)> {
        self.labels
            .iter()
            .filter_map(|line| {
                let line = line.trim();
                let (key, value) = line
                    .split_once('=')
                    .or_else(|| line.split_once(char::is_whitespace))?;
                let (key, value) = (key.trim(), value.trim());
                (!key.is_empty() && !value.is_empty())
                    .then(|| (key.to_string(), value.to_string()))
            })
            .collect()
    }
}
