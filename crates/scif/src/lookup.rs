// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Per-app path lookup.

use std::path::{Path, PathBuf};

use serde::Serialize;

#[cfg(test)]
#[path = "./lookup_test.rs"]
mod lookup_test;

/// Well-known locations of one app.
///
/// These are computed, not created: nothing here touches the disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppLookup {
    pub appname: String,
    pub approot: PathBuf,
    pub appdata: PathBuf,
    pub appmeta: PathBuf,
    pub appbin: PathBuf,
    pub applib: PathBuf,
    pub apprun: PathBuf,
    pub apphelp: PathBuf,
    pub appenv: PathBuf,
    pub apptest: PathBuf,
    pub applabels: PathBuf,
    pub apprecipe: PathBuf,
}

impl AppLookup {
    /// Keys of [`AppLookup::pairs`], in order.
    pub const KEYS: [&'static str; 12] = [
        "appdata",
        "approot",
        "appmeta",
        "appbin",
        "applib",
        "apprun",
        "apphelp",
        "appenv",
        "apptest",
        "applabels",
        "apprecipe",
        "appname",
    ];

    pub fn new(apps: &Path, data: &Path, name: &str) -> Self {
        let approot = apps.join(name);
        let appmeta = approot.join("scif");
        Self {
            appname: name.to_string(),
            appdata: data.join(name),
            appbin: approot.join("bin"),
            applib: approot.join("lib"),
            apprun: appmeta.join("runscript"),
            apphelp: appmeta.join("runscript.help"),
            appenv: appmeta.join("environment.sh"),
            apptest: appmeta.join("test.sh"),
            applabels: appmeta.join("labels.json"),
            apprecipe: appmeta.join(format!("{name}.scif")),
            approot,
            appmeta,
        }
    }

    /// All `(key, value)` pairs, keys as used in `SCIF_<KEY>` variables.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let paths = [
            &self.appdata,
            &self.approot,
            &self.appmeta,
            &self.appbin,
            &self.applib,
            &self.apprun,
            &self.apphelp,
            &self.appenv,
            &self.apptest,
            &self.applabels,
            &self.apprecipe,
        ];
        Self::KEYS
            .into_iter()
            .zip(
                paths
                    .into_iter()
                    .map(|p| p.display().to_string())
                    .chain(std::iter::once(self.appname.clone())),
            )
            .collect()
    }
}
