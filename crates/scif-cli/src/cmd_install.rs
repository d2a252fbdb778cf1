// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif install` command.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use miette::Result;

/// Install apps from a recipe
#[derive(Debug, Args)]
pub struct CmdInstall {
    /// Recipe file to install
    recipe: PathBuf,

    /// Apps to install (default: every app in the recipe)
    apps: Vec<String>,

    /// Fail early unless the parent of the base is writable
    #[clap(long)]
    writable: bool,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdInstall {
    pub fn run(&mut self) -> Result<i32> {
        let mut client = self.base.client();
        client.install(&self.recipe, &self.apps, self.writable)?;

        let installed = if self.apps.is_empty() {
            client.apps()
        } else {
            self.apps.clone()
        };
        for name in installed {
            println!("{} {name}", "Installed".green());
        }
        Ok(0)
    }
}
