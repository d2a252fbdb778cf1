// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif preview` command.

use std::path::PathBuf;

use clap::Args;
use miette::Result;

/// Show what installing a recipe would create
#[derive(Debug, Args)]
pub struct CmdPreview {
    /// Recipe file to preview
    recipe: PathBuf,

    /// Apps to preview (default: every app in the recipe)
    apps: Vec<String>,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdPreview {
    pub fn run(&mut self) -> Result<i32> {
        let client = self.base.client();
        print!("{}", client.preview(&self.recipe, &self.apps)?);
        Ok(0)
    }
}
