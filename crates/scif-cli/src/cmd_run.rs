// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif run` command.

use clap::Args;
use miette::Result;

/// Run an app's runscript
#[derive(Debug, Args)]
pub struct CmdRun {
    /// App to run
    app: String,

    /// Arguments passed to the runscript
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdRun {
    pub fn run(&mut self) -> Result<i32> {
        let mut client = self.base.client();
        crate::app_exit_code(client.run(&self.app, &self.args))
    }
}
