// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif test` command.

use clap::Args;
use miette::Result;

/// Run an app's tests
#[derive(Debug, Args)]
pub struct CmdTest {
    /// App to test
    app: String,

    /// Arguments passed to the test script
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdTest {
    pub fn run(&mut self) -> Result<i32> {
        let mut client = self.base.client();
        crate::app_exit_code(client.test(&self.app, &self.args))
    }
}
