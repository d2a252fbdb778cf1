// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif shell` command.

use clap::Args;
use miette::Result;

/// Open a shell in the base or inside an app
#[derive(Debug, Args)]
pub struct CmdShell {
    /// App to activate before starting the shell
    app: Option<String>,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdShell {
    pub fn run(&mut self) -> Result<i32> {
        let mut client = self.base.client();
        crate::app_exit_code(client.shell(self.app.as_deref()))
    }
}
