// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Implementation of the `scif exec` command.

use clap::Args;
use miette::Result;

/// Run a command inside an app's environment
#[derive(Debug, Args)]
pub struct CmdExec {
    /// App whose environment to use
    app: String,

    /// Executable to run, e.g. 'echo' or '[e]SCIF_APPBIN/tool'
    executable: String,

    /// Arguments passed to the executable
    #[clap(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    #[clap(flatten)]
    base: crate::BaseFlags,
}

impl CmdExec {
    pub fn run(&mut self) -> Result<i32> {
        let mut client = self.base.client();
        crate::app_exit_code(client.exec(&self.app, &self.executable, &self.args))
    }
}
