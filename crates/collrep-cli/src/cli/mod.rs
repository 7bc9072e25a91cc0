// collrep - Collective-call log replay toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CLI command definitions and argument parsing.
//!
//! Commands are grouped by category and flattened into one top-level enum:
//!
//! ```text
//! Commands
//! ├── Core (parse, inspect, detect-platform)
//! ├── Replay (replay)
//! └── Utility (completion)
//! ```

mod core;
mod replay;
mod utility;

use crate::error::CliError;
use clap::{Parser, Subcommand};

pub use self::core::CoreCommands;
pub use replay::ReplayCommands;
pub use utility::UtilityCommands;

/// collrep - replay NCCL/RCCL collective traces with nccl-tests/rccl-tests
///
/// # Examples
///
/// ```bash
/// # Translate a debug log into a deduplicated script and count table
/// collrep parse --nccl-debug-log rccl_debug.log --unique
///
/// # Build the harness, run the workload and summarize
/// collrep replay --nccl-debug-log rccl_debug.log --platform rocm
/// ```
#[derive(Parser)]
#[command(name = "collrep")]
#[command(author, version, about = "collrep - Collective-call log replay toolkit", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands enum.
#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Replay(ReplayCommands),

    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Dispatch to the command's category.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Core(cmd) => cmd.execute(),
            Commands::Replay(cmd) => cmd.execute(),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}
