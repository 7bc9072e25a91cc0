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

//! Replay commands: running the traced workload on the local harness.

use crate::commands::{self, ReplayConfig};
use crate::error::CliError;
use crate::harness::DEFAULT_SUMMARY_SCRIPT;
use crate::platform::parse_platform;
use clap::Subcommand;
use collrep_core::Platform;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum ReplayCommands {
    /// Parse a debug log, build the harness, run the workload and summarize
    ///
    /// Writes net_unique.sh and net_counts.csv, copies the script into the
    /// harness checkout, builds it, runs the script while capturing the perf
    /// log, then invokes the summary generator. Stops at the first failing step.
    Replay {
        /// NCCL/RCCL debug log
        #[arg(long, value_name = "FILE")]
        nccl_debug_log: String,

        /// Target platform (cuda, rocm); detected when omitted
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,

        /// Harness checkout (default ./rccl-tests or ./nccl-tests)
        #[arg(long, value_name = "DIR")]
        harness_dir: Option<PathBuf>,

        /// Summary generator script
        #[arg(long, value_name = "FILE", default_value = DEFAULT_SUMMARY_SCRIPT)]
        summary_script: PathBuf,

        /// Do not run the summary generator
        #[arg(long)]
        skip_summary: bool,

        /// Path prefix of the benchmark executables
        #[arg(long, value_name = "PATH")]
        prefix: Option<String>,

        /// Fail on any count anomaly: uneven division, participant mismatch or zero participants
        #[arg(long)]
        strict: bool,
    },
}

impl ReplayCommands {
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            ReplayCommands::Replay {
                nccl_debug_log,
                platform,
                harness_dir,
                summary_script,
                skip_summary,
                prefix,
                strict,
            } => commands::replay(&ReplayConfig {
                log: nccl_debug_log,
                platform,
                harness_dir,
                summary_script,
                skip_summary,
                prefix,
                strict,
            }),
        }
    }
}
