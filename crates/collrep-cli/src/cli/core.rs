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

//! Core commands: translating and inspecting trace logs.

use crate::commands::{self, InspectFormat, ParseConfig};
use crate::error::CliError;
use crate::platform::parse_platform;
use clap::Subcommand;
use collrep_core::Platform;

/// Core collrep commands.
#[derive(Subcommand)]
pub enum CoreCommands {
    /// Generate a benchmark script from an NCCL/RCCL debug log
    ///
    /// Reads a log captured with NCCL_DEBUG=INFO NCCL_DEBUG_SUBSYS=INIT,COLL
    /// and writes one nccl-tests/rccl-tests command per traced collective call.
    /// With --unique, writes distinct commands plus a per-command count table.
    Parse {
        /// NCCL/RCCL log after running the application with NCCL_DEBUG=INFO NCCL_DEBUG_SUBSYS=INIT,COLL
        #[arg(long, value_name = "FILE")]
        nccl_debug_log: String,

        /// Base name of the generated script
        #[arg(long, default_value = commands::DEFAULT_SCRIPT_NAME)]
        output_script_name: String,

        /// Write distinct commands and their call counts
        #[arg(long)]
        unique: bool,

        /// Target platform (cuda, rocm); detected when omitted
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,

        /// Path prefix of the benchmark executables
        #[arg(long, value_name = "PATH")]
        prefix: Option<String>,

        /// Fail on any count anomaly: uneven division, participant mismatch or zero participants
        #[arg(long)]
        strict: bool,

        /// Decode log lines in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Print the decoded collective calls of a debug log
    Inspect {
        /// NCCL/RCCL debug log
        #[arg(long, value_name = "FILE")]
        nccl_debug_log: String,

        /// Target platform (cuda, rocm); detected when omitted
        #[arg(long, value_parser = parse_platform)]
        platform: Option<Platform>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = InspectFormat::Text)]
        format: InspectFormat,
    },

    /// Print the detected platform (rocm or cuda)
    DetectPlatform,
}

impl CoreCommands {
    /// Execute the core command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            CoreCommands::Parse {
                nccl_debug_log,
                output_script_name,
                unique,
                platform,
                prefix,
                strict,
                parallel,
            } => commands::parse(&ParseConfig {
                log: nccl_debug_log,
                output_script_name,
                unique,
                platform,
                prefix,
                strict,
                parallel,
            })
            .map(|_| ()),
            CoreCommands::Inspect {
                nccl_debug_log,
                platform,
                format,
            } => commands::inspect(&nccl_debug_log, platform, format),
            CoreCommands::DetectPlatform => commands::detect_platform(),
        }
    }
}
