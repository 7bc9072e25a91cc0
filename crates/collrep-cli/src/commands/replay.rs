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

//! Replay command - parse, build the harness, run it and summarize

use super::{parse, ParseConfig};
use crate::error::CliError;
use crate::harness::{ReplayOptions, ReplayPlan, REPLAY_BASE_NAME};
use crate::platform::{resolve_platform, rocm_home};
use collrep_core::Platform;
use colored::Colorize;
use std::path::PathBuf;

/// Arguments of `collrep replay`.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    pub log: String,
    pub platform: Option<Platform>,
    pub harness_dir: Option<PathBuf>,
    pub summary_script: PathBuf,
    pub skip_summary: bool,
    /// Override of the executable path prefix written into the script.
    pub prefix: Option<String>,
    pub strict: bool,
}

/// Regenerate the deduplicated workload, run it on the local harness and
/// hand the results to the summary generator.
///
/// Artifacts and the perf log are written to the current directory.
///
/// # Errors
///
/// Returns `Err` on any parse failure and on the first harness step that
/// fails; later steps are not run.
pub fn replay(config: &ReplayConfig) -> Result<(), CliError> {
    let platform = resolve_platform(config.platform)?;

    parse(&ParseConfig {
        output_script_name: REPLAY_BASE_NAME.to_string(),
        unique: true,
        platform: Some(platform),
        prefix: config.prefix.clone(),
        strict: config.strict,
        ..ParseConfig::new(config.log.as_str())
    })?;

    let workdir = std::env::current_dir().map_err(|e| CliError::io_error(".", e))?;
    let options = ReplayOptions {
        platform,
        harness_dir: config.harness_dir.clone(),
        summary_script: config.summary_script.clone(),
        skip_summary: config.skip_summary,
        rocm_home: rocm_home(),
    };
    ReplayPlan::new(&options, &workdir).execute()?;

    println!("{} Finished dumping all data", "✓".green().bold());
    Ok(())
}
