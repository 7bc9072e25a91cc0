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

//! Parse command - translate a trace log into benchmark script artifacts

use super::{decode_records, read_file};
use crate::error::CliError;
use crate::platform::resolve_platform;
use collrep_core::emit::emit_translation;
use collrep_core::{
    translate_records, AggregationPolicy, CoreError, Platform, PlatformProfile, TranslateOptions,
};
use colored::Colorize;
use std::path::PathBuf;

/// Default artifact base name.
pub const DEFAULT_SCRIPT_NAME: &str = "net_nccl_rccl";

/// Arguments of `collrep parse`.
#[derive(Debug, Clone)]
pub struct ParseConfig {
    /// Path of the NCCL/RCCL debug log.
    pub log: String,
    /// Base name of the written artifacts.
    pub output_script_name: String,
    pub unique: bool,
    /// Explicit platform; detected when `None`.
    pub platform: Option<Platform>,
    /// Override of the executable path prefix.
    pub prefix: Option<String>,
    /// Fail on aggregation anomalies instead of warning.
    pub strict: bool,
    pub parallel: bool,
}

impl ParseConfig {
    /// Configuration with defaults for everything but the log path.
    pub fn new(log: impl Into<String>) -> Self {
        Self {
            log: log.into(),
            output_script_name: DEFAULT_SCRIPT_NAME.to_string(),
            unique: false,
            platform: None,
            prefix: None,
            strict: false,
            parallel: false,
        }
    }
}

/// Translate the log named in `config` and write the artifacts.
///
/// Without `unique`, writes `<name>.sh` with one command per traced call.
/// With `unique`, writes `<name>_unique.sh` and `<name>_counts.csv`.
///
/// # Returns
///
/// The paths written, script first.
///
/// # Errors
///
/// Returns `Err` if the platform cannot be determined, the log cannot be read,
/// any traced line fails to decode, aggregation fails under `strict`, or an
/// artifact cannot be written.
pub fn parse(config: &ParseConfig) -> Result<Vec<PathBuf>, CliError> {
    let platform = resolve_platform(config.platform)?;
    let mut profile = PlatformProfile::new(platform);
    if let Some(prefix) = &config.prefix {
        profile = profile.with_exec_prefix(prefix.as_str());
    }

    let (e4m3, e5m2) = profile.low_precision_names();
    tracing::info!("Using platform: {} (FP8 types: {}/{})", platform, e4m3, e5m2);

    let content = read_file(&config.log)?;
    let records = decode_records(&content, config.parallel)?;
    tracing::info!("Decoded {} collective calls from {}", records.len(), config.log);

    let options = TranslateOptions {
        unique: config.unique,
        policy: if config.strict {
            AggregationPolicy::Strict
        } else {
            AggregationPolicy::Lenient
        },
    };
    let translation = translate_records(&records, &profile, &options)?;

    if let Some(table) = translation.table() {
        tracing::info!("{} distinct commands", table.len());
        if !table.anomalies().is_empty() {
            println!(
                "{} {} count anomalies (see warnings above)",
                "!".yellow().bold(),
                table.anomalies().len()
            );
        }
    }

    let paths = emit_translation(&translation, &config.output_script_name).map_err(CoreError::from)?;
    for path in &paths {
        println!("{} Wrote {}", "✓".green().bold(), path.display());
    }
    Ok(paths)
}
