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

//! Inspect command - decoded view of every traced collective call

use super::read_file;
use crate::error::CliError;
use crate::platform::resolve_platform;
use collrep_core::{
    decode_line, filter_lines, synthesize, CollectiveCallRecord, CoreError, Platform,
    PlatformProfile,
};
use colored::Colorize;

/// Output format of `collrep inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
}

struct Inspected {
    line: usize,
    record: CollectiveCallRecord,
    command: String,
}

/// Decode each traced call in `file` and print it with its command.
///
/// # Errors
///
/// Returns `Err` if the platform cannot be determined, the file cannot be
/// read, a line fails to decode, or JSON serialization fails.
pub fn inspect(
    file: &str,
    platform: Option<Platform>,
    format: InspectFormat,
) -> Result<(), CliError> {
    let profile = PlatformProfile::new(resolve_platform(platform)?);
    let content = read_file(file)?;

    let mut calls = Vec::new();
    for line in filter_lines(&content) {
        let record = decode_line(line).map_err(CoreError::from)?;
        let command = synthesize(&record, &profile).map_err(CoreError::from)?;
        calls.push(Inspected {
            line: line.number,
            record,
            command: command.command,
        });
    }

    match format {
        InspectFormat::Json => print_json(&calls),
        InspectFormat::Text => {
            print_text(file, &profile, &calls);
            Ok(())
        }
    }
}

fn print_json(calls: &[Inspected]) -> Result<(), CliError> {
    let values: Vec<serde_json::Value> = calls
        .iter()
        .map(|c| -> Result<serde_json::Value, serde_json::Error> {
            Ok(serde_json::json!({
                "line": c.line,
                "record": serde_json::to_value(&c.record)?,
                "command": c.command,
            }))
        })
        .collect::<Result<_, _>>()?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_text(file: &str, profile: &PlatformProfile, calls: &[Inspected]) {
    println!("{}", "Collective Trace".bold().underline());
    println!();
    println!("{}  {}", "File:".cyan(), file);
    println!("{}  {}", "Platform:".cyan(), profile.platform());
    println!("{}  {}", "Calls:".cyan(), calls.len());
    println!();

    for call in calls {
        let r = &call.record;
        println!(
            "{:>6}  {} count={} datatype={} op={} root={} nranks={}",
            call.line.to_string().dimmed(),
            r.operation_kind.to_string().green(),
            r.element_count,
            profile.type_name(r.datatype),
            r.reduction_op.name(),
            r.root_rank,
            r.participant_count,
        );
        println!("        {}", call.command.yellow());
    }
}
