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

//! CLI command implementations

mod completion;
mod detect;
mod inspect;
mod parse;
mod replay;

pub use completion::{generate_completion_for_command, print_installation_instructions};
pub use detect::detect_platform;
pub use inspect::{inspect, InspectFormat};
pub use parse::{parse, ParseConfig, DEFAULT_SCRIPT_NAME};
pub use replay::{replay, ReplayConfig};

use crate::error::CliError;
use collrep_core::{decode_all, decode_line, filter_lines, CollectiveCallRecord, CoreError, LogLine};
use rayon::prelude::*;
use std::fs;

/// Default maximum input log size (1 GB).
/// Can be overridden via the `COLLREP_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`], in bytes.
pub const MAX_FILE_SIZE_ENV: &str = "COLLREP_MAX_FILE_SIZE";

fn get_max_file_size() -> u64 {
    std::env::var(MAX_FILE_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read a trace log from disk with size validation.
///
/// The size is checked from metadata before anything is read, so an
/// oversized log is rejected without allocating for it.
///
/// # Errors
///
/// Returns `Err` if:
/// - The file metadata cannot be accessed
/// - The file is larger than the limit (configurable via `COLLREP_MAX_FILE_SIZE`)
/// - The file cannot be read or is not valid UTF-8
///
/// # Examples
///
/// ```no_run
/// use collrep_cli::commands::read_file;
///
/// # fn main() -> Result<(), collrep_cli::CliError> {
/// let log = read_file("rccl_debug.log")?;
/// assert!(!log.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn read_file(path: &str) -> Result<String, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;

    let max_file_size = get_max_file_size();
    if metadata.len() > max_file_size {
        return Err(CliError::file_too_large(path, metadata.len(), max_file_size));
    }

    fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
}

/// Filter and decode `content`, optionally fanning lines out over rayon.
///
/// Output order always follows input order. With `parallel`, the error
/// returned for a bad log is one of its bad lines, not necessarily the first.
pub fn decode_records(
    content: &str,
    parallel: bool,
) -> Result<Vec<CollectiveCallRecord>, CliError> {
    let records = if parallel {
        let lines: Vec<LogLine<'_>> = filter_lines(content).collect();
        tracing::debug!("Decoding {} lines in parallel", lines.len());
        lines
            .into_par_iter()
            .map(decode_line)
            .collect::<Result<Vec<_>, _>>()
    } else {
        decode_all(filter_lines(content))
    };
    records.map_err(|e| CliError::Core(CoreError::from(e)))
}
