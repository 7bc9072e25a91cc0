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

//! End-to-end translation from log text to commands.

use crate::aggregate::{aggregate, AggregationPolicy, CommandFrequencyTable};
use crate::decode::{decode_all, CollectiveCallRecord};
use crate::error::CoreResult;
use crate::filter::filter_lines;
use crate::profile::PlatformProfile;
use crate::synth::{synthesize_all, BenchmarkCommand};

/// Options for [`translate`].
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Deduplicate commands and compute a frequency table.
    pub unique: bool,
    /// Anomaly handling when `unique` is set.
    pub policy: AggregationPolicy,
}

/// Result of a translation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// One command per trace line, duplicates kept.
    All(Vec<BenchmarkCommand>),
    /// Distinct commands with normalized counts.
    Unique(CommandFrequencyTable),
}

impl Translation {
    /// Lines of the script artifact.
    pub fn script_lines(&self) -> Vec<&str> {
        match self {
            Self::All(commands) => commands.iter().map(|c| c.command.as_str()).collect(),
            Self::Unique(table) => table.commands().collect(),
        }
    }

    /// The frequency table, in deduplicated mode.
    pub fn table(&self) -> Option<&CommandFrequencyTable> {
        match self {
            Self::All(_) => None,
            Self::Unique(table) => Some(table),
        }
    }
}

/// Filter, decode, synthesize and optionally aggregate `log`.
///
/// # Errors
///
/// Fails on the first line that does not decode, on byte-count overflow, and
/// on aggregation anomalies under [`AggregationPolicy::Strict`].
pub fn translate(
    log: &str,
    profile: &PlatformProfile,
    options: &TranslateOptions,
) -> CoreResult<Translation> {
    let records = decode_all(filter_lines(log))?;
    translate_records(&records, profile, options)
}

/// Synthesize and optionally aggregate already decoded records.
///
/// Used by callers that decode lines themselves, e.g. in parallel.
pub fn translate_records(
    records: &[CollectiveCallRecord],
    profile: &PlatformProfile,
    options: &TranslateOptions,
) -> CoreResult<Translation> {
    let commands = synthesize_all(records, profile)?;
    if options.unique {
        let table = aggregate(&commands, options.policy)?;
        Ok(Translation::Unique(table))
    } else {
        Ok(Translation::All(commands))
    }
}
