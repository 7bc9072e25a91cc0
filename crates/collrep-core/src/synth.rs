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

//! Rendering of decoded calls as harness command lines.

use crate::decode::CollectiveCallRecord;
use crate::error::SynthError;
use crate::profile::PlatformProfile;
use std::fmt;

/// A harness invocation together with the participant count of the call it
/// replays.
///
/// Equality for deduplication is decided on `command` alone; see
/// [`crate::aggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BenchmarkCommand {
    pub command: String,
    pub participant_count: u32,
}

impl BenchmarkCommand {
    pub fn new(command: impl Into<String>, participant_count: u32) -> Self {
        Self {
            command: command.into(),
            participant_count,
        }
    }
}

impl fmt::Display for BenchmarkCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command)
    }
}

/// Build the harness command that replays `record`.
///
/// The format is
/// `<prefix><executable> -d <type> -b <bytes> -e <bytes> -o <op> -g <nranks>`;
/// begin and end sizes are equal so the harness measures exactly the logged
/// message size.
///
/// # Errors
///
/// Returns [`SynthError::ByteCountOverflow`] if the payload size does not fit
/// in a `u64`.
///
/// # Examples
///
/// ```
/// use collrep_core::{synthesize, CollectiveCallRecord, Collective, DataType, Platform,
///     PlatformProfile, ReductionOp};
///
/// let record = CollectiveCallRecord {
///     communicator_id: "AllReduce".to_string(),
///     operation_kind: Collective::AllReduce,
///     element_count: 1024,
///     datatype: DataType::Half,
///     reduction_op: ReductionOp::Sum,
///     root_rank: 0,
///     participant_count: 8,
/// };
/// let cmd = synthesize(&record, &PlatformProfile::new(Platform::Rocm)).unwrap();
/// assert_eq!(
///     cmd.command,
///     "./rccl-tests/build/all_reduce_perf -d half -b 2048 -e 2048 -o sum -g 8"
/// );
/// ```
pub fn synthesize(
    record: &CollectiveCallRecord,
    profile: &PlatformProfile,
) -> Result<BenchmarkCommand, SynthError> {
    let width = record.datatype.byte_width();
    let total_bytes = record
        .total_bytes()
        .ok_or(SynthError::ByteCountOverflow {
            count: record.element_count,
            width,
        })?;

    let command = format!(
        "{}{} -d {} -b {} -e {} -o {} -g {}",
        profile.exec_prefix(),
        record.operation_kind.executable(),
        profile.type_name(record.datatype),
        total_bytes,
        total_bytes,
        record.reduction_op.name(),
        record.participant_count
    );

    Ok(BenchmarkCommand::new(command, record.participant_count))
}

/// Synthesize every record in order.
pub fn synthesize_all(
    records: &[CollectiveCallRecord],
    profile: &PlatformProfile,
) -> Result<Vec<BenchmarkCommand>, SynthError> {
    records.iter().map(|r| synthesize(r, profile)).collect()
}
