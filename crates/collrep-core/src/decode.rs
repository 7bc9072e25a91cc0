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

//! Decoding of collective-call trace lines.
//!
//! A trace line looks like:
//!
//! ```text
//! host:4711:4711 [0] NCCL INFO AllReduce: opCount 2a sendbuff 0x7f.. recvbuff 0x7f.. count 1024 datatype 7 op 0 root 0 comm 0x55.. [nranks=8] stream 0x56..
//! ```
//!
//! The line is split on single spaces and each field is read from the token
//! right after its label. There is no per-line recovery: any missing label or
//! bad value is a [`DecodeError`] for the whole run.

use crate::error::{DecodeError, DecodeErrorKind, RegistryError};
use crate::filter::LogLine;
use crate::registry::{Collective, DataType, ReductionOp};
use std::str::FromStr;

/// Token preceding the communicator / collective field.
pub const INFO_MARKER: &str = "INFO";

/// Prefix MSCCL puts in front of the collectives it implements.
pub const MSCCL_PREFIX: &str = "mscclFunc";

/// One decoded collective call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CollectiveCallRecord {
    /// Field after `INFO`, trailing `:` removed (e.g. `AllReduce`, `mscclFuncAllReduce`).
    pub communicator_id: String,
    /// Collective resolved from `communicator_id` with the MSCCL prefix removed.
    pub operation_kind: Collective,
    /// Number of elements per rank.
    pub element_count: u64,
    pub datatype: DataType,
    pub reduction_op: ReductionOp,
    pub root_rank: i64,
    /// Ranks taking part in the call, from `[nranks=N]`.
    pub participant_count: u32,
}

impl CollectiveCallRecord {
    /// Payload size in bytes, or `None` on overflow.
    pub fn total_bytes(&self) -> Option<u64> {
        self.element_count.checked_mul(self.datatype.byte_width())
    }
}

/// Decode one filtered line.
///
/// # Errors
///
/// Returns [`DecodeError`] when a labeled token is missing, an integer field
/// does not parse, the participant count is malformed or zero, or a code is
/// not in the registries.
///
/// # Examples
///
/// ```
/// use collrep_core::{decode_line, Collective, DataType, LogLine};
///
/// let text = "h:1:1 [0] NCCL INFO mscclFuncAllReduce: opCount 0 sendbuff 0x1 recvbuff 0x2 count 1024 datatype 6 op 0 root 0 comm 0x3 [nranks=4] stream 0x4";
/// let record = decode_line(LogLine::new(1, text)).unwrap();
///
/// assert_eq!(record.communicator_id, "mscclFuncAllReduce");
/// assert_eq!(record.operation_kind, Collective::AllReduce);
/// assert_eq!(record.datatype, DataType::Half);
/// assert_eq!(record.participant_count, 4);
/// ```
pub fn decode_line(line: LogLine<'_>) -> Result<CollectiveCallRecord, DecodeError> {
    let tokens = Tokens::new(line);

    let communicator_id = tokens
        .value_after(INFO_MARKER)?
        .trim_end_matches(':')
        .to_string();
    let element_count: u64 = tokens.integer_after("count")?;
    let datatype = DataType::from_code(tokens.value_after("datatype")?)
        .map_err(|e| tokens.registry_error(e))?;
    let reduction_op = ReductionOp::from_code(tokens.value_after("op")?)
        .map_err(|e| tokens.registry_error(e))?;
    let root_rank: i64 = tokens.integer_after("root")?;
    let participant_count = tokens.participants()?;

    let kind_name = communicator_id
        .strip_prefix(MSCCL_PREFIX)
        .unwrap_or(&communicator_id);
    let operation_kind = Collective::from_name(kind_name).map_err(|e| tokens.registry_error(e))?;

    Ok(CollectiveCallRecord {
        communicator_id,
        operation_kind,
        element_count,
        datatype,
        reduction_op,
        root_rank,
        participant_count,
    })
}

/// Decode every line in order, stopping at the first failure.
pub fn decode_all<'a, I>(lines: I) -> Result<Vec<CollectiveCallRecord>, DecodeError>
where
    I: IntoIterator<Item = LogLine<'a>>,
{
    let records = lines
        .into_iter()
        .map(decode_line)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(records = records.len(), "decoded collective-call lines");
    Ok(records)
}

/// Single-space tokenization of one line.
struct Tokens<'a> {
    line: LogLine<'a>,
    tokens: Vec<&'a str>,
}

impl<'a> Tokens<'a> {
    fn new(line: LogLine<'a>) -> Self {
        Self {
            line,
            tokens: line.text.split(' ').collect(),
        }
    }

    fn error(&self, kind: DecodeErrorKind, message: impl Into<String>) -> DecodeError {
        DecodeError::new(kind, message, self.line.number, self.line.text)
    }

    fn registry_error(&self, err: RegistryError) -> DecodeError {
        let kind = match err {
            RegistryError::UnknownDataType(_) => DecodeErrorKind::UnknownDataType,
            RegistryError::UnknownReductionOp(_) => DecodeErrorKind::UnknownReductionOp,
            RegistryError::UnknownCollective(_) => DecodeErrorKind::UnknownCollective,
            // Log lines carry no platform; kept distinct so it is never mislabeled.
            RegistryError::UnknownPlatform(_) => DecodeErrorKind::UnknownPlatform,
        };
        self.error(kind, err.to_string())
    }

    /// Token following the first token equal to `label`.
    fn value_after(&self, label: &str) -> Result<&'a str, DecodeError> {
        let pos = self
            .tokens
            .iter()
            .position(|t| *t == label)
            .ok_or_else(|| {
                self.error(
                    DecodeErrorKind::MissingToken,
                    format!("missing '{}' token", label),
                )
            })?;
        self.tokens.get(pos + 1).copied().ok_or_else(|| {
            self.error(
                DecodeErrorKind::MissingToken,
                format!("no value after '{}'", label),
            )
        })
    }

    fn integer_after<T: FromStr>(&self, label: &str) -> Result<T, DecodeError> {
        let value = self.value_after(label)?;
        value.parse::<T>().map_err(|_| {
            self.error(
                DecodeErrorKind::InvalidInteger,
                format!("'{}' value '{}' is not an integer", label, value),
            )
        })
    }

    /// Participant count from the first token containing `nranks`, e.g. `[nranks=8]`.
    fn participants(&self) -> Result<u32, DecodeError> {
        let token = self
            .tokens
            .iter()
            .find(|t| t.contains("nranks"))
            .ok_or_else(|| {
                self.error(DecodeErrorKind::MissingToken, "missing 'nranks' token")
            })?;
        let value = token
            .split('=')
            .nth(1)
            .map(|v| v.trim_end_matches(']'))
            .ok_or_else(|| {
                self.error(
                    DecodeErrorKind::InvalidParticipants,
                    format!("malformed participant token '{}'", token),
                )
            })?;
        let count: u32 = value.parse().map_err(|_| {
            self.error(
                DecodeErrorKind::InvalidParticipants,
                format!("participant count '{}' is not an integer", value),
            )
        })?;
        if count == 0 {
            return Err(self.error(
                DecodeErrorKind::InvalidParticipants,
                "participant count must be positive",
            ));
        }
        Ok(count)
    }
}
