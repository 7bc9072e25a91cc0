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

//! Error types for log translation.

use crate::aggregate::AggregationAnomaly;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A lookup into one of the static registries failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Platform name other than `cuda` or `rocm`.
    #[error("unknown platform '{0}' (expected 'cuda' or 'rocm')")]
    UnknownPlatform(String),
    /// Datatype code outside 0..=11.
    #[error("unknown datatype code '{0}'")]
    UnknownDataType(String),
    /// Reduction-op code outside 0..=5.
    #[error("unknown reduction op code '{0}'")]
    UnknownReductionOp(String),
    /// Collective name with no benchmark executable.
    #[error("unknown collective operation '{0}'")]
    UnknownCollective(String),
}

/// The kind of failure encountered while decoding a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// A labeled token (`count`, `datatype`, ...) is absent or has no value.
    MissingToken,
    /// A value that must be an integer is not one.
    InvalidInteger,
    /// The `nranks=` token is malformed or reports zero participants.
    InvalidParticipants,
    /// The datatype code is not in the registry.
    UnknownDataType,
    /// The reduction-op code is not in the registry.
    UnknownReductionOp,
    /// The collective name is not in the registry.
    UnknownCollective,
    /// A platform name is not in the registry.
    UnknownPlatform,
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "MissingToken"),
            Self::InvalidInteger => write!(f, "InvalidInteger"),
            Self::InvalidParticipants => write!(f, "InvalidParticipants"),
            Self::UnknownDataType => write!(f, "UnknownDataType"),
            Self::UnknownReductionOp => write!(f, "UnknownReductionOp"),
            Self::UnknownCollective => write!(f, "UnknownCollective"),
            Self::UnknownPlatform => write!(f, "UnknownPlatform"),
        }
    }
}

/// A filtered log line could not be turned into a record.
///
/// Carries the 1-based line number and the full line text so the offending
/// input can be located in the original log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}: {message}\n  | {text}")]
pub struct DecodeError {
    /// The kind of error.
    pub kind: DecodeErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number in the input log (1-based).
    pub line: usize,
    /// The offending line.
    pub text: String,
}

impl DecodeError {
    /// Create a new decode error.
    pub fn new(
        kind: DecodeErrorKind,
        message: impl Into<String>,
        line: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            text: text.into(),
        }
    }
}

/// A record could not be rendered as a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    /// `count * width` does not fit in 64 bits.
    #[error("byte count overflow: {count} elements of {width} bytes")]
    ByteCountOverflow {
        /// Element count from the log.
        count: u64,
        /// Width of the element type.
        width: u64,
    },
}

/// Aggregation stopped on an integrity anomaly under the strict policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("aggregation integrity check failed: {anomaly}")]
pub struct AggregateError {
    /// The anomaly that triggered the failure.
    pub anomaly: AggregationAnomaly,
}

/// Writing an artifact failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmitError {
    /// Creating or writing the artifact failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The artifact path.
        path: PathBuf,
        /// The error message.
        message: String,
    },

    /// The CSV writer rejected a record.
    #[error("CSV error for '{path}': {message}")]
    Csv {
        /// The artifact path (empty for in-memory writers).
        path: PathBuf,
        /// The error message.
        message: String,
    },

    /// A command contains the count-table delimiter, so its row would not split
    /// back into `command|count`.
    #[error("command for '{path}' contains the count delimiter '|': {command}")]
    DelimiterInCommand {
        /// The artifact path (empty for in-memory writers).
        path: PathBuf,
        /// The offending command.
        command: String,
    },
}

impl EmitError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a CSV error with path context.
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub(crate) fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            Self::Io { message, .. } => Self::Io {
                path: path.into(),
                message,
            },
            Self::Csv { message, .. } => Self::Csv {
                path: path.into(),
                message,
            },
            Self::DelimiterInCommand { command, .. } => Self::DelimiterInCommand {
                path: path.into(),
                command,
            },
        }
    }
}

/// Any failure of the translation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Synth(#[from] SynthError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// Result type for translation operations.
pub type CoreResult<T> = Result<T, CoreError>;
