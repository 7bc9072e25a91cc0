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

//! Structured error types for the collrep CLI.
//!
//! All command implementations return `Result<T, CliError>`; `main` prints the
//! error and exits non-zero, so every failure aborts the remaining steps.

use collrep_core::CoreError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for collrep CLI operations.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed (file read, write, copy or rename).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Input log exceeds the configured size limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        path: PathBuf,
        actual: u64,
        max: u64,
        max_mb: u64,
    },

    /// No `--platform` was given and neither ROCm nor CUDA could be found.
    #[error(
        "Could not detect platform. Neither ROCm nor CUDA found. \
         Please specify --platform explicitly or set ROCM_PATH/CUDA_HOME environment variable."
    )]
    PlatformUndetected,

    /// Translation failed (decode, synthesis, aggregation or artifact output).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An external program could not be started.
    #[error("Failed to start '{program}': {message}")]
    Spawn {
        /// The program that failed to start
        program: String,
        /// The error message
        message: String,
    },

    /// An external step exited unsuccessfully.
    #[error("{step} failed ({status})")]
    StepFailed {
        /// Human-readable step name
        step: String,
        /// Exit status as reported by the OS
        status: String,
    },

    /// JSON serialization error.
    #[error("JSON format error: {message}")]
    JsonFormat {
        /// The error message
        message: String,
    },

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Create a spawn error for `program`.
    pub fn spawn(program: impl Into<String>, source: io::Error) -> Self {
        Self::Spawn {
            program: program.into(),
            message: source.to_string(),
        }
    }

    /// Create a failed-step error.
    pub fn step_failed(step: impl Into<String>, status: impl ToString) -> Self {
        Self::StepFailed {
            step: step.into(),
            status: status.to_string(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(source: serde_json::Error) -> Self {
        Self::JsonFormat {
            message: source.to_string(),
        }
    }
}
