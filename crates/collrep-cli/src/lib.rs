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

//! collrep CLI library.
//!
//! Command implementations behind the `collrep` binary:
//!
//! - **parse**: translate an NCCL/RCCL debug log into an nccl-tests/rccl-tests
//!   script, optionally deduplicated with a per-command count table
//! - **inspect**: show every decoded collective call (text or JSON)
//! - **replay**: parse, build the local harness, run the workload and call the
//!   summary generator
//! - **detect-platform**: report whether ROCm or CUDA is installed
//! - **completion**: shell completion scripts
//!
//! # Examples
//!
//! ```no_run
//! use collrep_cli::commands::{parse, ParseConfig};
//! use collrep_core::Platform;
//!
//! # fn main() -> Result<(), collrep_cli::CliError> {
//! let written = parse(&ParseConfig {
//!     unique: true,
//!     platform: Some(Platform::Rocm),
//!     ..ParseConfig::new("rccl_debug.log")
//! })?;
//! assert_eq!(written.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod harness;
pub mod platform;

pub use error::CliError;
