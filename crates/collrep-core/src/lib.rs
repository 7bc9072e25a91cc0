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

//! Core translation engine for collective-call trace logs.
//!
//! This crate turns the `NCCL INFO <Collective>: opCount ...` lines that
//! NCCL and RCCL print under `NCCL_DEBUG=INFO NCCL_DEBUG_SUBSYS=INIT,COLL`
//! into `nccl-tests` / `rccl-tests` command lines, and folds repeated calls
//! into a per-command frequency table.
//!
//! The stages are plain functions over in-memory data and never launch
//! processes:
//!
//! - [`filter`]: select candidate lines from raw log text
//! - [`decode`]: parse a candidate line into a [`CollectiveCallRecord`]
//! - [`synth`]: render a record as a [`BenchmarkCommand`]
//! - [`aggregate`]: deduplicate commands into a [`CommandFrequencyTable`]
//! - [`emit`]: write the `.sh` script and `.csv` count artifacts
//!
//! [`pipeline::translate`] chains them for the common case.
//!
//! # Examples
//!
//! ```
//! use collrep_core::{translate, Platform, PlatformProfile, TranslateOptions};
//!
//! let log = "\
//! node1:1:1 [0] NCCL INFO AllReduce: opCount 0 sendbuff 0x1 recvbuff 0x2 count 1024 datatype 7 op 0 root 0 comm 0x3 [nranks=2] stream 0x4
//! node1:1:1 [1] NCCL INFO AllReduce: opCount 0 sendbuff 0x1 recvbuff 0x2 count 1024 datatype 7 op 0 root 0 comm 0x3 [nranks=2] stream 0x4
//! ";
//!
//! let profile = PlatformProfile::new(Platform::Cuda);
//! let options = TranslateOptions { unique: true, ..TranslateOptions::default() };
//! let translation = translate(log, &profile, &options).unwrap();
//!
//! assert_eq!(
//!     translation.script_lines(),
//!     vec!["./nccl-tests/build/all_reduce_perf -d float -b 4096 -e 4096 -o sum -g 2"]
//! );
//! ```

pub mod aggregate;
pub mod decode;
pub mod emit;
mod error;
pub mod filter;
pub mod pipeline;
mod profile;
pub mod registry;
pub mod synth;

pub use aggregate::{
    aggregate, AggregationAnomaly, AggregationPolicy, CommandFrequencyTable, FrequencyEntry,
};
pub use decode::{decode_all, decode_line, CollectiveCallRecord};
pub use error::{
    AggregateError, CoreError, CoreResult, DecodeError, DecodeErrorKind, EmitError,
    RegistryError, SynthError,
};
pub use filter::{filter_lines, is_collective_line, LogLine};
pub use pipeline::{translate, translate_records, TranslateOptions, Translation};
pub use profile::PlatformProfile;
pub use registry::{Collective, DataType, Platform, ReductionOp};
pub use synth::{synthesize, synthesize_all, BenchmarkCommand};
