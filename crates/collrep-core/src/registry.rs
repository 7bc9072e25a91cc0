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

//! Static registries for platforms, datatypes, reduction ops and collectives.
//!
//! The NCCL/RCCL trace prints datatypes and reduction ops as small integer
//! codes and collectives by name. Each registry is an enum with exhaustive
//! lookups; an unmapped code yields a [`RegistryError`] instead of a
//! half-formed command.

use crate::error::RegistryError;
use std::fmt;
use std::str::FromStr;

/// Target platform of the benchmark harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Platform {
    /// NVIDIA CUDA with `nccl-tests`.
    Cuda,
    /// AMD ROCm with `rccl-tests`.
    Rocm,
}

impl Platform {
    /// Both supported platforms.
    pub const ALL: [Platform; 2] = [Platform::Cuda, Platform::Rocm];

    /// Lowercase platform identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cuda => "cuda",
            Self::Rocm => "rocm",
        }
    }

    /// Directory prefix of the harness binaries, relative to the working directory.
    pub fn default_exec_prefix(self) -> &'static str {
        match self {
            Self::Cuda => "./nccl-tests/build/",
            Self::Rocm => "./rccl-tests/build/",
        }
    }

    /// Name of the harness checkout (`nccl-tests` or `rccl-tests`).
    pub fn harness_name(self) -> &'static str {
        match self {
            Self::Cuda => "nccl-tests",
            Self::Rocm => "rccl-tests",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cuda" => Ok(Self::Cuda),
            "rocm" => Ok(Self::Rocm),
            _ => Err(RegistryError::UnknownPlatform(s.to_string())),
        }
    }
}

/// Element type of a collective call, keyed by the `datatype` code in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataType {
    Int8,
    Uint8,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Half,
    Float,
    Double,
    Bfloat16,
    /// 8-bit float, 4 exponent bits and 3 mantissa bits.
    Fp8E4m3,
    /// 8-bit float, 5 exponent bits and 2 mantissa bits.
    Fp8E5m2,
}

impl DataType {
    /// All datatypes in code order.
    pub const ALL: [DataType; 12] = [
        DataType::Int8,
        DataType::Uint8,
        DataType::Int32,
        DataType::Uint32,
        DataType::Int64,
        DataType::Uint64,
        DataType::Half,
        DataType::Float,
        DataType::Double,
        DataType::Bfloat16,
        DataType::Fp8E4m3,
        DataType::Fp8E5m2,
    ];

    /// Resolve the textual code printed after `datatype` in the log.
    ///
    /// Codes are matched verbatim, so `"07"` is not the same as `"7"`.
    pub fn from_code(code: &str) -> Result<Self, RegistryError> {
        match code {
            "0" => Ok(Self::Int8),
            "1" => Ok(Self::Uint8),
            "2" => Ok(Self::Int32),
            "3" => Ok(Self::Uint32),
            "4" => Ok(Self::Int64),
            "5" => Ok(Self::Uint64),
            "6" => Ok(Self::Half),
            "7" => Ok(Self::Float),
            "8" => Ok(Self::Double),
            "9" => Ok(Self::Bfloat16),
            "10" => Ok(Self::Fp8E4m3),
            "11" => Ok(Self::Fp8E5m2),
            _ => Err(RegistryError::UnknownDataType(code.to_string())),
        }
    }

    /// Numeric code as printed by the library.
    pub fn code(self) -> u8 {
        match self {
            Self::Int8 => 0,
            Self::Uint8 => 1,
            Self::Int32 => 2,
            Self::Uint32 => 3,
            Self::Int64 => 4,
            Self::Uint64 => 5,
            Self::Half => 6,
            Self::Float => 7,
            Self::Double => 8,
            Self::Bfloat16 => 9,
            Self::Fp8E4m3 => 10,
            Self::Fp8E5m2 => 11,
        }
    }

    /// Size of one element in bytes.
    pub fn byte_width(self) -> u64 {
        match self {
            Self::Int8 | Self::Uint8 | Self::Fp8E4m3 | Self::Fp8E5m2 => 1,
            Self::Half | Self::Bfloat16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float => 4,
            Self::Int64 | Self::Uint64 | Self::Double => 8,
        }
    }

    /// Spelling accepted by the harness `-d` flag on `platform`.
    ///
    /// Only the two FP8 encodings differ: `nccl-tests` spells them
    /// `f8e4m3`/`f8e5m2`, `rccl-tests` spells them `fp8_e4m3`/`fp8_e5m2`.
    pub fn type_name(self, platform: Platform) -> &'static str {
        match (self, platform) {
            (Self::Int8, _) => "int8",
            (Self::Uint8, _) => "uint8",
            (Self::Int32, _) => "int32",
            (Self::Uint32, _) => "uint32",
            (Self::Int64, _) => "int64",
            (Self::Uint64, _) => "uint64",
            (Self::Half, _) => "half",
            (Self::Float, _) => "float",
            (Self::Double, _) => "double",
            (Self::Bfloat16, _) => "bfloat16",
            (Self::Fp8E4m3, Platform::Cuda) => "f8e4m3",
            (Self::Fp8E4m3, Platform::Rocm) => "fp8_e4m3",
            (Self::Fp8E5m2, Platform::Cuda) => "f8e5m2",
            (Self::Fp8E5m2, Platform::Rocm) => "fp8_e5m2",
        }
    }
}

/// Reduction operator, keyed by the `op` code in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ReductionOp {
    Sum,
    Prod,
    Max,
    Min,
    Avg,
    MulSum,
}

impl ReductionOp {
    /// All reduction ops in code order.
    pub const ALL: [ReductionOp; 6] = [
        ReductionOp::Sum,
        ReductionOp::Prod,
        ReductionOp::Max,
        ReductionOp::Min,
        ReductionOp::Avg,
        ReductionOp::MulSum,
    ];

    /// Resolve the textual code printed after `op` in the log.
    pub fn from_code(code: &str) -> Result<Self, RegistryError> {
        match code {
            "0" => Ok(Self::Sum),
            "1" => Ok(Self::Prod),
            "2" => Ok(Self::Max),
            "3" => Ok(Self::Min),
            "4" => Ok(Self::Avg),
            "5" => Ok(Self::MulSum),
            _ => Err(RegistryError::UnknownReductionOp(code.to_string())),
        }
    }

    /// Numeric code as printed by the library.
    pub fn code(self) -> u8 {
        match self {
            Self::Sum => 0,
            Self::Prod => 1,
            Self::Max => 2,
            Self::Min => 3,
            Self::Avg => 4,
            Self::MulSum => 5,
        }
    }

    /// Spelling accepted by the harness `-o` flag.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Prod => "prod",
            Self::Max => "max",
            Self::Min => "min",
            Self::Avg => "avg",
            Self::MulSum => "mulsum",
        }
    }
}

/// Collective operation, keyed by the name the library logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Collective {
    Broadcast,
    Reduce,
    AllGather,
    ReduceScatter,
    AllReduce,
    Gather,
    Scatter,
    AllToAll,
    AllToAllv,
    Send,
    Recv,
    Hypercube,
    AllReduceBias,
}

impl Collective {
    /// All collectives known to the harness.
    pub const ALL: [Collective; 13] = [
        Collective::Broadcast,
        Collective::Reduce,
        Collective::AllGather,
        Collective::ReduceScatter,
        Collective::AllReduce,
        Collective::Gather,
        Collective::Scatter,
        Collective::AllToAll,
        Collective::AllToAllv,
        Collective::Send,
        Collective::Recv,
        Collective::Hypercube,
        Collective::AllReduceBias,
    ];

    /// Resolve a collective from its logged name (case-sensitive).
    pub fn from_name(name: &str) -> Result<Self, RegistryError> {
        match name {
            "Broadcast" => Ok(Self::Broadcast),
            "Reduce" => Ok(Self::Reduce),
            "AllGather" => Ok(Self::AllGather),
            "ReduceScatter" => Ok(Self::ReduceScatter),
            "AllReduce" => Ok(Self::AllReduce),
            "Gather" => Ok(Self::Gather),
            "Scatter" => Ok(Self::Scatter),
            "AllToAll" => Ok(Self::AllToAll),
            "AllToAllv" => Ok(Self::AllToAllv),
            "Send" => Ok(Self::Send),
            "Recv" => Ok(Self::Recv),
            "Hypercube" => Ok(Self::Hypercube),
            "AllReduceBias" => Ok(Self::AllReduceBias),
            _ => Err(RegistryError::UnknownCollective(name.to_string())),
        }
    }

    /// Name as it appears in the log.
    pub fn log_name(self) -> &'static str {
        match self {
            Self::Broadcast => "Broadcast",
            Self::Reduce => "Reduce",
            Self::AllGather => "AllGather",
            Self::ReduceScatter => "ReduceScatter",
            Self::AllReduce => "AllReduce",
            Self::Gather => "Gather",
            Self::Scatter => "Scatter",
            Self::AllToAll => "AllToAll",
            Self::AllToAllv => "AllToAllv",
            Self::Send => "Send",
            Self::Recv => "Recv",
            Self::Hypercube => "Hypercube",
            Self::AllReduceBias => "AllReduceBias",
        }
    }

    /// Base name of the harness executable that replays this collective.
    ///
    /// `Send` and `Recv` both map to `sendrecv_perf`.
    pub fn executable(self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast_perf",
            Self::Reduce => "reduce_perf",
            Self::AllGather => "all_gather_perf",
            Self::ReduceScatter => "reduce_scatter_perf",
            Self::AllReduce => "all_reduce_perf",
            Self::Gather => "gather_perf",
            Self::Scatter => "scatter_perf",
            Self::AllToAll => "alltoall_perf",
            Self::AllToAllv => "alltoallv_perf",
            Self::Send | Self::Recv => "sendrecv_perf",
            Self::Hypercube => "hypercube_perf",
            Self::AllReduceBias => "all_reduce_bias_perf",
        }
    }
}

impl fmt::Display for Collective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.log_name())
    }
}
