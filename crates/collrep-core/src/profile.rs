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

//! Per-run platform configuration.

use crate::registry::{DataType, Platform};

/// Immutable platform configuration, built once per run and passed to every
/// stage that resolves type names or executable paths.
///
/// # Examples
///
/// ```
/// use collrep_core::{Platform, PlatformProfile};
///
/// let profile = PlatformProfile::new(Platform::Rocm);
/// assert_eq!(profile.exec_prefix(), "./rccl-tests/build/");
/// assert_eq!(profile.low_precision_names(), ("fp8_e4m3", "fp8_e5m2"));
///
/// let custom = PlatformProfile::new(Platform::Cuda).with_exec_prefix("/opt/nccl-tests/build/");
/// assert_eq!(custom.exec_prefix(), "/opt/nccl-tests/build/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    platform: Platform,
    exec_prefix: String,
}

impl PlatformProfile {
    /// Profile with the platform's default harness location.
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            exec_prefix: platform.default_exec_prefix().to_string(),
        }
    }

    /// Replace the executable path prefix.
    ///
    /// The prefix is concatenated with the executable name as-is, so a
    /// directory prefix needs its trailing `/`.
    pub fn with_exec_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.exec_prefix = prefix.into();
        self
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn exec_prefix(&self) -> &str {
        &self.exec_prefix
    }

    /// Harness spelling of `datatype` on this platform.
    pub fn type_name(&self, datatype: DataType) -> &'static str {
        datatype.type_name(self.platform)
    }

    /// Spellings of the two FP8 encodings (e4m3, e5m2) on this platform.
    pub fn low_precision_names(&self) -> (&'static str, &'static str) {
        (
            DataType::Fp8E4m3.type_name(self.platform),
            DataType::Fp8E5m2.type_name(self.platform),
        )
    }
}
