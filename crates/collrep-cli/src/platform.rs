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

//! Platform selection and detection.
//!
//! ROCm wins over CUDA when both are installed, matching where the harness
//! scripts were first used.

use crate::error::CliError;
use collrep_core::{Platform, RegistryError};
use std::path::{Path, PathBuf};

/// Default ROCm installation prefix.
pub const ROCM_DEFAULT_PATH: &str = "/opt/rocm";

/// Default CUDA installation prefix.
pub const CUDA_DEFAULT_PATH: &str = "/usr/local/cuda";

/// Environment variables that point at a ROCm installation.
pub const ROCM_ENV_VARS: [&str; 1] = ["ROCM_PATH"];

/// Environment variables that point at a CUDA installation.
pub const CUDA_ENV_VARS: [&str; 2] = ["CUDA_HOME", "CUDA_PATH"];

/// `clap` value parser for `--platform`.
pub fn parse_platform(s: &str) -> Result<Platform, String> {
    s.parse().map_err(|e: RegistryError| e.to_string())
}

/// Detect the platform from the process environment and filesystem.
///
/// # Errors
///
/// Returns [`CliError::PlatformUndetected`] when no ROCm or CUDA installation
/// is found.
pub fn detect_platform() -> Result<Platform, CliError> {
    detect_platform_with(|var| std::env::var(var).ok(), |path| path.exists())
}

/// Detection with injectable environment lookup and existence check.
///
/// ROCm is chosen if `/opt/rocm` or `$ROCM_PATH` exists; otherwise CUDA if
/// `/usr/local/cuda`, `$CUDA_HOME` or `$CUDA_PATH` exists. Empty variables are
/// ignored.
pub fn detect_platform_with<E, P>(env: E, exists: P) -> Result<Platform, CliError>
where
    E: Fn(&str) -> Option<String>,
    P: Fn(&Path) -> bool,
{
    let installed = |default: &str, vars: &[&str]| {
        std::iter::once(default.to_string())
            .chain(vars.iter().filter_map(|v| env(v)))
            .filter(|p| !p.is_empty())
            .any(|p| exists(Path::new(&p)))
    };

    if installed(ROCM_DEFAULT_PATH, &ROCM_ENV_VARS) {
        Ok(Platform::Rocm)
    } else if installed(CUDA_DEFAULT_PATH, &CUDA_ENV_VARS) {
        Ok(Platform::Cuda)
    } else {
        Err(CliError::PlatformUndetected)
    }
}

/// Use `explicit` if given, otherwise detect.
pub fn resolve_platform(explicit: Option<Platform>) -> Result<Platform, CliError> {
    match explicit {
        Some(platform) => Ok(platform),
        None => {
            let platform = detect_platform()?;
            tracing::info!("Auto-detected platform: {}", platform);
            Ok(platform)
        }
    }
}

/// ROCm installation passed to the rccl-tests installer (`$ROCM_PATH` or `/opt/rocm`).
pub fn rocm_home() -> PathBuf {
    std::env::var("ROCM_PATH")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(ROCM_DEFAULT_PATH))
}
