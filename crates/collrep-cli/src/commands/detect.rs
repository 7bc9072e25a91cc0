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

//! Detect-platform command

use crate::error::CliError;
use crate::platform;
use collrep_core::PlatformProfile;

/// Print the detected platform and its FP8 type spellings.
pub fn detect_platform() -> Result<(), CliError> {
    let platform = platform::detect_platform()?;
    let (e4m3, e5m2) = PlatformProfile::new(platform).low_precision_names();
    tracing::info!("FP8 types: {}/{}", e4m3, e5m2);
    println!("{}", platform);
    Ok(())
}
