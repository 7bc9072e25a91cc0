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

//! Candidate line selection.
//!
//! Only lines that describe a collective launch carry both the `opCount`
//! and the `sendbuff` markers; init chatter, topology dumps and truncated
//! lines are dropped here and never reach the decoder.

use memchr::memmem;

/// Marker present on every collective-call trace line.
pub const COLLECTIVE_MARKER: &str = "opCount";

/// Marker for the buffer-pointer field of a collective-call trace line.
pub const BUFFER_MARKER: &str = "sendbuff";

/// A line of the input log with its 1-based position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    /// Line number in the input (1-based).
    pub number: usize,
    /// Line text with trailing whitespace removed.
    pub text: &'a str,
}

impl<'a> LogLine<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self { number, text }
    }
}

/// Returns true if `line` contains both markers (substring match).
///
/// # Examples
///
/// ```
/// use collrep_core::is_collective_line;
///
/// assert!(is_collective_line("NCCL INFO AllReduce: opCount 3 sendbuff 0x1"));
/// assert!(!is_collective_line("NCCL INFO AllReduce: opCount 3"));
/// ```
pub fn is_collective_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    memmem::find(bytes, COLLECTIVE_MARKER.as_bytes()).is_some()
        && memmem::find(bytes, BUFFER_MARKER.as_bytes()).is_some()
}

/// Lazily select the collective-call lines of `log`, in input order.
///
/// Duplicates are kept; deduplication happens after synthesis.
pub fn filter_lines(log: &str) -> impl Iterator<Item = LogLine<'_>> {
    log.lines()
        .enumerate()
        .map(|(idx, text)| LogLine::new(idx + 1, text.trim_end()))
        .filter(|line| is_collective_line(line.text))
}
