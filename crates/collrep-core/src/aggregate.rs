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

//! Deduplication of synthesized commands.
//!
//! Every rank of a collective call logs its own line, so a call over `N`
//! ranks shows up `N` times. The frequency table keeps each distinct command
//! once, in first-seen order, and divides its raw occurrence count by the
//! participant count to recover the number of logical calls.
//!
//! Two situations break that model and are reported as
//! [`AggregationAnomaly`] values:
//!
//! - the raw count is not a multiple of the participant count
//!   ([`AggregationAnomaly::InexactDivision`]); the count is truncated;
//! - the same command recurs with a different participant count
//!   ([`AggregationAnomaly::ParticipantMismatch`]); the first count is kept.
//!
//! Under [`AggregationPolicy::Lenient`] anomalies are logged and collected on
//! the table; under [`AggregationPolicy::Strict`] the first one is an error.

use crate::error::AggregateError;
use crate::synth::BenchmarkCommand;
use std::collections::HashMap;
use std::fmt;

/// What to do when the aggregation model does not fit the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationPolicy {
    /// Warn, record the anomaly and keep going.
    #[default]
    Lenient,
    /// Fail on the first anomaly.
    Strict,
}

/// An integrity problem found while building a [`CommandFrequencyTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationAnomaly {
    /// Raw occurrences are not a multiple of the participant count.
    InexactDivision {
        command: String,
        occurrences: u64,
        participants: u32,
    },
    /// A command recurred with a participant count different from its first occurrence.
    ParticipantMismatch {
        command: String,
        first: u32,
        found: u32,
    },
    /// A command claims zero participants, so its count is undefined.
    ZeroParticipants { command: String, occurrences: u64 },
}

impl AggregationAnomaly {
    /// The command the anomaly refers to.
    pub fn command(&self) -> &str {
        match self {
            Self::InexactDivision { command, .. }
            | Self::ParticipantMismatch { command, .. }
            | Self::ZeroParticipants { command, .. } => command,
        }
    }
}

impl fmt::Display for AggregationAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InexactDivision {
                command,
                occurrences,
                participants,
            } => write!(
                f,
                "{} occurrences of '{}' are not a multiple of {} participants",
                occurrences, command, participants
            ),
            Self::ParticipantMismatch {
                command,
                first,
                found,
            } => write!(
                f,
                "'{}' first seen with {} participants, later with {}",
                command, first, found
            ),
            Self::ZeroParticipants {
                command,
                occurrences,
            } => write!(
                f,
                "{} occurrences of '{}' report zero participants",
                occurrences, command
            ),
        }
    }
}

/// One distinct command and its counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub command: String,
    /// Participant count from the first occurrence.
    pub participant_count: u32,
    /// Number of log lines that produced this command.
    pub occurrences: u64,
    /// `occurrences / participant_count`, truncated.
    pub count: u64,
}

/// Distinct commands in first-seen order with their normalized counts.
///
/// Immutable once built by [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandFrequencyTable {
    entries: Vec<FrequencyEntry>,
    index: HashMap<String, usize>,
    anomalies: Vec<AggregationAnomaly>,
}

impl CommandFrequencyTable {
    /// Distinct commands in first-seen order.
    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.command.as_str())
    }

    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    /// Normalized count of `command`, if present.
    pub fn count(&self, command: &str) -> Option<u64> {
        self.get(command).map(|e| e.count)
    }

    pub fn get(&self, command: &str) -> Option<&FrequencyEntry> {
        self.index.get(command).map(|&i| &self.entries[i])
    }

    /// Anomalies recorded under the lenient policy.
    pub fn anomalies(&self) -> &[AggregationAnomaly] {
        &self.anomalies
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Deduplicate `commands` and compute normalized counts.
///
/// # Errors
///
/// Under [`AggregationPolicy::Strict`], returns [`AggregateError`] for the
/// first anomaly found. Participant mismatches are detected while scanning,
/// inexact divisions after the scan in table order.
///
/// # Examples
///
/// ```
/// use collrep_core::{aggregate, AggregationPolicy, BenchmarkCommand};
///
/// let lines: Vec<BenchmarkCommand> = (0..6)
///     .map(|_| BenchmarkCommand::new("all_reduce_perf -d float -b 4 -e 4 -o sum -g 3", 3))
///     .collect();
///
/// let table = aggregate(&lines, AggregationPolicy::Strict).unwrap();
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.count("all_reduce_perf -d float -b 4 -e 4 -o sum -g 3"), Some(2));
/// ```
pub fn aggregate<'a, I>(
    commands: I,
    policy: AggregationPolicy,
) -> Result<CommandFrequencyTable, AggregateError>
where
    I: IntoIterator<Item = &'a BenchmarkCommand>,
{
    let mut table = CommandFrequencyTable::default();

    for cmd in commands {
        match table.index.get(&cmd.command) {
            Some(&i) => {
                let entry = &mut table.entries[i];
                entry.occurrences += 1;
                if entry.participant_count != cmd.participant_count {
                    let anomaly = AggregationAnomaly::ParticipantMismatch {
                        command: cmd.command.clone(),
                        first: entry.participant_count,
                        found: cmd.participant_count,
                    };
                    record_anomaly(&mut table.anomalies, anomaly, policy)?;
                }
            }
            None => {
                table.index.insert(cmd.command.clone(), table.entries.len());
                table.entries.push(FrequencyEntry {
                    command: cmd.command.clone(),
                    participant_count: cmd.participant_count,
                    occurrences: 1,
                    count: 0,
                });
            }
        }
    }

    for entry in table.entries.iter_mut() {
        if entry.participant_count == 0 {
            // Count stays 0.
            let anomaly = AggregationAnomaly::ZeroParticipants {
                command: entry.command.clone(),
                occurrences: entry.occurrences,
            };
            record_anomaly(&mut table.anomalies, anomaly, policy)?;
            continue;
        }
        let participants = u64::from(entry.participant_count);
        entry.count = entry.occurrences / participants;
        if entry.occurrences % participants != 0 {
            let anomaly = AggregationAnomaly::InexactDivision {
                command: entry.command.clone(),
                occurrences: entry.occurrences,
                participants: entry.participant_count,
            };
            record_anomaly(&mut table.anomalies, anomaly, policy)?;
        }
    }

    tracing::debug!(
        distinct = table.len(),
        anomalies = table.anomalies.len(),
        "aggregated benchmark commands"
    );
    Ok(table)
}

fn record_anomaly(
    anomalies: &mut Vec<AggregationAnomaly>,
    anomaly: AggregationAnomaly,
    policy: AggregationPolicy,
) -> Result<(), AggregateError> {
    match policy {
        AggregationPolicy::Strict => Err(AggregateError { anomaly }),
        AggregationPolicy::Lenient => {
            tracing::warn!("{}", anomaly);
            anomalies.push(anomaly);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmds(list: &[(&str, u32)]) -> Vec<BenchmarkCommand> {
        list.iter()
            .map(|(c, n)| BenchmarkCommand::new(*c, *n))
            .collect()
    }

    #[test]
    fn test_fan_out_is_normalized() {
        let input = cmds(&[("a", 3); 6]);
        let table = aggregate(&input, AggregationPolicy::Strict).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.count("a"), Some(2));
        assert_eq!(table.get("a").unwrap().occurrences, 6);
        assert!(table.anomalies().is_empty());
    }

    #[test]
    fn test_first_seen_order() {
        let input = cmds(&[("b", 1), ("a", 1), ("b", 1), ("c", 1), ("a", 1)]);
        let table = aggregate(&input, AggregationPolicy::Lenient).unwrap();
        assert_eq!(table.commands().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(table.count("b"), Some(2));
        assert_eq!(table.count("c"), Some(1));
    }

    #[test]
    fn test_inexact_division_lenient_truncates() {
        let input = cmds(&[("a", 4); 5]);
        let table = aggregate(&input, AggregationPolicy::Lenient).unwrap();
        assert_eq!(table.count("a"), Some(1));
        assert_eq!(
            table.anomalies(),
            &[AggregationAnomaly::InexactDivision {
                command: "a".to_string(),
                occurrences: 5,
                participants: 4,
            }]
        );
    }

    #[test]
    fn test_inexact_division_below_fan_out_counts_zero() {
        let input = cmds(&[("a", 8)]);
        let table = aggregate(&input, AggregationPolicy::Lenient).unwrap();
        assert_eq!(table.count("a"), Some(0));
        assert_eq!(table.anomalies().len(), 1);
    }

    #[test]
    fn test_inexact_division_strict_fails() {
        let input = cmds(&[("a", 2), ("a", 2), ("b", 2)]);
        let err = aggregate(&input, AggregationPolicy::Strict).unwrap_err();
        assert_eq!(err.anomaly.command(), "b");
    }

    #[test]
    fn test_participant_mismatch_keeps_first() {
        let input = cmds(&[("a", 2), ("a", 2), ("a", 4), ("a", 2)]);
        let table = aggregate(&input, AggregationPolicy::Lenient).unwrap();
        let entry = table.get("a").unwrap();
        assert_eq!(entry.participant_count, 2);
        assert_eq!(entry.count, 2);
        assert_eq!(
            table.anomalies(),
            &[AggregationAnomaly::ParticipantMismatch {
                command: "a".to_string(),
                first: 2,
                found: 4,
            }]
        );
    }

    #[test]
    fn test_participant_mismatch_strict_fails() {
        let input = cmds(&[("a", 2), ("a", 3)]);
        let err = aggregate(&input, AggregationPolicy::Strict).unwrap_err();
        assert!(matches!(
            err.anomaly,
            AggregationAnomaly::ParticipantMismatch { first: 2, found: 3, .. }
        ));
    }

    #[test]
    fn test_zero_participants_strict_fails() {
        let input = cmds(&[("x -g 0", 0); 3]);
        let err = aggregate(&input, AggregationPolicy::Strict).unwrap_err();
        assert_eq!(
            err.anomaly,
            AggregationAnomaly::ZeroParticipants {
                command: "x -g 0".to_string(),
                occurrences: 3,
            }
        );
    }

    #[test]
    fn test_zero_participants_lenient_counts_zero() {
        let input = cmds(&[("x -g 0", 0), ("y", 1), ("x -g 0", 0)]);
        let table = aggregate(&input, AggregationPolicy::Lenient).unwrap();
        assert_eq!(table.count("x -g 0"), Some(0));
        assert_eq!(table.count("y"), Some(1));
        assert_eq!(table.anomalies().len(), 1);
        assert_eq!(table.anomalies()[0].command(), "x -g 0");
        assert_eq!(
            table.anomalies()[0].to_string(),
            "2 occurrences of 'x -g 0' report zero participants"
        );
    }

    #[test]
    fn test_empty_input() {
        let input: Vec<BenchmarkCommand> = Vec::new();
        let table = aggregate(&input, AggregationPolicy::Strict).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.count("a"), None);
    }

    #[test]
    fn test_anomaly_display() {
        let anomaly = AggregationAnomaly::InexactDivision {
            command: "x".to_string(),
            occurrences: 5,
            participants: 2,
        };
        assert_eq!(
            anomaly.to_string(),
            "5 occurrences of 'x' are not a multiple of 2 participants"
        );
    }
}
