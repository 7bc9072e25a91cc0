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

//! Script and count-table artifacts.
//!
//! - `<base>.sh`: one harness command per line.
//! - `<base>.csv`: a `sep=|` line (so spreadsheet tools pick the delimiter),
//!   then `command|count` rows in first-seen order.

use crate::aggregate::CommandFrequencyTable;
use crate::error::EmitError;
use crate::pipeline::Translation;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// First line of every count table.
pub const COUNTS_HEADER: &str = "sep=|";

/// Column delimiter of the count table.
pub const COUNTS_DELIMITER: u8 = b'|';

/// Suffix appended to the base name of the deduplicated script.
pub const UNIQUE_SUFFIX: &str = "_unique";

/// Suffix appended to the base name of the count table.
pub const COUNTS_SUFFIX: &str = "_counts";

/// `<base>.sh`
pub fn script_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{}.sh", base))
}

/// `<base>.csv`
pub fn counts_path(base: &str) -> PathBuf {
    PathBuf::from(format!("{}.csv", base))
}

/// Write `commands`, one per line.
pub fn write_script<W, S>(commands: &[S], mut writer: W) -> Result<(), EmitError>
where
    W: Write,
    S: AsRef<str>,
{
    for cmd in commands {
        writer
            .write_all(cmd.as_ref().as_bytes())
            .and_then(|_| writer.write_all(b"\n"))
            .map_err(|e| EmitError::io("", e))?;
    }
    writer.flush().map_err(|e| EmitError::io("", e))
}

/// Check that every command in `table` can be written as a `command|count` row.
///
/// # Errors
///
/// Returns [`EmitError::DelimiterInCommand`] for the first command containing `|`.
pub fn check_counts(table: &CommandFrequencyTable) -> Result<(), EmitError> {
    match table
        .commands()
        .find(|cmd| cmd.as_bytes().contains(&COUNTS_DELIMITER))
    {
        Some(cmd) => Err(EmitError::DelimiterInCommand {
            path: PathBuf::new(),
            command: cmd.to_string(),
        }),
        None => Ok(()),
    }
}

/// Write the `sep=|` header and one `command|count` row per table entry.
///
/// Nothing is written if any command contains the delimiter.
///
/// # Examples
///
/// ```
/// use collrep_core::{aggregate, emit::write_counts, AggregationPolicy, BenchmarkCommand};
///
/// let cmds = vec![BenchmarkCommand::new("a -g 1", 1), BenchmarkCommand::new("a -g 1", 1)];
/// let table = aggregate(&cmds, AggregationPolicy::Strict).unwrap();
///
/// let mut out = Vec::new();
/// write_counts(&table, &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "sep=|\na -g 1|2\n");
/// ```
pub fn write_counts<W: Write>(
    table: &CommandFrequencyTable,
    mut writer: W,
) -> Result<(), EmitError> {
    check_counts(table)?;
    writer
        .write_all(COUNTS_HEADER.as_bytes())
        .and_then(|_| writer.write_all(b"\n"))
        .map_err(|e| EmitError::io("", e))?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(COUNTS_DELIMITER)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(writer);

    for entry in table.entries() {
        let count = entry.count.to_string();
        wtr.write_record([entry.command.as_str(), count.as_str()])
            .map_err(|e| EmitError::csv("", e))?;
    }

    wtr.flush().map_err(|e| EmitError::io("", e))
}

/// Write the script artifact to `<base>.sh` and return its path.
pub fn emit_script<S: AsRef<str>>(commands: &[S], base: &str) -> Result<PathBuf, EmitError> {
    let path = script_path(base);
    let file = create(&path)?;
    write_script(commands, BufWriter::new(file)).map_err(|e| e.with_path(&path))?;
    tracing::info!(path = %path.display(), commands = commands.len(), "wrote command script");
    Ok(path)
}

/// Write the count table to `<base>.csv` and return its path.
pub fn emit_counts(table: &CommandFrequencyTable, base: &str) -> Result<PathBuf, EmitError> {
    let path = counts_path(base);
    let file = create(&path)?;
    write_counts(table, BufWriter::new(file)).map_err(|e| e.with_path(&path))?;
    tracing::info!(path = %path.display(), rows = table.len(), "wrote command counts");
    Ok(path)
}

/// Write the artifacts for `translation` under `base`.
///
/// A full translation produces `<base>.sh`. A deduplicated one produces
/// `<base>_unique.sh` and `<base>_counts.csv`. Paths are returned in that
/// order.
pub fn emit_translation(translation: &Translation, base: &str) -> Result<Vec<PathBuf>, EmitError> {
    match translation {
        Translation::All(commands) => {
            let lines: Vec<&str> = commands.iter().map(|c| c.command.as_str()).collect();
            Ok(vec![emit_script(&lines, base)?])
        }
        Translation::Unique(table) => {
            let counts_base = format!("{}{}", base, COUNTS_SUFFIX);
            check_counts(table).map_err(|e| e.with_path(counts_path(&counts_base)))?;
            let lines: Vec<&str> = table.commands().collect();
            let script = emit_script(&lines, &format!("{}{}", base, UNIQUE_SUFFIX))?;
            let counts = emit_counts(table, &counts_base)?;
            Ok(vec![script, counts])
        }
    }
}

fn create(path: &Path) -> Result<File, EmitError> {
    File::create(path).map_err(|e| EmitError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{aggregate, AggregationPolicy};
    use crate::synth::BenchmarkCommand;
    use std::fs;

    #[test]
    fn test_paths() {
        assert_eq!(script_path("net_unique"), PathBuf::from("net_unique.sh"));
        assert_eq!(counts_path("out/net_counts"), PathBuf::from("out/net_counts.csv"));
    }

    #[test]
    fn test_write_script_lines() {
        let mut out = Vec::new();
        write_script(&["a -b 1", "c -d 2"], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a -b 1\nc -d 2\n");
    }

    #[test]
    fn test_write_script_empty() {
        let mut out = Vec::new();
        let empty: [&str; 0] = [];
        write_script(&empty, &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_counts_rejects_delimiter_in_command() {
        let cmds = vec![
            BenchmarkCommand::new("a -g 1", 1),
            BenchmarkCommand::new("/a|b/all_reduce_perf -g 1", 1),
        ];
        let table = aggregate(&cmds, AggregationPolicy::Strict).unwrap();
        let mut out = Vec::new();
        let err = write_counts(&table, &mut out).unwrap_err();
        assert_eq!(
            err,
            EmitError::DelimiterInCommand {
                path: PathBuf::new(),
                command: "/a|b/all_reduce_perf -g 1".to_string(),
            }
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_counts_order_and_format() {
        let cmds = vec![
            BenchmarkCommand::new("z -g 2", 2),
            BenchmarkCommand::new("a -g 1", 1),
            BenchmarkCommand::new("z -g 2", 2),
        ];
        let table = aggregate(&cmds, AggregationPolicy::Strict).unwrap();
        let mut out = Vec::new();
        write_counts(&table, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "sep=|\nz -g 2|1\na -g 1|1\n"
        );
    }

    #[test]
    fn test_emit_translation_unique() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("net");
        let base = base.to_str().unwrap();

        let cmds = vec![BenchmarkCommand::new("x -g 1", 1)];
        let table = aggregate(&cmds, AggregationPolicy::Strict).unwrap();
        let paths = emit_translation(&Translation::Unique(table), base).unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("net_unique.sh"));
        assert!(paths[1].ends_with("net_counts.csv"));
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "x -g 1\n");
        assert_eq!(fs::read_to_string(&paths[1]).unwrap(), "sep=|\nx -g 1|1\n");
    }

    #[test]
    fn test_emit_translation_unique_with_delimiter_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("net");
        let cmds = vec![BenchmarkCommand::new("/opt|x/all_reduce_perf -g 1", 1)];
        let table = aggregate(&cmds, AggregationPolicy::Strict).unwrap();
        let err = emit_translation(&Translation::Unique(table), base.to_str().unwrap()).unwrap_err();
        match err {
            EmitError::DelimiterInCommand { path, .. } => assert!(path.ends_with("net_counts.csv")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!dir.path().join("net_unique.sh").exists());
        assert!(!dir.path().join("net_counts.csv").exists());
    }

    #[test]
    fn test_emit_translation_all_keeps_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("trace");
        let cmds = vec![BenchmarkCommand::new("x", 1), BenchmarkCommand::new("x", 1)];
        let paths = emit_translation(&Translation::All(cmds), base.to_str().unwrap()).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "x\nx\n");
    }

    #[test]
    fn test_emit_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("missing").join("net");
        let err = emit_script(&["x"], base.to_str().unwrap()).unwrap_err();
        match err {
            EmitError::Io { path, .. } => assert!(path.ends_with("net.sh")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
