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

//! Benchmark harness orchestration for `collrep replay`.
//!
//! A replay is planned up front as a list of [`Step`]s and then executed in
//! order. The first failing step aborts the rest.

use crate::error::CliError;
use collrep_core::emit::{counts_path, script_path, COUNTS_SUFFIX, UNIQUE_SUFFIX};
use collrep_core::Platform;
use colored::Colorize;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Artifact base name used by replay (`net_unique.sh`, `net_counts.csv`).
pub const REPLAY_BASE_NAME: &str = "net";

/// Default summary generator script.
pub const DEFAULT_SUMMARY_SCRIPT: &str = "generate_summary.py";

/// Summary output name passed on CUDA.
pub const CUDA_SUMMARY_OUTPUT: &str = "nv_net_summary";

/// Interpreter used for the summary generator.
pub const SUMMARY_INTERPRETER: &str = "python";

/// Perf log file written while running the benchmark script.
pub fn perf_log_name(platform: Platform) -> &'static str {
    match platform {
        Platform::Rocm => "rccl_perf_log.txt",
        Platform::Cuda => "nccl_perf_log.txt",
    }
}

/// Inputs for planning a replay.
#[derive(Debug, Clone)]
pub struct ReplayOptions {
    pub platform: Platform,
    /// Harness checkout; defaults to `./rccl-tests` or `./nccl-tests`.
    pub harness_dir: Option<PathBuf>,
    pub summary_script: PathBuf,
    pub skip_summary: bool,
    /// ROCm installation handed to `install.sh`.
    pub rocm_home: PathBuf,
}

/// Where a child process's stdout goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Inherit,
    Discard,
    /// Copy to our stdout and to the file.
    Tee(PathBuf),
}

/// One external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStep {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub envs: Vec<(String, String)>,
    pub output: Output,
}

impl ProcessStep {
    fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            envs: Vec::new(),
            output: Output::Inherit,
        }
    }

    fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }
}

/// A single replay step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Copy { from: PathBuf, to: PathBuf },
    /// Print a file to stdout.
    Show(PathBuf),
    Run {
        description: String,
        process: ProcessStep,
    },
    Move { from: PathBuf, to: PathBuf },
}

/// Ordered replay steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayPlan {
    steps: Vec<Step>,
}

impl ReplayPlan {
    /// Plan the harness steps that follow artifact generation in `workdir`.
    pub fn new(options: &ReplayOptions, workdir: &Path) -> Self {
        let platform = options.platform;
        let harness = workdir.join(
            options
                .harness_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(platform.harness_name())),
        );
        let script = script_path(&format!("{}{}", REPLAY_BASE_NAME, UNIQUE_SUFFIX));
        let counts = counts_path(&format!("{}{}", REPLAY_BASE_NAME, COUNTS_SUFFIX));
        let perf_log = perf_log_name(platform);

        let mut steps = vec![Step::Copy {
            from: workdir.join(&script),
            to: harness.join(&script),
        }];

        let build = match platform {
            Platform::Rocm => ProcessStep::new(harness.join("install.sh").display().to_string(), &harness)
                .arg(format!("--rccl_home={}", options.rocm_home.display())),
            Platform::Cuda => ProcessStep::new("make", &harness).output(Output::Discard),
        };
        steps.push(Step::Run {
            description: format!("Building {}", platform.harness_name()),
            process: build,
        });

        steps.push(Step::Show(harness.join(&script)));

        let mut run = ProcessStep::new("sh", &harness)
            .arg(script.display().to_string())
            .output(Output::Tee(harness.join(perf_log)));
        if platform == Platform::Rocm {
            run = run.env("HSA_FORCE_FINE_GRAIN_PCIE", "1");
        }
        steps.push(Step::Run {
            description: format!("Running {}", platform.harness_name()),
            process: run,
        });

        steps.push(Step::Move {
            from: harness.join(perf_log),
            to: workdir.join(perf_log),
        });

        if !options.skip_summary {
            let mut summary = ProcessStep::new(SUMMARY_INTERPRETER, workdir)
                .arg(options.summary_script.display().to_string())
                .arg("--log-file")
                .arg(perf_log)
                .arg("--script-file")
                .arg(script.display().to_string());
            if platform == Platform::Cuda {
                summary = summary.arg("--output-file-name").arg(CUDA_SUMMARY_OUTPUT);
            }
            summary = summary
                .arg("--count-file")
                .arg(counts.display().to_string());
            steps.push(Step::Run {
                description: "Generating summary".to_string(),
                process: summary,
            });
        }

        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Run every step in order, stopping at the first failure.
    pub fn execute(&self) -> Result<(), CliError> {
        for step in &self.steps {
            run_step(step)?;
        }
        Ok(())
    }
}

fn run_step(step: &Step) -> Result<(), CliError> {
    match step {
        Step::Copy { from, to } => {
            tracing::info!("Copying {} to {}", from.display(), to.display());
            fs::copy(from, to).map_err(|e| CliError::io_error(to, e))?;
        }
        Step::Show(path) => {
            let content = fs::read(path).map_err(|e| CliError::io_error(path, e))?;
            io::stdout()
                .write_all(&content)
                .map_err(|e| CliError::io_error("<stdout>", e))?;
        }
        Step::Run {
            description,
            process,
        } => {
            tracing::info!("{}: {} {}", description, process.program, process.args.join(" "));
            run_process(description, process)?;
            println!("{} {}", "✓".green().bold(), description);
        }
        Step::Move { from, to } => {
            tracing::info!("Moving {} to {}", from.display(), to.display());
            move_file(from, to)?;
        }
    }
    Ok(())
}

fn run_process(description: &str, step: &ProcessStep) -> Result<(), CliError> {
    let mut command = Command::new(&step.program);
    command
        .args(&step.args)
        .current_dir(&step.cwd)
        .envs(step.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let status = match &step.output {
        Output::Inherit => command
            .status()
            .map_err(|e| CliError::spawn(&step.program, e))?,
        Output::Discard => command
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| CliError::spawn(&step.program, e))?,
        Output::Tee(path) => {
            let mut file = File::create(path).map_err(|e| CliError::io_error(path, e))?;
            let mut child = command
                .stdout(Stdio::piped())
                .spawn()
                .map_err(|e| CliError::spawn(&step.program, e))?;
            tee_child(&mut child, &mut io::stdout(), &mut file)
                .map_err(|e| CliError::io_error(path, e))?;
            child
                .wait()
                .map_err(|e| CliError::spawn(&step.program, e))?
        }
    };

    if status.success() {
        Ok(())
    } else {
        Err(CliError::step_failed(description, status))
    }
}

/// Tee the child's stdout to both writers.
///
/// On failure the child is killed and reaped before the error is returned.
fn tee_child<A: Write, B: Write>(child: &mut Child, a: &mut A, b: &mut B) -> io::Result<()> {
    let Some(mut stdout) = child.stdout.take() else {
        return Ok(());
    };
    tee(&mut stdout, a, b).map_err(|e| {
        drop(stdout);
        let _ = child.kill();
        let _ = child.wait();
        e
    })
}

/// Copy `reader` to both writers until EOF.
fn tee<R: Read, A: Write, B: Write>(reader: &mut R, a: &mut A, b: &mut B) -> io::Result<()> {
    let mut buf = [0u8; 8192];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        a.write_all(&buf[..n])?;
        b.write_all(&buf[..n])?;
    }
    a.flush()?;
    b.flush()
}

fn move_file(from: &Path, to: &Path) -> Result<(), CliError> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    // Cross-device: fall back to copy and remove.
    fs::copy(from, to).map_err(|e| CliError::io_error(to, e))?;
    fs::remove_file(from).map_err(|e| CliError::io_error(from, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(platform: Platform) -> ReplayOptions {
        ReplayOptions {
            platform,
            harness_dir: None,
            summary_script: PathBuf::from(DEFAULT_SUMMARY_SCRIPT),
            skip_summary: false,
            rocm_home: PathBuf::from("/opt/rocm"),
        }
    }

    fn runs(plan: &ReplayPlan) -> Vec<&ProcessStep> {
        plan.steps()
            .iter()
            .filter_map(|s| match s {
                Step::Run { process, .. } => Some(process),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_rocm_plan() {
        let work = Path::new("/work");
        let plan = ReplayPlan::new(&options(Platform::Rocm), work);

        assert_eq!(
            plan.steps()[0],
            Step::Copy {
                from: PathBuf::from("/work/net_unique.sh"),
                to: PathBuf::from("/work/rccl-tests/net_unique.sh"),
            }
        );

        let runs = runs(&plan);
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].program, "/work/rccl-tests/install.sh");
        assert_eq!(runs[0].args, vec!["--rccl_home=/opt/rocm"]);

        assert_eq!(runs[1].program, "sh");
        assert_eq!(runs[1].args, vec!["net_unique.sh"]);
        assert_eq!(
            runs[1].envs,
            vec![("HSA_FORCE_FINE_GRAIN_PCIE".to_string(), "1".to_string())]
        );
        assert_eq!(
            runs[1].output,
            Output::Tee(PathBuf::from("/work/rccl-tests/rccl_perf_log.txt"))
        );

        assert_eq!(
            runs[2].args,
            vec![
                "generate_summary.py",
                "--log-file",
                "rccl_perf_log.txt",
                "--script-file",
                "net_unique.sh",
                "--count-file",
                "net_counts.csv",
            ]
        );
        assert!(plan.steps().contains(&Step::Move {
            from: PathBuf::from("/work/rccl-tests/rccl_perf_log.txt"),
            to: PathBuf::from("/work/rccl_perf_log.txt"),
        }));
    }

    #[test]
    fn test_cuda_plan() {
        let plan = ReplayPlan::new(&options(Platform::Cuda), Path::new("/work"));
        let runs = runs(&plan);

        assert_eq!(runs[0].program, "make");
        assert_eq!(runs[0].output, Output::Discard);
        assert!(runs[1].envs.is_empty());
        assert_eq!(
            runs[1].output,
            Output::Tee(PathBuf::from("/work/nccl-tests/nccl_perf_log.txt"))
        );
        assert_eq!(
            runs[2].args,
            vec![
                "generate_summary.py",
                "--log-file",
                "nccl_perf_log.txt",
                "--script-file",
                "net_unique.sh",
                "--output-file-name",
                "nv_net_summary",
                "--count-file",
                "net_counts.csv",
            ]
        );
    }

    #[test]
    fn test_skip_summary_and_custom_harness() {
        let opts = ReplayOptions {
            harness_dir: Some(PathBuf::from("/opt/bench/rccl-tests")),
            skip_summary: true,
            ..options(Platform::Rocm)
        };
        let plan = ReplayPlan::new(&opts, Path::new("/work"));
        let runs = runs(&plan);

        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].cwd, PathBuf::from("/opt/bench/rccl-tests"));
        assert!(matches!(plan.steps().last(), Some(Step::Move { .. })));
    }

    #[test]
    fn test_tee_copies_to_both() {
        let mut input: &[u8] = b"# nThread 1 nGpus 1\n  1048576  262144  float  sum\n";
        let mut a = Vec::new();
        let mut b = Vec::new();
        tee(&mut input, &mut a, &mut b).unwrap();
        assert_eq!(a, b);
        assert!(String::from_utf8(a).unwrap().contains("1048576"));
    }

    #[test]
    fn test_move_file() {
        let dir = tempfile::tempdir().unwrap();
        let from = dir.path().join("perf.txt");
        let to = dir.path().join("moved.txt");
        fs::write(&from, "ok").unwrap();

        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(fs::read_to_string(&to).unwrap(), "ok");
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_step_aborts_plan() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("reached");
        let plan = ReplayPlan {
            steps: vec![
                Step::Run {
                    description: "Failing step".to_string(),
                    process: ProcessStep::new("sh", dir.path()).arg("-c").arg("exit 3"),
                },
                Step::Run {
                    description: "Never runs".to_string(),
                    process: ProcessStep::new("touch", dir.path())
                        .arg(marker.display().to_string()),
                },
            ],
        };

        let err = plan.execute().unwrap_err();
        assert!(matches!(err, CliError::StepFailed { ref step, .. } if step == "Failing step"));
        assert!(!marker.exists());
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_tee_failure_reaps_child() {
        let mut child = Command::new("sh")
            .args(["-c", "while :; do echo x; done"])
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();

        let mut log = Vec::new();
        let err = tee_child(&mut child, &mut BrokenPipe, &mut log).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(child.try_wait().unwrap().is_some());
    }
}
