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

//! Shell completion generation

use crate::error::CliError;
use clap::Command;
use clap_complete::{generate, Generator};
use std::io;

/// Write the completion script for `cmd` to stdout.
///
/// # Examples
///
/// ```no_run
/// use clap::Command;
/// use clap_complete::shells::Bash;
/// use collrep_cli::commands::generate_completion_for_command;
///
/// let mut cmd = Command::new("collrep");
/// generate_completion_for_command(Bash, &mut cmd).unwrap();
/// ```
pub fn generate_completion_for_command<G: Generator>(
    generator: G,
    cmd: &mut Command,
) -> Result<(), CliError> {
    let name = cmd.get_name().to_string();
    generate(generator, cmd, name, &mut io::stdout());
    Ok(())
}

/// Installation instructions for completions in `shell`.
///
/// Shell names are case-insensitive. Unknown shells yield `"Unsupported shell"`.
///
/// ```
/// use collrep_cli::commands::print_installation_instructions;
///
/// assert!(print_installation_instructions("zsh").contains("~/.zshrc"));
/// assert_eq!(print_installation_instructions("tcsh"), "Unsupported shell");
/// ```
pub fn print_installation_instructions(shell: &str) -> String {
    match shell.to_lowercase().as_str() {
        "bash" => r#"# Bash completion installation:

# For current session only:
eval "$(collrep completion bash)"

# For persistent installation, add to your ~/.bashrc:
echo 'eval "$(collrep completion bash)"' >> ~/.bashrc
"#
        .to_string(),
        "zsh" => r#"# Zsh completion installation:

# For current session only:
eval "$(collrep completion zsh)"

# For persistent installation, add to your ~/.zshrc:
echo 'eval "$(collrep completion zsh)"' >> ~/.zshrc
"#
        .to_string(),
        "fish" => r#"# Fish completion installation:

collrep completion fish > ~/.config/fish/completions/collrep.fish
"#
        .to_string(),
        "powershell" | "pwsh" => r#"# PowerShell completion installation:

# Add to your PowerShell profile:
collrep completion powershell | Out-String | Invoke-Expression
"#
        .to_string(),
        "elvish" => r#"# Elvish completion installation:

# Add to ~/.elvish/rc.elv:
eval (collrep completion elvish | slurp)
"#
        .to_string(),
        _ => "Unsupported shell".to_string(),
    }
}
