//! Shell completion scripts for the `helpdesk` binary.

use clap::CommandFactory;
use clap_complete::{generate, shells::Shell};
use std::io::{self, Write};

/// Name completions are registered under; matches the installed binary.
const BIN_NAME: &str = "helpdesk";

/// Writes the completion script for `shell` to stdout.
pub fn generate_completion(shell: Shell) {
    write_completion(shell, &mut io::stdout());
}

fn write_completion(shell: Shell, out: &mut dyn Write) {
    let mut app = crate::Cli::command();
    generate(shell, &mut app, BIN_NAME, out);
}
