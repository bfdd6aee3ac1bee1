// SPDX-License-Identifier: Apache-2.0

use colored::Colorize;
use netgraph::NetlistError;

pub fn report_cli_error_and_exit(
    message: &str,
    subcommand: Option<&str>,
    details: Vec<(&str, &str)>,
) -> ! {
    let prefix = subcommand.map(|s| format!("{}: ", s)).unwrap_or_default();
    eprintln!("netgraph-driver: {}{}", prefix, message.red().bold());
    for (key, value) in details {
        eprintln!("  {}: {}", key.dimmed(), value);
    }
    std::process::exit(1);
}

/// Reports a library error for the input at `path`; positioned errors are
/// shown with the offending source line and a caret.
pub fn report_netlist_error_and_exit(subcommand: &str, path: &str, error: &NetlistError) -> ! {
    let headline = match error {
        NetlistError::Io { .. } => "could not read input",
        NetlistError::Json(_) => "could not decode JSON",
        _ => "could not parse netlist",
    };
    let rendered = error.render_with_context();
    report_cli_error_and_exit(
        headline,
        Some(subcommand),
        vec![("input", path), ("error", rendered.as_str())],
    )
}

/// Prints a recoverable finding without exiting.
pub fn report_warning(subcommand: &str, message: &str) {
    eprintln!("netgraph-driver: {}: {} {}", subcommand, "warning:".yellow(), message);
}
