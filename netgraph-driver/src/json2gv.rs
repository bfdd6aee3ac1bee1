// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use clap::ArgMatches;
use netgraph::netlist::emit::emit_modules;
use netgraph::netlist::json::load_json_file;

use crate::report_cli_error::{
    report_cli_error_and_exit, report_netlist_error_and_exit, report_warning,
};

const SUBCOMMAND: &str = "json2gv";

pub fn handle_json2gv(matches: &ArgMatches) {
    let json_path = matches
        .get_one::<String>("json")
        .expect("json path is required");
    let parsed = load_json_file(Path::new(json_path))
        .unwrap_or_else(|e| report_netlist_error_and_exit(SUBCOMMAND, json_path, &e));
    for diagnostic in &parsed.diagnostics {
        report_warning(SUBCOMMAND, &diagnostic.to_string());
    }

    let text = emit_modules(&parsed.modules);
    match matches.get_one::<String>("output") {
        Some(output) => {
            if let Err(e) = std::fs::write(output, text) {
                report_cli_error_and_exit(
                    "could not write netlist",
                    Some(SUBCOMMAND),
                    vec![("output", output.as_str()), ("error", e.to_string().as_str())],
                );
            }
        }
        None => print!("{}", text),
    }
}
