// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use clap::ArgMatches;
use netgraph::netlist::graph::build_graph;
use netgraph::parse_netlist_from_path;

use crate::report_cli_error::{report_cli_error_and_exit, report_netlist_error_and_exit};

const SUBCOMMAND: &str = "gv2graph";

pub fn handle_gv2graph(matches: &ArgMatches) {
    let netlist_path = matches
        .get_one::<String>("netlist")
        .expect("netlist path is required");
    let parsed = parse_netlist_from_path(Path::new(netlist_path))
        .unwrap_or_else(|e| report_netlist_error_and_exit(SUBCOMMAND, netlist_path, &e));
    let json = build_graph(&parsed.modules)
        .to_json_string()
        .unwrap_or_else(|e| report_netlist_error_and_exit(SUBCOMMAND, netlist_path, &e));
    match matches.get_one::<String>("output") {
        Some(output) => {
            if let Err(e) = std::fs::write(output, json) {
                report_cli_error_and_exit(
                    "could not write graph",
                    Some(SUBCOMMAND),
                    vec![("output", output.as_str()), ("error", e.to_string().as_str())],
                );
            }
        }
        None => println!("{}", json),
    }
}
