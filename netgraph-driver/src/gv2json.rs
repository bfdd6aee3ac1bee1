// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use clap::ArgMatches;
use netgraph::netlist::emit::emit_modules;
use netgraph::netlist::io::{parse_with_templates, read_netlist_text};
use netgraph::netlist::json::write_json_file;
use netgraph::netlist::validate::{validate_modules, ValidationSummary};

use crate::driver_config::{
    get_json_output, get_unresolved_as_errors, get_validate_instances, get_verilog_output,
    DriverConfig,
};
use crate::report_cli_error::{
    report_cli_error_and_exit, report_netlist_error_and_exit, report_warning,
};

const SUBCOMMAND: &str = "gv2json";

pub fn handle_gv2json(matches: &ArgMatches, config: &Option<DriverConfig>) {
    let netlist_path = matches
        .get_one::<String>("netlist")
        .expect("netlist path is required");
    let json_out = get_json_output(matches, config);
    let verilog_out = get_verilog_output(matches, config);

    let text = read_netlist_text(Path::new(netlist_path))
        .unwrap_or_else(|e| report_netlist_error_and_exit(SUBCOMMAND, netlist_path, &e));
    let (templates, parsed) = parse_with_templates(&text)
        .unwrap_or_else(|e| report_netlist_error_and_exit(SUBCOMMAND, netlist_path, &e));

    for diagnostic in &parsed.diagnostics {
        report_warning(SUBCOMMAND, &diagnostic.to_string());
    }
    if get_validate_instances(matches, config) {
        if let ValidationSummary::Findings(findings) = validate_modules(&parsed.modules, &templates)
        {
            for finding in &findings {
                report_warning(SUBCOMMAND, &finding.to_string());
            }
        }
    }

    if let Err(e) = write_json_file(Path::new(&json_out), &parsed.modules) {
        report_cli_error_and_exit(
            "could not write JSON",
            Some(SUBCOMMAND),
            vec![("output", json_out.as_str()), ("error", e.to_string().as_str())],
        );
    }
    if let Err(e) = std::fs::write(&verilog_out, emit_modules(&parsed.modules)) {
        report_cli_error_and_exit(
            "could not write regenerated netlist",
            Some(SUBCOMMAND),
            vec![("output", verilog_out.as_str()), ("error", e.to_string().as_str())],
        );
    }
    println!(
        "Parsed {} module(s); JSON written to {}; netlist written to {}",
        parsed.modules.len(),
        json_out,
        verilog_out
    );

    if parsed.has_unresolved() && get_unresolved_as_errors(matches, config) {
        let count = parsed.diagnostics.len().to_string();
        report_cli_error_and_exit(
            "unresolved pin connections",
            Some(SUBCOMMAND),
            vec![("netlist", netlist_path.as_str()), ("count", count.as_str())],
        );
    }
}
