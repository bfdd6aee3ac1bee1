// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use clap::ArgMatches;
use netgraph::netlist::io::{parse_with_templates, read_netlist_text};
use netgraph::netlist::validate::{validate_modules, ValidationSummary};

use crate::report_cli_error::report_netlist_error_and_exit;

pub fn handle_gv_validate(matches: &ArgMatches) {
    let netlist_path = matches
        .get_one::<String>("netlist")
        .expect("netlist path is required");
    let (templates, parsed) = read_netlist_text(Path::new(netlist_path))
        .and_then(|text| parse_with_templates(&text))
        .unwrap_or_else(|e| report_netlist_error_and_exit("gv-validate", netlist_path, &e));
    let num_instances: usize = parsed.modules.iter().map(|m| m.instances.len()).sum();
    match validate_modules(&parsed.modules, &templates) {
        ValidationSummary::Clean => {
            println!("OK: {} instance(s) checked", num_instances);
        }
        ValidationSummary::Findings(findings) => {
            for finding in &findings {
                println!("{}", finding);
            }
            eprintln!(
                "{} finding(s) in {} instance(s)",
                findings.len(),
                num_instances
            );
            std::process::exit(1);
        }
    }
}
