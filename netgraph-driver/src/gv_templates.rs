// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use clap::ArgMatches;
use netgraph::netlist::io::read_netlist_text;
use netgraph::netlist::model::Direction;
use netgraph::netlist::template::extract_templates;

use crate::report_cli_error::report_netlist_error_and_exit;

pub fn handle_gv_templates(matches: &ArgMatches) {
    let netlist_path = matches
        .get_one::<String>("netlist")
        .expect("netlist path is required");
    let templates = read_netlist_text(Path::new(netlist_path))
        .and_then(|text| extract_templates(&text))
        .unwrap_or_else(|e| report_netlist_error_and_exit("gv-templates", netlist_path, &e));
    for template in &templates {
        println!("module {}", template.name);
        for direction in Direction::ALL {
            for port in template.ports(direction) {
                match port.width {
                    Some((msb, lsb)) => println!("  {} [{}:{}] {}", direction, msb, lsb, port.name),
                    None => println!("  {} {}", direction, port.name),
                }
            }
        }
    }
}
