// SPDX-License-Identifier: Apache-2.0

use clap::ArgMatches;
use netgraph::netlist::stats;
use std::path::Path;

use crate::report_cli_error::report_netlist_error_and_exit;

pub fn handle_gv_read_stats(matches: &ArgMatches) {
    let netlist_path = matches
        .get_one::<String>("netlist")
        .expect("netlist path is required");
    let s = stats::read_netlist_stats(Path::new(netlist_path))
        .unwrap_or_else(|e| report_netlist_error_and_exit("gv-read-stats", netlist_path, &e));
    println!("Modules: {}", s.modules.len());
    println!("Instances: {}", s.num_instances());
    println!("Unresolved references: {}", s.num_diagnostics);
    println!("Parse time: {} ms", s.parse_duration.as_millis());
    for m in &s.modules {
        println!("Module {}:", m.name);
        println!("  Ports: {} input(s), {} output(s)", m.num_inputs, m.num_outputs);
        println!(
            "  Nets: {} wire, {} port-derived, {} total",
            m.num_wire_nets, m.num_port_derived_nets, m.num_arena_nets
        );
        println!(
            "  Instances: {} hierarchical, {} leaf-level",
            m.num_hierarchical, m.num_leaf
        );
        println!(
            "  Pins: {} ({} without net)",
            m.num_pins, m.num_pins_without_net
        );
        println!("  Cell counts:");
        for (cell, count) in &m.cell_counts {
            println!("    {cell}: {count}");
        }
    }
}
