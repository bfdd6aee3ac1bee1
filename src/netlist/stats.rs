// SPDX-License-Identifier: Apache-2.0

//! Compute summary statistics for parsed netlists.

use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::netlist::error::NetlistError;
use crate::netlist::io::{parse_netlist_str, read_netlist_text};
use crate::netlist::model::{CellType, Module, NetKind};

/// Summary statistics for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleStats {
    pub name: String,
    pub num_inputs: usize,
    pub num_outputs: usize,
    pub num_wire_nets: usize,
    pub num_port_derived_nets: usize,
    /// All nets, including the ones reachable only through pins.
    pub num_arena_nets: usize,
    pub num_hierarchical: usize,
    pub num_leaf: usize,
    pub num_pins: usize,
    pub num_pins_without_net: usize,
    /// Instance count per reference name, most used first.
    pub cell_counts: Vec<(String, usize)>,
}

/// Summary statistics for a netlist file.
#[derive(Debug)]
pub struct NetlistStats {
    pub modules: Vec<ModuleStats>,
    pub num_diagnostics: usize,
    pub parse_duration: Duration,
}

impl NetlistStats {
    pub fn num_instances(&self) -> usize {
        self.modules
            .iter()
            .map(|m| m.num_hierarchical + m.num_leaf)
            .sum()
    }
}

pub fn module_stats(module: &Module) -> ModuleStats {
    let count_nets = |kind: NetKind| module.nets().filter(|n| n.kind == kind).count();
    let count_cells = |cell_type: CellType| {
        module
            .instances
            .iter()
            .filter(|i| i.cell_type == cell_type)
            .count()
    };

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for inst in &module.instances {
        *counts.entry(inst.ref_name.as_str()).or_insert(0) += 1;
    }
    let mut cell_counts: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    cell_counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let pins = module.instances.iter().flat_map(|i| i.pins.iter());
    ModuleStats {
        name: module.name.clone(),
        num_inputs: module.inputs.len(),
        num_outputs: module.outputs.len(),
        num_wire_nets: count_nets(NetKind::Wire),
        num_port_derived_nets: count_nets(NetKind::PortDerived),
        num_arena_nets: module.arena_len(),
        num_hierarchical: count_cells(CellType::Hierarchical),
        num_leaf: count_cells(CellType::LeafLevel),
        num_pins: pins.clone().count(),
        num_pins_without_net: pins.filter(|p| p.net.is_none()).count(),
        cell_counts,
    }
}

/// Reads and parses the netlist at `path`, returning summary statistics.
pub fn read_netlist_stats(path: &Path) -> Result<NetlistStats, NetlistError> {
    let text = read_netlist_text(path)?;
    let start = Instant::now();
    let parsed = parse_netlist_str(&text)?;
    let parse_duration = start.elapsed();
    Ok(NetlistStats {
        modules: parsed.modules.iter().map(module_stats).collect(),
        num_diagnostics: parsed.diagnostics.len(),
        parse_duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_module_stats_counts() {
        let src = r#"
module sub (input i, output o);
endmodule
module top (input a, output y);
  wire n1, n2;
  INV u0 (.A(a), .Y(n1));
  INV u1 (.A(n1), .Y(n2));
  SUB s0 (.i(n2), .o(y));
  TIE t0 (.Z(1'b0), .NC(), .X(ghost));
endmodule
"#;
        let parsed = parse_netlist_str(src).unwrap();
        let stats = module_stats(parsed.find_module("top").unwrap());
        assert_eq!(stats.num_inputs, 1);
        assert_eq!(stats.num_outputs, 1);
        assert_eq!(stats.num_wire_nets, 2);
        assert_eq!(stats.num_port_derived_nets, 2);
        // Two wires, two port-derived nets and one constant.
        assert_eq!(stats.num_arena_nets, 5);
        assert_eq!(stats.num_hierarchical, 1);
        assert_eq!(stats.num_leaf, 3);
        assert_eq!(stats.num_pins, 9);
        assert_eq!(stats.num_pins_without_net, 2);
        assert_eq!(
            stats.cell_counts,
            vec![
                ("INV".to_string(), 2),
                ("SUB".to_string(), 1),
                ("TIE".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_read_netlist_stats_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.v");
        std::fs::write(
            &path,
            "module top (a, y);\ninput a;\noutput y;\nINV u0 (.A(a), .Y(y));\nendmodule\n",
        )
        .unwrap();
        let stats = read_netlist_stats(&path).unwrap();
        assert_eq!(stats.modules.len(), 1);
        assert_eq!(stats.num_instances(), 1);
        assert_eq!(stats.num_diagnostics, 0);
    }
}
