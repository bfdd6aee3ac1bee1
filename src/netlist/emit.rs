// SPDX-License-Identifier: Apache-2.0

//! Renders modules back to structural source text.
//!
//! The output uses an ANSI header and one line per instance, and is accepted
//! by `netlist::parse`: re-parsing it yields the same ports, `wire` nets and
//! instance/pin topology.

use std::fmt::Write as FmtWrite;

use crate::netlist::model::{Module, NetKind, Width};

fn width_prefix(width: Option<Width>) -> String {
    match width {
        Some((msb, lsb)) => format!("[{}:{}] ", msb, lsb),
        None => String::new(),
    }
}

pub fn emit_module(module: &Module) -> String {
    let mut s = String::new();

    let ports: Vec<String> = module
        .all_ports()
        .map(|p| format!("{} {}{}", p.direction, width_prefix(p.width), p.name))
        .collect();
    if ports.is_empty() {
        writeln!(&mut s, "module {} ();", module.name).unwrap();
    } else {
        writeln!(&mut s, "module {} (", module.name).unwrap();
        writeln!(&mut s, "    {}", ports.join(",\n    ")).unwrap();
        writeln!(&mut s, ");").unwrap();
    }
    writeln!(&mut s).unwrap();

    // Synthesized nets are implied by the connections that use them.
    for net in module.nets().filter(|n| n.kind == NetKind::Wire) {
        writeln!(&mut s, "    wire {}{};", width_prefix(net.width), net.name).unwrap();
    }

    for instance in &module.instances {
        let pins: Vec<String> = instance
            .pins
            .iter()
            .map(|pin| format!(".{}({})", pin.name, module.pin_net_name(pin).unwrap_or("")))
            .collect();
        writeln!(
            &mut s,
            "    {} {} ({});",
            instance.ref_name,
            instance.name,
            pins.join(", ")
        )
        .unwrap();
    }

    writeln!(&mut s, "endmodule").unwrap();
    s
}

/// Renders every module, separated by a blank line.
pub fn emit_modules(modules: &[Module]) -> String {
    modules
        .iter()
        .map(emit_module)
        .collect::<Vec<_>>()
        .join("\n")
}
