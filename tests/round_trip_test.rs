// SPDX-License-Identifier: Apache-2.0

//! Generator and JSON codec round trips.

use netgraph::netlist::emit::emit_modules;
use netgraph::netlist::json::{from_json_str, load_json_file, to_json_string, write_json_file};
use netgraph::{parse_netlist_str, Direction, Module, NetKind};
use pretty_assertions::assert_eq;

const DESIGN: &str = r#"
module mux2 (input a, input b, input s, output y);
  wire ns, t0, t1;
  INV i0 (.A(s), .Y(ns));
  AND2 g0 (.A(a), .B(ns), .Y(t0));
  AND2 g1 (.A(b), .B(s), .Y(t1));
  OR2 g2 (.A(t0), .B(t1), .Y(y));
endmodule

module top (sel, d, q);
  input sel;
  input [1:0] d;
  output q;
  wire [1:0] d;
  mux2 m0 (.a(d[0]), .b(d[1]), .s(sel), .y(q));
  TIEHI th (.Z(1'b1), .NC());
endmodule
"#;

/// `(instance, ref_name, [(pin, net name)])` for every instance.
fn topology(module: &Module) -> Vec<(String, String, Vec<(String, Option<String>)>)> {
    module
        .instances
        .iter()
        .map(|inst| {
            let pins = inst
                .pins
                .iter()
                .map(|p| (p.name.clone(), module.pin_net_name(p).map(str::to_string)))
                .collect();
            (inst.name.clone(), inst.ref_name.clone(), pins)
        })
        .collect()
}

fn ports(module: &Module) -> Vec<(Direction, String, Option<(u32, u32)>)> {
    module
        .all_ports()
        .map(|p| (p.direction, p.name.clone(), p.width))
        .collect()
}

fn wires(module: &Module) -> Vec<(String, Option<(u32, u32)>)> {
    module
        .nets()
        .filter(|n| n.kind == NetKind::Wire)
        .map(|n| (n.name.clone(), n.width))
        .collect()
}

#[test]
fn generator_output_reparses_to_same_structure() {
    let first_pass = parse_netlist_str(DESIGN).unwrap();
    let text = emit_modules(&first_pass.modules);
    let reparsed = parse_netlist_str(&text).unwrap();
    assert_eq!(reparsed.modules.len(), first_pass.modules.len());
    for (a, b) in first_pass.modules.iter().zip(&reparsed.modules) {
        assert_eq!(a.name, b.name);
        assert_eq!(ports(a), ports(b));
        assert_eq!(wires(a), wires(b));
        assert_eq!(topology(a), topology(b));
    }
}

#[test]
fn json_round_trip_reclassifies_nets() {
    let first_pass = parse_netlist_str(DESIGN).unwrap();
    let json = to_json_string(&first_pass.modules).unwrap();
    let reloaded = from_json_str(&json).unwrap();
    assert!(reloaded.diagnostics.is_empty(), "{:?}", reloaded.diagnostics);

    for (a, b) in first_pass.modules.iter().zip(&reloaded.modules) {
        assert_eq!(topology(a), topology(b));
        // Listed nets keep their names and order but all come back as wires.
        let names_a: Vec<&str> = a.nets().map(|n| n.name.as_str()).collect();
        let names_b: Vec<&str> = b.nets().map(|n| n.name.as_str()).collect();
        assert_eq!(names_a, names_b);
        assert!(b.nets().all(|n| n.kind == NetKind::Wire));
        assert!(b.all_ports().all(|p| p.derived.is_empty()));
    }

    let top = reloaded.find_module("top").unwrap();
    let m0 = top.find_instance("m0").unwrap();
    let a = top.pin_net(m0.find_pin("a").unwrap()).unwrap();
    assert_eq!(a.kind, NetKind::WireSub);
    assert_eq!(a.width, None);
    let th = top.find_instance("th").unwrap();
    assert_eq!(top.pin_net(&th.pins[0]).unwrap().kind, NetKind::Constant);
    assert_eq!(th.pins[1].net, None);

    // Cell type and pin direction come straight from the records.
    assert_eq!(m0.cell_type, first_pass.modules[1].instances[0].cell_type);
    assert_eq!(
        m0.pins.iter().map(|p| p.direction).collect::<Vec<_>>(),
        first_pass.modules[1].instances[0]
            .pins
            .iter()
            .map(|p| p.direction)
            .collect::<Vec<_>>()
    );
}

#[test]
fn json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("parsed_objects.json");
    let first_pass = parse_netlist_str(DESIGN).unwrap();
    write_json_file(&path, &first_pass.modules).unwrap();
    let reloaded = load_json_file(&path).unwrap();
    assert_eq!(reloaded.modules.len(), 2);
    assert_eq!(
        topology(&first_pass.modules[0]),
        topology(&reloaded.modules[0])
    );
}
