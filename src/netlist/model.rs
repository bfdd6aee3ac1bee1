// SPDX-License-Identifier: Apache-2.0

//! In-memory netlist graph.
//!
//! A [`Module`] owns its ports, nets and instances. Nets live in a per-module
//! arena and are referred to by [`NetIndex`]; ports and pins only ever hold
//! handles into that arena, never the nets themselves.
//!
//! Only a subset of the arena is "listed" (the module's ordered net
//! collection): explicitly declared `wire` nets and synthesized
//! `port-derived` nets. Single-bit aliases, constants and reload-time
//! sub-nets are reachable only through the pins (and ports) that use them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bit range as written, `(msb, lsb)`.
pub type Width = (u32, u32);

/// Index into a module's net arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NetIndex(pub usize);

/// Index into `Module::instances`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstIndex(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Iteration order used everywhere ports are walked: inputs first.
    pub const ALL: [Direction; 2] = [Direction::Input, Direction::Output];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Input => "input",
            Direction::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance of a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetKind {
    /// Declared by a `wire` statement.
    #[serde(rename = "wire")]
    Wire,
    /// Single-bit alias synthesized for `base[n]` where `base` is a declared
    /// wire.
    #[serde(rename = "wire-single")]
    WireSingle,
    /// Any bit-indexed reference recreated when loading JSON.
    #[serde(rename = "wire-sub")]
    WireSub,
    /// Synthesized because a pin connects straight to a port name.
    #[serde(rename = "port-derived")]
    PortDerived,
    /// A literal value such as `1'b0`.
    #[serde(rename = "constant")]
    Constant,
}

impl NetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NetKind::Wire => "wire",
            NetKind::WireSingle => "wire-single",
            NetKind::WireSub => "wire-sub",
            NetKind::PortDerived => "port-derived",
            NetKind::Constant => "constant",
        }
    }
}

impl fmt::Display for NetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellType {
    /// The referenced name is itself a module defined in the same source.
    #[serde(rename = "hierarchical")]
    Hierarchical,
    /// A library/primitive cell, opaque to us.
    #[serde(rename = "leaf-level")]
    LeafLevel,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellType::Hierarchical => "hierarchical",
            CellType::LeafLevel => "leaf-level",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Net {
    pub name: String,
    pub kind: NetKind,
    pub width: Option<Width>,
}

impl Net {
    pub fn new(name: impl Into<String>, kind: NetKind, width: Option<Width>) -> Self {
        Net {
            name: name.into(),
            kind,
            width,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    pub name: String,
    pub direction: Direction,
    pub width: Option<Width>,
    /// Nets synthesized during resolution that refer to this port, in the
    /// order the referencing pins were seen. Never populated by declarations.
    pub derived: Vec<NetIndex>,
}

impl Port {
    pub fn new(name: impl Into<String>, direction: Direction, width: Option<Width>) -> Self {
        Port {
            name: name.into(),
            direction,
            width,
            derived: Vec::new(),
        }
    }
}

/// Locates a port inside its module: the direction selects the container and
/// `index` the position within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub direction: Direction,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    pub name: String,
    /// Unknown unless it could be taken from a module template.
    pub direction: Option<Direction>,
    /// Owning instance.
    pub instance: InstIndex,
    pub net: Option<NetIndex>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub name: String,
    pub ref_name: String,
    pub cell_type: CellType,
    pub pins: Vec<Pin>,
    /// Source line of the declaration; `None` for instances loaded from JSON.
    pub lineno: Option<u32>,
}

impl Instance {
    pub fn new(name: impl Into<String>, ref_name: impl Into<String>, cell_type: CellType) -> Self {
        Instance {
            name: name.into(),
            ref_name: ref_name.into(),
            cell_type,
            pins: Vec::new(),
            lineno: None,
        }
    }

    pub fn find_pin(&self, name: &str) -> Option<&Pin> {
        self.pins.iter().find(|p| p.name == name)
    }
}

/// A parsed module.
///
/// Invariants:
/// - every `NetIndex` held by a port, a pin or the listed-net collection is
///   a valid index into this module's arena;
/// - every listed net has kind `Wire` or `PortDerived`;
/// - `Pin::instance` is the index of the instance that owns the pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub inputs: Vec<Port>,
    pub outputs: Vec<Port>,
    pub instances: Vec<Instance>,
    net_arena: Vec<Net>,
    listed: Vec<NetIndex>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Module {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            instances: Vec::new(),
            net_arena: Vec::new(),
            listed: Vec::new(),
        }
    }

    pub fn ports(&self, direction: Direction) -> &[Port] {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }

    pub fn ports_mut(&mut self, direction: Direction) -> &mut Vec<Port> {
        match direction {
            Direction::Input => &mut self.inputs,
            Direction::Output => &mut self.outputs,
        }
    }

    /// All ports, inputs first.
    pub fn all_ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    pub fn push_port(&mut self, port: Port) -> PortRef {
        let direction = port.direction;
        let ports = self.ports_mut(direction);
        ports.push(port);
        PortRef {
            direction,
            index: ports.len() - 1,
        }
    }

    pub fn port(&self, port_ref: PortRef) -> &Port {
        &self.ports(port_ref.direction)[port_ref.index]
    }

    pub fn port_mut(&mut self, port_ref: PortRef) -> &mut Port {
        &mut self.ports_mut(port_ref.direction)[port_ref.index]
    }

    fn find_port_by(&self, pred: impl Fn(&Port) -> bool) -> Option<PortRef> {
        Direction::ALL.iter().find_map(|&direction| {
            self.ports(direction)
                .iter()
                .position(&pred)
                .map(|index| PortRef { direction, index })
        })
    }

    /// Exact (case-sensitive) port lookup; inputs are searched first.
    pub fn find_port(&self, name: &str) -> Option<PortRef> {
        self.find_port_by(|p| p.name == name)
    }

    /// ASCII case-insensitive port lookup; inputs are searched first.
    pub fn find_port_ignore_case(&self, name: &str) -> Option<PortRef> {
        self.find_port_by(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn net(&self, index: NetIndex) -> &Net {
        &self.net_arena[index.0]
    }

    /// Number of nets in the arena, listed or not.
    pub fn arena_len(&self) -> usize {
        self.net_arena.len()
    }

    /// Adds a net to the arena without listing it in the module.
    pub fn alloc_net(&mut self, net: Net) -> NetIndex {
        self.net_arena.push(net);
        NetIndex(self.net_arena.len() - 1)
    }

    /// Adds a net to the arena and appends it to the listed collection.
    pub fn push_listed_net(&mut self, net: Net) -> NetIndex {
        debug_assert!(matches!(net.kind, NetKind::Wire | NetKind::PortDerived));
        let index = self.alloc_net(net);
        self.listed.push(index);
        index
    }

    pub fn listed_net_indices(&self) -> &[NetIndex] {
        &self.listed
    }

    /// The module's net collection, in creation order.
    pub fn nets(&self) -> impl Iterator<Item = &Net> {
        self.listed.iter().map(move |i| &self.net_arena[i.0])
    }

    /// First listed net with the given name and kind.
    pub fn find_listed_net(&self, name: &str, kind: NetKind) -> Option<NetIndex> {
        self.listed.iter().copied().find(|i| {
            let net = &self.net_arena[i.0];
            net.kind == kind && net.name == name
        })
    }

    pub fn find_instance(&self, name: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.name == name)
    }

    pub fn push_instance(&mut self, instance: Instance) -> InstIndex {
        self.instances.push(instance);
        InstIndex(self.instances.len() - 1)
    }

    pub fn pin_net(&self, pin: &Pin) -> Option<&Net> {
        pin.net.map(|i| self.net(i))
    }

    /// Name of the net a pin is connected to, if any.
    pub fn pin_net_name(&self, pin: &Pin) -> Option<&str> {
        self.pin_net(pin).map(|n| n.name.as_str())
    }

    pub fn derived_nets<'a>(&'a self, port: &'a Port) -> impl Iterator<Item = &'a Net> + 'a {
        port.derived.iter().map(move |i| &self.net_arena[i.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_port_prefers_inputs() {
        let mut m = Module::new("m");
        m.push_port(Port::new("q", Direction::Output, None));
        m.push_port(Port::new("q", Direction::Input, None));
        let found = m.find_port("q").unwrap();
        assert_eq!(found.direction, Direction::Input);
    }

    #[test]
    fn test_find_port_ignore_case() {
        let mut m = Module::new("m");
        m.push_port(Port::new("DataIn", Direction::Input, Some((7, 0))));
        assert!(m.find_port("datain").is_none());
        let found = m.find_port_ignore_case("datain").unwrap();
        assert_eq!(m.port(found).name, "DataIn");
    }

    #[test]
    fn test_alloc_net_is_not_listed() {
        let mut m = Module::new("m");
        let w = m.push_listed_net(Net::new("w", NetKind::Wire, None));
        let c = m.alloc_net(Net::new("1'b0", NetKind::Constant, None));
        assert_eq!(m.arena_len(), 2);
        assert_eq!(m.listed_net_indices(), &[w]);
        assert_eq!(m.net(c).kind, NetKind::Constant);
        assert_eq!(m.nets().count(), 1);
    }

    #[test]
    fn test_find_listed_net_matches_kind() {
        let mut m = Module::new("m");
        m.push_listed_net(Net::new("a", NetKind::PortDerived, Some((1, 0))));
        assert!(m.find_listed_net("a", NetKind::Wire).is_none());
        let w = m.push_listed_net(Net::new("a", NetKind::Wire, None));
        assert_eq!(m.find_listed_net("a", NetKind::Wire), Some(w));
    }

    #[test]
    fn test_derived_nets_follow_port_links() {
        let mut m = Module::new("m");
        let p = m.push_port(Port::new("a", Direction::Input, Some((3, 0))));
        m.push_listed_net(Net::new("w", NetKind::Wire, None));
        let bit = m.alloc_net(Net::new("a[1]", NetKind::WireSingle, Some((1, 0))));
        m.port_mut(p).derived.push(bit);
        let names: Vec<&str> = m.derived_nets(m.port(p)).map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a[1]"]);

        // The port may come from outside the module.
        let detached = m.port(p).clone();
        let count = m.derived_nets(&detached).count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(NetKind::WireSingle.to_string(), "wire-single");
        assert_eq!(NetKind::PortDerived.as_str(), "port-derived");
        assert_eq!(CellType::LeafLevel.to_string(), "leaf-level");
        assert_eq!(Direction::Output.to_string(), "output");
    }
}
