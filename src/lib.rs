// SPDX-License-Identifier: Apache-2.0

//! `netgraph` reads structural (gate-level) netlists into a hierarchical
//! graph of modules, ports, nets, instances and pins.
//!
//! The pipeline is:
//!
//! 1. [`netlist::template::extract_templates`] collects module signatures.
//! 2. [`netlist::parse::parse_netlist`] builds the full graph, resolving every
//!    pin connection to a net via [`netlist::resolve`].
//! 3. The graph can be written back out as source text
//!    ([`netlist::emit::emit_modules`]) or as JSON ([`netlist::json`]).

pub mod netlist;

pub use netlist::error::{Diagnostic, NetlistError};
pub use netlist::io::{parse_netlist_from_path, parse_netlist_str};
pub use netlist::model::{
    CellType, Direction, InstIndex, Instance, Module, Net, NetIndex, NetKind, Pin, Port, Width,
};
pub use netlist::parse::ParsedNetlist;
pub use netlist::template::ModuleTemplate;
