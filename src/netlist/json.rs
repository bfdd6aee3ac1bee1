// SPDX-License-Identifier: Apache-2.0

//! JSON persistence for parsed modules.
//!
//! Saving is a direct projection of the graph. Loading rebuilds it from the
//! recorded names alone, which is lossy in the following ways:
//!
//! - every listed net comes back as `wire`, whatever it was saved as;
//! - a pin net containing `'` becomes a fresh `constant`, one containing `[`
//!   a fresh `wire-sub`; anything else is looked up among the listed nets by
//!   name (the last one of a given name wins);
//! - port derived lists are not saved and are empty after loading.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::netlist::error::{Diagnostic, NetlistError};
use crate::netlist::model::{
    CellType, Direction, InstIndex, Instance, Module, Net, NetKind, Pin, Port, Width,
};
use crate::netlist::parse::ParsedNetlist;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    pub name: String,
    pub direction: Direction,
    pub width: Option<[u32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PortsRecord {
    pub input: Vec<PortRecord>,
    pub output: Vec<PortRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinRecord {
    pub name: String,
    pub direction: Option<Direction>,
    /// Name of the owning instance.
    pub instance: Option<String>,
    /// Name of the connected net, `null` when unconnected.
    pub net: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceRecord {
    pub instance: String,
    pub cell_type: CellType,
    pub ref_name: String,
    pub pins: Vec<PinRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetRecord {
    pub name: String,
    pub net_type: NetKind,
    pub width: Option<[u32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub module_name: String,
    pub ports: PortsRecord,
    pub instances: Vec<InstanceRecord>,
    pub nets: Vec<NetRecord>,
}

fn width_to_record(width: Option<Width>) -> Option<[u32; 2]> {
    width.map(|(msb, lsb)| [msb, lsb])
}

fn width_from_record(width: Option<[u32; 2]>) -> Option<Width> {
    width.map(|[msb, lsb]| (msb, lsb))
}

pub fn module_to_record(module: &Module) -> ModuleRecord {
    let port_records = |direction: Direction| -> Vec<PortRecord> {
        module
            .ports(direction)
            .iter()
            .map(|p| PortRecord {
                name: p.name.clone(),
                direction: p.direction,
                width: width_to_record(p.width),
            })
            .collect()
    };
    let instances = module
        .instances
        .iter()
        .map(|inst| InstanceRecord {
            instance: inst.name.clone(),
            cell_type: inst.cell_type,
            ref_name: inst.ref_name.clone(),
            pins: inst
                .pins
                .iter()
                .map(|pin| PinRecord {
                    name: pin.name.clone(),
                    direction: pin.direction,
                    instance: module
                        .instances
                        .get(pin.instance.0)
                        .map(|owner| owner.name.clone()),
                    net: module.pin_net_name(pin).map(str::to_string),
                })
                .collect(),
        })
        .collect();
    let nets = module
        .nets()
        .map(|n| NetRecord {
            name: n.name.clone(),
            net_type: n.kind,
            width: width_to_record(n.width),
        })
        .collect();
    ModuleRecord {
        module_name: module.name.clone(),
        ports: PortsRecord {
            input: port_records(Direction::Input),
            output: port_records(Direction::Output),
        },
        instances,
        nets,
    }
}

pub fn to_records(modules: &[Module]) -> Vec<ModuleRecord> {
    modules.iter().map(module_to_record).collect()
}

pub fn to_json_string(modules: &[Module]) -> Result<String, NetlistError> {
    Ok(serde_json::to_string_pretty(&to_records(modules))?)
}

/// Rebuilds one module, appending any unresolved pin references to
/// `diagnostics`.
pub fn module_from_record(record: &ModuleRecord, diagnostics: &mut Vec<Diagnostic>) -> Module {
    let mut module = Module::new(record.module_name.clone());
    for (direction, ports) in [
        (Direction::Input, &record.ports.input),
        (Direction::Output, &record.ports.output),
    ] {
        for p in ports {
            module.push_port(Port::new(
                p.name.clone(),
                direction,
                width_from_record(p.width),
            ));
        }
    }

    let mut by_name = HashMap::new();
    for n in &record.nets {
        let index = module.push_listed_net(Net::new(
            n.name.clone(),
            NetKind::Wire,
            width_from_record(n.width),
        ));
        by_name.insert(n.name.clone(), index);
    }

    for inst_record in &record.instances {
        let inst_index = InstIndex(module.instances.len());
        let mut instance = Instance::new(
            inst_record.instance.clone(),
            inst_record.ref_name.clone(),
            inst_record.cell_type,
        );
        for pin_record in &inst_record.pins {
            let net = match pin_record.net.as_deref() {
                None => None,
                Some(text) if text.contains('\'') => {
                    Some(module.alloc_net(Net::new(text, NetKind::Constant, None)))
                }
                Some(text) if text.contains('[') => {
                    Some(module.alloc_net(Net::new(text, NetKind::WireSub, None)))
                }
                Some(text) => {
                    let found = by_name.get(text).copied();
                    if found.is_none() {
                        let diagnostic = Diagnostic::UnresolvedReference {
                            module: record.module_name.clone(),
                            instance: inst_record.instance.clone(),
                            pin: pin_record.name.clone(),
                            expr: text.to_string(),
                            lineno: None,
                        };
                        log::warn!("{}", diagnostic);
                        diagnostics.push(diagnostic);
                    }
                    found
                }
            };
            instance.pins.push(Pin {
                name: pin_record.name.clone(),
                direction: pin_record.direction,
                instance: inst_index,
                net,
            });
        }
        module.push_instance(instance);
    }
    module
}

pub fn from_records(records: &[ModuleRecord]) -> ParsedNetlist {
    let mut diagnostics = Vec::new();
    let modules = records
        .iter()
        .map(|r| module_from_record(r, &mut diagnostics))
        .collect();
    ParsedNetlist {
        modules,
        diagnostics,
    }
}

pub fn from_json_str(text: &str) -> Result<ParsedNetlist, NetlistError> {
    let records: Vec<ModuleRecord> = serde_json::from_str(text)?;
    log::info!("from_json_str: {} module record(s)", records.len());
    Ok(from_records(&records))
}

pub fn write_json_file(path: &Path, modules: &[Module]) -> Result<(), NetlistError> {
    let text = to_json_string(modules)?;
    std::fs::write(path, text).map_err(|source| NetlistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("wrote {} module(s) to {}", modules.len(), path.display());
    Ok(())
}

pub fn load_json_file(path: &Path) -> Result<ParsedNetlist, NetlistError> {
    let text = std::fs::read_to_string(path).map_err(|source| NetlistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_json_str(&text)
}
