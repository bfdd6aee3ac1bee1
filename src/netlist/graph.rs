// SPDX-License-Identifier: Apache-2.0

//! Node/edge view of parsed modules, for external graph tooling.
//!
//! Node ids are dotted paths: `<module>.<port>`, `<module>.<instance>` and
//! `<module>.<instance>.<pin>`. Edges run from an instance to each of its
//! pins and from each connected pin to `<module>.<net>`. Nets themselves are
//! not emitted as nodes.

use serde::{Deserialize, Serialize};

use crate::netlist::error::NetlistError;
use crate::netlist::model::{Direction, Module};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Port,
    Instance,
    Pin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn to_json_string(&self) -> Result<String, NetlistError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn build_graph(modules: &[Module]) -> Graph {
    let mut graph = Graph::default();
    for module in modules {
        for port in module.all_ports() {
            graph.nodes.push(GraphNode {
                id: format!("{}.{}", module.name, port.name),
                kind: NodeKind::Port,
                direction: Some(port.direction),
            });
        }
        for instance in &module.instances {
            let instance_id = format!("{}.{}", module.name, instance.name);
            graph.nodes.push(GraphNode {
                id: instance_id.clone(),
                kind: NodeKind::Instance,
                direction: None,
            });
            for pin in &instance.pins {
                let pin_id = format!("{}.{}", instance_id, pin.name);
                graph.nodes.push(GraphNode {
                    id: pin_id.clone(),
                    kind: NodeKind::Pin,
                    direction: None,
                });
                graph.edges.push(GraphEdge {
                    from: instance_id.clone(),
                    to: pin_id.clone(),
                });
                if let Some(net_name) = module.pin_net_name(pin) {
                    graph.edges.push(GraphEdge {
                        from: pin_id,
                        to: format!("{}.{}", module.name, net_name),
                    });
                }
            }
        }
    }
    log::debug!(
        "build_graph: {} node(s), {} edge(s)",
        graph.nodes.len(),
        graph.edges.len()
    );
    graph
}
