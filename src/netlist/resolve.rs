// SPDX-License-Identifier: Apache-2.0

//! Net resolution for pin connection expressions.
//!
//! Given the text inside `.pin( ... )` and the symbol tables accumulated so
//! far for the enclosing module, decide which net the pin refers to. The
//! decision is made by [`decide`], which only reads the module, and carried
//! out by [`apply`], which allocates nets and links ports.
//!
//! Tie-break order:
//!
//! 1. `base[n]` where `base` is a listed `wire`: a fresh `wire-single` alias
//!    named by the full text, width `(1, 0)`; a port whose name matches
//!    `base` ignoring case records it as derived. Otherwise go to 4.
//! 2. Text containing `'`: a fresh `constant`.
//! 3. Plain text: an exact port-name match yields a fresh, listed
//!    `port-derived` net recorded on the port; otherwise the listed `wire`
//!    of that name is shared.
//! 4. Strip a trailing `[n]` and retry the exact port-name match of 3.
//!    Failing that, the pin stays unconnected.

use crate::netlist::model::{Module, Net, NetIndex, NetKind, PortRef};

/// Outcome of resolving one connection expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Reuse of an already declared wire.
    Shared(NetIndex),
    WireSingle {
        name: String,
        port: Option<PortRef>,
    },
    Constant {
        text: String,
    },
    PortDerived {
        name: String,
        port: PortRef,
    },
    Unresolved,
}

/// Splits `base[n]` into `("base", n)`. `base` must be a simple identifier
/// and `n` a decimal index.
pub fn split_bit_index(expr: &str) -> Option<(&str, u32)> {
    let inner = expr.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let base = &inner[..open];
    let index = &inner[open + 1..];
    let mut chars = base.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !first_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$') {
        return None;
    }
    if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((base, index.parse().ok()?))
}

/// Decides what `expr` refers to in `module` without modifying it.
pub fn decide(module: &Module, expr: &str) -> Resolution {
    let expr = expr.trim();
    if expr.ends_with(']') {
        if let Some((base, _)) = split_bit_index(expr) {
            if module.find_listed_net(base, NetKind::Wire).is_some() {
                return Resolution::WireSingle {
                    name: expr.to_string(),
                    port: module.find_port_ignore_case(base),
                };
            }
        }
    } else if expr.contains('\'') {
        return Resolution::Constant {
            text: expr.to_string(),
        };
    } else if let Some(port) = module.find_port(expr) {
        return Resolution::PortDerived {
            name: expr.to_string(),
            port,
        };
    } else if let Some(index) = module.find_listed_net(expr, NetKind::Wire) {
        return Resolution::Shared(index);
    }

    // Fallback: a bit of a port that has no wire declaration of its own.
    let base = split_bit_index(expr).map(|(b, _)| b).unwrap_or(expr);
    match module.find_port(base) {
        Some(port) => Resolution::PortDerived {
            name: expr.to_string(),
            port,
        },
        None => Resolution::Unresolved,
    }
}

/// Carries out `resolution` on `module`, returning the pin's net.
pub fn apply(module: &mut Module, resolution: Resolution) -> Option<NetIndex> {
    match resolution {
        Resolution::Shared(index) => Some(index),
        Resolution::WireSingle { name, port } => {
            let index = module.alloc_net(Net::new(name, NetKind::WireSingle, Some((1, 0))));
            if let Some(port) = port {
                module.port_mut(port).derived.push(index);
            }
            Some(index)
        }
        Resolution::Constant { text } => {
            Some(module.alloc_net(Net::new(text, NetKind::Constant, None)))
        }
        Resolution::PortDerived { name, port } => {
            let index = module.push_listed_net(Net::new(name, NetKind::PortDerived, Some((1, 0))));
            module.port_mut(port).derived.push(index);
            Some(index)
        }
        Resolution::Unresolved => None,
    }
}

/// [`decide`] followed by [`apply`].
pub fn resolve(module: &mut Module, expr: &str) -> Option<NetIndex> {
    let resolution = decide(module, expr);
    log::trace!("resolve: `{}` -> {:?}", expr, resolution);
    apply(module, resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::netlist::model::{Direction, Port};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn module_with(wires: &[&str], inputs: &[&str], outputs: &[&str]) -> Module {
        let mut m = Module::new("m");
        for w in wires {
            m.push_listed_net(Net::new(*w, NetKind::Wire, Some((3, 0))));
        }
        for i in inputs {
            m.push_port(Port::new(*i, Direction::Input, None));
        }
        for o in outputs {
            m.push_port(Port::new(*o, Direction::Output, None));
        }
        m
    }

    #[test_case("a[2]", Some(("a", 2)); "simple")]
    #[test_case("bus_0[15]", Some(("bus_0", 15)); "underscore and digits")]
    #[test_case("a[3:0]", None; "part select")]
    #[test_case("a[i]", None; "symbolic index")]
    #[test_case("[2]", None; "missing base")]
    #[test_case("a", None; "no index")]
    fn test_split_bit_index(expr: &str, want: Option<(&str, u32)>) {
        assert_eq!(split_bit_index(expr), want);
    }

    #[test]
    fn test_decide_shared_wire() {
        let m = module_with(&["n1"], &[], &[]);
        let idx = m.find_listed_net("n1", NetKind::Wire).unwrap();
        assert_eq!(decide(&m, "n1"), Resolution::Shared(idx));
    }

    #[test]
    fn test_decide_port_beats_wire_with_same_name() {
        let m = module_with(&["a"], &["a"], &[]);
        assert!(matches!(
            decide(&m, "a"),
            Resolution::PortDerived { ref name, .. } if name == "a"
        ));
    }

    #[test]
    fn test_decide_wire_single_links_port_ignoring_case() {
        let m = module_with(&["data"], &[], &["DATA"]);
        match decide(&m, "data[1]") {
            Resolution::WireSingle {
                name,
                port: Some(port),
            } => {
                assert_eq!(name, "data[1]");
                assert_eq!(port.direction, Direction::Output);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_decide_wire_single_without_port() {
        let m = module_with(&["n"], &[], &[]);
        assert_eq!(
            decide(&m, "n[0]"),
            Resolution::WireSingle {
                name: "n[0]".to_string(),
                port: None,
            }
        );
    }

    #[test]
    fn test_decide_indexed_port_without_wire_falls_back() {
        let m = module_with(&[], &["q"], &[]);
        assert!(matches!(
            decide(&m, "q[3]"),
            Resolution::PortDerived { ref name, .. } if name == "q[3]"
        ));
    }

    #[test]
    fn test_decide_fallback_port_match_is_case_sensitive() {
        let m = module_with(&[], &["Q"], &[]);
        assert_eq!(decide(&m, "q[3]"), Resolution::Unresolved);
        assert_eq!(decide(&m, "q"), Resolution::Unresolved);
    }

    #[test]
    fn test_decide_constant() {
        let m = module_with(&[], &[], &[]);
        assert_eq!(
            decide(&m, "4'b0101"),
            Resolution::Constant {
                text: "4'b0101".to_string()
            }
        );
    }

    #[test]
    fn test_apply_port_derived_lists_and_links() {
        let mut m = module_with(&[], &["q"], &[]);
        let a = resolve(&mut m, "q").unwrap();
        let b = resolve(&mut m, "q").unwrap();
        assert_ne!(a, b);
        assert_eq!(m.listed_net_indices(), &[a, b]);
        let port = m.find_port("q").unwrap();
        assert_eq!(m.port(port).derived, vec![a, b]);
        assert_eq!(m.net(a).kind, NetKind::PortDerived);
        assert_eq!(m.net(a).width, Some((1, 0)));
    }

    #[test]
    fn test_apply_wire_single_is_not_listed() {
        let mut m = module_with(&["a"], &[], &[]);
        let idx = resolve(&mut m, "a[2]").unwrap();
        assert_eq!(m.listed_net_indices().len(), 1);
        assert_eq!(m.net(idx).name, "a[2]");
        assert_eq!(m.net(idx).kind, NetKind::WireSingle);
    }

    #[test]
    fn test_apply_unresolved() {
        let mut m = module_with(&[], &[], &[]);
        assert_eq!(resolve(&mut m, "ghost"), None);
        assert_eq!(m.arena_len(), 0);
    }
}
