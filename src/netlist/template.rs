// SPDX-License-Identifier: Apache-2.0

//! First pass: collect the name and port signature of every module.
//!
//! Templates decide whether an instance is hierarchical (its reference name
//! is a module defined in the same source) or a leaf cell, and let the
//! validator check pin names against the referenced module's ports.

use crate::netlist::decl::pop_port_clause;
use crate::netlist::error::NetlistError;
use crate::netlist::model::{Direction, Width};
use crate::netlist::scan::{Keyword, LineScanner, TokenCursor, TokenPayload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePort {
    pub name: String,
    pub width: Option<Width>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTemplate {
    pub name: String,
    pub inputs: Vec<TemplatePort>,
    pub outputs: Vec<TemplatePort>,
}

impl ModuleTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        ModuleTemplate {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn ports(&self, direction: Direction) -> &[TemplatePort] {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }

    fn ports_mut(&mut self, direction: Direction) -> &mut Vec<TemplatePort> {
        match direction {
            Direction::Input => &mut self.inputs,
            Direction::Output => &mut self.outputs,
        }
    }

    /// Direction of the port called `name` (exact match), inputs first.
    pub fn port_direction(&self, name: &str) -> Option<Direction> {
        Direction::ALL
            .iter()
            .copied()
            .find(|&d| self.ports(d).iter().any(|p| p.name == name))
    }

    pub fn has_port(&self, name: &str) -> bool {
        self.port_direction(name).is_some()
    }
}

/// Template whose name matches `ref_name` ignoring ASCII case.
pub fn find_template<'a>(
    templates: &'a [ModuleTemplate],
    ref_name: &str,
) -> Option<&'a ModuleTemplate> {
    templates
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(ref_name))
}

/// Scans `src` and returns one template per module, in source order.
///
/// Fails with [`NetlistError::StructuralMismatch`] when `module` and
/// `endmodule` counts differ; no templates are returned in that case.
pub fn extract_templates(src: &str) -> Result<Vec<ModuleTemplate>, NetlistError> {
    log::info!("extract_templates: start");
    let mut scanner = LineScanner::new();
    let mut templates = Vec::new();
    let mut current: Option<ModuleTemplate> = None;
    let mut module_count = 0usize;
    let mut endmodule_count = 0usize;

    for (i, line) in src.lines().enumerate() {
        let lineno = (i + 1) as u32;
        let tokens = scanner.scan_line(lineno, line);
        let mut cursor = TokenCursor::new(&tokens);
        while let Some(tok) = cursor.peekt() {
            match &tok.payload {
                TokenPayload::Keyword(Keyword::Module) => {
                    cursor.popt();
                    module_count += 1;
                    let Some(name) = cursor.pop_identifier() else {
                        return Err(NetlistError::MalformedModuleHeader {
                            pos: cursor.pos_or_end(lineno),
                            line: line.to_string(),
                        });
                    };
                    log::debug!("extract_templates: module `{}` on line {}", name, lineno);
                    if let Some(prev) = current.replace(ModuleTemplate::new(name)) {
                        log::warn!(
                            "module `{}` is not closed before module `{}` on line {}",
                            prev.name,
                            name,
                            lineno
                        );
                        templates.push(prev);
                    }
                    if cursor.peek_is(&TokenPayload::OParen) {
                        cursor.popt();
                    }
                }
                TokenPayload::Keyword(Keyword::Endmodule) => {
                    cursor.popt();
                    endmodule_count += 1;
                    if let Some(done) = current.take() {
                        templates.push(done);
                    }
                }
                TokenPayload::Keyword(Keyword::Input | Keyword::Output | Keyword::Inout)
                    if current.is_some() =>
                {
                    match (pop_port_clause(&mut cursor), current.as_mut()) {
                        (Some(clause), Some(template)) => match clause.direction {
                            Some(direction) => {
                                for name in clause.names {
                                    template.ports_mut(direction).push(TemplatePort {
                                        name,
                                        width: clause.width,
                                    });
                                }
                            }
                            None => log::debug!(
                                "extract_templates: ignoring inout {:?} on line {}",
                                clause.names,
                                lineno
                            ),
                        },
                        _ => cursor.skip_statement(),
                    }
                }
                _ => cursor.skip_statement(),
            }
        }
    }

    if module_count != endmodule_count {
        log::error!(
            "extract_templates: {} `module` vs {} `endmodule`",
            module_count,
            endmodule_count
        );
        return Err(NetlistError::StructuralMismatch {
            modules: module_count,
            endmodules: endmodule_count,
        });
    }
    if let Some(open) = current {
        log::warn!("module `{}` is never closed", open.name);
        templates.push(open);
    }
    log::info!("extract_templates: {} template(s)", templates.len());
    Ok(templates)
}
