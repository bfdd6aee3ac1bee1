// SPDX-License-Identifier: Apache-2.0

//! Second pass: build the module graph.
//!
//! The parser is an explicit state machine ([`ParseContext`]) fed one
//! physical line at a time. Within a line, tokens are consumed statement by
//! statement; an instance's connection list may span any number of lines.

use crate::netlist::decl::{pop_port_clause, pop_wire_clause};
use crate::netlist::error::{Diagnostic, NetlistError};
use crate::netlist::model::{CellType, InstIndex, Instance, Module, Net, NetKind, Pin, Port};
use crate::netlist::resolve::{resolve, split_bit_index};
use crate::netlist::scan::{Keyword, LineScanner, Pos, Token, TokenCursor, TokenPayload};
use crate::netlist::template::{find_template, ModuleTemplate};

/// Result of a successful parse.
#[derive(Debug, Clone, Default)]
pub struct ParsedNetlist {
    pub modules: Vec<Module>,
    /// Recoverable findings, in the order they were encountered.
    pub diagnostics: Vec<Diagnostic>,
}

impl ParsedNetlist {
    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn has_unresolved(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::UnresolvedReference { .. }))
    }
}

/// `.name(expr)`, with `expr` rebuilt from its tokens (`a[2]`, `{a,b}`) or
/// `None` when the parentheses are empty.
#[derive(Debug, PartialEq, Eq)]
struct PinConnection<'t> {
    name: &'t str,
    expr: Option<String>,
}

fn is_instance_open(cursor: &TokenCursor) -> bool {
    matches!(
        (cursor.peek_nth(0), cursor.peek_nth(1), cursor.peek_nth(2)),
        (
            Some(Token {
                payload: TokenPayload::Identifier(_),
                ..
            }),
            Some(Token {
                payload: TokenPayload::Identifier(_),
                ..
            }),
            Some(Token {
                payload: TokenPayload::OParen,
                ..
            }),
        )
    )
}

fn malformed(pos: Pos, line: &str, message: String) -> NetlistError {
    log::error!("malformed instance line @ {}: {}", pos, message);
    NetlistError::MalformedInstanceLine {
        pos,
        line: line.to_string(),
        message,
    }
}

fn is_word(payload: &TokenPayload) -> bool {
    matches!(
        payload,
        TokenPayload::Identifier(_)
            | TokenPayload::Keyword(_)
            | TokenPayload::Number(_)
            | TokenPayload::Literal(_)
    )
}

/// Parses `.name(expr)` starting at the `.`.
fn pop_pin_connection<'t>(
    cursor: &mut TokenCursor<'t>,
    lineno: u32,
    line: &str,
) -> Result<PinConnection<'t>, NetlistError> {
    cursor.popt();
    let Some(name) = cursor.pop_identifier() else {
        return Err(malformed(
            cursor.pos_or_end(lineno),
            line,
            "expected pin name after `.`".to_string(),
        ));
    };
    if !cursor.peek_is(&TokenPayload::OParen) {
        return Err(malformed(
            cursor.pos_or_end(lineno),
            line,
            format!("expected `(` after pin name `{}`", name),
        ));
    }
    cursor.popt();

    let expr_pos = cursor.pos_or_end(lineno);
    let mut text = String::new();
    let mut depth = 0usize;
    let mut prev_word = false;
    loop {
        match cursor.popt() {
            Some(Token {
                payload: TokenPayload::CParen,
                ..
            }) if depth == 0 => break,
            Some(tok) => {
                match tok.payload {
                    TokenPayload::OParen => depth += 1,
                    TokenPayload::CParen => depth -= 1,
                    _ => {}
                }
                let word = is_word(&tok.payload);
                if word && prev_word {
                    text.push(' ');
                }
                prev_word = word;
                text.push_str(&tok.payload.to_string());
            }
            None => {
                return Err(malformed(
                    cursor.pos_or_end(lineno),
                    line,
                    format!("unterminated connection for pin `{}`", name),
                ))
            }
        }
    }

    // Anything else is left to net resolution; a bracket suffix must be a
    // single decimal bit index.
    if text.ends_with(']') && split_bit_index(&text).is_none() {
        return Err(malformed(
            expr_pos,
            line,
            format!(
                "unsupported connection expression `{}` for pin `{}`",
                text, name
            ),
        ));
    }
    let expr = if text.is_empty() { None } else { Some(text) };
    Ok(PinConnection { name, expr })
}

/// Parser state threaded through every line.
pub struct ParseContext<'t> {
    templates: &'t [ModuleTemplate],
    current_module: Option<Module>,
    /// True between an instance's opening `(` and its closing `)`.
    inside_instance: bool,
    /// Parenthesis nesting inside a skipped positional connection list.
    positional_depth: usize,
    modules: Vec<Module>,
    diagnostics: Vec<Diagnostic>,
    module_count: usize,
    endmodule_count: usize,
}

impl<'t> ParseContext<'t> {
    pub fn new(templates: &'t [ModuleTemplate]) -> Self {
        ParseContext {
            templates,
            current_module: None,
            inside_instance: false,
            positional_depth: 0,
            modules: Vec::new(),
            diagnostics: Vec::new(),
            module_count: 0,
            endmodule_count: 0,
        }
    }

    pub fn current_module(&self) -> Option<&Module> {
        self.current_module.as_ref()
    }

    pub fn inside_instance(&self) -> bool {
        self.inside_instance
    }

    /// Consumes the tokens of one physical line.
    pub fn feed_line(
        &mut self,
        lineno: u32,
        line: &str,
        tokens: &[Token],
    ) -> Result<(), NetlistError> {
        let mut cursor = TokenCursor::new(tokens);
        while let Some(tok) = cursor.peekt() {
            match &tok.payload {
                TokenPayload::Keyword(Keyword::Module) => {
                    self.open_module(&mut cursor, lineno, line)?
                }
                TokenPayload::Keyword(Keyword::Endmodule) => {
                    cursor.popt();
                    self.close_module(lineno);
                }
                _ if self.current_module.is_none() => {
                    log::debug!("parse: line {}: skipping `{}` outside module", lineno, tok.payload);
                    cursor.skip_statement();
                }
                _ if is_instance_open(&cursor) => self.open_instance(&mut cursor, lineno)?,
                _ if self.inside_instance => self.consume_pins(&mut cursor, lineno, line)?,
                TokenPayload::Keyword(Keyword::Input | Keyword::Output | Keyword::Inout) => {
                    self.port_clause(&mut cursor, lineno)
                }
                TokenPayload::Keyword(Keyword::Wire) => self.wire_clause(&mut cursor, lineno),
                _ => {
                    log::debug!("parse: line {}: skipping statement at `{}`", lineno, tok.payload);
                    cursor.skip_statement();
                }
            }
        }
        Ok(())
    }

    fn open_module(
        &mut self,
        cursor: &mut TokenCursor,
        lineno: u32,
        line: &str,
    ) -> Result<(), NetlistError> {
        cursor.popt();
        self.module_count += 1;
        let Some(name) = cursor.pop_identifier() else {
            let pos = cursor.pos_or_end(lineno);
            log::error!("expected module name after `module` @ {}", pos);
            return Err(NetlistError::MalformedModuleHeader {
                pos,
                line: line.to_string(),
            });
        };
        if let Some(prev) = self.current_module.take() {
            log::warn!(
                "module `{}` is not closed before module `{}` on line {}",
                prev.name,
                name,
                lineno
            );
            self.modules.push(prev);
        }
        if self.modules.iter().any(|m| m.name == name) {
            log::error!("duplicate module `{}` on line {}", name, lineno);
            return Err(NetlistError::DuplicateModule {
                name: name.to_string(),
                lineno,
            });
        }
        log::debug!("parse: module `{}` on line {}", name, lineno);
        self.current_module = Some(Module::new(name));
        self.inside_instance = false;
        if cursor.peek_is(&TokenPayload::OParen) {
            cursor.popt();
        }
        Ok(())
    }

    fn close_module(&mut self, lineno: u32) {
        self.endmodule_count += 1;
        if self.inside_instance {
            log::warn!("instance not closed before `endmodule` on line {}", lineno);
            self.inside_instance = false;
        }
        match self.current_module.take() {
            Some(module) => {
                log::debug!(
                    "parse: closed module `{}`: {} port(s), {} net(s), {} instance(s)",
                    module.name,
                    module.inputs.len() + module.outputs.len(),
                    module.nets().count(),
                    module.instances.len()
                );
                self.modules.push(module);
            }
            None => log::warn!("`endmodule` without open module on line {}", lineno),
        }
    }

    fn open_instance(&mut self, cursor: &mut TokenCursor, lineno: u32) -> Result<(), NetlistError> {
        let Some(module) = self.current_module.as_mut() else {
            return Ok(());
        };
        let ref_name = cursor.pop_identifier().unwrap_or_default();
        let name = cursor.pop_identifier().unwrap_or_default();
        cursor.popt();
        if self.inside_instance {
            log::warn!(
                "instance not closed before instance `{}` on line {}",
                name,
                lineno
            );
        }
        if module.find_instance(name).is_some() {
            log::error!(
                "duplicate instance `{}` in module `{}` on line {}",
                name,
                module.name,
                lineno
            );
            return Err(NetlistError::DuplicateInstance {
                module: module.name.clone(),
                instance: name.to_string(),
                lineno,
            });
        }
        let cell_type = match find_template(self.templates, ref_name) {
            Some(_) => CellType::Hierarchical,
            None => CellType::LeafLevel,
        };
        log::debug!(
            "parse: {} instance `{}` of `{}` on line {}",
            cell_type,
            name,
            ref_name,
            lineno
        );
        let mut instance = Instance::new(name, ref_name, cell_type);
        instance.lineno = Some(lineno);
        module.push_instance(instance);
        self.inside_instance = true;
        self.positional_depth = 0;
        Ok(())
    }

    /// Consumes connection-list tokens until the instance closes, the line
    /// ends, or a token that starts a new statement is reached.
    fn consume_pins(
        &mut self,
        cursor: &mut TokenCursor,
        lineno: u32,
        line: &str,
    ) -> Result<(), NetlistError> {
        while let Some(tok) = cursor.peekt() {
            match &tok.payload {
                TokenPayload::Dot => {
                    let conn = pop_pin_connection(cursor, lineno, line)?;
                    self.attach_pin(conn, lineno);
                }
                TokenPayload::Comma => {
                    cursor.popt();
                }
                TokenPayload::CParen if self.positional_depth > 0 => {
                    cursor.popt();
                    self.positional_depth -= 1;
                }
                TokenPayload::CParen => {
                    cursor.popt();
                    if cursor.peek_is(&TokenPayload::Semi) {
                        cursor.popt();
                    }
                    self.inside_instance = false;
                    return Ok(());
                }
                TokenPayload::Keyword(Keyword::Module | Keyword::Endmodule) => return Ok(()),
                _ if is_instance_open(cursor) => return Ok(()),
                TokenPayload::Keyword(_) => {
                    return Err(malformed(
                        tok.pos,
                        line,
                        format!("unexpected `{}` in connection list", tok.payload),
                    ))
                }
                other => {
                    // Positional connections carry no pin names; the
                    // instance keeps no pins for them.
                    log::debug!(
                        "parse: line {}: skipping positional connection `{}`",
                        lineno,
                        other
                    );
                    if *other == TokenPayload::OParen {
                        self.positional_depth += 1;
                    }
                    cursor.popt();
                }
            }
        }
        Ok(())
    }

    fn attach_pin(&mut self, conn: PinConnection, lineno: u32) {
        let Some(module) = self.current_module.as_mut() else {
            return;
        };
        let Some(inst_index) = module.instances.len().checked_sub(1).map(InstIndex) else {
            return;
        };
        let net = match &conn.expr {
            None => None,
            Some(expr) => {
                let net = resolve(module, expr);
                if net.is_none() {
                    let instance = &module.instances[inst_index.0];
                    let diagnostic = Diagnostic::UnresolvedReference {
                        module: module.name.clone(),
                        instance: instance.name.clone(),
                        pin: conn.name.to_string(),
                        expr: expr.clone(),
                        lineno: Some(lineno),
                    };
                    log::warn!("{}", diagnostic);
                    self.diagnostics.push(diagnostic);
                }
                net
            }
        };
        let instance = &mut module.instances[inst_index.0];
        let direction = match instance.cell_type {
            CellType::Hierarchical => find_template(self.templates, &instance.ref_name)
                .and_then(|t| t.port_direction(conn.name)),
            CellType::LeafLevel => None,
        };
        instance.pins.push(Pin {
            name: conn.name.to_string(),
            direction,
            instance: inst_index,
            net,
        });
    }

    fn port_clause(&mut self, cursor: &mut TokenCursor, lineno: u32) {
        let Some(module) = self.current_module.as_mut() else {
            cursor.skip_statement();
            return;
        };
        match pop_port_clause(cursor) {
            Some(clause) => match clause.direction {
                Some(direction) => {
                    for name in clause.names {
                        log::debug!(
                            "parse: {} `{}` in module `{}` on line {}",
                            direction,
                            name,
                            module.name,
                            lineno
                        );
                        module.push_port(Port::new(name, direction, clause.width));
                    }
                }
                None => log::debug!(
                    "parse: line {}: ignoring inout {:?}",
                    lineno,
                    clause.names
                ),
            },
            None => cursor.skip_statement(),
        }
    }

    fn wire_clause(&mut self, cursor: &mut TokenCursor, lineno: u32) {
        let Some(module) = self.current_module.as_mut() else {
            cursor.skip_statement();
            return;
        };
        match pop_wire_clause(cursor) {
            Some(decls) => {
                for decl in decls {
                    log::debug!(
                        "parse: wire `{}` {:?} in module `{}` on line {}",
                        decl.name,
                        decl.width,
                        module.name,
                        lineno
                    );
                    module.push_listed_net(Net::new(decl.name, NetKind::Wire, decl.width));
                }
            }
            None => {
                log::debug!("parse: line {}: skipping unsupported wire statement", lineno);
                cursor.skip_statement();
            }
        }
    }

    /// Checks the module/endmodule balance and returns the parsed modules.
    pub fn finish(mut self) -> Result<ParsedNetlist, NetlistError> {
        if self.module_count != self.endmodule_count {
            log::error!(
                "parse: {} `module` vs {} `endmodule`",
                self.module_count,
                self.endmodule_count
            );
            return Err(NetlistError::StructuralMismatch {
                modules: self.module_count,
                endmodules: self.endmodule_count,
            });
        }
        if let Some(open) = self.current_module.take() {
            log::warn!("module `{}` is never closed", open.name);
            self.modules.push(open);
        }
        Ok(ParsedNetlist {
            modules: self.modules,
            diagnostics: self.diagnostics,
        })
    }
}

/// Parses `src` into modules, classifying instances against `templates`.
pub fn parse_netlist(
    src: &str,
    templates: &[ModuleTemplate],
) -> Result<ParsedNetlist, NetlistError> {
    log::info!("parse_netlist: start ({} template(s))", templates.len());
    let mut scanner = LineScanner::new();
    let mut ctx = ParseContext::new(templates);
    for (i, line) in src.lines().enumerate() {
        let lineno = (i + 1) as u32;
        let tokens = scanner.scan_line(lineno, line);
        if tokens.is_empty() {
            continue;
        }
        ctx.feed_line(lineno, line, &tokens)?;
    }
    let parsed = ctx.finish()?;
    log::info!(
        "parse_netlist: {} module(s), {} diagnostic(s)",
        parsed.modules.len(),
        parsed.diagnostics.len()
    );
    Ok(parsed)
}
