// SPDX-License-Identifier: Apache-2.0

//! Recognizers for declaration clauses shared by the template pass and the
//! core parser, so both passes agree on what a port looks like.

use crate::netlist::model::{Direction, Width};
use crate::netlist::scan::{Keyword, Token, TokenCursor, TokenPayload};

/// `input [m:n] a, b` / `output c` / `inout d`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortClause {
    /// `None` for `inout`, which the model does not represent.
    pub direction: Option<Direction>,
    pub width: Option<Width>,
    pub names: Vec<String>,
}

/// One identifier of a `wire` clause together with its effective width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireDecl {
    pub name: String,
    pub width: Option<Width>,
}

/// Parses a `[msb:lsb]` range if one starts at the cursor.
///
/// Returns `None` (consuming nothing) when the next tokens are not a
/// complete range.
pub fn pop_width(cursor: &mut TokenCursor) -> Option<Width> {
    let number = |tok: Option<&Token>| match tok {
        Some(Token {
            payload: TokenPayload::Number(s),
            ..
        }) => s.parse::<u32>().ok(),
        _ => None,
    };
    if !cursor.peek_is(&TokenPayload::OBrack) {
        return None;
    }
    let msb = number(cursor.peek_nth(1))?;
    if !matches!(cursor.peek_nth(2), Some(t) if t.payload == TokenPayload::Colon) {
        return None;
    }
    let lsb = number(cursor.peek_nth(3))?;
    if !matches!(cursor.peek_nth(4), Some(t) if t.payload == TokenPayload::CBrack) {
        return None;
    }
    for _ in 0..5 {
        cursor.popt();
    }
    Some((msb, lsb))
}

fn is_clause_keyword(tok: Option<&Token>) -> bool {
    matches!(
        tok,
        Some(Token {
            payload: TokenPayload::Keyword(Keyword::Input | Keyword::Output | Keyword::Inout),
            ..
        })
    )
}

/// Parses a port clause starting at an `input`/`output`/`inout` keyword.
///
/// The identifier list ends at `;` (consumed), at `)` or end of line (not
/// consumed), or at a comma followed by another direction keyword, which is
/// how ANSI headers chain clauses: `module m (input a, b, output y);`.
///
/// Returns `None` if the keyword is not followed by at least one identifier.
pub fn pop_port_clause(cursor: &mut TokenCursor) -> Option<PortClause> {
    let direction = match cursor.popt().map(|t| &t.payload) {
        Some(TokenPayload::Keyword(Keyword::Input)) => Some(Direction::Input),
        Some(TokenPayload::Keyword(Keyword::Output)) => Some(Direction::Output),
        Some(TokenPayload::Keyword(Keyword::Inout)) => None,
        _ => return None,
    };
    let width = pop_width(cursor);
    let mut names = Vec::new();
    while let Some(name) = cursor.pop_identifier() {
        names.push(name.to_string());
        match cursor.peekt().map(|t| &t.payload) {
            Some(TokenPayload::Comma) => {
                cursor.popt();
                if is_clause_keyword(cursor.peekt()) {
                    break;
                }
            }
            Some(TokenPayload::Semi) => {
                cursor.popt();
                break;
            }
            _ => break,
        }
    }
    if names.is_empty() {
        return None;
    }
    Some(PortClause {
        direction,
        width,
        names,
    })
}

/// Parses `wire [m:n] a, [k:l] b, c;` starting at the `wire` keyword.
///
/// The clause-level range is the default for every identifier; a range
/// directly in front of an identifier overrides it for that identifier.
/// The clause ends at `;` or end of line. Returns `None` for anything else
/// (e.g. `wire a = b;`), leaving the caller to skip the statement.
pub fn pop_wire_clause(cursor: &mut TokenCursor) -> Option<Vec<WireDecl>> {
    match cursor.popt().map(|t| &t.payload) {
        Some(TokenPayload::Keyword(Keyword::Wire)) => {}
        _ => return None,
    }
    let default_width = pop_width(cursor);
    let mut decls = Vec::new();
    loop {
        let width = pop_width(cursor).or(default_width);
        let name = cursor.pop_identifier()?;
        decls.push(WireDecl {
            name: name.to_string(),
            width,
        });
        match cursor.peekt().map(|t| &t.payload) {
            Some(TokenPayload::Comma) => {
                cursor.popt();
            }
            Some(TokenPayload::Semi) => {
                cursor.popt();
                return Some(decls);
            }
            None => return Some(decls),
            Some(_) => return None,
        }
    }
}
