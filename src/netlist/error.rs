// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! [`NetlistError`] values are fatal: they abort the operation that produced
//! them and no partial result is returned. [`Diagnostic`] values are
//! recoverable findings collected alongside a successful result.

use crate::netlist::scan::Pos;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetlistError {
    /// The input (or output) path could not be read or written.
    #[error("I/O error on `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The number of `module` openings differs from the number of
    /// `endmodule` closings.
    #[error("mismatch in the number of `module` ({modules}) and `endmodule` ({endmodules}) declarations")]
    StructuralMismatch { modules: usize, endmodules: usize },
    /// `module` keyword not followed by a module name.
    #[error("expected module name after `module` @ {pos}")]
    MalformedModuleHeader { pos: Pos, line: String },
    /// An instance connection list that cannot be tokenized into named pin
    /// connections.
    #[error("malformed instance line @ {pos}: {message}")]
    MalformedInstanceLine {
        pos: Pos,
        line: String,
        message: String,
    },
    #[error("duplicate module name `{name}` on line {lineno}")]
    DuplicateModule { name: String, lineno: u32 },
    #[error("duplicate instance name `{instance}` in module `{module}` on line {lineno}")]
    DuplicateInstance {
        module: String,
        instance: String,
        lineno: u32,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NetlistError {
    /// Source position, for the kinds that have one.
    pub fn pos(&self) -> Option<Pos> {
        match self {
            NetlistError::MalformedModuleHeader { pos, .. }
            | NetlistError::MalformedInstanceLine { pos, .. } => Some(*pos),
            _ => None,
        }
    }

    /// Renders the error followed by the offending source line and a caret
    /// under the offending column, when a position is known.
    pub fn render_with_context(&self) -> String {
        let line = match self {
            NetlistError::MalformedModuleHeader { line, .. }
            | NetlistError::MalformedInstanceLine { line, .. } => line,
            _ => return self.to_string(),
        };
        let col = self
            .pos()
            .map(|p| (p.colno as usize).saturating_sub(1))
            .unwrap_or(0);
        format!("{}\n{}\n{}^", self, line, " ".repeat(col))
    }
}

/// Recoverable findings recorded while building or loading a netlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A pin's connection expression did not map to any net; the pin is kept
    /// with no net.
    UnresolvedReference {
        module: String,
        instance: String,
        pin: String,
        expr: String,
        lineno: Option<u32>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedReference {
                module,
                instance,
                pin,
                expr,
                lineno,
            } => {
                write!(
                    f,
                    "no net found for `{}` on pin {}.{} in module `{}`",
                    expr, instance, pin, module
                )?;
                if let Some(lineno) = lineno {
                    write!(f, " (line {})", lineno)?;
                }
                Ok(())
            }
        }
    }
}
