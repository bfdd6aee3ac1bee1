// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for reading and parsing netlists from disk.
//!
//! Handles plain and `.gz` inputs and runs both passes (template extraction,
//! then the core parser) over the text.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::netlist::error::NetlistError;
use crate::netlist::parse::{parse_netlist, ParsedNetlist};
use crate::netlist::template::{extract_templates, ModuleTemplate};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> NetlistError + '_ {
    move |source| NetlistError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads the whole netlist at `path`, decompressing it when the extension is
/// `gz`.
pub fn read_netlist_text(path: &Path) -> Result<String, NetlistError> {
    let file = File::open(path).map_err(io_error(path))?;
    let is_gz = path.extension().map(|e| e == "gz").unwrap_or(false);
    let mut reader: Box<dyn Read> = if is_gz {
        Box::new(MultiGzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(io_error(path))?;
    log::debug!(
        "read_netlist_text: {} byte(s) from {}",
        text.len(),
        path.display()
    );
    Ok(text)
}

/// Runs both passes over `src`, also returning the templates so callers can
/// validate against them.
pub fn parse_with_templates(
    src: &str,
) -> Result<(Vec<ModuleTemplate>, ParsedNetlist), NetlistError> {
    let templates = extract_templates(src)?;
    let parsed = parse_netlist(src, &templates)?;
    Ok((templates, parsed))
}

pub fn parse_netlist_str(src: &str) -> Result<ParsedNetlist, NetlistError> {
    parse_with_templates(src).map(|(_, parsed)| parsed)
}

/// Reads (optionally gzipped) netlist text from `path` and parses it.
pub fn parse_netlist_from_path(path: &Path) -> Result<ParsedNetlist, NetlistError> {
    let text = read_netlist_text(path)?;
    parse_netlist_str(&text)
}
