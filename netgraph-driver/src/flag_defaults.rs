// SPDX-License-Identifier: Apache-2.0

//! Default output locations used when neither a flag nor the config file
//! names one.

/// Where `gv2json` writes the regenerated structural source.
pub const VERILOG_OUTPUT: &str = "output_netlist_file.v";

/// Where `gv2json` writes the JSON module records.
pub const JSON_OUTPUT: &str = "parsed_objects.json";
