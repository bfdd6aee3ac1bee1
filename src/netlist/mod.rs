// SPDX-License-Identifier: Apache-2.0

pub mod decl;
pub mod emit;
pub mod error;
pub mod graph;
pub mod io;
pub mod json;
pub mod model;
pub mod parse;
pub mod resolve;
pub mod scan;
pub mod stats;
pub mod template;
pub mod validate;
