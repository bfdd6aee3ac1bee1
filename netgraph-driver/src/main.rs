// SPDX-License-Identifier: Apache-2.0

//! Command line driver for the `netgraph` structural netlist parser.
//!
//! Commands are given like:
//!
//! ```text
//! netgraph-driver <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - gv2json: Parses a netlist and writes JSON module records plus a
//!   regenerated netlist.
//! - json2gv: Reloads JSON module records and emits structural source.
//! - gv-templates: Lists the module signatures found in a netlist.
//! - gv-validate: Checks hierarchical instances against module ports.
//! - gv-read-stats: Prints summary statistics.
//! - gv2graph: Emits a node/edge view of the netlist as JSON.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- gv2json design.v --json_out design.json
//! $ cargo run -- --config=netgraph.toml gv2json design.v.gz --validate=true
//! $ cargo run -- json2gv design.json --output regenerated.v
//! ```

mod driver_config;
mod flag_defaults;
mod gv2graph;
mod gv2json;
mod gv_read_stats;
mod gv_templates;
mod gv_validate;
mod json2gv;
mod report_cli_error;

use std::path::Path;

use clap::{Arg, ArgAction};
use driver_config::{load_driver_config, DriverConfig};
use report_cli_error::report_cli_error_and_exit;

const CWD_CONFIG_NAME: &str = "netgraph.toml";

trait AppExt {
    fn add_netlist_arg(self) -> Self;
    fn add_output_arg(self, help: &'static str) -> Self;
    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self;
}

impl AppExt for clap::Command {
    fn add_netlist_arg(self) -> Self {
        (self as clap::Command).arg(
            Arg::new("netlist")
                .help("Input netlist (.v, .gv, optionally .gz compressed)")
                .required(true)
                .index(1),
        )
    }

    fn add_output_arg(self, help: &'static str) -> Self {
        (self as clap::Command).arg(
            Arg::new("output")
                .long("output")
                .value_name("PATH")
                .help(help)
                .action(ArgAction::Set),
        )
    }

    /// Adds a boolean argument to the command; the helper ensures a uniform
    /// style for boolean arguments.
    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self {
        (self as clap::Command).arg(
            Arg::new(long)
                .long(long)
                .value_name("BOOL")
                .action(ArgAction::Set)
                .value_parser(["true", "false"])
                .num_args(1)
                .help(help),
        )
    }
}

fn resolve_config(flag: Option<&String>) -> Option<DriverConfig> {
    let mut config_path: Option<String> = flag.cloned();

    // If there is no config flag specified, but there is a netgraph.toml in
    // the current directory, use that.
    if config_path.is_none() {
        let cwd_config = Path::new(CWD_CONFIG_NAME);
        if cwd_config.exists() {
            log::info!("Using {} in current directory", CWD_CONFIG_NAME);
            config_path = Some(CWD_CONFIG_NAME.to_string());
        }
    }

    config_path.map(|path| {
        if !Path::new(&path).exists() {
            let cwd = std::env::current_dir()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|_| "<unknown>".to_string());
            report_cli_error_and_exit(
                "config file does not exist",
                None,
                vec![("path", path.as_str()), ("working directory", cwd.as_str())],
            );
        }
        load_driver_config(Path::new(&path)).unwrap_or_else(|e| {
            report_cli_error_and_exit(
                "could not load config file",
                None,
                vec![("path", path.as_str()), ("error", format!("{:#}", e).as_str())],
            )
        })
    })
}

fn main() {
    let _ = env_logger::try_init();

    log::info!(
        "netgraph-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = clap::Command::new("netgraph-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command line driver for the netgraph structural netlist parser")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG")
                .help("Path to a netgraph.toml file")
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("gv2json")
                .about("Parses a netlist into JSON module records")
                .add_netlist_arg()
                .arg(
                    Arg::new("json_out")
                        .long("json_out")
                        .value_name("PATH")
                        .help("Path to write the JSON module records")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("verilog_out")
                        .long("verilog_out")
                        .value_name("PATH")
                        .help("Path to write the regenerated netlist")
                        .action(ArgAction::Set),
                )
                .add_bool_arg(
                    "validate",
                    "Check hierarchical instances against their module's ports",
                )
                .add_bool_arg(
                    "unresolved_as_errors",
                    "Exit with an error when a pin connection could not be resolved",
                ),
        )
        .subcommand(
            clap::Command::new("json2gv")
                .about("Emits a netlist from JSON module records")
                .arg(
                    Arg::new("json")
                        .help("JSON module records, as written by gv2json")
                        .required(true)
                        .index(1),
                )
                .add_output_arg("Path to write the netlist (default: stdout)"),
        )
        .subcommand(
            clap::Command::new("gv-templates")
                .about("Lists module names and port signatures")
                .add_netlist_arg(),
        )
        .subcommand(
            clap::Command::new("gv-validate")
                .about("Checks hierarchical instances against module ports")
                .add_netlist_arg(),
        )
        .subcommand(
            clap::Command::new("gv-read-stats")
                .about("Prints summary statistics for a netlist")
                .add_netlist_arg(),
        )
        .subcommand(
            clap::Command::new("gv2graph")
                .about("Emits a node/edge view of a netlist as JSON")
                .add_netlist_arg()
                .add_output_arg("Path to write the graph JSON (default: stdout)"),
        )
        .get_matches();

    let config = resolve_config(matches.get_one::<String>("config"));

    if let Some(matches) = matches.subcommand_matches("gv2json") {
        gv2json::handle_gv2json(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("json2gv") {
        json2gv::handle_json2gv(matches);
    } else if let Some(matches) = matches.subcommand_matches("gv-templates") {
        gv_templates::handle_gv_templates(matches);
    } else if let Some(matches) = matches.subcommand_matches("gv-validate") {
        gv_validate::handle_gv_validate(matches);
    } else if let Some(matches) = matches.subcommand_matches("gv-read-stats") {
        gv_read_stats::handle_gv_read_stats(matches);
    } else if let Some(matches) = matches.subcommand_matches("gv2graph") {
        gv2graph::handle_gv2graph(matches);
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
    } else {
        report_cli_error_and_exit("No valid subcommand provided.", None, vec![]);
    }
}
