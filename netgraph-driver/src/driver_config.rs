// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::Context;
use clap::ArgMatches;
use serde::Deserialize;

use crate::flag_defaults;

/// Contents of a `netgraph.toml` file. Every field is optional; a flag given
/// on the command line always wins over the value here.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DriverConfig {
    /// Path for the regenerated structural source written by `gv2json`.
    pub verilog_output: Option<String>,

    /// Path for the JSON module records written by `gv2json`.
    pub json_output: Option<String>,

    /// Check hierarchical instances against their module's ports while
    /// converting.
    pub validate_instances: Option<bool>,

    /// Exit with an error status when some pin connection could not be
    /// resolved to a net.
    pub unresolved_as_errors: Option<bool>,
}

pub fn load_driver_config(path: &Path) -> anyhow::Result<DriverConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: DriverConfig =
        toml::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))?;
    log::debug!("loaded driver config from {}: {:?}", path.display(), config);
    Ok(config)
}

fn get_path(
    matches: &ArgMatches,
    flag: &str,
    from_config: Option<&String>,
    default: &str,
) -> String {
    matches
        .get_one::<String>(flag)
        .or(from_config)
        .cloned()
        .unwrap_or_else(|| default.to_string())
}

fn get_bool(matches: &ArgMatches, flag: &str, from_config: Option<bool>) -> bool {
    match matches.get_one::<String>(flag) {
        Some(value) => value == "true",
        None => from_config.unwrap_or(false),
    }
}

pub fn get_json_output(matches: &ArgMatches, config: &Option<DriverConfig>) -> String {
    let from_config = config.as_ref().and_then(|c| c.json_output.as_ref());
    get_path(matches, "json_out", from_config, flag_defaults::JSON_OUTPUT)
}

pub fn get_verilog_output(matches: &ArgMatches, config: &Option<DriverConfig>) -> String {
    let from_config = config.as_ref().and_then(|c| c.verilog_output.as_ref());
    get_path(matches, "verilog_out", from_config, flag_defaults::VERILOG_OUTPUT)
}

pub fn get_validate_instances(matches: &ArgMatches, config: &Option<DriverConfig>) -> bool {
    get_bool(
        matches,
        "validate",
        config.as_ref().and_then(|c| c.validate_instances),
    )
}

pub fn get_unresolved_as_errors(matches: &ArgMatches, config: &Option<DriverConfig>) -> bool {
    get_bool(
        matches,
        "unresolved_as_errors",
        config.as_ref().and_then(|c| c.unresolved_as_errors),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction, Command};
    use pretty_assertions::assert_eq;

    fn command() -> Command {
        Command::new("t")
            .arg(Arg::new("json_out").long("json_out").action(ArgAction::Set))
            .arg(Arg::new("verilog_out").long("verilog_out").action(ArgAction::Set))
            .arg(
                Arg::new("validate")
                    .long("validate")
                    .action(ArgAction::Set)
                    .value_parser(["true", "false"]),
            )
            .arg(
                Arg::new("unresolved_as_errors")
                    .long("unresolved_as_errors")
                    .action(ArgAction::Set)
                    .value_parser(["true", "false"]),
            )
    }

    #[test]
    fn test_defaults_without_config() {
        let matches = command().get_matches_from(["t"]);
        assert_eq!(get_json_output(&matches, &None), "parsed_objects.json");
        assert_eq!(get_verilog_output(&matches, &None), "output_netlist_file.v");
        assert!(!get_validate_instances(&matches, &None));
        assert!(!get_unresolved_as_errors(&matches, &None));
    }

    #[test]
    fn test_flag_beats_config_beats_default() {
        let config = Some(DriverConfig {
            json_output: Some("from_config.json".to_string()),
            validate_instances: Some(true),
            ..Default::default()
        });
        let matches = command().get_matches_from(["t", "--validate", "false"]);
        assert_eq!(get_json_output(&matches, &config), "from_config.json");
        assert!(!get_validate_instances(&matches, &config));

        let matches = command().get_matches_from(["t", "--json_out", "flag.json"]);
        assert_eq!(get_json_output(&matches, &config), "flag.json");
        assert!(get_validate_instances(&matches, &config));
    }

    #[test]
    fn test_load_driver_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netgraph.toml");
        std::fs::write(
            &path,
            "json_output = \"out.json\"\nunresolved_as_errors = true\n",
        )
        .unwrap();
        let config = load_driver_config(&path).unwrap();
        assert_eq!(
            config,
            DriverConfig {
                json_output: Some("out.json".to_string()),
                unresolved_as_errors: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_unknown_config_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("netgraph.toml");
        std::fs::write(&path, "jsn_output = \"typo.json\"\n").unwrap();
        assert!(load_driver_config(&path).is_err());
    }
}
