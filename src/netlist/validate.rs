// SPDX-License-Identifier: Apache-2.0

//! Checks instances of known modules against the modules' port lists.
//!
//! Only hierarchical instances are checked; an instance whose reference name
//! has no template is a library cell and is trivially valid.

use std::fmt;

use crate::netlist::model::{Instance, Module};
use crate::netlist::template::{find_template, ModuleTemplate};

/// A pin on an instance that the referenced module does not declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateMismatch {
    pub module: String,
    pub instance: String,
    pub ref_name: String,
    pub pin: String,
}

impl fmt::Display for TemplateMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: instance `{}` of `{}` has pin `{}` which is not a port of `{}`",
            self.module, self.instance, self.ref_name, self.pin, self.ref_name
        )
    }
}

/// Result of validating a set of modules.
#[derive(Debug, PartialEq, Eq)]
pub enum ValidationSummary {
    /// Every instance matched its template.
    Clean,
    Findings(Vec<TemplateMismatch>),
}

/// Every pin of `instance` not found among the ports of its template.
pub fn check_instance(
    module_name: &str,
    instance: &Instance,
    templates: &[ModuleTemplate],
) -> Vec<TemplateMismatch> {
    let Some(template) = find_template(templates, &instance.ref_name) else {
        return Vec::new();
    };
    instance
        .pins
        .iter()
        .filter(|pin| !template.has_port(&pin.name))
        .map(|pin| TemplateMismatch {
            module: module_name.to_string(),
            instance: instance.name.clone(),
            ref_name: instance.ref_name.clone(),
            pin: pin.name.clone(),
        })
        .collect()
}

pub fn instance_is_valid(instance: &Instance, templates: &[ModuleTemplate]) -> bool {
    check_instance("", instance, templates).is_empty()
}

/// Checks every instance of every module.
pub fn validate_modules(modules: &[Module], templates: &[ModuleTemplate]) -> ValidationSummary {
    let mut findings = Vec::new();
    for module in modules {
        for instance in &module.instances {
            let mismatches = check_instance(&module.name, instance, templates);
            for m in &mismatches {
                log::warn!("{}", m);
            }
            findings.extend(mismatches);
        }
    }
    log::info!("validate_modules: {} finding(s)", findings.len());
    if findings.is_empty() {
        ValidationSummary::Clean
    } else {
        ValidationSummary::Findings(findings)
    }
}
