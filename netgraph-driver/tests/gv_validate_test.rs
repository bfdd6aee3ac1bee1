// SPDX-License-Identifier: Apache-2.0

use std::process::Command;

fn run_validate(netlist: &str) -> std::process::Output {
    let driver = env!("CARGO_BIN_EXE_netgraph-driver");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("design.v");
    std::fs::write(&path, netlist).unwrap();
    Command::new(driver)
        .current_dir(dir.path())
        .arg("gv-validate")
        .arg(&path)
        .output()
        .expect("gv-validate invocation should run")
}

#[test]
fn gv_validate_clean_design() {
    let output = run_validate(
        "module inv (input i, output o);\nendmodule\nmodule top (input a, output y);\ninv u0 (.i(a), .o(y));\nNAND2 u1 (.A(a), .B(a), .Y());\nendmodule\n",
    );
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("OK: 2 instance(s) checked"), "{}", stdout);
}

#[test]
fn gv_validate_reports_unknown_pins() {
    let output = run_validate(
        "module inv (input i, output o);\nendmodule\nmodule top (input a, output y);\ninv u0 (.i(a), .z(y));\nendmodule\n",
    );
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("instance `u0` of `inv` has pin `z`"), "{}", stdout);
}
