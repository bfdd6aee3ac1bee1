// SPDX-License-Identifier: Apache-2.0

use std::process::Command;

const NETLIST: &str = r#"
module half_adder (a, b, s, c);
  input a, b;
  output s, c;
  XOR2 x0 (.A(a), .B(b), .Y(s));
  AND2 a0 (.A(a), .B(b), .Y(c));
endmodule

module top (input [1:0] in, output sum, output carry);
  wire [1:0] w;
  half_adder ha (.a(w[0]), .b(w[1]), .s(sum), .c(carry));
  TIE t0 (.Z(1'b0));
endmodule
"#;

#[test]
fn gv2json_writes_json_and_regenerated_netlist() {
    let driver = env!("CARGO_BIN_EXE_netgraph-driver");
    let dir = tempfile::tempdir().unwrap();
    let netlist_path = dir.path().join("design.v");
    std::fs::write(&netlist_path, NETLIST).unwrap();
    let json_path = dir.path().join("design.json");
    let verilog_path = dir.path().join("regen.v");

    let output = Command::new(driver)
        .current_dir(dir.path())
        .arg("gv2json")
        .arg(&netlist_path)
        .arg("--json_out")
        .arg(&json_path)
        .arg("--verilog_out")
        .arg(&verilog_path)
        .output()
        .expect("gv2json invocation should run");
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    let modules = json.as_array().unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[1]["module_name"], "top");
    let ha = &modules[1]["instances"][0];
    assert_eq!(ha["cell_type"], "hierarchical");
    assert_eq!(ha["pins"][0]["net"], "w[0]");
    assert_eq!(ha["pins"][0]["direction"], "input");
    assert_eq!(modules[1]["instances"][1]["cell_type"], "leaf-level");

    let regenerated = std::fs::read_to_string(&verilog_path).unwrap();
    assert!(regenerated.contains("module top ("), "{}", regenerated);
    assert!(regenerated.contains("    wire [1:0] w;"), "{}", regenerated);
    assert!(
        regenerated.contains("half_adder ha (.a(w[0]), .b(w[1]), .s(sum), .c(carry));"),
        "{}",
        regenerated
    );
}

#[test]
fn gv2json_uses_config_file_in_working_directory() {
    let driver = env!("CARGO_BIN_EXE_netgraph-driver");
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("design.v"), NETLIST).unwrap();
    std::fs::write(
        dir.path().join("netgraph.toml"),
        "json_output = \"from_config.json\"\nverilog_output = \"from_config.v\"\n",
    )
    .unwrap();

    let output = Command::new(driver)
        .current_dir(dir.path())
        .arg("gv2json")
        .arg("design.v")
        .output()
        .expect("gv2json invocation should run");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(dir.path().join("from_config.json").exists());
    assert!(dir.path().join("from_config.v").exists());
}

#[test]
fn gv2json_defaults_output_names() {
    let driver = env!("CARGO_BIN_EXE_netgraph-driver");
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("design.v"), NETLIST).unwrap();

    let output = Command::new(driver)
        .current_dir(dir.path())
        .arg("gv2json")
        .arg("design.v")
        .output()
        .expect("gv2json invocation should run");
    assert!(output.status.success());
    assert!(dir.path().join("parsed_objects.json").exists());
    assert!(dir.path().join("output_netlist_file.v").exists());
}

#[test]
fn gv2json_unresolved_as_errors() {
    let driver = env!("CARGO_BIN_EXE_netgraph-driver");
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("design.v"),
        "module m;\nBUF u0 (.A(nowhere));\nendmodule\n",
    )
    .unwrap();

    let run = |strict: &str| {
        Command::new(driver)
            .current_dir(dir.path())
            .arg("gv2json")
            .arg("design.v")
            .arg("--unresolved_as_errors")
            .arg(strict)
            .output()
            .expect("gv2json invocation should run")
    };

    let lenient = run("false");
    assert!(lenient.status.success());
    let stderr = String::from_utf8_lossy(&lenient.stderr);
    assert!(stderr.contains("nowhere"), "stderr: {}", stderr);

    let strict = run("true");
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("unresolved pin connections"), "stderr: {}", stderr);
}

#[test]
fn gv2json_reports_malformed_line_with_caret() {
    let driver = env!("CARGO_BIN_EXE_netgraph-driver");
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("design.v"),
        "module m;\nwire [3:0] a;\nX u1 (.A(a[3:1]));\nendmodule\n",
    )
    .unwrap();

    let output = Command::new(driver)
        .current_dir(dir.path())
        .arg("gv2json")
        .arg("design.v")
        .output()
        .expect("gv2json invocation should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("malformed instance line @ 3:10"), "stderr: {}", stderr);
    assert!(stderr.contains("X u1 (.A(a[3:1]));"), "stderr: {}", stderr);
    assert!(!dir.path().join("parsed_objects.json").exists());
}

#[test]
fn gv2json_reports_json_write_failure_as_output_error() {
    let driver = env!("CARGO_BIN_EXE_netgraph-driver");
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("design.v"), NETLIST).unwrap();
    let json_path = dir.path().join("missing_dir").join("design.json");

    let output = Command::new(driver)
        .current_dir(dir.path())
        .arg("gv2json")
        .arg("design.v")
        .arg("--json_out")
        .arg(&json_path)
        .output()
        .expect("gv2json invocation should run");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not write JSON"), "stderr: {}", stderr);
    assert!(stderr.contains("output"), "stderr: {}", stderr);
    assert!(!stderr.contains("could not read input"), "stderr: {}", stderr);
}
