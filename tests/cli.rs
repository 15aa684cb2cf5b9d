//! Integration tests for top-level CLI behavior.

mod common;

use std::process::Command;

use common::Workspace;

fn run_pkgextract(ws: Option<&Workspace>, args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_pkgextract");
    let mut cmd = Command::new(bin);
    cmd.args(args).env_remove("PKGEXTRACT_RECORD").env_remove("PKGEXTRACT_LOG");
    if let Some(ws) = ws {
        cmd.env("GOROOT", ws.goroot()).env("GOPATH", ws.gopath()).current_dir(&ws.root);
    }
    cmd.output().expect("failed to run pkgextract binary")
}

#[test]
fn extract_writes_relocated_tree_and_summary() {
    let ws = Workspace::new("cli_extract");
    ws.seed();
    let out = ws.out();
    let output = run_pkgextract(
        Some(&ws),
        &["extract", "example.com/app", "--prefix", "v", "--output", out.to_str().unwrap()],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("extracted 4 packages (4 files)"));
    assert!(ws.read("out/v/example.com/app/main.go").contains("lib \"v/example.com/lib\""));
}

#[test]
fn extract_with_jobs_matches_sequential() {
    let ws = Workspace::new("cli_jobs");
    ws.seed();
    let seq = ws.root.join("seq");
    let par = ws.root.join("par");
    let a = run_pkgextract(
        Some(&ws),
        &["extract", "example.com/app", "--prefix", "v", "-o", seq.to_str().unwrap()],
    );
    let b = run_pkgextract(
        Some(&ws),
        &["extract", "example.com/app", "--prefix", "v", "-o", par.to_str().unwrap(), "-j", "4"],
    );
    assert!(a.status.success() && b.status.success());
    assert_eq!(ws.read("seq/v/example.com/lib/lib.go"), ws.read("par/v/example.com/lib/lib.go"));
}

#[test]
fn scan_prints_identifier_map_without_writing() {
    let ws = Workspace::new("cli_scan");
    ws.seed();
    let output = run_pkgextract(
        Some(&ws),
        &["scan", "example.com/app", "--prefix", "v", "--exclude", "golang.org/x"],
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("example.com/lib: v/example.com/lib"));
    assert!(!stdout.contains("golang.org/x/text"));
    assert!(!ws.exists("out"));
}

#[test]
fn config_file_supplies_prefix_and_output() {
    let ws = Workspace::new("cli_config");
    ws.seed();
    ws.write("extract.yaml", "prefix: cfg.example/vendor\noutput: from-config\n");
    let config = ws.root.join("extract.yaml");
    let output = run_pkgextract(
        Some(&ws),
        &["extract", "example.com/app", "--config", config.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(ws.exists("from-config/cfg.example/vendor/example.com/app/main.go"));
}

#[test]
fn missing_prefix_exits_with_error() {
    let ws = Workspace::new("cli_no_prefix");
    ws.seed();
    let output = run_pkgextract(Some(&ws), &["extract", "example.com/app"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("no import prefix configured"));
}

#[test]
fn unknown_package_exits_with_error() {
    let ws = Workspace::new("cli_unknown");
    let output = run_pkgextract(Some(&ws), &["scan", "example.com/nowhere", "--prefix", "v"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("cannot resolve package `example.com/nowhere`"));
}

#[test]
fn help_lists_subcommands() {
    let output = run_pkgextract(None, &["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("extract"));
    assert!(stdout.contains("scan"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let output = run_pkgextract(None, &["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}
