use std::process::{Command, Output};

pub const TESTS_BINARY: &str = env!("CARGO_BIN_EXE_stackshell");

fn run(lines: &[&str]) -> Output {
    let mut cmd = Command::new(TESTS_BINARY);
    cmd.args(["--color", "never", "--no-history"])
        .env("RUST_LOG", "off");
    for line in lines {
        cmd.args(["-c", line]);
    }
    cmd.output().unwrap()
}

#[test]
fn test_version_line() {
    let output = run(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        format!("stackshell {}\n", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn test_unknown_command_fails() {
    let output = run(&["bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8(output.stderr).unwrap(),
        "[-] Unknown command: bogus.\n"
    );
}

#[test]
fn test_context_session() {
    let output = run(&["use module", "set RHOST 10.0.0.1", "show", "back", "stack"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("RHOST => 10.0.0.1"));
    assert!(stdout.contains("  RHOST  10.0.0.1"));
    assert!(stdout.ends_with("  0  Core\n"));
}

#[test]
fn test_handler_failure_does_not_fail_the_run() {
    let output = run(&["use", "version"]);
    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[-] Error while running command use: missing argument: context"));
    assert!(String::from_utf8(output.stdout).unwrap().starts_with("stackshell "));
}

#[test]
fn test_exit_stops_remaining_lines() {
    let output = run(&["exit", "version"]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_help_flag() {
    let output = Command::new(TESTS_BINARY).arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--command"));
    assert!(stdout.contains("--history-file"));
}
