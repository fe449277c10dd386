use std::{
    fs,
    process::{Command, Output, Stdio},
};

fn sicl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sicl"))
        .args(args)
        .env_remove("SICL_LOG")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run sicl")
}

#[test]
fn runs_program_from_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("count.sicl");
    fs::write(
        &path,
        "+include std\n@n $i 1 3\n!std print: (\"tick\"), ($i),\n@b $i\n",
    )
    .expect("write program");

    let output = sicl(&["-f", path.to_str().expect("utf-8 path")]);
    assert!(
        output.status.success(),
        "sicl failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "tick 1\ntick 2\ntick 3\n"
    );
}

#[test]
fn runs_inline_program() {
    let output = sicl(&["-i", "+include std\n!std print: (\"inline\"),"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "inline\n");
}

#[test]
fn script_errors_exit_non_zero_with_diagnostic() {
    let output = sicl(&["-i", "# first\n!nomodule foo: (1),"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NameError"), "missing kind:\n{stderr}");
    assert!(stderr.contains("nomodule"), "missing module name:\n{stderr}");
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.sicl");
    let output = sicl(&["-f", path.to_str().expect("utf-8 path")]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to access"));
}

#[test]
fn requires_a_program() {
    let output = sicl(&[]);
    assert!(!output.status.success());
}
