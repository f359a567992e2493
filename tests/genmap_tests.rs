use assert_cmd::Command;
use std::{env, fs, path::PathBuf, process};

fn out_path(name: &str) -> PathBuf {
    env::temp_dir().join(format!("genmap-{}-{name}", process::id()))
}

#[test]
fn missing_output_argument() {
    let mut cmd = Command::cargo_bin("genmap").unwrap();

    let assert = cmd.args(["testdata/keymap.in", "testdata/serial.j2"]).assert();

    let output = assert.get_output();

    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn generate() {
    let out = out_path("serial");
    let mut cmd = Command::cargo_bin("genmap").unwrap();

    cmd.args(["testdata/keymap.in", "testdata/serial.j2"])
        .arg(&out)
        .assert()
        .success();

    // minijinja swallows the template's own trailing newline
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "KeyA=1;KeyB=2;ShiftLeft=3;"
    );

    fs::remove_file(&out).unwrap();
}

#[test]
fn unresolved_keysym_aborts() {
    let out = out_path("bad-keymap");
    let mut cmd = Command::cargo_bin("genmap").unwrap();

    let assert = cmd
        .args(["testdata/bad_keymap.in", "testdata/serial.j2"])
        .arg(&out)
        .assert()
        .failure();

    let output = assert.get_output();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(
        stderr.contains("XK_definitely_not_a_keysym"),
        "stderr: {stderr}"
    );
    assert!(!out.exists());
}

#[test]
fn broken_template_writes_nothing() {
    let out = out_path("broken-template");
    let mut cmd = Command::cargo_bin("genmap").unwrap();

    let assert = cmd
        .args(["testdata/keymap.in", "testdata/broken.j2"])
        .arg(&out)
        .assert()
        .failure();

    let output = assert.get_output();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stderr.contains("template"), "stderr: {stderr}");
    assert!(!out.exists());
}
