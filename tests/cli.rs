use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Run `vs` with args in the given dir, returning (stdout, stderr, success).
fn vs(dir: &TempDir, args: &[&str]) -> (String, String, bool) {
    vs_with_stdin(dir, args, None)
}

fn vs_with_stdin(dir: &TempDir, args: &[&str], stdin: Option<&str>) -> (String, String, bool) {
    use std::io::Write;
    use std::process::Stdio;

    let bin = env!("CARGO_BIN_EXE_vs");
    let mut child = Command::new(bin)
        .args(args)
        .current_dir(dir.path())
        .env_remove("VS_SESSION")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run vs");
    let mut pipe = child.stdin.take().expect("stdin piped");
    if let Some(text) = stdin {
        pipe.write_all(text.as_bytes()).expect("failed to write stdin");
    }
    drop(pipe);
    let out = child.wait_with_output().expect("failed to wait for vs");
    (
        String::from_utf8_lossy(&out.stdout).to_string(),
        String::from_utf8_lossy(&out.stderr).to_string(),
        out.status.success(),
    )
}

/// Record the reference session: three adds over two versions.
fn record_reference(dir: &TempDir) {
    for (items, version, state) in [
        ("case01,case02,case03", "v1", "failed"),
        ("case01", "v1", "passed"),
        ("case04,case03", "v2", "passed"),
    ] {
        let (_, stderr, ok) = vs(dir, &["input", items]);
        assert!(ok, "input failed: {stderr}");
        let (_, stderr, ok) = vs(dir, &["add", "--version", version, "--state", state]);
        assert!(ok, "add failed: {stderr}");
    }
}

#[test]
fn input_then_show() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, ok) = vs(&dir, &["show"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "no input");

    let (stdout, _, ok) = vs(&dir, &["input", "case02, case01\ncase02"]);
    assert!(ok);
    assert_eq!(stdout, "add 2 new objects:\ncase01, case02\n");

    let (stdout, _, ok) = vs(&dir, &["show"]);
    assert!(ok);
    assert!(stdout.contains("case01, case02"), "{stdout}");
}

#[test]
fn input_from_stdin() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, ok) = vs_with_stdin(&dir, &["input"], Some("case01\ncase02\n"));
    assert!(ok, "{stderr}");
    assert!(stdout.starts_with("add 2 new objects"), "{stdout}");
}

#[test]
fn add_and_summarize() {
    let dir = TempDir::new().unwrap();
    record_reference(&dir);
    let (stdout, _, ok) = vs(&dir, &["summary"]);
    assert!(ok);
    assert_eq!(
        stdout,
        concat!(
            "there are 0 descriptions\n\n",
            "version v1\nfailed:2, passed:1\n",
            "version v2\nfailed:0, passed:2\n",
        )
    );
}

#[test]
fn add_without_input_names_every_failure() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, ok) = vs(&dir, &["add"]);
    assert!(!ok, "add should have failed");
    assert!(
        stderr.contains("invalid state, invalid version, invalid inputs"),
        "{stderr}"
    );

    let (stdout, _, _) = vs(&dir, &["summary"]);
    assert!(stdout.contains("null"), "{stdout}");
}

#[test]
fn back_restores_previous_add_once() {
    let dir = TempDir::new().unwrap();
    record_reference(&dir);

    let (stdout, _, ok) = vs(&dir, &["back"]);
    assert!(ok);
    assert!(!stdout.contains("version v2"), "{stdout}");
    assert!(stdout.contains("version v1"), "{stdout}");

    let (again, _, ok) = vs(&dir, &["back"]);
    assert!(ok);
    assert_eq!(again, stdout);
}

#[test]
fn save_load_round_trip() {
    let dir = TempDir::new().unwrap();
    record_reference(&dir);

    let (stdout, stderr, ok) = vs(&dir, &["save", "states"]);
    assert!(ok, "save failed: {stderr}");
    assert_eq!(stdout.trim(), "saved states.json");
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("states.json")).unwrap()).unwrap();
    assert_eq!(saved["v2"]["case04"], "passed");

    let fresh = TempDir::new().unwrap();
    let source = dir.path().join("states.json");
    let (stdout, stderr, ok) = vs(&fresh, &["load", source.to_str().unwrap()]);
    assert!(ok, "load failed: {stderr}");
    assert!(stdout.contains("version v2\nfailed:0, passed:2"), "{stdout}");
}

#[test]
fn save_and_export_without_states() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, ok) = vs(&dir, &["save", "out.json"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "nothing to save");
    let (stdout, _, ok) = vs(&dir, &["export", "out.csv"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "nothing to export");
    assert!(!dir.path().join("out.json").exists());
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn export_with_descriptions() {
    let dir = TempDir::new().unwrap();
    record_reference(&dir);

    let (_, stderr, ok) = vs(&dir, &["export", "plain"]);
    assert!(ok, "export failed: {stderr}");
    assert_eq!(
        fs::read_to_string(dir.path().join("plain.csv")).unwrap(),
        concat!(
            "item,v1,v2\r\n",
            "case01,passed,\r\n",
            "case02,failed,\r\n",
            "case03,failed,passed\r\n",
            "case04,,passed\r\n",
        )
    );

    fs::write(
        dir.path().join("desc.csv"),
        "item,description\ncase01,desc1\ncase03,desc3\ncase04,desc4\n",
    )
    .unwrap();
    let (stdout, stderr, ok) = vs(&dir, &["load-desc", "desc.csv"]);
    assert!(ok, "load-desc failed: {stderr}");
    assert!(stdout.starts_with("there are 3 descriptions"), "{stdout}");

    let (_, stderr, ok) = vs(&dir, &["export", "described.csv"]);
    assert!(ok, "export failed: {stderr}");
    assert_eq!(
        fs::read_to_string(dir.path().join("described.csv")).unwrap(),
        concat!(
            "item,description,v1,v2\r\n",
            "case01,desc1,passed,\r\n",
            "case02,,failed,\r\n",
            "case03,desc3,failed,passed\r\n",
            "case04,desc4,,passed\r\n",
        )
    );
}

#[test]
fn duplicate_descriptions_rejected() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dup.csv"), "item,description\ncase01,a\ncase01,b\n").unwrap();
    let (_, stderr, ok) = vs(&dir, &["load-desc", "dup.csv"]);
    assert!(!ok);
    assert!(stderr.contains("duplicate item"), "{stderr}");

    let (stdout, _, _) = vs(&dir, &["summary"]);
    assert!(stdout.starts_with("there are 0 descriptions"), "{stdout}");
}

#[test]
fn load_malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.json"), "{\"v1\": ").unwrap();
    let (_, stderr, ok) = vs(&dir, &["load", "bad.json"]);
    assert!(!ok);
    assert!(stderr.contains("invalid format"), "{stderr}");
}

#[test]
fn session_flag_and_reset() {
    let dir = TempDir::new().unwrap();
    let (_, _, ok) = vs(&dir, &["--session", "alt.json", "input", "case01"]);
    assert!(ok);
    assert!(dir.path().join("alt.json").exists());
    assert!(!dir.path().join(".versioned-states.json").exists());

    let (stdout, _, ok) = vs(&dir, &["status", "--session", "alt.json"]);
    assert!(ok);
    assert!(stdout.contains("Updated:"), "{stdout}");

    let (stdout, _, ok) = vs(&dir, &["--session", "alt.json", "reset"]);
    assert!(ok);
    assert_eq!(stdout.trim(), "session cleared");
    assert!(!dir.path().join("alt.json").exists());
}

#[test]
fn unknown_command_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let (_, _, ok) = vs(&dir, &["nonexistent"]);
    assert!(!ok);
}
