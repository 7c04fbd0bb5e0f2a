use std::process::Command;

fn combined_output(output: &std::process::Output) -> String {
    let mut combined = String::new();
    combined.push_str(&String::from_utf8_lossy(&output.stdout));
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}

fn voxboard_bin() -> &'static str {
    option_env!("CARGO_BIN_EXE_voxboard").expect("voxboard test binary not built")
}

#[test]
fn voxboard_help_mentions_name() {
    let output = Command::new(voxboard_bin())
        .arg("--help")
        .output()
        .expect("run voxboard --help");
    assert!(output.status.success());
    let combined = combined_output(&output);
    assert!(combined.contains("VoxBoard"));
    assert!(combined.contains("--say"));
}

#[test]
fn voxboard_list_phrases_prints_ranked_seeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(voxboard_bin())
        .args(["--no-logs", "--list-phrases", "--data-dir"])
        .arg(dir.path())
        .output()
        .expect("run voxboard --list-phrases");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.lines().count(), 10);
    assert!(stdout.contains("Por favor"));
}

#[cfg(unix)]
#[test]
fn voxboard_say_persists_custom_phrase() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = Command::new(voxboard_bin())
        .args(["--no-logs", "--tts-cmd", "true", "--say", "Hola mundo", "--data-dir"])
        .arg(dir.path())
        .output()
        .expect("run voxboard --say");
    assert!(output.status.success(), "{}", combined_output(&output));

    let stored = std::fs::read_to_string(dir.path().join("phrases.json")).expect("phrases.json");
    let phrases: serde_json::Value = serde_json::from_str(&stored).expect("json");
    let custom = phrases
        .as_array()
        .and_then(|items| items.last())
        .expect("custom phrase");
    assert_eq!(custom["text"], "Hola mundo");
    assert_eq!(custom["emoji"], "💬");
    assert_eq!(custom["count"], 1);
}

#[test]
fn voxboard_rejects_bad_contact_number() {
    let output = Command::new(voxboard_bin())
        .args(["--no-logs", "--contact-number", "abc", "--list-phrases"])
        .output()
        .expect("run voxboard");
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("--contact-number"));
}
