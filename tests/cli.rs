use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn write_config(dir: &std::path::Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("config.json");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn missing_config_file_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("citepage")?;
    cmd.env("NO_COLOR", "1");
    cmd.arg("--config").arg("/nonexistent/config.json");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("reading config file"));
    Ok(())
}

#[test]
fn malformed_config_exits_nonzero() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let config = write_config(tmp.path(), "{ not json");
    let mut cmd = Command::cargo_bin("citepage")?;
    cmd.env("NO_COLOR", "1");
    cmd.arg("--config").arg(&config);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("parsing config file"));
    Ok(())
}

#[test]
fn unknown_style_fails_before_any_fetch() -> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("out");
    let config = write_config(
        tmp.path(),
        &format!(
            r#"{{
                "output_dir": {:?},
                "citations": [{{"user_id": "u1", "code": "sig"}}],
                "style": "chicago"
            }}"#,
            out
        ),
    );
    let mut cmd = Command::cargo_bin("citepage")?;
    cmd.env("NO_COLOR", "1");
    let output = cmd.arg("--config").arg(&config).output()?;
    assert!(!output.status.success());
    let stderr = String::from_utf8(strip_ansi_escapes::strip(output.stderr))?;
    assert!(
        stderr.contains("unknown citation style: chicago"),
        "stderr mismatch. stderr=\n{}",
        stderr
    );
    // Rejected at load time, so nothing was fetched or written.
    assert!(!out.exists());
    Ok(())
}

#[test]
fn empty_profile_list_succeeds_with_empty_combined_outputs()
-> Result<(), Box<dyn std::error::Error>> {
    let tmp = tempfile::tempdir()?;
    let out = tmp.path().join("out");
    let config = write_config(
        tmp.path(),
        &format!(r#"{{"output_dir": {:?}, "citations": []}}"#, out),
    );
    let mut cmd = Command::cargo_bin("citepage")?;
    cmd.env("NO_COLOR", "1");
    let output = cmd.arg("--config").arg(&config).output()?;
    assert!(output.status.success());
    let stderr = String::from_utf8(strip_ansi_escapes::strip(output.stderr))?;
    assert!(
        stderr.contains("✓ 0") && stderr.contains("✗ 0"),
        "stderr summary mismatch. stderr=\n{}",
        stderr
    );
    assert_eq!(fs::read_to_string(out.join("all.json"))?, "[]");
    assert!(out.join("all.html").is_file());
    Ok(())
}
