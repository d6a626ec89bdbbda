//! Command-line behaviour of the `create_loop` binary
//!
//! Nothing here needs ffmpeg installed: every case either stops before any
//! tool runs or only touches the work directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn create_loop(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("create_loop").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("TEN_H_LOOPER_CONFIG")
        .env_remove("TEN_H_LOOPER_TEMP_PREFIX")
        .env_remove("TEN_H_LOOPER_WORK_DIR")
        .env_remove("TEN_H_LOOPER_FFMPEG_BIN");
    cmd
}

#[test]
fn test_help_succeeds() {
    let dir = TempDir::new().unwrap();
    create_loop(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("clean"));
}

#[test]
fn test_missing_subcommand_is_usage_error() {
    let dir = TempDir::new().unwrap();
    create_loop(&dir).assert().code(1);
}

#[test]
fn test_malformed_time_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("clip.mp4"), b"video").unwrap();

    create_loop(&dir)
        .args(["create", "clip.mp4", "--start", "1:xx"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("1:xx"));
}

#[test]
fn test_unsupported_source_fails_validation() {
    let dir = TempDir::new().unwrap();
    create_loop(&dir)
        .args(["create", "https://vimeo.com/12345"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: validation failed"));
}

#[test]
fn test_missing_ffmpeg_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("clip.mp4"), b"video").unwrap();

    create_loop(&dir)
        .env("TEN_H_LOOPER_FFMPEG_BIN", "no-such-ffmpeg-binary")
        .args(["create", "clip.mp4"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no-such-ffmpeg-binary"));
    assert!(!dir.path().join("ten-hours-of-clip.mp4").exists());
}

#[test]
fn test_invalid_config_value_is_rejected() {
    let dir = TempDir::new().unwrap();
    create_loop(&dir)
        .env("TEN_H_LOOPER_TEMP_PREFIX", "a/b")
        .arg("clean")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: validation failed"));
}

#[test]
fn test_clean_removes_prefixed_files() {
    let dir = TempDir::new().unwrap();
    let stale = dir.path().join("tenxlooper-temp-inputs-1234.txt");
    let keep = dir.path().join("holiday.mp4");
    std::fs::write(&stale, b"file 'x'").unwrap();
    std::fs::write(&keep, b"video").unwrap();

    create_loop(&dir)
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 temporary file(s)"));

    assert!(!stale.exists());
    assert!(keep.exists());
}

#[test]
fn test_clean_dry_run_keeps_files() {
    let dir = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let stale = work.path().join("tenxlooper-temp-subvideo-1234-clip.mp4");
    std::fs::write(&stale, b"video").unwrap();

    create_loop(&dir)
        .arg("--work-dir")
        .arg(work.path())
        .args(["clean", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "tenxlooper-temp-subvideo-1234-clip.mp4",
        ));

    assert!(stale.exists());
}

#[test]
fn test_clean_with_nothing_to_do() {
    let dir = TempDir::new().unwrap();
    create_loop(&dir)
        .args(["clean", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No temporary files found"));
}
