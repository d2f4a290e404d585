/*!
 * End-to-end tests for the chadtree binary
 */
#![cfg(unix)]

use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

fn install(bin: &Path, name: &str, body: &str) {
    let path = bin.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Config pointing the opener search at `bin`, with an empty `PATH`
fn chadtree(bin: &Path, args: &[&str]) -> Output {
    let config = bin.join("config.toml");
    fs::write(
        &config,
        format!("opener_search_path = [\"{}\"]\n", bin.display()),
    )
    .unwrap();

    Command::new(env!("CARGO_BIN_EXE_chadtree"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("PATH", "")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_resolve_prints_command() {
    let bin = TempDir::new().unwrap();
    install(bin.path(), "xdg-open", "exit 0");

    let out = chadtree(bin.path(), &["resolve", "/home/u/file.txt"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout.trim(),
        format!("{} /home/u/file.txt", bin.path().join("xdg-open").display())
    );
}

#[test]
fn test_resolve_json() {
    let bin = TempDir::new().unwrap();
    install(bin.path(), "open", "exit 0");

    let out = chadtree(bin.path(), &["resolve", "--json", "/x"]);
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["opener"], "open");
    assert_eq!(value["argv"][1], "--");
    assert_eq!(value["argv"][2], "/x");
}

#[test]
fn test_resolve_without_opener_fails() {
    let bin = TempDir::new().unwrap();

    let out = chadtree(bin.path(), &["resolve", "/x"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("xdg-open"));
}

#[test]
fn test_open_success_is_silent() {
    let bin = TempDir::new().unwrap();
    let marker = bin.child("opened");
    install(
        bin.path(),
        "xdg-open",
        &format!("echo \"$1\" > '{}'", marker.path().display()),
    );

    let out = chadtree(
        bin.path(),
        &["open", "--visual", "/a/first", "/a/second", "--cwd", bin.path().to_str().unwrap()],
    );
    assert!(out.status.success(), "{:?}", out);
    assert!(out.stdout.is_empty());
    marker.assert("/a/first\n");
}

#[test]
fn test_open_failure_exits_one_with_message() {
    let bin = TempDir::new().unwrap();
    install(bin.path(), "xdg-open", "echo 'cannot open' >&2\nexit 5");

    let out = chadtree(
        bin.path(),
        &["open", "/x", "--cwd", bin.path().to_str().unwrap()],
    );
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("exited with 5"), "{}", stderr);
    assert!(stderr.contains("cannot open"));
}

#[test]
fn test_relative_paths_resolve_against_cwd() {
    let bin = TempDir::new().unwrap();
    let marker = bin.child("opened");
    install(
        bin.path(),
        "xdg-open",
        &format!("echo \"$1\" > '{}'", marker.path().display()),
    );

    let out = chadtree(
        bin.path(),
        &["open", "notes.md", "--cwd", bin.path().to_str().unwrap()],
    );
    assert!(out.status.success(), "{:?}", out);
    marker.assert(format!("{}\n", bin.path().join("notes.md").display()));
}
