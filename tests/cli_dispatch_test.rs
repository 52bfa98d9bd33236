// tests/cli_dispatch_test.rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{TempDir, tempdir};

// 使用临时 HOME，避免读取本机的配置文件
fn main_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env("HOME", home.path()).env("USERPROFILE", home.path());
    cmd
}

// --- 测试基本 CLI 行为 ---

#[test]
fn test_help_flag() {
    let home = tempdir().unwrap();
    main_command(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("显示此帮助信息并退出"))
        .stdout(predicate::str::contains("remember_user_token"));
}

#[test]
fn test_missing_required_args() {
    let home = tempdir().unwrap();
    main_command(&home)
        .args(["-c", "cookie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--response <FILE>"));
}

// --- 测试致命错误在启动浏览器之前中止运行 ---

#[test]
fn test_missing_manifest_exits_with_error() {
    let home = tempdir().unwrap();
    let out = tempdir().unwrap();
    main_command(&home)
        .args(["-c", "cookie", "-r"])
        .arg(out.path().join("nope.json"))
        .arg("-o")
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("无法读取课程清单"));

    // 没有创建任何输出目录
    assert!(!out.path().join("jsons").exists());
}

#[test]
fn test_malformed_manifest_exits_with_error() {
    let home = tempdir().unwrap();
    let out = tempdir().unwrap();
    let manifest = out.path().join("response.json");
    fs::write(&manifest, r#"{ "course": { "name": "Go" "#).unwrap();

    main_command(&home)
        .args(["-c", "cookie", "-r"])
        .arg(&manifest)
        .arg("-o")
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("无法解析课程清单"));
}

#[test]
fn test_missing_explicit_config_exits_with_error() {
    let home = tempdir().unwrap();
    main_command(&home)
        .args(["-c", "cookie", "-r", "tests/fixtures/response.json"])
        .args(["--config", "/definitely/not/here.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("配置文件错误"));
}
