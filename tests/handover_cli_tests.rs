#![cfg(unix)]

use qrboot::db::{UserStorage, connect};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn qrboot(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_qrboot"));
    cmd.current_dir(root)
        .env_remove("RUST_LOG")
        .env("APP_ROOT", root)
        .env("INIT_COMMAND", "false")
        .env("DEFAULT_USERNAME", "bootuser")
        .env("DEFAULT_PASSWORD", "secretpw")
        .env("LOGLEVEL", "info");
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to run qrboot")
}

#[tokio::test]
async fn server_exit_code_propagates_after_fallback() {
    let root = TempDir::new().expect("tempdir");
    let out = run(qrboot(root.path()).args(["run", "--", "sh", "-c", "exit 7"]));
    assert_eq!(out.status.code(), Some(7));

    let db = root.path().join("instance").join("database.db");
    let store = UserStorage::new(connect(&db).await.expect("connect"));
    assert_eq!(store.count_by_username("bootuser").await.expect("count"), 1);
    store.close().await;
}

#[test]
fn server_inherits_bootstrap_pid() {
    let root = TempDir::new().expect("tempdir");
    let child = qrboot(root.path())
        .args(["run", "sh", "-c", "echo server-pid=$$"])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    let pid = child.id();
    let out = child.wait_with_output().expect("wait");
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let reported = stdout
        .lines()
        .find_map(|l| l.strip_prefix("server-pid="))
        .expect("server printed its pid");
    assert_eq!(reported.trim(), pid.to_string());
}

#[test]
fn fallback_failure_exits_70_without_starting_server() {
    let root = TempDir::new().expect("tempdir");
    std::fs::create_dir_all(root.path().join("instance").join("database.db")).expect("block db");
    let marker = root.path().join("server-ran");

    let out = run(qrboot(root.path()).args([
        "run",
        "touch",
        marker.to_str().expect("utf-8 path"),
    ]));
    assert_eq!(out.status.code(), Some(70));
    assert!(!marker.exists());
}

#[test]
fn layout_failure_exits_73() {
    let root = TempDir::new().expect("tempdir");
    std::fs::write(root.path().join("static"), b"file").expect("block static");

    let out = run(qrboot(root.path()).args(["run", "true"]));
    assert_eq!(out.status.code(), Some(73));
    assert!(!root.path().join("instance").join("database.db").exists());
}

#[test]
fn missing_server_binary_exits_126() {
    let root = TempDir::new().expect("tempdir");
    let out = run(qrboot(root.path()).args(["run", "/definitely/not/a/server"]));
    assert_eq!(out.status.code(), Some(126));
}

#[test]
fn add_user_refuses_existing_name() {
    let root = TempDir::new().expect("tempdir");

    let first = run(qrboot(root.path()).args(["add-user", "alice", "pw", "--admin"]));
    assert!(first.status.success());
    let second = run(qrboot(root.path()).args(["add-user", "alice", "other"]));
    assert_eq!(second.status.code(), Some(1));
}

#[test]
fn init_db_and_migrate_run_standalone() {
    let root = TempDir::new().expect("tempdir");
    assert!(run(qrboot(root.path()).arg("init-db")).status.success());
    assert!(root.path().join("instance").join("database.db").is_file());
    assert!(run(qrboot(root.path()).arg("migrate")).status.success());
}

#[tokio::test]
async fn migrate_on_empty_root_creates_schema() {
    let root = TempDir::new().expect("tempdir");
    let out = run(qrboot(root.path()).arg("migrate"));
    assert!(out.status.success(), "migrate failed: {out:?}");

    let db = root.path().join("instance").join("database.db");
    let store = UserStorage::new(connect(&db).await.expect("connect"));
    let tables = store.table_names().await.expect("tables");
    assert!(tables.iter().any(|t| t == "users"));
    assert_eq!(store.count_by_username("bootuser").await.expect("count"), 0);
    store.close().await;
}

#[tokio::test]
async fn add_user_on_empty_root_creates_account() {
    let root = TempDir::new().expect("tempdir");
    let out = run(qrboot(root.path()).args(["add-user", "bob", "pw"]));
    assert!(out.status.success(), "add-user failed: {out:?}");

    let db = root.path().join("instance").join("database.db");
    let store = UserStorage::new(connect(&db).await.expect("connect"));
    let bob = store
        .find_by_username("bob")
        .await
        .expect("query")
        .expect("created");
    assert!(!bob.is_admin());
    store.close().await;
}
