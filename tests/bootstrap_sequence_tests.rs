use qrboot::config::Config;
use qrboot::db::{UserStorage, connect};
use qrboot::error::{BootError, EXIT_SCHEMA};
use qrboot::service::password::verify_password;
use qrboot::service::schema_init::SchemaPath;
use qrboot::service::seeder::SeedOutcome;
use std::fs;
use tempfile::TempDir;

fn config(root: &TempDir) -> Config {
    let mut cfg = Config::with_root(root.path());
    cfg.init_command = String::new();
    cfg.default_username = "bootuser".into();
    cfg.default_password = "secretpw".into();
    cfg
}

async fn storage(cfg: &Config) -> UserStorage {
    UserStorage::new(connect(&cfg.database_path()).await.expect("connect"))
}

#[tokio::test]
async fn fresh_volume_gets_layout_schema_and_admin() {
    let root = TempDir::new().expect("tempdir");
    let cfg = config(&root);

    let report = qrboot::prepare(&cfg).await.expect("bootstrap");
    assert!(report.writable);
    assert!(report.permissions_ok);
    match &report.schema {
        SchemaPath::Fallback(init) => assert!(matches!(init.seed, SeedOutcome::Created(_))),
        other => panic!("expected fallback, got {other:?}"),
    }

    for dir in ["instance", "uploads", "static/media"] {
        assert!(root.path().join(dir).is_dir(), "{dir} missing");
    }

    let store = storage(&cfg).await;
    let user = store
        .find_by_username("bootuser")
        .await
        .expect("query")
        .expect("seeded");
    assert!(user.is_admin());
    assert_ne!(user.password_hash, "secretpw");
    assert!(verify_password(&user.password_hash, "secretpw").expect("verify"));
    store.close().await;
}

#[tokio::test]
async fn repeated_runs_are_idempotent() {
    let root = TempDir::new().expect("tempdir");
    let cfg = config(&root);

    qrboot::prepare(&cfg).await.expect("first");
    let store = storage(&cfg).await;
    let tables_before = store.table_names().await.expect("tables");
    let hash_before = store
        .find_by_username("bootuser")
        .await
        .expect("query")
        .expect("seeded")
        .password_hash;
    store.close().await;

    let mut second = cfg.clone();
    second.default_password = "changed".into();
    let report = qrboot::prepare(&second).await.expect("second");
    match report.schema {
        SchemaPath::Fallback(init) => assert_eq!(init.seed, SeedOutcome::AlreadyExists),
        other => panic!("expected fallback, got {other:?}"),
    }

    let store = storage(&cfg).await;
    assert_eq!(store.table_names().await.expect("tables"), tables_before);
    assert_eq!(store.count_by_username("bootuser").await.expect("count"), 1);
    let hash_after = store
        .find_by_username("bootuser")
        .await
        .expect("query")
        .expect("seeded")
        .password_hash;
    assert_eq!(hash_before, hash_after);
    store.close().await;
}

#[cfg(unix)]
#[tokio::test]
async fn failing_primary_falls_back() {
    let root = TempDir::new().expect("tempdir");
    let mut cfg = config(&root);
    cfg.init_command = "false".into();

    let report = qrboot::prepare(&cfg).await.expect("bootstrap");
    assert!(matches!(report.schema, SchemaPath::Fallback(_)));
    assert!(cfg.database_path().is_file());
}

#[cfg(unix)]
#[tokio::test]
async fn database_file_is_group_read_write() {
    use std::os::unix::fs::PermissionsExt;

    let root = TempDir::new().expect("tempdir");
    let cfg = config(&root);
    qrboot::prepare(&cfg).await.expect("bootstrap");

    let mode = fs::metadata(cfg.database_path())
        .expect("meta")
        .permissions()
        .mode();
    assert_eq!(mode & 0o660, 0o660);
    let dir_mode = fs::metadata(cfg.instance_dir())
        .expect("meta")
        .permissions()
        .mode();
    assert_eq!(dir_mode & 0o777, 0o755);
}

#[tokio::test]
async fn unwritable_instance_still_attempts_schema() {
    let root = TempDir::new().expect("tempdir");
    let cfg = config(&root);
    let instance = cfg.instance_dir();
    // the probe marker and the database path are both taken by directories
    fs::create_dir_all(instance.join(".write_test").join("blocker")).expect("block marker");
    fs::create_dir_all(cfg.database_path()).expect("block database");

    assert!(!qrboot::service::probe::probe_writable(&instance));
    let err = qrboot::prepare(&cfg).await.expect_err("schema must fail");
    assert!(matches!(err, BootError::Schema(_)));
    assert_eq!(err.exit_code(), EXIT_SCHEMA);
}

#[tokio::test]
async fn layout_failure_stops_before_schema() {
    let root = TempDir::new().expect("tempdir");
    let cfg = config(&root);
    fs::write(root.path().join("uploads"), b"file").expect("block uploads");

    let err = qrboot::prepare(&cfg).await.expect_err("layout must fail");
    assert!(matches!(err, BootError::NotADirectory(_)));
    assert!(!cfg.database_path().exists());
}

#[tokio::test]
async fn optional_storage_dir_is_created() {
    let root = TempDir::new().expect("tempdir");
    let mut cfg = config(&root);
    cfg.storage_dir = Some("storage".into());
    qrboot::prepare(&cfg).await.expect("bootstrap");
    assert!(root.path().join("storage").is_dir());
}
