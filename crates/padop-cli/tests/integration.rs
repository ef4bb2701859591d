use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn padop(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("padop").unwrap();
    cmd.current_dir(dir.path()).env("PADOP_ROOT", dir.path());
    cmd
}

fn init_unit(dir: &TempDir) {
    padop(dir).arg("init").assert().success();
}

fn write_payload(dir: &TempDir, name: &str, json: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, json).unwrap();
    path.display().to_string()
}

const DB_PAYLOAD: &str = r#"{"db":{"dbname":"etherpad","host":"db1","port":5432,"user":"u","password":"p"}}"#;
const CERT_PAYLOAD: &str = r#"{"cert":{"cert":"CERT","key":"KEY"},"network":{"public_ip":"203.0.113.5","private_ip":"10.0.0.5","hostname":"pad-0","unit_name":"etherpad/0"}}"#;

// ---------------------------------------------------------------------------
// padop init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_state_files() {
    let dir = TempDir::new().unwrap();
    padop(&dir).arg("init").assert().success();

    assert!(dir.path().join(".padop").is_dir());
    assert!(dir.path().join(".padop/config.yaml").exists());
    assert!(dir.path().join(".padop/facts.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    padop(&dir).arg("init").assert().success();
    padop(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

// ---------------------------------------------------------------------------
// padop handle
// ---------------------------------------------------------------------------

#[test]
fn handle_requires_init() {
    let dir = TempDir::new().unwrap();
    padop(&dir)
        .args(["handle", "install"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn handle_rejects_unknown_event() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);
    padop(&dir)
        .args(["handle", "leader-elected"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown event"));
}

#[test]
fn install_sets_systemd_flag() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);

    padop(&dir)
        .args(["handle", "install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("install-service-unit"));

    padop(&dir)
        .args(["facts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("systemd-installed: true"));
}

#[test]
fn install_redelivery_runs_nothing() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);

    padop(&dir).args(["handle", "install"]).assert().success();
    padop(&dir)
        .args(["handle", "install"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No actions ran"));
}

#[test]
fn full_chain_reaches_web_configured() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);
    let db = write_payload(&dir, "db.json", DB_PAYLOAD);
    let cert = write_payload(&dir, "cert.json", CERT_PAYLOAD);

    padop(&dir).args(["handle", "install"]).assert().success();
    padop(&dir)
        .args(["handle", "db-relation-joined", "--leader"])
        .assert()
        .success();
    padop(&dir)
        .args(["handle", "db-master-changed", "--payload", &db])
        .assert()
        .success()
        .stdout(predicate::str::contains("write-app-config"));
    padop(&dir)
        .args(["handle", "certificates-relation-joined", "--payload", &cert])
        .assert()
        .success();
    padop(&dir)
        .args(["handle", "server-cert-ready", "--payload", &cert])
        .assert()
        .success();
    padop(&dir)
        .args(["handle", "nginx-ready", "--service-running"])
        .assert()
        .success()
        .stdout(predicate::str::contains("configure-web-server"));

    padop(&dir)
        .args(["facts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("web-configured: true"));

    padop(&dir)
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("active"));
}

#[test]
fn empty_cert_payload_blocks() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);
    let bad = write_payload(&dir, "bad.json", r#"{"cert":{"cert":"","key":"KEY"}}"#);

    padop(&dir)
        .args(["handle", "server-cert-ready", "--payload", &bad])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deferred: capture-server-cert"));

    padop(&dir)
        .args(["facts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ssl-available: false"));
}

#[test]
fn port_change_closes_old_and_opens_new() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);

    // First config pass opens the configured port.
    padop(&dir)
        .args(["handle", "config-changed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("open port 9001"));

    let config = dir.path().join(".padop/config.yaml");
    std::fs::write(&config, "version: 1\nport: 8080\n").unwrap();

    padop(&dir)
        .args(["handle", "config-changed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("close port 9001"))
        .stdout(predicate::str::contains("open port 8080"));
}

#[test]
fn handle_json_output_is_parseable() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);

    let output = padop(&dir)
        .args(["handle", "install", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["executed"][0], "install-service-unit");
    assert_eq!(value["event"], "install");
}

// ---------------------------------------------------------------------------
// padop config
// ---------------------------------------------------------------------------

#[test]
fn config_validate_default_ok() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);

    padop(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration OK"));
}

#[test]
fn config_validate_reports_errors() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);
    let config = dir.path().join(".padop/config.yaml");
    std::fs::write(&config, "version: 1\nport: 0\n").unwrap();

    padop(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("port must be non-zero"));
}

#[test]
fn config_show_prints_yaml() {
    let dir = TempDir::new().unwrap();
    init_unit(&dir);

    padop(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("port: 9001"));
}
