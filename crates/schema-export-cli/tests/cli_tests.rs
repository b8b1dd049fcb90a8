//! CLI integration tests for schema-export.
//!
//! These tests verify command-line argument parsing, help output,
//! exported content, and exit codes for various error conditions.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a command for the schema-export binary.
fn cmd() -> Command {
    Command::cargo_bin("schema-export").unwrap()
}

const SNAPSHOT: &str = r#"{
  "version": "1.0",
  "generated": "2024-05-01T12:00:00Z",
  "tables": {
    "users": {
      "columns": [
        {"name": "id", "type": "integer", "length": null, "precision": null, "scale": null,
         "nullable": false, "default": null, "primaryKey": true, "autoIncrement": true,
         "enumValues": null},
        {"name": "status", "type": "enum", "length": null, "precision": null, "scale": null,
         "nullable": false, "default": {"kind": "string", "value": "active"},
         "primaryKey": false, "autoIncrement": false, "enumValues": ["active", "banned"]}
      ],
      "indexes": [{"name": "ix_users_status", "columns": ["status"], "unique": false}],
      "foreignKeys": []
    },
    "orders": {
      "columns": [
        {"name": "id", "type": "biginteger", "length": null, "precision": null, "scale": null,
         "nullable": false, "default": null, "primaryKey": true, "autoIncrement": true,
         "enumValues": null},
        {"name": "user_id", "type": "integer", "length": null, "precision": null, "scale": null,
         "nullable": false, "default": null, "primaryKey": false, "autoIncrement": false,
         "enumValues": null}
      ],
      "indexes": [],
      "foreignKeys": [
        {"name": null, "columns": ["user_id"], "referencedTable": "users",
         "referencedColumns": ["id"], "onDelete": "cascade", "onUpdate": null}
      ]
    }
  }
}"#;

/// Write a snapshot and a config pointing at it; returns the config path.
fn setup(dir: &TempDir, engine: &str, extra: &str) -> PathBuf {
    std::fs::write(dir.path().join("schema.json"), SNAPSHOT).unwrap();
    let config = dir.path().join("export.yaml");
    std::fs::write(
        &config,
        format!(
            "source:\n  engine: {}\n  snapshot: schema.json\n{}",
            engine, extra
        ),
    )
    .unwrap();
    config
}

fn with_config(config: &Path) -> Command {
    let mut c = cmd();
    c.arg("--config").arg(config).args(["--verbosity", "error"]);
    c
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ddl"))
        .stdout(predicate::str::contains("json"))
        .stdout(predicate::str::contains("order"));
}

#[test]
fn test_ddl_subcommand_help() {
    cmd()
        .args(["ddl", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--table"))
        .stdout(predicate::str::contains("--engine"))
        .stdout(predicate::str::contains("--defer-foreign-keys"))
        .stdout(predicate::str::contains("--output"));
}

#[test]
fn test_json_subcommand_help() {
    cmd()
        .args(["json", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--pretty"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("schema-export"));
}

#[test]
fn test_config_default() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("[default: export.yaml]"));
}

// =============================================================================
// Export Tests
// =============================================================================

#[test]
fn test_ddl_postgres() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    with_config(&config)
        .arg("ddl")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("BEGIN;\n"))
        .stdout(predicate::str::contains("CREATE TABLE \"users\""))
        .stdout(predicate::str::contains(
            "CHECK (\"status\" IN ('active', 'banned'))",
        ))
        .stdout(predicate::str::contains("DEFAULT 'active'"))
        .stdout(predicate::str::contains(
            "CREATE INDEX \"ix_users_status\" ON \"users\" (\"status\")",
        ))
        .stdout(predicate::str::ends_with("COMMIT;\n"));
}

#[test]
fn test_ddl_engine_override() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    with_config(&config)
        .args(["ddl", "--engine", "mariadb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("START TRANSACTION;"))
        .stdout(predicate::str::contains("`status` ENUM('active','banned')"))
        .stdout(predicate::str::contains("SET FOREIGN_KEY_CHECKS = 0;"));
}

#[test]
fn test_ddl_table_order_follows_dependencies() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "mssql", "");
    let output = with_config(&config)
        .args(["ddl", "--table", "orders", "--table", "users"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let script = String::from_utf8(output.stdout).unwrap();
    let users = script.find("CREATE TABLE [users]").unwrap();
    let orders = script.find("CREATE TABLE [orders]").unwrap();
    assert!(users < orders);
    assert!(script.contains("DEFAULT N'active'"));
}

#[test]
fn test_ddl_defer_foreign_keys_flag() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    with_config(&config)
        .args(["ddl", "--defer-foreign-keys"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "ALTER TABLE \"orders\" ADD CONSTRAINT \"fk_orders_user_id\"",
        ));
}

#[test]
fn test_ddl_config_options() {
    let dir = TempDir::new().unwrap();
    let config = setup(
        &dir,
        "postgres",
        "export:\n  drop_tables: false\n  transaction: false\n",
    );
    with_config(&config)
        .arg("ddl")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("CREATE TABLE"))
        .stdout(predicate::str::contains("DROP TABLE").not())
        .stdout(predicate::str::contains("BEGIN").not());
}

#[test]
fn test_json_output_file() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "mysql", "export:\n  tables: [users]\n");
    let out = dir.path().join("out.json");
    with_config(&config)
        .args(["json", "--pretty", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let json = std::fs::read_to_string(&out).unwrap();
    assert!(json.contains("\"version\": \"1.0\""));
    assert!(json.contains("\"users\""));
    assert!(!json.contains("\"orders\""));
    assert!(json.contains("\"enumValues\": ["));
}

#[test]
fn test_order_subcommand() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    with_config(&config)
        .arg("order")
        .assert()
        .success()
        .stdout("users\norders\n");

    with_config(&config)
        .args(["order", "--drop"])
        .assert()
        .success()
        .stdout("orders\nusers\n");
}

#[test]
fn test_order_reports_external_reference() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    with_config(&config)
        .args(["order", "--table", "orders"])
        .assert()
        .success()
        .stdout("orders\n")
        .stderr(predicate::str::contains("-> users (external)"));
}

#[test]
fn test_order_reports_cycle() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    let cyclic = SNAPSHOT.replace(
        r#""foreignKeys": []"#,
        r#""foreignKeys": [
        {"name": "fk_users_last_order", "columns": ["id"], "referencedTable": "orders",
         "referencedColumns": ["id"], "onDelete": null, "onUpdate": null}
      ]"#,
    );
    std::fs::write(dir.path().join("schema.json"), cyclic).unwrap();
    with_config(&config)
        .arg("order")
        .assert()
        .success()
        .stderr(predicate::str::contains("cycles among: users, orders"))
        .stderr(predicate::str::contains("(cycle)"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_file() {
    cmd()
        .args(["--config", "/nonexistent/export.yaml", "ddl"])
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("IO error"));
}

#[test]
fn test_invalid_config_engine() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "oracle", "");
    with_config(&config)
        .arg("ddl")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("source.engine"));
}

#[test]
fn test_unknown_table_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    let out = dir.path().join("out.sql");
    with_config(&config)
        .args(["ddl", "--table", "users", "--table", "ghosts", "--output"])
        .arg(&out)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unknown table: ghosts"));
    assert!(!out.exists());
}

#[test]
fn test_unknown_engine_override() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    with_config(&config)
        .args(["ddl", "--engine", "db2"])
        .assert()
        .failure()
        .code(4);
}

#[test]
fn test_malformed_snapshot() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "postgres", "");
    std::fs::write(dir.path().join("schema.json"), "{not json").unwrap();
    with_config(&config)
        .arg("json")
        .assert()
        .failure()
        .code(6);
}
