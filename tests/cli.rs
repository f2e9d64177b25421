use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn ledgerdesk(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ledgerdesk").unwrap();
    cmd.env("LEDGERDESK_DATA_DIR", data_dir.path())
        .env_remove("LEDGERDESK_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn init_seeds_currencies() {
    let dir = TempDir::new().unwrap();

    ledgerdesk(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"))
        .stdout(predicate::str::contains("Seeded 5 currencies"));

    ledgerdesk(&dir)
        .args(["currency", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COP"))
        .stdout(predicate::str::contains("Page 1 of 1 (5 total)"));

    // Second init leaves the catalog alone
    ledgerdesk(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded").not());
}

#[test]
fn duplicate_group_code_reports_field() {
    let dir = TempDir::new().unwrap();

    ledgerdesk(&dir)
        .args(["group", "create", "HOLD", "Holding"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created economic group: Holding"));

    ledgerdesk(&dir)
        .args(["group", "create", "hold", "Other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("code"))
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn period_close_and_reopen() {
    let dir = TempDir::new().unwrap();

    ledgerdesk(&dir)
        .args(["group", "create", "HOLD", "Holding"])
        .assert()
        .success();

    ledgerdesk(&dir)
        .args([
            "period", "create", "--type", "month", "--year", "2025", "--month", "3", "--group",
            "HOLD",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created accounting period: 2025-03"));

    ledgerdesk(&dir)
        .args(["period", "close", "2025-03", "--group", "HOLD", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Closed period 2025-03"))
        .stdout(predicate::str::contains("reopen"));

    ledgerdesk(&dir)
        .args(["period", "delete", "2025-03", "--group", "HOLD", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PERIOD_CLOSED"));

    ledgerdesk(&dir)
        .args(["period", "reopen", "2025-03", "--group", "HOLD", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Open"));

    ledgerdesk(&dir)
        .args(["period", "list", "--group", "HOLD", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"closed\": false"))
        .stdout(predicate::str::contains("\"totalPages\": 1"));

    ledgerdesk(&dir)
        .args(["audit", "--entity", "period"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CLOSE AccountingPeriod"))
        .stdout(predicate::str::contains("REOPEN AccountingPeriod"));
}
