use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn spendwise(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("spendwise").unwrap();
    cmd.env("SPENDWISE_DATA_DIR", data_dir.path())
        .env("SPENDWISE_USER", "tester")
        .env_remove("RUST_LOG")
        .env_remove("GEMINI_API_KEY");
    cmd
}

fn setup_accounts(data_dir: &TempDir) {
    spendwise(data_dir)
        .args(["account", "create", "Checking", "--balance", "500"])
        .assert()
        .success();
    spendwise(data_dir)
        .args([
            "account",
            "create",
            "Visa",
            "--account-type",
            "credit",
            "--balance=-200",
            "--limit",
            "5000",
        ])
        .assert()
        .success();
}

#[test]
fn init_creates_profile_and_default_goals() {
    let dir = TempDir::new().unwrap();

    spendwise(&dir)
        .args(["init", "--email", "sara@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile: sara"))
        .stdout(predicate::str::contains("Created 3 default budget goals"));

    // Running it again keeps the existing goals
    spendwise(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("default budget goals").not());

    spendwise(&dir)
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food & Dining"))
        .stdout(predicate::str::contains("Entertainment"));
}

#[test]
fn settlement_moves_both_balances() {
    let dir = TempDir::new().unwrap();
    setup_accounts(&dir);

    spendwise(&dir)
        .args(["settle", "Checking", "Visa", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paid 100.00 from Checking to Visa"));

    spendwise(&dir)
        .args(["account", "show", "Checking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("400.00"));

    spendwise(&dir)
        .args(["account", "show", "visa"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-100.00"));

    spendwise(&dir)
        .args(["account", "verify"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All account balances match"));
}

#[test]
fn rejected_operations_leave_balances_alone() {
    let dir = TempDir::new().unwrap();
    setup_accounts(&dir);

    spendwise(&dir)
        .args(["txn", "add", "Checking", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid amount"));

    spendwise(&dir)
        .args(["settle", "Checking", "Amex", "50"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found: Amex"));

    spendwise(&dir)
        .args(["account", "show", "Checking"])
        .assert()
        .success()
        .stdout(predicate::str::contains("500.00"));
}

#[test]
fn expense_appears_in_list_and_report() {
    let dir = TempDir::new().unwrap();
    setup_accounts(&dir);

    spendwise(&dir)
        .args([
            "transaction",
            "add",
            "Checking",
            "42.50",
            "--category",
            "food",
            "--date",
            "2025-03-10",
            "--description",
            "Corner cafe",
            "--mood",
            "happy",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created transaction"));

    spendwise(&dir)
        .args(["txn", "list", "--search", "cafe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Corner cafe"))
        .stdout(predicate::str::contains("42.50"));

    spendwise(&dir)
        .args(["report", "--end", "2025-03-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Food & Dining"))
        .stdout(predicate::str::contains("Daily Trend (Last 7 Days)"));
}

#[test]
fn account_with_transactions_cannot_be_deleted() {
    let dir = TempDir::new().unwrap();
    setup_accounts(&dir);

    spendwise(&dir)
        .args(["txn", "add", "Checking", "10"])
        .assert()
        .success();

    spendwise(&dir)
        .args(["account", "delete", "Checking"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is used by 1 transaction"));
}

#[test]
fn insights_need_enough_history() {
    let dir = TempDir::new().unwrap();
    setup_accounts(&dir);

    spendwise(&dir)
        .arg("insights")
        .assert()
        .success()
        .stdout(predicate::str::contains("Add at least 3 transactions"));
}

#[test]
fn insights_fall_back_without_api_key() {
    let dir = TempDir::new().unwrap();
    setup_accounts(&dir);
    for amount in ["5", "6", "7"] {
        spendwise(&dir)
            .args(["txn", "add", "Checking", amount])
            .assert()
            .success();
    }

    spendwise(&dir)
        .arg("insights")
        .assert()
        .success()
        .stdout(predicate::str::contains("Data Analysis Paused"));
}

#[test]
fn settings_validate_currency() {
    let dir = TempDir::new().unwrap();

    spendwise(&dir)
        .args(["settings", "set", "--currency", "XYZ"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported currency"));

    spendwise(&dir)
        .args(["settings", "set", "--currency", "usd", "--language", "ar"])
        .assert()
        .success();

    spendwise(&dir)
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Language: ar"))
        .stdout(predicate::str::contains("Currency: USD"));
}

#[test]
fn audit_lists_changes() {
    let dir = TempDir::new().unwrap();
    setup_accounts(&dir);

    spendwise(&dir)
        .args(["settle", "Checking", "Visa", "25"])
        .assert()
        .success();

    spendwise(&dir)
        .args(["audit", "--limit", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transaction"))
        .stdout(predicate::str::contains("Account"));
}

#[test]
fn users_are_isolated() {
    let dir = TempDir::new().unwrap();
    setup_accounts(&dir);

    spendwise(&dir)
        .args(["--user", "someone-else", "account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No accounts found"));
}
