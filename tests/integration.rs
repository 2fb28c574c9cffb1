//! Integration tests for the `azbackup` binary.
//!
//! These tests exercise the CLI layer end-to-end: they spawn the actual
//! compiled binary and assert on exit codes, stdout, and stderr.  `azcopy`
//! is **not** required — these tests cover argument parsing, config loading,
//! `azbackup init`, `--print-config`, `--dry-run`, and error paths that
//! never reach a real invocation.
//!
//! # Running
//!
//! ```sh
//! cargo test --test integration
//! ```

use std::{fs, process::Command};

/// Absolute path to the compiled `azbackup` binary, resolved at compile time
/// by Cargo.  This works correctly for both `cargo test` and `cargo test
/// --release` without any hardcoding.
const BIN: &str = env!("CARGO_BIN_EXE_azbackup");

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Run `azbackup` with `args` in the given working directory.
///
/// Returns `(exit_success, stdout, stderr)`.
fn run_in(args: &[&str], dir: &std::path::Path) -> (bool, String, String) {
    let out = Command::new(BIN)
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|e| panic!("failed to spawn {BIN}: {e}"));

    (
        out.status.success(),
        String::from_utf8_lossy(&out.stdout).into_owned(),
        String::from_utf8_lossy(&out.stderr).into_owned(),
    )
}

/// Run `azbackup` with `args` in a fresh temporary directory.
fn run(args: &[&str]) -> (bool, String, String) {
    let dir = tempfile::tempdir().unwrap();
    run_in(args, dir.path())
}

/// A config pointing at fake accounts with one table and one container.
const FULL_CONFIG: &str = r#"
[source]
account = "srcacct"
key     = "c3JjLWtleQ=="

[destination]
account   = "destacct"
key       = "ZGVzdC1rZXk="
container = "backups"
subfolder = "nightly"

[backup]
tables     = ["customers"]
containers = ["images"]
"#;

// ─── --help / --version ───────────────────────────────────────────────────────

#[test]
fn help_exits_zero() {
    let (ok, stdout, _) = run(&["--help"]);
    assert!(ok, "azbackup --help should exit 0");
    assert!(
        stdout.contains("azbackup"),
        "help text should mention the binary name"
    );
}

#[test]
fn version_exits_zero() {
    let (ok, stdout, _) = run(&["--version"]);
    assert!(ok, "--version should exit 0");
    assert!(
        stdout.contains("0.1.0"),
        "--version should print the version"
    );
}

#[test]
fn init_help_exits_zero() {
    let (ok, stdout, _) = run(&["init", "--help"]);
    assert!(ok);
    assert!(stdout.to_lowercase().contains("scaffold"));
}

// ─── azbackup init ────────────────────────────────────────────────────────────

#[test]
fn init_creates_azbackup_toml() {
    let dir = tempfile::tempdir().unwrap();
    let (ok, _, _) = run_in(&["init"], dir.path());
    assert!(ok, "azbackup init should exit 0");

    let toml_path = dir.path().join("azbackup.toml");
    assert!(toml_path.exists(), "azbackup.toml should be created");

    let content = fs::read_to_string(&toml_path).unwrap();
    for section in ["[source]", "[destination]", "[backup]", "[azcopy]"] {
        assert!(content.contains(section), "missing {section}");
    }
}

#[test]
fn init_with_custom_config_path() {
    let dir = tempfile::tempdir().unwrap();
    let custom = dir.path().join("custom.toml");
    let (ok, _, _) = run_in(&["--config", custom.to_str().unwrap(), "init"], dir.path());
    assert!(ok);
    assert!(custom.exists(), "custom.toml should be created");
}

#[test]
fn init_refuses_to_overwrite_existing_config() {
    let dir = tempfile::tempdir().unwrap();
    let toml_path = dir.path().join("azbackup.toml");
    fs::write(&toml_path, "# existing").unwrap();

    let (ok, stdout, stderr) = run_in(&["init"], dir.path());
    assert!(!ok, "init should fail when azbackup.toml already exists");

    // The original content must be untouched.
    assert_eq!(fs::read_to_string(&toml_path).unwrap(), "# existing");

    let combined = format!("{stdout}{stderr}");
    assert!(
        combined.contains("already exists") || combined.contains("refusing"),
        "error message should explain why init failed; got: {combined}"
    );
}

#[test]
fn init_generated_config_is_valid_toml() {
    let dir = tempfile::tempdir().unwrap();
    run_in(&["init"], dir.path());

    let content = fs::read_to_string(dir.path().join("azbackup.toml")).unwrap();
    toml::from_str::<toml::Value>(&content).expect("generated azbackup.toml must be valid TOML");
}

// ─── --print-config ───────────────────────────────────────────────────────────

#[test]
fn print_config_exits_zero_with_valid_config() {
    let dir = tempfile::tempdir().unwrap();
    run_in(&["init"], dir.path());

    let (ok, stdout, _) = run_in(&["--print-config"], dir.path());
    assert!(ok, "--print-config should exit 0 when config is valid");
    // The debug output should contain the struct field names.
    assert!(stdout.contains("destination") || stdout.contains("DestinationConfig"));
}

#[test]
fn print_config_exits_zero_with_missing_config() {
    // No azbackup.toml — falls back to defaults, should still print and exit 0.
    let (ok, _, stderr) = run(&["--print-config"]);
    assert!(ok, "--print-config should exit 0 even without a config file");
    assert!(
        stderr.contains("not found"),
        "a missing config should produce a warning"
    );
}

#[test]
fn print_config_errors_on_invalid_toml() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("azbackup.toml"), "not valid toml ][[[").unwrap();

    let (ok, _, _) = run_in(&["--print-config"], dir.path());
    assert!(!ok, "invalid TOML should cause a non-zero exit");
}

// ─── --dry-run ────────────────────────────────────────────────────────────────

#[test]
fn dry_run_prints_invocations_without_leaking_keys() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("azbackup.toml"), FULL_CONFIG).unwrap();

    let (ok, stdout, _) = run_in(&["--dry-run"], dir.path());
    assert!(ok, "--dry-run should exit 0");

    // One line per resource: the table and the container.
    assert!(stdout.contains("/source:https://srcacct.table.core.windows.net/customers"));
    assert!(stdout.contains("/source:https://srcacct.blob.core.windows.net/images"));

    // Keys are masked, never printed.
    assert!(stdout.contains("/sourceKey:***"));
    assert!(stdout.contains("/Destkey:***"));
    assert!(!stdout.contains("c3JjLWtleQ=="));
    assert!(!stdout.contains("ZGVzdC1rZXk="));
}

#[test]
fn dry_run_respects_skip_flags() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("azbackup.toml"), FULL_CONFIG).unwrap();

    let (ok, stdout, _) = run_in(&["--dry-run", "--no-containers"], dir.path());
    assert!(ok);
    assert!(stdout.contains("customers"));
    assert!(!stdout.contains("images"));
}

#[test]
fn dry_run_with_nothing_configured_says_so() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("azbackup.toml"),
        r#"
        [source]
        account = "srcacct"
        key     = "c3JjLWtleQ=="
        "#,
    )
    .unwrap();

    let (ok, stdout, _) = run_in(&["--dry-run"], dir.path());
    assert!(ok);
    assert!(stdout.contains("nothing to do"));
}

// ─── Validation failures ──────────────────────────────────────────────────────

#[test]
fn default_run_without_credentials_fails_fast() {
    // Defaults have blank account names; the pipeline must refuse before
    // spawning anything.
    let (ok, _, stderr) = run(&[]);
    assert!(!ok, "a blank config must not start a backup");
    assert!(
        stderr.contains("missing or empty argument"),
        "failure should name the validation error; got: {stderr}"
    );
}

#[test]
fn dry_run_with_blank_destination_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("azbackup.toml"),
        r#"
        [source]
        account = "srcacct"
        key     = "c3JjLWtleQ=="

        [destination]
        container = "backups"

        [backup]
        tables = ["customers"]
        "#,
    )
    .unwrap();

    let (ok, _, stderr) = run_in(&["--dry-run"], dir.path());
    assert!(!ok);
    assert!(stderr.contains("destination account"));
}
