//! End-to-end checks of the `ideck` binary in non-interactive modes. Output
//! is piped, so every command speaks JSON unless told otherwise.

mod common;

use serde_json::Value;

fn json_of(stdout: &str) -> Value {
    serde_json::from_str(stdout.trim()).expect("stdout is one JSON document")
}

#[test]
fn help_lists_subcommands() {
    let result = common::run_cli_case("help_lists_subcommands", &["--help"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    for name in ["dashboard", "list", "show", "config"] {
        assert!(
            result.stdout.contains(name),
            "missing {name}; log: {}",
            result.log_path.display()
        );
    }
}

#[test]
fn list_demo_incidents_first_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = common::write_config(dir.path());
    let config = config.to_str().expect("utf-8 path");
    let result = common::run_cli_case(
        "list_demo_incidents_first_page",
        &["--config", config, "list", "incidents", "--demo"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = json_of(&result.stdout);
    assert_eq!(payload["command"], "list");
    assert_eq!(payload["kind"], "incidents");
    assert_eq!(payload["items"].as_array().map(Vec::len), Some(25));
    assert_eq!(payload["items"][0]["id"], "INC1000");
    assert_eq!(payload["meta"]["page"], 1);
    assert_eq!(payload["meta"]["has_next"], true);
}

#[test]
fn list_demo_alerts_sorted_second_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = common::write_config(dir.path());
    let config = config.to_str().expect("utf-8 path");
    let result = common::run_cli_case(
        "list_demo_alerts_sorted_second_page",
        &[
            "--config", config, "list", "alerts", "--page", "2", "--sort", "severity", "--demo",
        ],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = json_of(&result.stdout);
    assert_eq!(payload["kind"], "alerts");
    assert_eq!(payload["meta"]["page"], 2);
    assert_eq!(payload["meta"]["has_prev"], true);
}

#[test]
fn unknown_sort_field_is_a_user_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = common::write_config(dir.path());
    let config = config.to_str().expect("utf-8 path");
    let result = common::run_cli_case(
        "unknown_sort_field_is_a_user_error",
        &[
            "--config", config, "list", "incidents", "--sort", "bogus", "--demo",
        ],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("unknown sort field"));
}

#[test]
fn show_demo_incident_includes_detail_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = common::write_config(dir.path());
    let config = config.to_str().expect("utf-8 path");
    let result = common::run_cli_case(
        "show_demo_incident_includes_detail_fields",
        &["--config", config, "show", "incidents", "INC1003", "--demo"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());

    let payload = json_of(&result.stdout);
    assert_eq!(payload["item"]["id"], "INC1003");
    assert!(payload["item"]["description"].is_string());
    assert!(payload["item"]["timeline"].as_array().is_some_and(|t| !t.is_empty()));
}

#[test]
fn show_missing_record_exits_with_user_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = common::write_config(dir.path());
    let config = config.to_str().expect("utf-8 path");
    let result = common::run_cli_case(
        "show_missing_record_exits_with_user_error",
        &["--config", config, "show", "alerts", "ALR1", "--demo"],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("DECK-2004"));
}

#[test]
fn dashboard_rejects_json() {
    let result = common::run_cli_case("dashboard_rejects_json", &["--json", "dashboard", "--demo"]);
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("--json"));
}

#[test]
fn dashboard_without_a_terminal_fails_cleanly() {
    let result = common::run_cli_case(
        "dashboard_without_a_terminal_fails_cleanly",
        &["dashboard", "--demo"],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("interactive terminal"));
}

#[test]
fn missing_explicit_config_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.toml");
    let missing = missing.to_str().expect("utf-8 path");
    let result = common::run_cli_case(
        "missing_explicit_config_is_reported",
        &["--config", missing, "list", "incidents", "--demo"],
    );
    assert_eq!(result.status.code(), Some(1), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("DECK-1002"));
}

#[test]
fn config_path_and_show() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = common::write_config(dir.path());
    let config = config.to_str().expect("utf-8 path");

    let result = common::run_cli_case("config_path", &["--config", config, "config", "path"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload = json_of(&result.stdout);
    assert_eq!(payload["path"], config);
    assert_eq!(payload["exists"], true);

    let result = common::run_cli_case("config_show", &["--config", config, "config", "show"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload = json_of(&result.stdout);
    assert_eq!(payload["config"]["api"]["page_size"], 25);
    assert_eq!(payload["config"]["api"]["endpoint"], "http://127.0.0.1:9/api");
    assert!(payload["hash"].as_str().is_some_and(|h| h.len() == 16));
}
