use clap::Parser;
use pretty_assertions::assert_eq;
use quote_cli::app::{App, render_error};
use quote_cli::cli::Cli;
use quote_cli::config::AppConfig;
use quote_core::QuoteError;
use quote_core::db::DbConfig;
use serde_json::Value;
use tempfile::TempDir;

fn memory_app(
    session_dir: &TempDir,
    json: bool,
) -> App {
    let mut config = AppConfig::default();
    config.database = DbConfig::memory();
    config.session.dir = session_dir.path().to_path_buf();
    App::new(config, json)
}

async fn run(
    app: &App,
    args: &[&str],
) -> Result<String, QuoteError> {
    let cli = Cli::try_parse_from(std::iter::once("quotes").chain(args.iter().copied()))
        .expect("arguments should parse");
    app.run(&cli.command).await
}

async fn run_json(
    app: &App,
    args: &[&str],
) -> Value {
    let out = run(app, args).await.expect("command should succeed");
    serde_json::from_str(&out).expect("output should be JSON")
}

const REFERENCE: &[&str] = &[
    "--cost", "10000", "--profit", "2000", "--term", "12", "--rate", "5.5",
    "--out-of-pocket", "1000", "--tax-rate", "8.25",
];

fn with_reference<'a>(head: &[&'a str]) -> Vec<&'a str> {
    head.iter().copied().chain(REFERENCE.iter().copied()).collect()
}

#[tokio::test]
async fn compute_prints_reference_figures() {
    let dir = TempDir::new().expect("tempdir");
    let app = memory_app(&dir, true);

    let json = run_json(&app, &with_reference(&["compute"])).await;

    assert_eq!(json["taxes"], 990.0);
    assert_eq!(json["baseLoanAmount"], 12990.0);
    assert_eq!(json["interest"], 714.45);
    assert_eq!(json["totalLoanAmount"], 12704.45);
    assert_eq!(json["outOfPocket"], 1000.0);
}

#[tokio::test]
async fn create_then_get_and_list() {
    let dir = TempDir::new().expect("tempdir");
    let app = memory_app(&dir, true);

    let created = run_json(&app, &with_reference(&["create", "--name", "Civic"])).await;
    let id = created["id"].as_str().expect("id").to_string();

    let fetched = run_json(&app, &["get", id.as_str()]).await;
    let listed = run_json(&app, &["list"]).await;

    assert_eq!(fetched, created);
    assert_eq!(created["financeQuote"]["sellingPrice"], 12000.0);
    assert_eq!(created["result"]["quoteName"], "Civic");
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn update_overlays_flags_on_stored_inputs() {
    let dir = TempDir::new().expect("tempdir");
    let app = memory_app(&dir, true);
    let created = run_json(&app, &with_reference(&["create", "--name", "Civic"])).await;
    let id = created["id"].as_str().expect("id").to_string();

    let updated = run_json(&app, &["update", &id, "--term", "24"]).await;

    assert_eq!(updated["result"]["quoteName"], "Civic");
    assert_eq!(updated["financeQuote"]["term"], 24.0);
    assert_eq!(updated["financeQuote"]["cost"], 10000.0);
    assert_eq!(updated["result"]["totalLoanAmount"], 12704.45);
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn delete_twice_reports_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let app = memory_app(&dir, false);
    let created = run(&app, &with_reference(&["create", "--name", "Civic"]))
        .await
        .expect("create");
    let id = created
        .lines()
        .next()
        .and_then(|line| line.rsplit_once('(').map(|(_, rest)| rest.trim_end_matches(')')))
        .expect("header carries id")
        .to_string();

    assert_eq!(run(&app, &["delete", id.as_str()]).await, Ok(format!("Deleted quote {id}.\n")));
    assert_eq!(run(&app, &["delete", id.as_str()]).await, Err(QuoteError::NotFound(id.clone())));
}

#[tokio::test]
async fn blank_name_is_a_validation_error() {
    let dir = TempDir::new().expect("tempdir");
    let app = memory_app(&dir, true);

    let err = run(&app, &with_reference(&["create", "--name", "  "]))
        .await
        .expect_err("blank name should fail");

    let envelope: Value = serde_json::from_str(&app.render_error(&err)).expect("json");
    assert_eq!(envelope["code"], "VALIDATION_ERROR");
    assert_eq!(envelope["details"][0]["field"], "name");
}

#[tokio::test]
async fn session_round_trip_through_snapshot_and_store() {
    let dir = TempDir::new().expect("tempdir");
    let app = memory_app(&dir, true);

    run(&app, &["session", "set", "cost", "15000"]).await.expect("set cost");
    run(&app, &["session", "set", "profit", "3000"]).await.expect("set profit");
    run(&app, &["session", "name", "Corolla"]).await.expect("name");

    let working = run_json(&app, &["session", "show"]).await;
    assert_eq!(working["quoteName"], "Corolla");
    assert_eq!(working["financeQuote"]["sellingPrice"], 18000.0);

    let saved = run_json(&app, &["session", "save"]).await;
    assert_eq!(saved["result"]["quoteName"], "Corolla");

    let after_save = run_json(&app, &["session", "show"]).await;
    assert_eq!(after_save["quoteName"], "");
    assert_eq!(after_save["savedQuotes"].as_array().map(Vec::len), Some(1));

    let id = saved["id"].as_str().expect("id").to_string();
    let opened = run_json(&app, &["session", "open", id.as_str()]).await;
    assert_eq!(opened["id"], saved["id"]);
    assert_eq!(opened["financeQuote"]["cost"], 15000.0);
}

#[tokio::test]
async fn session_open_unknown_id_is_not_found() {
    let dir = TempDir::new().expect("tempdir");
    let app = memory_app(&dir, true);

    let result = run(&app, &["session", "open", "nope"]).await;

    assert_eq!(result, Err(QuoteError::NotFound("nope".to_string())));
}

#[tokio::test]
async fn session_sync_replaces_local_list() {
    let dir = TempDir::new().expect("tempdir");
    let app = memory_app(&dir, true);
    run(&app, &with_reference(&["create", "--name", "Civic"])).await.expect("create");

    let synced = run_json(&app, &["session", "sync"]).await;

    assert_eq!(synced["savedQuotes"][0]["name"], "Civic");
}

#[tokio::test]
async fn unknown_backend_is_masked_in_production() {
    let dir = TempDir::new().expect("tempdir");
    let mut config = AppConfig::default();
    config.database = DbConfig::new("postgres", "postgres://localhost/quotes");
    config.session.dir = dir.path().to_path_buf();
    config.production = true;
    let app = App::new(config, true);

    let err = run(&app, &["list"]).await.expect_err("unknown backend");

    assert!(matches!(&err, QuoteError::Internal(detail) if detail.contains("postgres")));
    let envelope: Value = serde_json::from_str(&app.render_error(&err)).expect("json");
    assert_eq!(envelope["message"], "Internal server error");
    assert_eq!(envelope["code"], "INTERNAL_ERROR");
}

#[test]
fn text_errors_are_not_json() {
    let text = render_error(&QuoteError::MissingQuoteId, false, false);

    assert_eq!(text, "error [MISSING_QUOTE_ID]: Quote ID is required\n");
}
