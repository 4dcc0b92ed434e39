use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn shipmate_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("shipmate");
    path
}

fn write_config(root: &Path, content_root: &Path) -> PathBuf {
    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[content]
root = "{}"
include_globs = ["**/*.md"]

[search]
max_results = 20

[history]
path = "{}/data/store.json"
capacity = 10
"#,
        content_root.display(),
        root.display()
    );

    let config_path = config_dir.join("shipmate.toml");
    fs::write(&config_path, config_content).unwrap();
    config_path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let content = root.join("content");
    fs::create_dir_all(content.join("ports")).unwrap();
    fs::write(
        content.join("safety.md"),
        "# Safety On Board\n\n\
         <!-- critical -->\n\
         Read this before sailing.\n\n\
         ## Muster Drill\n\n\
         <!-- keywords: muster, lifejacket -->\n\
         Report to your muster station before departure.\n",
    )
    .unwrap();
    fs::write(
        content.join("ports/cozumel.md"),
        "# Cozumel Day\n\n\
         <!-- kind: port -->\n\
         Tender boats are not needed in Cozumel; the ship docks at the pier.\n",
    )
    .unwrap();
    fs::write(content.join("notes.txt"), "muster notes that are never indexed").unwrap();

    let config_path = write_config(&root, &content);
    (tmp, config_path)
}

fn run_shipmate(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = shipmate_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .env_remove("SHIPMATE_LOG")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run shipmate binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

fn search_json(config_path: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["search"];
    full.extend_from_slice(args);
    full.push("--json");
    let (stdout, stderr, success) = run_shipmate(config_path, &full);
    assert!(success, "search failed: stdout={}, stderr={}", stdout, stderr);
    serde_json::from_str(&stdout).unwrap()
}

fn result_ids(response: &serde_json::Value) -> Vec<String> {
    response["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_search_finds_content_and_curated_records() {
    let (_tmp, config_path) = setup_test_env();

    let response = search_json(&config_path, &["muster"]);
    let ids = result_ids(&response);
    assert!(ids.contains(&"safety-muster-drill".to_string()), "{:?}", ids);
    assert!(ids.contains(&"safety-emuster".to_string()), "{:?}", ids);
    assert!(!ids.iter().any(|id| id.starts_with("notes")));
    assert_eq!(response["count"].as_u64().unwrap() as usize, ids.len());

    let scores: Vec<u64> = response["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["score"].as_u64().unwrap())
        .collect();
    assert!(scores.iter().all(|s| *s > 0));
    assert!(scores.windows(2).all(|w| w[0] >= w[1]), "{:?}", scores);
}

#[test]
fn test_search_text_output() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_shipmate(&config_path, &["search", "muster"]);
    assert!(success, "search failed: stderr={}", stderr);
    assert!(stdout.contains("1. ["));
    assert!(stdout.contains("eMuster Safety Drill"));
    assert!(stdout.contains("<mark>"));
    assert!(stdout.contains("id: safety-emuster"));
}

#[test]
fn test_search_kind_filter() {
    let (_tmp, config_path) = setup_test_env();

    let response = search_json(&config_path, &["cozumel", "--kind", "port"]);
    let results = response["results"].as_array().unwrap();
    assert!(!results.is_empty());
    assert!(results.iter().all(|r| r["type"] == "port"));

    let ids = result_ids(&response);
    assert!(ids.contains(&"port-cozumel".to_string()));
    assert!(ids.contains(&"ports-cozumel-cozumel-day".to_string()));
}

#[test]
fn test_search_limit_and_explain() {
    let (_tmp, config_path) = setup_test_env();

    let response = search_json(&config_path, &["a", "--limit", "3", "--explain"]);
    let results = response["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    for r in results {
        let explain = &r["explain"];
        let total: u64 = ["title", "exact_title", "content", "keyword", "priority", "critical", "recency"]
            .iter()
            .map(|k| explain[*k].as_u64().unwrap())
            .sum();
        assert_eq!(total, r["score"].as_u64().unwrap());
    }
}

#[test]
fn test_invalid_kind_rejected() {
    let (_tmp, config_path) = setup_test_env();

    let (_, stderr, success) = run_shipmate(&config_path, &["search", "spa", "--kind", "lounge"]);
    assert!(!success);
    assert!(stderr.contains("lounge"));
}

#[test]
fn test_zero_limit_rejected() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) =
        run_shipmate(&config_path, &["search", "muster", "--limit", "0"]);
    assert!(!success, "limit 0 accepted: {}", stdout);
    assert!(stderr.contains("limit must be at least 1"));
}

#[test]
fn test_history_recorded_and_cleared() {
    let (tmp, config_path) = setup_test_env();

    run_shipmate(&config_path, &["search", "muster"]);
    run_shipmate(&config_path, &["search", "  cozumel  "]);
    run_shipmate(&config_path, &["search", "MUSTER"]);

    let (stdout, _, success) = run_shipmate(&config_path, &["history", "--json"]);
    assert!(success);
    let history: Vec<String> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(history, vec!["MUSTER", "cozumel"]);
    assert!(tmp.path().join("data/store.json").exists());

    let (stdout, _, success) = run_shipmate(&config_path, &["history", "clear"]);
    assert!(success);
    assert!(stdout.contains("cleared"));

    let (stdout, _, success) = run_shipmate(&config_path, &["history"]);
    assert!(success);
    assert!(stdout.contains("No recent searches."));
}

#[test]
fn test_blank_search_returns_popular_and_skips_history() {
    let (_tmp, config_path) = setup_test_env();

    let response = search_json(&config_path, &["   "]);
    assert_eq!(response["count"], 0);
    let suggestions = response["suggestions"].as_array().unwrap();
    assert_eq!(suggestions[0], "muster station");

    let (stdout, _, _) = run_shipmate(&config_path, &["history", "--json"]);
    let history: Vec<String> = serde_json::from_str(&stdout).unwrap();
    assert!(history.is_empty());
}

#[test]
fn test_suggest_does_not_record_history() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_shipmate(&config_path, &["suggest", "cozu"]);
    assert!(success, "suggest failed: {}", stderr);
    assert!(stdout.lines().any(|l| l == "Cozumel, Mexico"), "{}", stdout);
    assert!(stdout.lines().count() <= 8);

    let (stdout, _, _) = run_shipmate(&config_path, &["history", "--json"]);
    let history: Vec<String> = serde_json::from_str(&stdout).unwrap();
    assert!(history.is_empty());
}

#[test]
fn test_missing_content_root_falls_back_to_catalog() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_config(tmp.path(), &tmp.path().join("nowhere"));

    let (stdout, stderr, success) = run_shipmate(&config_path, &["search", "cozumel"]);
    assert!(success, "search failed: {}", stderr);
    assert!(stderr.contains("Warning"));
    assert!(stdout.contains("Cozumel, Mexico"));
}

#[test]
fn test_highlight_escapes_markup() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) =
        run_shipmate(&config_path, &["highlight", "<b>Spa</b> & spa", "spa"]);
    assert!(success);
    assert_eq!(
        stdout.trim_end(),
        "&lt;b&gt;<mark>Spa</mark>&lt;/b&gt; &amp; <mark>spa</mark>"
    );
}

#[test]
fn test_index_stats_json() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_shipmate(&config_path, &["index", "--json"]);
    assert!(success, "index failed: {}", stderr);
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let total = report["stats"]["total"].as_u64().unwrap();
    // 17 curated records, 3 content sections.
    assert_eq!(total, 20);
    assert_eq!(report["entries"].as_array().unwrap().len(), 20);
}

#[test]
fn test_get_entry() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_shipmate(&config_path, &["get", "safety-muster-drill"]);
    assert!(success);
    assert!(stdout.contains("title:     Muster Drill"));
    assert!(stdout.contains("critical:  true"));
    assert!(stdout.contains("lifejacket"));

    let (_, stderr, success) = run_shipmate(&config_path, &["get", "no-such-entry"]);
    assert!(!success);
    assert!(stderr.contains("entry not found"));
}

#[test]
fn test_sources_lists_catalog() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_shipmate(&config_path, &["sources"]);
    assert!(success);
    assert!(stdout.contains("markdown"));
    assert!(stdout.contains("OK"));
    assert!(stdout.contains("safety-all-aboard"));
}

#[test]
fn test_invalid_config_rejected() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("bad.toml");
    fs::write(&config_path, "[search]\nmax_results = 0\n").unwrap();

    let (_, stderr, success) = run_shipmate(&config_path, &["search", "spa"]);
    assert!(!success);
    assert!(stderr.contains("max_results"));
}
