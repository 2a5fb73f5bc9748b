//! E2E tests for the `isnad` binary: `build` followed by the read-only
//! `stats`, `narrator` and `search` commands over the written artifacts.
//!
//! Covers: artifact files on disk, JSON report shapes, coded error
//! diagnostics for missing inputs and bad settings, shell completions.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

const NARRATORS_CSV: &str = "\
scholar_indx,name,grade,birth_place,area_of_interest
1,Abu Hurairah,Companion,Yemen,Hadith
2,Ibn Shihab al-Zuhri,Thiqah,Medina,Fiqh
3,Malik ibn Anas,Imam,Medina,Fiqh
4,Nafi,Thiqah,,
";

const HADITHS_CSV: &str = "\
id,hadith_id,source,chapter_no,hadith_no,chapter,chain_indx,text_ar,text_en
1,1,Sahih Bukhari,1,1,Revelation,\"1, 2, 3\",إنما الأعمال بالنيات,Actions are judged by intentions
2,2,Sahih Bukhari,1,2,Revelation,\"1,2\",,The believer is a mirror to the believer
3,3,Sahih Muslim,2,7,Faith,4,,Speak good or remain silent
";

fn isnad_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("isnad"));
    cmd.current_dir(dir);
    cmd.env("ISNAD_LOG", "error");
    cmd.env_remove("ISNAD_FORMAT");
    cmd.env_remove("ISNAD_TIMING");
    cmd
}

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("hadiths.csv"), HADITHS_CSV).unwrap();
    fs::write(dir.join("narrators.csv"), NARRATORS_CSV).unwrap();
}

fn build(dir: &Path) {
    isnad_cmd(dir)
        .args([
            "build",
            "--hadiths",
            "hadiths.csv",
            "--narrators",
            "narrators.csv",
            "--out",
            "out",
        ])
        .assert()
        .success();
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("command should not crash");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON on stdout")
}

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_fixtures(dir.path());
    dir
}

// ---------------------------------------------------------------------------
// isnad build
// ---------------------------------------------------------------------------

#[test]
fn build_writes_all_four_artifacts() {
    let dir = project();
    build(dir.path());

    for file in ["graph.json", "narrators.json", "hadiths.json", "stats.json"] {
        let path = dir.path().join("out").join(file);
        let text = fs::read_to_string(&path).unwrap_or_else(|_| panic!("{file} missing"));
        serde_json::from_str::<Value>(&text).unwrap_or_else(|_| panic!("{file} is not JSON"));
    }

    let leftovers: Vec<_> = fs::read_dir(dir.path().join("out"))
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind");
}

#[test]
fn build_json_report_describes_graph() {
    let dir = project();
    let report = json_stdout(isnad_cmd(dir.path()).args([
        "build",
        "--hadiths",
        "hadiths.csv",
        "--narrators",
        "narrators.csv",
        "--out",
        "out",
        "--json",
    ]));

    assert_eq!(report["hadith_rows"], 3);
    assert_eq!(report["narrator_rows"], 4);
    assert_eq!(report["processed_hadiths"], 3);
    assert_eq!(report["graph"]["node_count"], 3, "single-narrator chain adds no node");
    assert_eq!(report["graph"]["edge_count"], 2);
    assert_eq!(report["files"].as_array().unwrap().len(), 4);
    assert!(report["content_hash"].as_str().unwrap().starts_with("blake3:"));
}

#[test]
fn build_graph_artifact_keeps_edge_weights() {
    let dir = project();
    build(dir.path());

    let text = fs::read_to_string(dir.path().join("out/graph.json")).unwrap();
    let graph: Value = serde_json::from_str(&text).unwrap();
    let edges = graph["edges"].as_array().unwrap();
    let heavy = edges
        .iter()
        .find(|e| e["source"] == 1 && e["target"] == 2)
        .expect("edge 1 -> 2");
    assert_eq!(heavy["weight"], 2);
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 3);
}

#[test]
fn build_honours_max_hadiths_and_top_n() {
    let dir = project();
    let report = json_stdout(isnad_cmd(dir.path()).args([
        "build",
        "--hadiths",
        "hadiths.csv",
        "--narrators",
        "narrators.csv",
        "--out",
        "out",
        "--max-hadiths",
        "1",
        "--top-n",
        "2",
        "--json",
    ]));
    assert_eq!(report["processed_hadiths"], 1);
    assert_eq!(report["exported_nodes"], 2);

    let text = fs::read_to_string(dir.path().join("out/hadiths.json")).unwrap();
    let hadiths: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(hadiths.as_array().unwrap().len(), 1);
}

#[test]
fn build_reads_settings_from_config_file() {
    let dir = project();
    fs::write(
        dir.path().join("isnad.toml"),
        "[input]\nhadiths = \"hadiths.csv\"\nnarrators = \"narrators.csv\"\n\n[export]\noutput_dir = \"site\"\n",
    )
    .unwrap();

    isnad_cmd(dir.path()).arg("build").assert().success();
    assert!(dir.path().join("site/stats.json").exists());

    // Read-only commands find the same directory through the config file.
    isnad_cmd(dir.path()).arg("stats").assert().success();
}

#[test]
fn build_recovers_from_malformed_fields() {
    let dir = project();
    fs::write(
        dir.path().join("narrators.csv"),
        "scholar_indx,name,grade\nx5,Broken Row,Thiqah\n1,Abu Hurairah,Companion\n2,Nafi,Thiqah\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("hadiths.csv"),
        "id,source,chain_indx,text_en\nabc,Sahih Bukhari,\"1,?,2\",first\n2,Sahih Muslim,\"2,7abc\",second\n",
    )
    .unwrap();

    let report = json_stdout(isnad_cmd(dir.path()).args([
        "build",
        "--hadiths",
        "hadiths.csv",
        "--narrators",
        "narrators.csv",
        "--out",
        "out",
        "--json",
    ]));

    assert_eq!(report["hadith_rows"], 2, "rows with bad fields are kept");
    assert_eq!(report["narrator_rows"], 3);
    assert_eq!(report["malformed_numeric"], 2, "scholar_indx and hadith id");
    assert_eq!(report["malformed_chain_entries"], 1, "only the entry with no digits");
    // Chains [1, 2] and [2, 7]: the leading digits of "7abc" survive.
    assert_eq!(report["graph"]["node_count"], 3);
    assert_eq!(report["graph"]["edge_count"], 2);
    assert_eq!(report["graph"]["unresolved_nodes"], 1);
    assert!(dir.path().join("out/stats.json").exists());
}

#[test]
fn recovered_chain_entries_are_logged_with_dataset() {
    let dir = project();
    fs::write(
        dir.path().join("hadiths.csv"),
        "id,source,chain_indx\n1,Sahih Bukhari,\"1,?,2\"\n",
    )
    .unwrap();

    isnad_cmd(dir.path())
        .env("ISNAD_LOG", "warn")
        .env("ISNAD_LOG_FORMAT", "json")
        .args([
            "build",
            "--hadiths",
            "hadiths.csv",
            "--narrators",
            "narrators.csv",
            "--out",
            "out",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("dropped malformed chain entries"))
        .stderr(predicate::str::contains("\"dataset\":\"hadiths\""));
}

#[test]
fn build_missing_dataset_fails_with_input_code() {
    let dir = project();
    isnad_cmd(dir.path())
        .args([
            "build",
            "--hadiths",
            "nope.csv",
            "--narrators",
            "narrators.csv",
            "--out",
            "out",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1001"))
        .stderr(predicate::str::contains("hadiths"));

    assert!(!dir.path().join("out").exists(), "no output on load failure");
}

#[test]
fn build_missing_required_column_fails() {
    let dir = project();
    fs::write(dir.path().join("bad.csv"), "id,source\n1,Sahih Bukhari\n").unwrap();
    isnad_cmd(dir.path())
        .args([
            "build",
            "--hadiths",
            "bad.csv",
            "--narrators",
            "narrators.csv",
            "--out",
            "out",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("chain_indx"));
}

#[test]
fn build_rejects_out_of_range_damping() {
    let dir = project();
    isnad_cmd(dir.path())
        .args([
            "build",
            "--hadiths",
            "hadiths.csv",
            "--narrators",
            "narrators.csv",
            "--damping",
            "1.5",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2002"));
}

#[test]
fn malformed_config_reports_parse_code() {
    let dir = project();
    fs::write(dir.path().join("isnad.toml"), "[pagerank\n").unwrap();
    isnad_cmd(dir.path())
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

// ---------------------------------------------------------------------------
// isnad stats
// ---------------------------------------------------------------------------

#[test]
fn stats_json_has_summary_and_leaderboards() {
    let dir = project();
    build(dir.path());

    let stats = json_stdout(isnad_cmd(dir.path()).args(["stats", "--out", "out", "--json"]));
    assert_eq!(stats["graph"]["nodes"], 3);
    assert_eq!(stats["graph"]["edges"], 2);
    for list in ["top_pagerank", "top_betweenness", "top_citations"] {
        assert_eq!(stats[list].as_array().unwrap().len(), 3, "{list}");
    }
    assert_eq!(stats["top_betweenness"][0]["id"], 2, "middle of the chain bridges");
}

#[test]
fn stats_before_build_reports_missing_artifact() {
    let dir = project();
    isnad_cmd(dir.path())
        .args(["stats", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1003"))
        .stderr(predicate::str::contains("isnad build"));
}

#[test]
fn json_mode_errors_are_json_on_stderr() {
    let dir = project();
    let output = isnad_cmd(dir.path())
        .args(["stats", "--out", "out", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let err: Value = serde_json::from_slice(&output.stderr).expect("JSON error on stderr");
    assert_eq!(err["error"]["error_code"], "E1003");
}

#[test]
fn json_mode_errors_stay_parseable_with_default_logging() {
    let dir = project();
    let output = isnad_cmd(dir.path())
        .env_remove("ISNAD_LOG")
        .env_remove("DEBUG")
        .args(["narrator", "1", "--out", "out", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let err: Value = serde_json::from_slice(&output.stderr).expect("only the JSON error on stderr");
    assert_eq!(err["error"]["error_code"], "E1003");
    assert!(err["error"]["suggestion"].is_string());
}

// ---------------------------------------------------------------------------
// isnad narrator
// ---------------------------------------------------------------------------

#[test]
fn narrator_json_contains_metrics() {
    let dir = project();
    build(dir.path());

    let detail = json_stdout(isnad_cmd(dir.path()).args(["narrator", "2", "--out", "out", "--json"]));
    assert_eq!(detail["name"], "Ibn Shihab al-Zuhri");
    assert_eq!(detail["in_degree"], 1);
    assert_eq!(detail["out_degree"], 1);
    assert!((detail["betweenness"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn narrator_detail_carries_directory_fields() {
    let dir = project();
    build(dir.path());

    let detail = json_stdout(isnad_cmd(dir.path()).args(["narrator", "1", "--out", "out", "--json"]));
    assert_eq!(detail["name"], "Abu Hurairah");
    assert_eq!(detail["name_arabic"], "Abu Hurairah");
    assert_eq!(detail["grade"], "Companion");
    assert_eq!(detail["birth_place"], "Yemen");
    assert_eq!(detail["death"], "Unknown");
}

#[test]
fn unknown_narrator_fails_with_not_found_code() {
    let dir = project();
    build(dir.path());

    isnad_cmd(dir.path())
        .args(["narrator", "99", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn narrator_outside_any_chain_is_not_exported() {
    let dir = project();
    build(dir.path());

    // Narrator 4 only appears in a single-entry chain.
    isnad_cmd(dir.path())
        .args(["narrator", "4", "--out", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

// ---------------------------------------------------------------------------
// isnad search
// ---------------------------------------------------------------------------

#[test]
fn search_matches_english_text_case_insensitively() {
    let dir = project();
    build(dir.path());

    let hits = json_stdout(isnad_cmd(dir.path()).args(["search", "INTENTIONS", "--out", "out", "--json"]));
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"], 1);
    assert_eq!(
        hits[0]["narrator_names"],
        serde_json::json!(["Abu Hurairah", "Ibn Shihab al-Zuhri", "Malik ibn Anas"])
    );
}

#[test]
fn search_matches_collection_and_respects_limit() {
    let dir = project();
    build(dir.path());

    let hits = json_stdout(isnad_cmd(dir.path()).args([
        "search", "bukhari", "--limit", "1", "--out", "out", "--json",
    ]));
    assert_eq!(hits.as_array().unwrap().len(), 1);
}

#[test]
fn search_arabic_text() {
    let dir = project();
    build(dir.path());

    let hits = json_stdout(isnad_cmd(dir.path()).args(["search", "بالنيات", "--out", "out", "--json"]));
    assert_eq!(hits.as_array().unwrap().len(), 1);
}

#[test]
fn empty_search_lists_samples() {
    let dir = project();
    build(dir.path());

    let hits = json_stdout(isnad_cmd(dir.path()).args(["search", "--out", "out", "--json"]));
    assert_eq!(hits.as_array().unwrap().len(), 3);
}

#[test]
fn search_text_output_has_header() {
    let dir = project();
    build(dir.path());

    isnad_cmd(dir.path())
        .args(["search", "silent", "--out", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("id\treference\ttext"))
        .stdout(predicate::str::contains("Sahih Muslim 2:7"));
}

// ---------------------------------------------------------------------------
// isnad completions
// ---------------------------------------------------------------------------

#[test]
fn completions_emit_script() {
    let dir = TempDir::new().unwrap();
    isnad_cmd(dir.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("isnad"));
}
