//! CLI tests for the `threadprep` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const STORE: &str = r#"{
  "schema_version": 1,
  "comments": [
    {
      "id": 1,
      "post_id": 1,
      "parent": 0,
      "author": "Test",
      "author_email": "test@example.org",
      "author_url": "http://example.com/author-url/",
      "content": "Hello world",
      "date_gmt": "2024-01-01T00:00:00Z",
      "status": "approved"
    },
    {
      "id": 2,
      "post_id": 1,
      "parent": 1,
      "author": "Test",
      "author_email": "test@example.org",
      "author_url": "http://example.com/author-url/",
      "content": "Hello world",
      "date_gmt": "2024-01-01T00:01:00Z",
      "status": "approved"
    }
  ]
}"#;

fn threadprep(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("threadprep").expect("binary built");
    cmd.current_dir(dir.path()).env_remove("THREADPREP_CONFIG");
    cmd
}

fn write_store(dir: &TempDir) -> String {
    let path = dir.path().join("comments.json");
    fs::write(&path, STORE).unwrap();
    path.display().to_string()
}

#[test]
fn prepare_implodes_list_argument() {
    let dir = TempDir::new().unwrap();
    threadprep(&dir)
        .args(["prepare", "SELECT * FROM t WHERE id IN(%,d)", "[1,2,3]"])
        .assert()
        .success()
        .stdout("SELECT * FROM t WHERE id IN(1,2,3)\n");
}

#[test]
fn prepare_quotes_and_escapes_strings() {
    let dir = TempDir::new().unwrap();
    threadprep(&dir)
        .args(["prepare", "--raw", "name = %s AND note LIKE %s", "foo'bar", "50%"])
        .assert()
        .success()
        .stdout("name = 'foo\\'bar' AND note LIKE '50%'\n");
}

#[test]
fn prepare_keeps_marker_without_raw() {
    let dir = TempDir::new().unwrap();
    threadprep(&dir)
        .args(["prepare", "--seed", "tests", "LIKE %s", "50%"])
        .assert()
        .success()
        .stdout(predicate::str::contains("%").not())
        .stdout(predicate::str::starts_with("LIKE '50{"));
}

#[test]
fn prepare_list_rejects_many_values_for_one_placeholder() {
    let dir = TempDir::new().unwrap();
    threadprep(&dir)
        .args(["prepare", "--list", r#"["foo","bar"]"#, "key = %s"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "the query only expected one placeholder",
        ));
}

#[test]
fn prepare_reports_implode_misuse() {
    let dir = TempDir::new().unwrap();
    threadprep(&dir)
        .args(["prepare", "IN(%,d)", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "attempt to implode a non array value [5]",
        ));
}

#[test]
fn expand_prints_format_and_arguments() {
    let dir = TempDir::new().unwrap();
    let output = threadprep(&dir)
        .args(["expand", "%d,%,d,%d", "0", "[1,2,3]", "4"])
        .output()
        .expect("run expand command");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["format"], "%d,%d,%d,%d,%d");
    assert_eq!(json["args"], serde_json::json!([0, 1, 2, 3, 4]));
}

#[test]
fn query_without_paging() {
    let dir = TempDir::new().unwrap();
    let store = write_store(&dir);
    let output = threadprep(&dir)
        .args(["query", "--post", "1", "--store", &store])
        .output()
        .expect("run query command");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["query"]["orderby"], "comment_date_gmt");
    assert_eq!(json["query"]["post_id"], 1);
    assert!(json["query"].get("paged").is_none());
    assert!(json.get("current_page").is_none());
}

#[test]
fn query_with_paging_from_config() {
    let dir = TempDir::new().unwrap();
    let store = write_store(&dir);
    fs::create_dir_all(dir.path().join(".threadprep")).unwrap();
    fs::write(
        dir.path().join(".threadprep/config.toml"),
        "[discussion]\npage_comments = true\ncomments_per_page = 5\n",
    )
    .unwrap();

    let output = threadprep(&dir)
        .args(["query", "--post", "1", "--store", &store, "--email", "me@example.org"])
        .output()
        .expect("run query command");

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(json["query"]["number"], 5);
    assert_eq!(json["query"]["paged"], 1);
    assert_eq!(
        json["query"]["include_unapproved"],
        serde_json::json!(["me@example.org"])
    );
    assert_eq!(json["current_page"], 1);
}

#[test]
fn render_nested_comments() {
    let dir = TempDir::new().unwrap();
    let store = write_store(&dir);
    threadprep(&dir)
        .args(["render", "--post", "1", "--store", &store])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "<ol class=\"wp-block-comment-template\"><li id=\"comment-1\" class=\"comment even thread-even depth-1\">",
        ))
        .stdout(predicate::str::contains(
            "<ol><li id=\"comment-2\" class=\"comment odd alt depth-2\">",
        ));
}

#[test]
fn render_missing_store_is_empty_list() {
    let dir = TempDir::new().unwrap();
    let store = dir.path().join("missing.json").display().to_string();
    threadprep(&dir)
        .args(["render", "--post", "1", "--store", &store])
        .assert()
        .success()
        .stdout("<ol class=\"wp-block-comment-template\"></ol>\n");
}

#[test]
fn config_reset_and_validate() {
    let dir = TempDir::new().unwrap();
    threadprep(&dir)
        .args(["config", "reset", "--force"])
        .assert()
        .success();
    assert!(dir.path().join(".threadprep/config.toml").exists());

    threadprep(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join(".threadprep")).unwrap();
    fs::write(
        dir.path().join(".threadprep/config.toml"),
        "[discussion]\ncomment_order = \"sideways\"\n",
    )
    .unwrap();

    threadprep(&dir)
        .args(["config", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
