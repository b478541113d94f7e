use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("comment-export").unwrap()
}

const CALC: &str = "package calc

// Add sums two integers.
func Add(a, b int) int { return a + b }

// Reader reads values.
type Reader interface {
	// Read returns the next value.
	Read() int
}
";

#[test]
fn exports_expanded_records() {
    let src = assert_fs::TempDir::new().unwrap();
    src.child("calc.go").write_str(CALC).unwrap();
    let out = src.child("docs.json");

    cmd()
        .arg("--go-folder")
        .arg(src.path())
        .arg("--output-json-file")
        .arg(out.path())
        .assert()
        .success();

    out.assert(
        r#"{"funcs":[{"name":"Add","doc":"Add sums two integers."},{"name":"AddEx","doc":"Add sums two integers."},{"name":"AddAsync","doc":"Add sums two integers."},{"name":"ReaderRead","doc":"Read returns the next value."},{"name":"ReaderReadEx","doc":"Read returns the next value."},{"name":"ReaderReadInterface","doc":"Read returns the next value."},{"name":"ReaderReadAsync","doc":"Read returns the next value."}]}"#,
    );
}

#[test]
fn simple_policy_with_custom_field() {
    let src = assert_fs::TempDir::new().unwrap();
    src.child("calc.go").write_str(CALC).unwrap();
    let out = src.child("docs.json");

    cmd()
        .arg("--go-folder")
        .arg(src.path())
        .arg("--output-json-file")
        .arg(out.path())
        .args(["--expansion-policy", "none", "--output-field-name", "funComments", "--no-trim"])
        .assert()
        .success();

    out.assert(r#"{"funComments":[{"name":"Add","doc":"Add sums two integers.\n"}]}"#);
}

#[test]
fn fun_docs_field_feeds_binding_importer() {
    let src = assert_fs::TempDir::new().unwrap();
    src.child("calc.go").write_str(CALC).unwrap();
    let out = src.child("docs.json");

    cmd()
        .arg("--go-folder")
        .arg(src.path())
        .arg("--output-json-file")
        .arg(out.path())
        .args(["--output-field-name", "funDocs"])
        .assert()
        .success();

    let written = std::fs::read_to_string(out.path()).unwrap();
    let document: serde_json::Value = serde_json::from_str(&written).unwrap();
    let object = document.as_object().unwrap();
    assert_eq!(object.len(), 1);

    let entries = object["funDocs"].as_array().unwrap();
    assert_eq!(entries.len(), 7);
    for entry in entries {
        let entry = entry.as_object().unwrap();
        assert_eq!(entry.len(), 2);
        assert!(entry["name"].is_string());
        assert!(entry["doc"].is_string());
    }
    assert_eq!(entries[0]["name"], "Add");
}

#[test]
fn config_file_supplies_paths() {
    let work = assert_fs::TempDir::new().unwrap();
    work.child("src/calc.go").write_str(CALC).unwrap();
    work.child("comment-export.toml")
        .write_str("[paths]\ngo_folder = \"src\"\noutput_json_file = \"out.json\"\n\n[export]\nexpansion_policy = \"function3\"\n")
        .unwrap();

    cmd().current_dir(work.path()).assert().success();

    work.child("out.json")
        .assert(predicate::str::contains(r#""name":"AddAsync""#))
        .assert(predicate::str::contains("ReaderRead").not());
}

#[test]
fn syntax_error_fails_without_output() {
    let src = assert_fs::TempDir::new().unwrap();
    src.child("broken.go").write_str("package calc\nfunc Broken( {\n").unwrap();
    let out = src.child("docs.json");

    cmd()
        .arg("--go-folder")
        .arg(src.path())
        .arg("--output-json-file")
        .arg(out.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("broken.go"));

    out.assert(predicate::path::missing());
}

#[test]
fn missing_folder_flag_fails() {
    let work = assert_fs::TempDir::new().unwrap();

    cmd()
        .current_dir(work.path())
        .args(["--output-json-file", "out.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--go-folder"));
}

#[test]
fn version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
