use assert_cmd::prelude::*;
use predicates::ord::eq;
use predicates::prelude::*;
use predicates::str::{contains, PredicateStrExt};
use std::process::Command;
use tempfile::TempDir;

// `nosql-docs` with no args should exit with a non-zero code.
#[test]
fn docs_cli_no_args() {
    Command::cargo_bin("nosql-docs").unwrap().assert().failure();
}

// `nosql-docs -V` should print the version
#[test]
fn docs_cli_version() {
    Command::cargo_bin("nosql-docs")
        .unwrap()
        .args(&["-V"])
        .assert()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn docs_cli_list_empty() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("nosql-docs")
        .unwrap()
        .args(&["list"])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn docs_cli_insert_then_list() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");

    Command::cargo_bin("nosql-docs")
        .unwrap()
        .args(&["insert", "name=UCSF", "address=505 Parnassus Ave", "rank=3"])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::is_match("^[0-9a-f]{16}\n$").unwrap());

    Command::cargo_bin("nosql-docs")
        .unwrap()
        .args(&["list"])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(
            contains(r#""name":"UCSF""#)
                .and(contains(r#""address":"505 Parnassus Ave""#))
                .and(contains(r#""rank":3"#))
                .and(contains(r#""_id":""#)),
        );
}

#[test]
fn docs_cli_collection_option() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");

    Command::cargo_bin("nosql-docs")
        .unwrap()
        .args(&["--collection", "students", "insert", "name=Bob"])
        .current_dir(&temp_dir)
        .assert()
        .success();

    Command::cargo_bin("nosql-docs")
        .unwrap()
        .args(&["list"])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    Command::cargo_bin("nosql-docs")
        .unwrap()
        .args(&["--collection", "students", "list"])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(contains("Bob"));
}

#[test]
fn docs_cli_malformed_field() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("nosql-docs")
        .unwrap()
        .args(&["insert", "no-equals-sign"])
        .current_dir(&temp_dir)
        .assert()
        .failure()
        .stderr(contains("Expected NAME=VALUE"));
}

// `nosql-cache` with no args should exit with a non-zero code.
#[test]
fn cache_cli_no_args() {
    Command::cargo_bin("nosql-cache").unwrap().assert().failure();
}

#[test]
fn cache_cli_invalid_engine() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("nosql-cache")
        .unwrap()
        .args(&["--engine", "memcached", "store", "foo"])
        .current_dir(&temp_dir)
        .assert()
        .failure();
}

#[test]
fn cache_cli_store_prints_keys_and_replay() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("nosql-cache")
        .unwrap()
        .args(&["--engine", "sled", "store", "foo", "bar", "--replay"])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(
            contains("Cache::store was called 2 times:")
                .and(contains(r#"Cache::store(["foo"]) -> "#))
                .and(contains(r#"Cache::store(["bar"]) -> "#)),
        );
}

#[test]
fn cache_cli_store_without_instrumentation() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("nosql-cache")
        .unwrap()
        .args(&[
            "--engine",
            "sled",
            "--no-count",
            "--no-history",
            "store",
            "foo",
            "--replay",
        ])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(contains("Cache::store was called 0 times:"));
}

#[test]
fn cache_cli_roundtrip_int() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("nosql-cache")
        .unwrap()
        .args(&[
            "--engine", "sled", "roundtrip", "42", "--type", "int", "--as", "int",
        ])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(eq("42").trim());
}

#[test]
fn cache_cli_roundtrip_str() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("nosql-cache")
        .unwrap()
        .args(&["--engine", "sled", "roundtrip", "hello", "--as", "str"])
        .current_dir(&temp_dir)
        .assert()
        .success()
        .stdout(eq("hello").trim());
}

#[test]
fn cache_cli_rejects_bad_int() {
    let temp_dir = TempDir::new().expect("unable to create temporary working directory");
    Command::cargo_bin("nosql-cache")
        .unwrap()
        .args(&["--engine", "sled", "store", "abc", "--type", "int"])
        .current_dir(&temp_dir)
        .assert()
        .failure();
}
