//! End-to-end conversion of transcript folders into a SQLite dataset

use std::fs;
use std::path::Path;

use llmd_dataset_rust::config::DatabaseConfig;
use llmd_dataset_rust::db::Database;
use llmd_dataset_rust::hashing::hash_prompt;
use llmd_dataset_rust::{Converter, ConverterError};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("Failed to write fixture");
}

fn open(db_path: &Path) -> Database {
    Database::open(db_path, &DatabaseConfig::default()).expect("Failed to open database")
}

#[test]
fn test_single_conversation_list() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    write(
        &data_dir,
        "a.json",
        r#"[[{"role":"user","content":"hi"},{"role":"assistant","content":"hello world"}]]"#,
    );

    let summary = Converter::new()
        .convert(&data_dir, &db_path, &DatabaseConfig::default())
        .expect("conversion should succeed");
    assert_eq!(summary.processed_count, 1);
    assert_eq!(summary.error_count, 0);

    let db = open(&db_path);
    let rows = db.rows_by_hash(&hash_prompt("### user:\nhi\n")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].gen_tokens, vec!["hello", "world"]);
    assert_eq!(rows[0].n_gen_tokens, 2);
}

#[test]
fn test_flat_message_list_is_one_conversation() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    write(
        &data_dir,
        "a.json",
        r#"[{"role":"user","content":"hi"},{"role":"assistant","content":"hello world"}]"#,
    );

    let summary = Converter::new()
        .convert(&data_dir, &db_path, &DatabaseConfig::default())
        .unwrap();
    assert_eq!(summary.processed_count, 1);
    assert_eq!(summary.error_count, 0);

    let db = open(&db_path);
    assert_eq!(db.count_rows().unwrap(), 1);
    let rows = db.rows_by_hash(&hash_prompt("### user:\nhi\n")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].gen_tokens, vec!["hello", "world"]);
    assert_eq!(rows[0].n_gen_tokens, 2);
}

#[test]
fn test_list_of_conversations() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    write(
        &data_dir,
        "many.json",
        r#"[
            [{"role":"user","content":"first"},{"role":"assistant","content":"one"}],
            [{"role":"user","content":"second"},{"role":"assistant","content":"two more"}]
        ]"#,
    );

    let summary = Converter::new()
        .convert(&data_dir, &db_path, &DatabaseConfig::default())
        .unwrap();
    assert_eq!(summary.processed_count, 2);

    let db = open(&db_path);
    assert_eq!(db.rows_by_hash(&hash_prompt("### user:\nfirst\n")).unwrap()[0].gen_tokens, vec!["one"]);
    assert_eq!(db.rows_by_hash(&hash_prompt("### user:\nsecond\n")).unwrap()[0].n_gen_tokens, 2);
}

#[test]
fn test_single_message_document() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    write(&data_dir, "one.json", r#"{"role":"assistant","content":"foo bar"}"#);

    let summary = Converter::new()
        .convert(&data_dir, &db_path, &DatabaseConfig::default())
        .unwrap();
    assert_eq!(summary.processed_count, 1);

    let rows = open(&db_path).rows_by_hash(&hash_prompt("")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].gen_tokens, vec!["foo", "bar"]);
    assert_eq!(rows[0].n_gen_tokens, 2);
}

#[test]
fn test_yaml_mapping_of_conversations() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    write(
        &data_dir,
        "b.yaml",
        "conv1:\n  - role: human\n    content: what is rust\n  - role: assistant\n    content: a language\nconv2:\n  - role: user\n    content: thanks\n  - role: assistant\n    content: you are welcome\n",
    );

    let summary = Converter::new()
        .convert(&data_dir, &db_path, &DatabaseConfig::default())
        .unwrap();
    assert_eq!(summary.processed_count, 2);
    assert_eq!(summary.error_count, 0);

    let db = open(&db_path);
    assert_eq!(db.count_rows().unwrap(), 2);

    let first = db.rows_by_hash(&hash_prompt("### user:\nwhat is rust\n")).unwrap();
    assert_eq!(first[0].gen_tokens, vec!["a", "language"]);

    let second = db.rows_by_hash(&hash_prompt("### user:\nthanks\n")).unwrap();
    assert_eq!(second[0].n_gen_tokens, 3);
}

#[test]
fn test_empty_prompt_is_counted_as_error() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    write(
        &data_dir,
        "c.json",
        r#"[[{"role":"system","content":"x"},{"role":"assistant","content":""}]]"#,
    );

    let summary = Converter::new()
        .convert(&data_dir, &db_path, &DatabaseConfig::default())
        .unwrap();
    assert_eq!(summary.processed_count, 0);
    assert_eq!(summary.error_count, 1);
    assert_eq!(open(&db_path).count_rows().unwrap(), 0);
}

#[test]
fn test_missing_source_folder_leaves_database_untouched() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("does-not-exist");
    let db_path = temp_dir.path().join("out.db");

    let result = Converter::new().convert(&data_dir, &db_path, &DatabaseConfig::default());

    assert!(matches!(result, Err(ConverterError::DirectoryNotFound(_))));
    assert!(!db_path.exists());
}

#[test]
fn test_mixed_folder_accounts_for_every_unit() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    // 2 good conversations + 1 empty prompt
    write(
        &data_dir,
        "good.JSON",
        r#"[
            [{"role":"user","content":"a"},{"role":"assistant","content":"1 2 3"}],
            [{"role":"user","content":"b"},{"role":"assistant","content":"4"}],
            [{"role":"tool","content":"c"},{"role":"assistant","content":"5"}]
        ]"#,
    );
    // 1 file error each
    write(&data_dir, "bad.json", "{ not json");
    write(&data_dir, "notes.md", "# readme");
    write(&data_dir, "empty.yaml", "{}\n");

    let summary = Converter::new()
        .convert(&data_dir, &db_path, &DatabaseConfig::default())
        .unwrap();

    assert_eq!(summary.files_visited, 4);
    assert_eq!(summary.processed_count, 2);
    assert_eq!(summary.conversation_errors, 1);
    assert_eq!(summary.file_errors, 3);
    assert_eq!(summary.error_count, 4);
    assert_eq!(open(&db_path).count_rows().unwrap(), 2);
}

#[test]
fn test_repeated_runs_append_rows() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    write(&data_dir, "one.json", r#"{"role":"assistant","content":"again"}"#);

    let converter = Converter::new();
    converter.convert(&data_dir, &db_path, &DatabaseConfig::default()).unwrap();
    converter.convert(&data_dir, &db_path, &DatabaseConfig::default()).unwrap();

    assert_eq!(open(&db_path).count_rows().unwrap(), 2);
}

#[test]
fn test_empty_folder_creates_empty_database() {
    let temp_dir = tempdir().unwrap();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir(&data_dir).unwrap();
    let db_path = temp_dir.path().join("out.db");

    let summary = Converter::new()
        .convert(&data_dir, &db_path, &DatabaseConfig::default())
        .unwrap();

    assert_eq!(summary.processed_count, 0);
    assert_eq!(summary.error_count, 0);
    assert!(db_path.exists());
    assert_eq!(open(&db_path).count_rows().unwrap(), 0);
}
