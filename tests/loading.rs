use std::fs;
use std::path::Path;

use csvseek::domain::AppConfig;
use csvseek::loader::{available_files, load_table};
use csvseek::model::{Model, Status};
use csvseek::{DirectoryAccess, Error, FileAccess, LoadError, SearchScope};

fn fixture_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

#[test]
fn loads_fixture_from_directory() {
    let access = DirectoryAccess::new(fixture_dir());
    assert_eq!(available_files(&access, &[]), vec!["sample-data.csv"]);

    let table = load_table(&access, "sample-data.csv").unwrap();
    assert_eq!(table.headers().len(), 6);
    assert_eq!(table.nrows(), 12);
    assert!(table.rows()[3].get("age").unwrap().is_empty());
}

#[test]
fn missing_files_are_load_errors() {
    let access = DirectoryAccess::new(fixture_dir());
    let err = load_table(&access, "absent.csv").unwrap_err();
    assert!(matches!(err, Error::Load(LoadError::NotFound(_))));
    assert_eq!(err.to_string(), "Failed to load absent.csv: Not Found");
}

#[test]
fn model_runs_against_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("voters.csv"), "name,ward\nAsha,12\nRavi,2\n").unwrap();
    fs::write(dir.path().join("empty.csv"), "\n\n").unwrap();

    let config = AppConfig::default()
        .with_data_dir(dir.path())
        .with_files(vec!["voters.csv".into(), "ghost.csv".into(), "empty.csv".into()])
        .with_export_dir(dir.path().join("out"));
    let access = DirectoryAccess::new(config.data_dir.clone());
    assert!(access.exists("voters.csv"));

    let mut model = Model::init(&config, Box::new(access));
    assert_eq!(model.files(), &["voters.csv".to_string(), "empty.csv".to_string()]);
    assert_eq!(model.status, Status::Ready);

    model.set_search_term("2");
    model.set_scope(SearchScope::from("ward"));
    assert_eq!(model.display_len(), 2);
    assert_eq!(model.results_label().unwrap(), "Found 2 results in \"ward\"");

    model.update(Some(csvseek::domain::Message::Export)).unwrap();
    let exported = fs::read_to_string(dir.path().join("out/search-results.csv")).unwrap();
    assert_eq!(exported, "name,ward\nAsha,12\nRavi,2");

    model.load_data_file("empty.csv");
    assert_eq!(model.status, Status::Empty);
    assert_eq!(model.error(), Some("CSV file is empty"));
}
