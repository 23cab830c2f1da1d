use std::fs;

use bar_source::{
    SourceError,
    reader::read_raw_bars,
    store::{ObjectStore, local::LocalFsStore},
    symbol::{RAW_SUFFIX, symbol_from_path},
};
use tempfile::TempDir;

fn seed(dir: &TempDir) -> LocalFsStore {
    let prefix = dir.path().join("acct").join("raw").join("asxStocks");
    fs::create_dir_all(prefix.join("nested")).unwrap();
    fs::write(
        prefix.join("CBA_raw.csv"),
        "Date,Open,High,Low,Close,Volume\n2024-01-02,1,1,1,1,10\n",
    )
    .unwrap();
    fs::write(
        prefix.join("BHP.AX_raw.csv"),
        "Date,Open,High,Low,Close,Volume\n2024-01-02,2,2,2,2,20\n",
    )
    .unwrap();
    fs::write(prefix.join("README.txt"), "not a csv").unwrap();
    LocalFsStore::for_account(dir.path(), "acct")
}

#[test]
fn lists_matching_files_in_order() {
    let dir = TempDir::new().unwrap();
    let store = seed(&dir);

    let paths = store.list("raw/asxStocks/*.csv").unwrap();
    assert_eq!(
        paths,
        vec![
            "raw/asxStocks/BHP.AX_raw.csv".to_string(),
            "raw/asxStocks/CBA_raw.csv".to_string(),
        ]
    );

    let symbols: Vec<String> = paths
        .iter()
        .filter_map(|p| symbol_from_path(p, RAW_SUFFIX))
        .collect();
    assert_eq!(symbols, vec!["BHP.AX", "CBA"]);
}

#[test]
fn absent_prefix_lists_nothing() {
    let dir = TempDir::new().unwrap();
    let store = seed(&dir);
    assert!(store.list("raw/nope/*.csv").unwrap().is_empty());
}

#[test]
fn glob_in_directory_is_rejected() {
    let dir = TempDir::new().unwrap();
    let store = seed(&dir);
    let err = store.list("raw/*/x.csv").unwrap_err();
    assert!(matches!(err, SourceError::InvalidPattern { .. }));
}

#[test]
fn open_reads_bytes_and_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let store = seed(&dir);

    let bytes = store.open("raw/asxStocks/CBA_raw.csv").unwrap();
    let bars = read_raw_bars(bytes.as_slice()).unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].volume, Some(10));

    let err = store.open("raw/asxStocks/MISSING_raw.csv").unwrap_err();
    match err {
        SourceError::NotFound { path } => assert_eq!(path, "raw/asxStocks/MISSING_raw.csv"),
        other => panic!("unexpected error: {other}"),
    }
}
