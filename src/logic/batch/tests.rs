use tempfile::tempdir;

use super::*;
use crate::logic::tests::stub_engine;

fn header(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn read_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_log_header_written_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("log.csv");
    let cols = header(&["a", "b"]);

    {
        let mut log = CsvLog::open(&path, &cols).unwrap();
        log.append(&header(&["1", "2"])).unwrap();
        log.flush().unwrap();
    }
    {
        let mut log = CsvLog::open(&path, &cols).unwrap();
        log.append(&header(&["3", ""])).unwrap();
        log.flush().unwrap();
        assert_eq!(log.rows(), 1);
    }

    assert_eq!(read_lines(&path), vec!["a,b", "1,2", "3,"]);
}

#[test]
fn test_batch_writes_both_logs() {
    let dir = tempdir().unwrap();
    let engine = stub_engine(&[DatasetKind::Ckd]);

    let summary = BatchRunner::new(&engine)
        .with_output_dir(dir.path())
        .run(DatasetKind::Ckd, 0.5, "run1_")
        .unwrap();

    // 4 rows, half held out
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.result_log, dir.path().join("run1_ckd_result.csv"));
    assert_eq!(summary.lines_log, dir.path().join("run1_ckd_lines.csv"));
    assert!(summary.finished_at >= summary.started_at);

    let results = read_lines(&summary.result_log);
    assert_eq!(results[0], "Constant,Expected_CKD");
    assert_eq!(results.len(), 3);
    for line in &results[1..] {
        let (score, expected) = line.split_once(',').unwrap();
        assert_eq!(score, "100");
        assert!(expected == "ckd" || expected == "notckd");
    }

    let lines = read_lines(&summary.lines_log);
    let columns: Vec<&str> = lines[0].split(',').collect();
    assert_eq!(columns.len(), DatasetKind::Ckd.schema().fields.len());
    assert_eq!(columns[..3], ["age", "bp", "sg"]);
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_batch_appends_across_runs() {
    let dir = tempdir().unwrap();
    let engine = stub_engine(&[DatasetKind::Ckd]);
    let runner = BatchRunner::new(&engine).with_output_dir(dir.path());

    runner.run(DatasetKind::Ckd, 0.5, "").unwrap();
    let second = runner.run(DatasetKind::Ckd, 0.5, "").unwrap();

    assert_eq!(second.rows, 2);
    assert_eq!(read_lines(&second.result_log).len(), 5);
}

#[test]
fn test_batch_rejects_bad_ratio() {
    let dir = tempdir().unwrap();
    let engine = stub_engine(&[DatasetKind::Ckd]);
    let runner = BatchRunner::new(&engine).with_output_dir(dir.path());

    assert!(matches!(
        runner.run(DatasetKind::Ckd, 1.5, ""),
        Err(RiskError::Config(_))
    ));
}

#[test]
fn test_batch_requires_loaded_dataset() {
    let dir = tempdir().unwrap();
    let engine = stub_engine(&[DatasetKind::Ckd]);
    let runner = BatchRunner::new(&engine).with_output_dir(dir.path());

    assert!(matches!(
        runner.run(DatasetKind::MaternalHealth, 0.8, ""),
        Err(RiskError::DatasetNotLoaded(_))
    ));
}

#[test]
fn test_run_rows_scores_external_records() {
    let dir = tempdir().unwrap();
    let engine = stub_engine(&[DatasetKind::Ckd]);
    let csv = dir.path().join("external.csv");
    std::fs::write(&csv, "years,pressure,class\n55,90,ckd\n30,?,notckd\n41,70,ckd\n").unwrap();

    let renames = [("years", "age"), ("pressure", "bp"), ("class", "ckd")]
        .map(|(from, to)| (from.to_string(), to.to_string()));
    let rows = load_external(&csv, DatasetKind::Ckd, &renames).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains("age"));
    assert!(!rows[0].contains("years"));
    assert!(rows[1].get("bp").is_none());

    let summary = BatchRunner::new(&engine)
        .with_output_dir(dir.path())
        .run_rows(DatasetKind::Ckd, &rows, "ext_")
        .unwrap();

    assert_eq!(summary.rows, 3);
    assert_eq!(summary.result_log, dir.path().join("ext_ckd_result.csv"));
    let results = read_lines(&summary.result_log);
    assert_eq!(results[1..], ["100,ckd", "100,notckd", "100,ckd"]);

    // Missing pressure is filled from the nearest snapshot row
    let lines = read_lines(&summary.lines_log);
    let second: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(second[0], "30");
    assert!(!second[1].is_empty());
}

#[test]
fn test_load_external_missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        load_external(dir.path().join("absent.csv"), DatasetKind::Ckd, &[]),
        Err(RiskError::Io(_))
    ));
}
