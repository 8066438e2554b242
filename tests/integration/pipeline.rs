#![allow(missing_docs)]

mod support;

use std::fs;

use bench_diagrams::{
    discover_reports, load_table, run, window, DiagramConfig, DiagramError, NamePattern, Outcome,
    PrintFormat, Table,
};
use serde_json::Value;
use support::{CriterionDir, SIZES};

fn config(fixture: &CriterionDir) -> DiagramConfig {
    DiagramConfig {
        criterion_dir: fixture.criterion_dir().to_path_buf(),
        outdir: fixture.outdir(),
        ..DiagramConfig::new(fixture.bench.clone())
    }
}

#[test]
fn only_matching_directories_become_records() {
    let fixture = CriterionDir::new("mybench");
    fixture.populate(&["fast", "slow"], 6);
    fs::create_dir_all(fixture.bench_dir().join("report")).expect("report dir");
    fs::create_dir_all(fixture.bench_dir().join("mybench_0_4k_lower")).expect("lowercase dir");
    fixture.add_raw("otherbench_0_4K_fast", &support::estimates_json(1.0));
    fs::write(fixture.bench_dir().join("mybench_9_9K_file"), "not a dir").expect("file");

    let reports = discover_reports(&fixture.bench_dir(), &NamePattern::new("mybench"))
        .expect("discover");
    assert_eq!(reports.len(), 12);
    assert!(reports.iter().all(|r| r.name.starts_with("mybench_")));
    assert!(reports.iter().all(|r| r.group == "fast" || r.group == "slow"));

    let run = reports
        .iter()
        .find(|r| r.name == "mybench_2_4K_fast")
        .expect("third fast run");
    assert_eq!((run.idx, run.size.as_str()), (2, "4K"));
}

#[test]
fn rows_are_ordered_by_run_index() {
    let fixture = CriterionDir::new("mybench");
    let sizes = ["4K", "8K", "16K", "32K", "64K", "128K"];
    // Lexical listing order would put 128K and 16K first.
    for idx in [5, 2, 0, 4, 1, 3] {
        fixture.add_run(idx, sizes[idx], "fast", 100.0 * idx as f64);
    }
    let table = load_table(&config(&fixture)).expect("table");
    assert_eq!(table.rows(), sizes);
    assert_eq!(
        table.columns()[0].values,
        vec![0.0, 100.0, 200.0, 300.0, 400.0, 500.0]
    );
}

#[test]
fn estimate_selector_picks_the_field() {
    let fixture = CriterionDir::new("ipc");
    fixture.populate(&["epoll"], 3);
    let cfg = DiagramConfig {
        estimate: "std_dev".into(),
        ..config(&fixture)
    };
    let table = load_table(&cfg).expect("table");
    assert_eq!(table.columns()[0].values, vec![3.0, 3.0, 3.0]);

    let cfg = DiagramConfig {
        estimate: "mean".into(),
        ..config(&fixture)
    };
    let table = load_table(&cfg).expect("table");
    // 1000.75 truncated.
    assert_eq!(table.columns()[0].values[0], 1000.0);
}

#[test]
fn show_only_prints_and_writes_nothing() {
    let fixture = CriterionDir::new("ipc");
    fixture.populate(&["epoll", "uring"], 4);
    let cfg = DiagramConfig {
        show_only: true,
        ..config(&fixture)
    };
    let mut out = Vec::new();
    let outcome = run(&cfg, &mut out).expect("run");
    assert!(matches!(outcome, Outcome::Printed(ref table) if table.row_count() == 4));
    assert!(!fixture.outdir().exists());

    let text = String::from_utf8(out).expect("utf8");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].contains("epoll") && lines[0].contains("uring"));
    assert!(lines[1].starts_with("1K"));
    assert!(lines[1].ends_with("1250"));
}

#[test]
fn show_only_json_lists_rows_and_columns() {
    let fixture = CriterionDir::new("ipc");
    fixture.populate(&["epoll"], 2);
    let cfg = DiagramConfig {
        show_only: true,
        print_format: PrintFormat::Json,
        ..config(&fixture)
    };
    let mut out = Vec::new();
    run(&cfg, &mut out).expect("run");
    let json: Value = serde_json::from_slice(&out).expect("json");
    assert_eq!(json["rows"], serde_json::json!(["1K", "2K"]));
    assert_eq!(json["columns"][0]["name"], "epoll");
    assert_eq!(json["columns"][0]["values"], serde_json::json!([1000.0, 2000.0]));
}

#[test]
fn renders_four_windows() {
    let fixture = CriterionDir::new("ipc");
    fixture.populate(&["epoll", "io_uring"], SIZES.len());
    let cfg = config(&fixture);
    let mut out = Vec::new();
    let Outcome::Rendered(paths) = run(&cfg, &mut out).expect("run") else {
        panic!("expected rendered outcome");
    };
    assert!(out.is_empty());

    let expected: Vec<_> = ["first_5", "mid_5", "last_5", "all"]
        .iter()
        .map(|name| fixture.outdir().join(format!("ipc_{name}.svg")))
        .collect();
    assert_eq!(paths, expected);
    for path in &paths {
        assert!(path.is_file(), "{} missing", path.display());
    }

    let first = fs::read_to_string(&paths[0]).expect("first_5");
    assert!(first.contains("ipc_first_5"));
    assert!(first.contains("Measurement (ns)"));
    assert!(first.contains("Buffer Size"));

    let mid = support::svg_texts(&fs::read_to_string(&paths[1]).expect("mid_5"));
    assert!(mid.iter().any(|t| t == "Measurement (us)"));
    for size in &SIZES[3..8] {
        assert!(mid.iter().any(|t| t == size), "{size} missing from mid_5");
    }
    assert!(!mid.iter().any(|t| t == "4K" || t == "256K"));
    assert!(mid.iter().any(|t| t == "io_uring"));
}

#[test]
fn existing_diagrams_are_overwritten() {
    let fixture = CriterionDir::new("ipc");
    fixture.populate(&["epoll"], 6);
    let stale = fixture.outdir().join("ipc_all.svg");
    fs::create_dir_all(fixture.outdir()).expect("outdir");
    fs::write(&stale, "stale").expect("stale file");

    run(&config(&fixture), &mut Vec::new()).expect("run");
    let svg = fs::read_to_string(&stale).expect("svg");
    assert!(svg.contains("<svg"));
}

#[test]
fn missing_estimates_file_aborts() {
    let fixture = CriterionDir::new("ipc");
    fixture.populate(&["epoll"], 3);
    fs::create_dir_all(fixture.bench_dir().join("ipc_3_8K_epoll")).expect("empty run dir");
    let err = load_table(&config(&fixture)).unwrap_err();
    assert!(matches!(err, DiagramError::ReadEstimates { .. }), "{err}");
}

#[test]
fn malformed_estimates_abort() {
    let fixture = CriterionDir::new("ipc");
    fixture.populate(&["epoll"], 3);
    fixture.add_raw("ipc_3_8K_epoll", "{ not json");
    let err = load_table(&config(&fixture)).unwrap_err();
    assert!(matches!(err, DiagramError::ParseEstimates { .. }), "{err}");
}

#[test]
fn missing_bench_directory_aborts() {
    let fixture = CriterionDir::new("ipc");
    let cfg = DiagramConfig {
        bench: "absent".into(),
        ..config(&fixture)
    };
    let err = load_table(&cfg).unwrap_err();
    assert!(matches!(err, DiagramError::ReadDir { .. }), "{err}");
}

#[test]
fn no_matching_runs_is_an_error() {
    let fixture = CriterionDir::new("ipc");
    fs::create_dir_all(fixture.bench_dir().join("report")).expect("report dir");
    let err = load_table(&config(&fixture)).unwrap_err();
    assert!(matches!(err, DiagramError::NoReports { .. }), "{err}");
}

#[test]
fn unsupported_format_fails_before_writing() {
    let fixture = CriterionDir::new("ipc");
    fixture.populate(&["epoll"], 3);
    let cfg = DiagramConfig {
        format: "pdf".into(),
        ..config(&fixture)
    };
    let err = run(&cfg, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, DiagramError::UnsupportedFormat(ref f) if f == "pdf"));
    assert!(!fixture.outdir().exists());
}

#[test]
fn micro_conversion_divides_by_one_thousand() {
    let table = Table::new(
        vec!["4K".into()],
        vec![bench_diagrams::Column {
            name: "g".into(),
            values: vec![5000.0],
        }],
    )
    .expect("table");
    let [first, mid, ..] = window::windows(table.row_count());
    assert_eq!(table.scaled(first.unit.divisor()).columns()[0].values, vec![5000.0]);
    assert_eq!(table.scaled(mid.unit.divisor()).columns()[0].values, vec![5.0]);
}
