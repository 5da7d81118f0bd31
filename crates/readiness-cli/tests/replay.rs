use pretty_assertions::assert_eq;
use readiness_cli::{build_driver, AppConfig, DriverError, Script, ScriptSource, SinkConfig};
use readiness_core::{Classification, Session, Stage};
use readiness_sink::SinkFormat;
use std::fs;
use std::path::{Path, PathBuf};

fn demo(name: &str) -> Script {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos").join(name);
    Script::load(&path).unwrap()
}

fn config(dir: &Path, format: SinkFormat) -> AppConfig {
    AppConfig {
        output_dir: dir.join("reports"),
        log_filter: None,
        sink: SinkConfig {
            format,
            path: dir.join(match format {
                SinkFormat::Csv => "responses.csv",
                SinkFormat::Jsonl => "responses.jsonl",
            }),
        },
    }
}

fn pdfs_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "pdf"))
        .collect()
}

#[test]
fn owner_demo_writes_report_and_csv_row() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), SinkFormat::Csv);
    let driver = build_driver(&config);

    let summary = driver
        .run(&mut Session::new(), &mut ScriptSource::new(demo("owner.yaml")).strict(true))
        .unwrap();

    assert_eq!(summary.final_stage, Stage::Complete);
    assert_eq!(summary.classification, Classification::Owner);
    assert!(summary.warnings.is_empty(), "{:?}", summary.warnings);

    let pdfs = pdfs_in(&config.output_dir);
    assert_eq!(pdfs.len(), 1);
    let name = pdfs[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("Business_Readiness_Report_"), "{name}");
    assert!(fs::read(&pdfs[0]).unwrap().starts_with(b"%PDF-"));

    let csv = fs::read_to_string(&config.sink.path).unwrap();
    assert_eq!(csv.lines().count(), 1);
    assert!(csv.contains(",REG-O-003,41–50,Other,6,"));
    assert!(!csv.contains("Running Business"));
}

#[test]
fn starter_demo_backs_out_of_owner_branch() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), SinkFormat::Jsonl);
    let driver = build_driver(&config);

    let summary = driver
        .run(&mut Session::new(), &mut ScriptSource::new(demo("starter.yaml")).strict(true))
        .unwrap();

    assert_eq!(summary.classification, Classification::Starter);
    assert_eq!(summary.completed, 1);
    let name = summary.reports[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("Starter_Report_"), "{name}");

    let row: serde_json::Value =
        serde_json::from_str(fs::read_to_string(&config.sink.path).unwrap().trim()).unwrap();
    let fields = row["fields"].as_object().unwrap();
    assert_eq!(fields.len(), 4 + 10);
    assert_eq!(fields["s7"], "Partially");
}

#[test]
fn future_demo_completes() {
    let dir = tempfile::tempdir().unwrap();
    let driver = build_driver(&config(dir.path(), SinkFormat::Csv));
    let summary = driver
        .run(&mut Session::new(), &mut ScriptSource::new(demo("future.yaml")))
        .unwrap();
    assert_eq!(summary.classification, Classification::Future);
    assert_eq!(summary.rejected, 0);
}

#[test]
fn strict_replay_stops_on_incomplete_stage() {
    let dir = tempfile::tempdir().unwrap();
    let driver = build_driver(&config(dir.path(), SinkFormat::Csv));
    let script = Script::from_yaml(
        "steps:\n  - action: submit\n    answers:\n      Registration Code: REG-X\n",
    )
    .unwrap();

    let err = driver
        .run(&mut Session::new(), &mut ScriptSource::new(script).strict(true))
        .unwrap_err();
    assert!(matches!(err, DriverError::StepRejected { step: 1, .. }));
}

#[test]
fn sample_config_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/readiness.toml");
    let config = AppConfig::load(&path, true).unwrap();
    assert_eq!(config.sink.format, SinkFormat::Csv);
    assert_eq!(config.output_dir, PathBuf::from("reports"));
}
