//! Integration test: config load, CSV read, feature stages, alignment, stub model, metrics.

use attack_inference::{
    config::{FeaturesConfig, PipelineConfig},
    dataset::{Table, Value},
    features::{derive_fields, schema::*, AlignedMatrix, FeaturePipeline, Vocabulary},
    inference::InferencePipeline,
    model::Classifier,
    PipelineError,
};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const LOG: &str = "\
Timestamp,Source IP Address,Destination IP Address,Source Port,Destination Port,Protocol,Packet Length,Packet Type,Traffic Type,Malware Indicators,Anomaly Scores,Alerts/Warnings,Attack Type,Attack Signature,Action Taken,Severity Level,Device Information,Network Segment,Firewall Logs,IDS/IPS Alerts,Log Source
2023-05-30 06:33:58,10.0.0.1,8.8.8.8,80,31225,ICMP,503,Data,HTTP,IoC Detected,28.67,,DDoS,Known Pattern B,Logged,Low,Mozilla/5.0 (Windows NT 6.2; Win64),Segment A,Log Data,,Server
2023-08-26 07:08:30,192.168.1.5,1.1.1.1,8080,17245,UDP,1174,Data,HTTP,IoC Detected,51.5,,Malware,Known Pattern A,Blocked,Medium,Opera/9.80 (X11; Linux i686),Segment B,Log Data,Alert Data,Firewall
2022-11-13 08:23:25,172.16.0.1,9.9.9.9,50000,6131,UDP,306,Control,HTTP,,87.42,Alert Triggered,Intrusion,Known Pattern B,Ignored,High,Mozilla/5.0 (Linux; Android 10),Segment C,,Alert Data,Firewall
";

fn log_table() -> Table {
    Table::from_csv_reader(LOG.as_bytes()).unwrap()
}

fn numbers(t: &Table, column: &str) -> Vec<f64> {
    t.column(column)
        .unwrap()
        .into_iter()
        .map(|v| v.as_f64().unwrap())
        .collect()
}

fn texts(t: &Table, column: &str) -> Vec<String> {
    t.column(column).unwrap().into_iter().map(|v| v.to_string()).collect()
}

/// Returns fixed labels and remembers nothing between calls.
struct StubClassifier {
    names: Vec<String>,
    labels: Vec<i64>,
    vocabulary: Option<Vocabulary>,
}

impl StubClassifier {
    fn new(names: &[&str], labels: &[i64]) -> Self {
        Self {
            names: names.iter().map(|s| s.to_string()).collect(),
            labels: labels.to_vec(),
            vocabulary: None,
        }
    }
}

impl Classifier for StubClassifier {
    fn feature_names(&self) -> &[String] {
        &self.names
    }

    fn vocabulary(&self) -> Option<&Vocabulary> {
        self.vocabulary.as_ref()
    }

    fn predict(&self, features: &AlignedMatrix) -> attack_inference::Result<Vec<i64>> {
        assert_eq!(features.feature_names(), self.names.as_slice());
        Ok(self.labels[..features.nrows()].to_vec())
    }
}

#[test]
fn config_load_default() {
    let c = PipelineConfig::load(Path::new("nonexistent.json"));
    assert_eq!(c.features.selected_columns.len(), 26);
    assert_eq!(c.features.categorical_columns.len(), 16);
    assert!(c.log.json);
}

#[test]
fn config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"model_path":"m/clf.onnx","log":{"level":"debug","json":false}}"#).unwrap();
    let c = PipelineConfig::load(&path);
    assert_eq!(c.log.level, "debug");
    assert_eq!(c.manifest_path(), Path::new("m/clf.features.json"));
}

#[test]
fn derived_fields_for_three_rows() {
    let d = derive_fields(&log_table()).unwrap();
    assert_eq!(numbers(&d, SEVERITY_LEVEL_NUMERIC), vec![1.0, 2.0, 3.0]);
    assert_eq!(numbers(&d, IS_SOURCE_PRIVATE), vec![1.0, 1.0, 1.0]);
    assert_eq!(numbers(&d, IS_DESTINATION_PRIVATE), vec![0.0, 0.0, 0.0]);
    assert_eq!(texts(&d, SOURCE_PORT_CATEGORY), vec!["Well-known", "Registered", "Dynamic"]);
    assert_eq!(texts(&d, DESTINATION_PORT_CATEGORY), vec!["Registered", "Registered", "Registered"]);
    assert_eq!(texts(&d, BROWSER), vec!["Mozilla", "Opera", "Mozilla"]);
    assert_eq!(texts(&d, OPERATING_SYSTEM), vec!["Windows", "Linux", "Android"]);
    assert_eq!(numbers(&d, HOUR), vec![6.0, 7.0, 8.0]);
    assert_eq!(numbers(&d, IS_NIGHT_TRAFFIC), vec![1.0, 0.0, 0.0]);
    // Tuesday, Saturday, Sunday with Monday = 0
    assert_eq!(numbers(&d, DAY_OF_WEEK), vec![1.0, 5.0, 6.0]);
    assert_eq!(numbers(&d, IS_WEEKEND), vec![0.0, 0.0, 1.0]);
    assert_eq!(numbers(&d, ATTACK_TYPE_NUMERIC), vec![0.0, 1.0, 2.0]);
}

#[test]
fn unmapped_labels_are_missing_not_errors() {
    let data = LOG.replace(",Low,", ",Critical,").replace(",DDoS,", ",Phishing,");
    let d = derive_fields(&Table::from_csv_reader(data.as_bytes()).unwrap()).unwrap();
    assert!(d.get(0, SEVERITY_LEVEL_NUMERIC).unwrap().is_missing());
    assert!(d.get(0, ATTACK_TYPE_NUMERIC).unwrap().is_missing());
}

#[test]
fn duplicate_rows_removed_before_derivation() {
    let mut data = LOG.to_string();
    data.push_str(LOG.lines().nth(1).unwrap());
    data.push('\n');
    let raw = Table::from_csv_reader(data.as_bytes()).unwrap();
    assert_eq!(raw.len(), 4);
    assert_eq!(derive_fields(&raw).unwrap().len(), 3);
}

#[test]
fn bad_timestamp_is_data_error() {
    let data = LOG.replace("2023-05-30 06:33:58", "not a time");
    match derive_fields(&Table::from_csv_reader(data.as_bytes()).unwrap()) {
        Err(PipelineError::Data { column, reason }) => {
            assert_eq!(column, TIMESTAMP);
            assert!(reason.contains("not a time"));
        }
        other => panic!("unexpected {:?}", other),
    }
}

fn data_error_column(data: &str) -> String {
    match derive_fields(&Table::from_csv_reader(data.as_bytes()).unwrap()) {
        Err(PipelineError::Data { column, .. }) => column,
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn out_of_range_port_is_data_error() {
    let data = LOG.replace(",80,31225,", ",70000,31225,");
    assert_eq!(data_error_column(&data), SOURCE_PORT);
}

#[test]
fn malformed_ip_is_data_error() {
    let data = LOG.replace(",10.0.0.1,", ",abc,");
    assert_eq!(data_error_column(&data), SOURCE_IP);
}

#[test]
fn missing_device_cell_is_data_error() {
    let data = LOG.replace(",Mozilla/5.0 (Windows NT 6.2; Win64),", ",,");
    assert_eq!(data_error_column(&data), DEVICE_INFORMATION);
}

#[test]
fn dedup_compares_timestamp_text() {
    let mut data = LOG.to_string();
    let first = LOG.lines().nth(1).unwrap();
    data.push_str(&first.replace("2023-05-30 06:33:58", "2023-05-30T06:33:58"));
    data.push('\n');
    let raw = Table::from_csv_reader(data.as_bytes()).unwrap();
    assert_eq!(derive_fields(&raw).unwrap().len(), 4);
}

#[test]
fn missing_raw_column_is_data_error() {
    let raw = log_table().drop_columns(&[DEVICE_INFORMATION]);
    assert!(matches!(derive_fields(&raw), Err(PipelineError::Data { .. })));
}

#[test]
fn missing_selected_column_is_schema_error() {
    let raw = log_table().drop_columns(&["Log Source"]);
    let r = FeaturePipeline::new(FeaturesConfig::default()).prepare(&raw, None);
    assert!(matches!(r, Err(PipelineError::Schema { column }) if column == "Log Source"));
}

#[test]
fn full_feature_set_is_encoded() {
    let batch = FeaturePipeline::new(FeaturesConfig::default())
        .prepare(&log_table(), None)
        .unwrap();
    let e = &batch.encoded;
    let untouched: Vec<&str> = SELECTED_COLUMNS
        .iter()
        .filter(|c| !CATEGORICAL_COLUMNS.contains(c))
        .copied()
        .collect();
    assert_eq!(untouched.len(), 10);
    assert_eq!(e.columns()[..10], untouched[..]);
    assert!(!e.has_column("Protocol"));
    assert!(e.has_column("Protocol_ICMP"));
    assert!(e.has_column("Malware Indicators_nan"));
    assert!(e.has_column("Operating System_Android"));
    assert!(e.has_column("Source Port Category_Dynamic"));
    assert_eq!(e.get(2, "Severity Level_High"), Some(&Value::Number(1.0)));
    assert_eq!(batch.ground_truth, vec![Some(0), Some(1), Some(2)]);
}

#[test]
fn run_with_perfect_predictions() {
    let model = StubClassifier::new(
        &["Hour", "Packet Length", "Protocol_UDP", "Protocol_TCP", IS_SOURCE_PRIVATE],
        &[0, 1, 2],
    );
    let out = InferencePipeline::new(FeaturesConfig::default())
        .run(&log_table(), &model)
        .unwrap();

    assert_eq!(out.metrics.accuracy, 1.0);
    assert_eq!(out.metrics.precision, 1.0);
    assert_eq!(out.metrics.recall, 1.0);
    assert_eq!(out.metrics.f1, 1.0);

    assert_eq!(out.summary.missing_features, vec!["Protocol_TCP".to_string()]);
    assert!(out.summary.dropped_features.contains(&"Protocol_ICMP".to_string()));
    assert_eq!(
        out.predictions.columns(),
        &[
            "Hour".to_string(),
            "Packet Length".to_string(),
            "Protocol_UDP".to_string(),
            "Protocol_TCP".to_string(),
            IS_SOURCE_PRIVATE.to_string(),
            PREDICTIONS.to_string(),
        ]
    );
    assert_eq!(numbers(&out.predictions, "Protocol_TCP"), vec![0.0, 0.0, 0.0]);
    assert_eq!(numbers(&out.predictions, "Protocol_UDP"), vec![0.0, 1.0, 1.0]);
    assert_eq!(numbers(&out.predictions, PREDICTIONS), vec![0.0, 1.0, 2.0]);
}

#[test]
fn run_scores_mistakes() {
    let model = StubClassifier::new(&["Hour"], &[0, 0, 2]);
    let out = InferencePipeline::new(FeaturesConfig::default())
        .run(&log_table(), &model)
        .unwrap();
    assert!((out.metrics.accuracy - 2.0 / 3.0).abs() < 1e-9);
    assert!(out.metrics.f1 < 1.0);
}

#[test]
fn run_uses_model_vocabulary() {
    let fitted = FeaturePipeline::new(FeaturesConfig::default())
        .prepare(&log_table(), None)
        .unwrap()
        .vocabulary;
    let only_first: String = LOG.lines().take(2).map(|l| format!("{}\n", l)).collect();
    let mut model = StubClassifier::new(&["Protocol_ICMP", "Protocol_UDP"], &[0]);
    model.vocabulary = Some(fitted);

    let out = InferencePipeline::new(FeaturesConfig::default())
        .run(&Table::from_csv_reader(only_first.as_bytes()).unwrap(), &model)
        .unwrap();
    // UDP is known from the vocabulary, so it is encoded rather than zero-filled
    assert!(out.summary.missing_features.is_empty());
    assert_eq!(numbers(&out.predictions, "Protocol_ICMP"), vec![1.0]);
}

#[test]
fn empty_contract_is_alignment_error() {
    let model = StubClassifier::new(&[], &[0, 1, 2]);
    let r = InferencePipeline::new(FeaturesConfig::default()).run(&log_table(), &model);
    assert!(matches!(r, Err(PipelineError::Alignment(_))));
}

#[test]
fn csv_file_roundtrip_through_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("traffic.csv");
    File::create(&path).unwrap().write_all(LOG.as_bytes()).unwrap();

    let raw = Table::from_csv_path(&path).unwrap();
    let model = StubClassifier::new(&["Packet Length", IS_WEEKEND], &[0, 1, 2]);
    let out = InferencePipeline::new(FeaturesConfig::default())
        .run(&raw, &model)
        .unwrap();

    let out_path = dir.path().join("predictions.csv");
    out.predictions.write_csv(File::create(&out_path).unwrap()).unwrap();
    let written = std::fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("Packet Length,Is Weekend,Predictions\n503,0,0\n"));
    assert_eq!(out.summary.rows, 3);
}
