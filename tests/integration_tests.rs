use chrono::NaiveDate;
use meteo_normalizer::config::PipelineConfig;
use meteo_normalizer::models::schema::header;
use meteo_normalizer::models::CleanedRecord;
use meteo_normalizer::processors::{Pipeline, RunSummary};
use meteo_normalizer::writers::partition_path;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const GOOD_ROW: &str =
    "farm2,meteo,21/06/2024 14:30,2024-06-21 14:31:02,Athens,Attica,25.3c,60%,12km/h,180,0mm,1013hpa,,,,";
const SHORT_ROW: &str = "farm3,meteo,21/06/2024 14:40,2024-06-21 14:41:00,Athens";
const DAMP_ROW: &str =
    "farm1,meteo,21/06/2024 14:50,2024-06-21 14:51:00,Athens,Attica,24.0c,damp,10km/h,170,0mm,1012hpa,,,,";

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
}

fn write_config(root: &Path, sources: &[&str]) -> PathBuf {
    let mut yaml = String::from(
        "farm_count: 4\n\
         civil_timezone: Europe/Athens\n\
         units:\n\
         \x20 temperature: c\n\
         \x20 humidity: \"%\"\n\
         \x20 wind_speed: km/h\n\
         \x20 wind_direction: deg\n\
         \x20 precipitation: mm\n\
         \x20 pressure: hpa\n\
         \x20 dew_point: c\n\
         \x20 heat_index: c\n\
         sources:\n",
    );
    for source in sources {
        yaml.push_str(&format!(
            "  {key}:\n    staging: \"{root}/staging/{key}.csv\"\n    raw: \"{root}/raw/{key}\"\n    cleaned: \"{root}/cleaned/{key}\"\n    failed: \"{root}/failed/{key}\"\n",
            key = source,
            root = root.display()
        ));
    }

    let path = root.join("pipeline.yaml");
    fs::write(&path, yaml).expect("Failed to write config");
    path
}

fn write_staging(root: &Path, source: &str, rows: &[&str]) -> PathBuf {
    let dir = root.join("staging");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join(format!("{}.csv", source));

    let mut contents = header().join(",");
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    fs::write(&path, contents).unwrap();
    path
}

fn partition(root: &Path, kind: &str, source: &str) -> PathBuf {
    partition_path(&root.join(kind).join(source), run_date())
}

fn data_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

fn run(config_path: &Path, dry_run: bool) -> RunSummary {
    let config = PipelineConfig::load(config_path).expect("Config should load");
    Pipeline::new(config)
        .unwrap()
        .with_run_date(run_date())
        .with_dry_run(dry_run)
        .with_silent(true)
        .run()
        .unwrap()
}

#[test]
fn test_end_to_end_run() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let root = temp_dir.path();
    let config = write_config(root, &["meteo"]);
    let staging = write_staging(root, "meteo", &[GOOD_ROW, SHORT_ROW, DAMP_ROW]);

    let summary = run(&config, false);
    let meteo = summary.source("meteo").unwrap();
    assert_eq!(meteo.rows_read, 3);
    assert_eq!(meteo.accepted, 1);
    assert_eq!(meteo.rejected_length, 1);
    assert_eq!(meteo.rejected_measurement, 1);
    assert_eq!(meteo.io_error, None);

    let cleaned = partition(root, "cleaned", "meteo");
    assert!(cleaned.ends_with("cleaned/meteo/2024/06/21.csv"));
    let mut reader = csv::Reader::from_path(&cleaned).unwrap();
    let records: Vec<CleanedRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.farm, "2");
    assert_eq!(record.source, "meteo");
    assert_eq!(record.timestamp, "2024-06-21 14:30:00.000000");
    assert_eq!(record.city, "Athens");
    assert_eq!(record.temperature, 25.3);
    assert_eq!(record.humidity, 60.0);
    assert_eq!(record.wind_speed, 12.0);
    assert_eq!(record.wind_direction, 180.0);
    assert_eq!(record.precipitation, 0.0);
    assert_eq!(record.pressure, 1013.0);
    assert_eq!(record.dew_point, None);
    assert_eq!(record.heat_index, None);
    assert_eq!(record.wind_chill, None);
    assert_eq!(record.solar_radiation, None);

    // rejected rows keep their raw form
    assert_eq!(
        data_lines(&partition(root, "failed", "meteo")),
        vec![SHORT_ROW.to_string(), DAMP_ROW.to_string()]
    );

    // every staging row lands in the raw archive, in order
    assert_eq!(
        data_lines(&partition(root, "raw", "meteo")),
        vec![GOOD_ROW.to_string(), SHORT_ROW.to_string(), DAMP_ROW.to_string()]
    );

    // staging keeps only its header
    let rotated = fs::read_to_string(&staging).unwrap();
    assert_eq!(rotated.trim_end(), header().join(","));
}

#[test]
fn test_second_run_appends_without_header() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = write_config(root, &["meteo"]);

    write_staging(root, "meteo", &[GOOD_ROW]);
    run(&config, false);
    write_staging(root, "meteo", &[GOOD_ROW]);
    let summary = run(&config, false);
    assert_eq!(summary.accepted(), 1);

    let contents = fs::read_to_string(partition(root, "cleaned", "meteo")).unwrap();
    let headers = contents
        .lines()
        .filter(|line| line.starts_with("farm,source"))
        .count();
    assert_eq!(headers, 1);
    assert_eq!(contents.lines().count(), 3);
}

#[test]
fn test_missing_staging_aborts_only_that_source() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = write_config(root, &["meteo", "soda"]);
    let staging = write_staging(root, "meteo", &[GOOD_ROW]);

    let summary = run(&config, false);
    assert_eq!(summary.io_errors(), 1);
    assert!(summary.source("soda").unwrap().io_error.is_some());
    assert_eq!(summary.source("meteo").unwrap().accepted, 1);

    assert!(!root.join("cleaned").join("soda").exists());
    assert!(partition(root, "cleaned", "meteo").exists());
    assert_eq!(
        fs::read_to_string(staging).unwrap().lines().count(),
        1,
        "meteo staging should be rotated"
    );
}

#[test]
fn test_partition_failure_keeps_unrouted_rows_only() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = write_config(root, &["meteo"]);
    let staging = write_staging(root, "meteo", &[GOOD_ROW, SHORT_ROW, DAMP_ROW]);

    // a plain file where the failed base directory should be
    let blocker = root.join("failed");
    fs::write(&blocker, "not a directory").unwrap();

    let summary = run(&config, false);
    let meteo = summary.source("meteo").unwrap();
    assert!(meteo.io_error.is_some());
    assert_eq!(meteo.rows_read, 1);
    assert_eq!(meteo.accepted, 1);

    // the rejected row was not half-written to the raw archive
    assert_eq!(
        data_lines(&partition(root, "raw", "meteo")),
        vec![GOOD_ROW.to_string()]
    );
    assert_eq!(
        data_lines(&staging),
        vec![SHORT_ROW.to_string(), DAMP_ROW.to_string()]
    );

    fs::remove_file(&blocker).unwrap();
    let summary = run(&config, false);
    let meteo = summary.source("meteo").unwrap();
    assert_eq!(meteo.io_error, None);
    assert_eq!(meteo.rows_read, 2);

    assert_eq!(data_lines(&partition(root, "cleaned", "meteo")).len(), 1);
    assert_eq!(
        data_lines(&partition(root, "raw", "meteo")),
        vec![GOOD_ROW.to_string(), SHORT_ROW.to_string(), DAMP_ROW.to_string()]
    );
    assert_eq!(
        data_lines(&partition(root, "failed", "meteo")),
        vec![SHORT_ROW.to_string(), DAMP_ROW.to_string()]
    );
    assert_eq!(
        fs::read_to_string(&staging).unwrap().trim_end(),
        header().join(",")
    );
}

#[test]
fn test_relabelled_staging_header_is_not_data() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = write_config(root, &["meteo"]);

    let staging = root.join("staging").join("meteo.csv");
    fs::create_dir_all(staging.parent().unwrap()).unwrap();
    fs::write(
        &staging,
        format!(
            "Farm,Source,Timestamp,Crawl Time,City,Region,Temperature,Humidity,Wind Speed,\
             Wind Direction,Precipitation,Pressure,Dew Point,Heat Index,Wind Chill,Solar Radiation\n{}\n",
            GOOD_ROW
        ),
    )
    .unwrap();

    let summary = run(&config, false);
    let meteo = summary.source("meteo").unwrap();
    assert_eq!(meteo.rows_read, 1);
    assert_eq!(meteo.accepted, 1);
    assert!(!partition(root, "failed", "meteo").exists());

    // the header is kept as found
    assert!(fs::read_to_string(&staging)
        .unwrap()
        .starts_with("Farm,Source,Timestamp,Crawl Time"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = write_config(root, &["meteo"]);
    let staging = write_staging(root, "meteo", &[GOOD_ROW, SHORT_ROW]);
    let before = fs::read_to_string(&staging).unwrap();

    let summary = run(&config, true);
    assert!(summary.dry_run);
    assert_eq!(summary.accepted(), 1);
    assert_eq!(summary.rejected(), 1);

    assert!(!root.join("raw").exists());
    assert!(!root.join("cleaned").exists());
    assert!(!root.join("failed").exists());
    assert_eq!(fs::read_to_string(&staging).unwrap(), before);
}

#[test]
fn test_epoch_source_with_derived_metrics() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = write_config(root, &["open-meteo"]);
    write_staging(
        root,
        "open-meteo",
        &["1,open-meteo,1700000000,2023-11-15 00:14:00,Heraklion,Crete,35c,60%,3.6 m/s,N,0.1 in,1012 hPa,,95f,,"],
    );

    let summary = run(&config, false);
    assert_eq!(summary.accepted(), 1, "{}", summary.generate_summary());

    let mut reader = csv::Reader::from_path(partition(root, "cleaned", "open-meteo")).unwrap();
    let records: Vec<CleanedRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
    let record = &records[0];

    assert_eq!(record.timestamp, "2023-11-15 00:13:20.000000");
    assert_eq!(record.wind_speed, 13.0);
    assert_eq!(record.wind_direction, 0.0);
    assert_eq!(record.precipitation, 2.5);
    // computed from temperature and humidity, reported value ignored
    assert_eq!(record.heat_index, Some(45.1));
    // wind chill has no configured unit
    assert_eq!(record.wind_chill, None);
}

#[test]
fn test_report_serializes() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let config = write_config(root, &["meteo"]);
    write_staging(root, "meteo", &[GOOD_ROW]);

    let summary = run(&config, false);
    let json = serde_json::to_string(&summary).unwrap();
    let parsed: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, summary);
    assert!(json.contains("\"run_date\":\"2024-06-21\""));
}
