use std::fs;
use std::path::Path;

use zip_opportunity::config::{CensusConfig, PipelineConfig};
use zip_opportunity::income::{
    CensusIncomeClient, IncomeFetchError, IncomeRecord, IncomeStatus, IncomeTable,
    StaticIncomeSource,
};
use zip_opportunity::pipeline;
use zip_opportunity::ZipCode;

const CENTER_LON: f64 = -78.8260;
const CENTER_LAT: f64 = 35.8587;

fn square(lon: f64, lat: f64, half: f64) -> String {
    format!(
        "[[[{w}, {s}], [{e}, {s}], [{e}, {n}], [{w}, {n}], [{w}, {s}]]]",
        w = lon - half,
        e = lon + half,
        s = lat - half,
        n = lat + half
    )
}

fn boundaries_geojson() -> String {
    let features = [
        ("27606", square(-78.83, 35.86, 0.02)),
        ("27513", square(-78.60, 35.86, 0.05)),
        ("27519", square(-78.95, 35.80, 0.03)),
        // Asheville: present everywhere else, far outside the region.
        ("28801", square(-82.55, 35.59, 0.05)),
    ];

    let features = features
        .iter()
        .map(|(zip, coords)| {
            format!(
                r#"{{"type":"Feature","properties":{{"ZCTA5CE20":"{zip}"}},"geometry":{{"type":"Polygon","coordinates":{coords}}}}}"#
            )
        })
        .collect::<Vec<_>>()
        .join(",");

    format!(r#"{{"type":"FeatureCollection","features":[{features}]}}"#)
}

const HOUSING: &str = "\"GEO_ID\",\"NAME\",\"B25024_001E\",\"B25024_002E\",\"B25024_003E\"\n\
\"Geography\",\"Geographic Area Name\",\"Estimate!!Total:\",\"Estimate!!Total:!!1, detached\",\"Estimate!!Total:!!1, attached\"\n\
\"860Z200US27606\",\"ZCTA5 27606\",\"21000\",\"6500\",\"1200\"\n\
\"860Z200US27513\",\"ZCTA5 27513\",\"19000\",\"9000\",\"600\"\n\
\"860Z200US27519\",\"ZCTA5 27519\",\"17000\",\"*****\",\"900\"\n\
\"860Z200US28801\",\"ZCTA5 28801\",\"9000\",\"4000\",\"300\"\n";

fn income_table() -> IncomeTable {
    let rows = [
        ("27606", Some(71_250.0)),
        ("27513", Some(98_000.0)),
        ("27519", Some(150_000.0)),
        ("28801", Some(55_000.0)),
    ];
    IncomeTable::from_records(
        rows.iter()
            .map(|(zip, income)| IncomeRecord {
                name: format!("ZCTA5 {zip}"),
                zip: ZipCode::parse(zip).expect("zip"),
                median_household_income: *income,
            })
            .collect(),
    )
}

fn fixture_config(dir: &Path) -> PipelineConfig {
    let boundary_path = dir.join("zcta.geojson");
    let housing_csv_path = dir.join("housing.csv");
    fs::write(&boundary_path, boundaries_geojson()).expect("write boundaries");
    fs::write(&housing_csv_path, HOUSING).expect("write housing");

    PipelineConfig {
        center_lon: CENTER_LON,
        center_lat: CENTER_LAT,
        radius_meters: 30_000.0,
        boundary_path,
        zip_field: "ZCTA5CE20".to_string(),
        housing_csv_path,
        output_csv_path: dir.join("scores.csv"),
    }
}

#[tokio::test]
async fn pipeline_scores_region_and_writes_sorted_csv() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = fixture_config(dir.path());

    let report = pipeline::run(&config, &StaticIncomeSource::table(income_table()))
        .await
        .expect("pipeline completes");

    assert_eq!(report.boundaries_loaded, 4);
    assert_eq!(report.zctas_in_region, 3);
    assert_eq!(report.housing_rows, 4);
    assert_eq!(report.income, IncomeStatus::Loaded { rows: 4 });
    assert_eq!(report.scored_rows(), 2);

    let written = fs::read_to_string(&config.output_csv_path).expect("output exists");
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(
        lines,
        vec![
            "ZIP Code,Total_Single_Family_Homes,Median_Household_Income,Adjusted_Opportunity_Score",
            "27513,9600,98000,940800000",
            "27606,7700,71250,548625000",
            "27519,,150000,",
        ]
    );
    assert!(!written.contains("28801"));
}

#[tokio::test]
async fn failed_income_lookup_still_writes_every_region_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = fixture_config(dir.path());
    let failing =
        StaticIncomeSource::failing(IncomeFetchError::Transport("connection refused".into()));

    let report = pipeline::run(&config, &failing)
        .await
        .expect("pipeline completes without income");

    assert!(matches!(
        report.income,
        IncomeStatus::Unavailable {
            category: "transport",
            ..
        }
    ));
    assert_eq!(report.rows.len(), 3);
    assert!(report.rows.iter().all(|row| {
        row.median_household_income.is_none() && row.adjusted_opportunity_score.is_none()
    }));

    let written = fs::read_to_string(&config.output_csv_path).expect("output exists");
    assert_eq!(written.lines().count(), 4);
}

#[tokio::test]
async fn skipped_income_lookup_is_reported_as_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = fixture_config(dir.path());

    let report = pipeline::run_without_income(&config)
        .await
        .expect("pipeline completes without income");

    assert_eq!(report.income, IncomeStatus::Skipped);
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.scored_rows(), 0);
    assert!(report
        .rows
        .iter()
        .all(|row| row.median_household_income.is_none()));

    let written = fs::read_to_string(&config.output_csv_path).expect("output exists");
    assert!(written.contains("27513,9600,,"));
}

#[tokio::test]
async fn unreachable_census_api_degrades_to_missing_income() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = fixture_config(dir.path());

    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    let client = CensusIncomeClient::new(CensusConfig {
        base_url: format!("http://127.0.0.1:{port}/data"),
        timeout_secs: 5,
        ..CensusConfig::default()
    })
    .expect("client builds");

    let report = pipeline::run(&config, &client)
        .await
        .expect("pipeline completes");

    assert_eq!(report.rows.len(), 3);
    assert!(report
        .rows
        .iter()
        .all(|row| row.adjusted_opportunity_score.is_none()));
}

#[tokio::test]
async fn missing_housing_extract_aborts_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = fixture_config(dir.path());
    config.housing_csv_path = dir.path().join("absent.csv");

    let error = pipeline::run(&config, &StaticIncomeSource::default())
        .await
        .expect_err("housing extract is required");
    assert!(error.to_string().starts_with("housing error"));
    assert!(!config.output_csv_path.exists());
}
