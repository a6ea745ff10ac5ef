//! End-to-end runs of the command line front-end against cached data.

use clap::Parser;
use epicurve_cli::{logging_config, run, App, Cli};
use epicurve_common::test_utils::{create_temp_dir, date, fixtures, init_test_logging};
use epicurve_common::DayRange;
use epicurve_config::Config;
use epicurve_graphs::ColorScheme;
use epicurve_series::{
    read_series, save_cached, DisplayMode, Indicator, Metric, PopulationTable, RawTable, SeriesRequest,
};
use std::path::Path;

fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.data.cache_base = dir.join("covid_").to_string_lossy().into_owned();
    config.data.population_file = dir.join("population.csv").to_string_lossy().into_owned();
    config
        .quarantine
        .insert("Freedonia".to_string(), "2020-03-03".to_string());

    let raw = RawTable::from_reader(fixtures::RAW_CSV.as_bytes()).unwrap();
    save_cached(&config.data.cache_base, date(2020, 3, 5), &raw).unwrap();
    std::fs::write(&config.data.population_file, fixtures::POPULATION_CSV).unwrap();
    config
}

fn parse(args: &[&str], config: &mut Config) -> Cli {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.apply_overrides(config);
    config.validate_all().unwrap();
    cli
}

#[tokio::test]
async fn test_series_command_writes_csv() {
    init_test_logging();
    let dir = create_temp_dir();
    let mut config = config_in(dir.path());
    let output = dir.path().join("out").join("series.csv");
    let output_arg = output.to_string_lossy().into_owned();

    let cli = parse(
        &[
            "epicurve",
            "--cache-date",
            "2020-03-05",
            "series",
            "--country",
            "Ruritania",
            "--country",
            "Freedonia",
            "--mode",
            "daily-increase",
            "-o",
            &output_arg,
        ],
        &mut config,
    );
    run(cli, config).await.unwrap();

    let series = read_series(&output).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].country, "Ruritania");
    assert_eq!(series[0].len(), 3);
    assert_eq!(series[0].day_zero, Some(date(2020, 3, 3)));
    assert_eq!(series[1].country, "Freedonia");
    assert_eq!(series[1].len(), 5);
}

#[tokio::test]
async fn test_plot_command_appends_extension() {
    let dir = create_temp_dir();
    let mut config = config_in(dir.path());
    let output = dir.path().join("chart");
    let output_arg = output.to_string_lossy().into_owned();

    let cli = parse(
        &[
            "epicurve",
            "--cache-date",
            "2020-03-05",
            "plot",
            "--country",
            "Freedonia",
            "--linear",
            "--backend",
            "html",
            "-o",
            &output_arg,
        ],
        &mut config,
    );
    run(cli, config).await.unwrap();

    let html = std::fs::read_to_string(dir.path().join("chart.html")).unwrap();
    assert!(html.contains("Confirmed covid-19 on 05/03/2020"));
    assert!(html.contains("Freedonia quarantine on day 2 (2020-03-03)"));
}

#[tokio::test]
async fn test_missing_cache_date_fails() {
    let dir = create_temp_dir();
    let mut config = config_in(dir.path());
    let output = dir.path().join("series.csv");
    let output_arg = output.to_string_lossy().into_owned();

    let cli = parse(
        &["epicurve", "--cache-date", "2020-01-01", "series", "-o", &output_arg],
        &mut config,
    );
    assert!(run(cli, config).await.is_err());
    assert!(!output.exists());
}

#[test]
fn test_bitmap_chart_from_app() {
    let dir = create_temp_dir();
    let mut config = config_in(dir.path());
    config.query.countries = vec!["Ruritania".to_string(), "Freedonia".to_string()];
    config.chart.backend = "bitmap".to_string();
    config.chart.mode = "bar".to_string();
    config.chart.width = 640;
    config.chart.height = 480;
    config.chart.palette = vec!["#112233".to_string()];

    let app = App::new(config);
    let style = app.chart_style();
    assert_eq!(style.width, 640);

    let raw = RawTable::from_reader(fixtures::RAW_CSV.as_bytes()).unwrap();
    let population = PopulationTable::from_path(&app.config().data.population_file).unwrap();
    let rendered = app.chart(&raw, &population, date(2020, 3, 5)).unwrap();
    assert_eq!(&rendered.bytes[..4], b"\x89PNG");
}

#[test]
fn test_unknown_country_aborts_build() {
    let dir = create_temp_dir();
    let mut config = config_in(dir.path());
    config.query.countries = vec!["Atlantis".to_string()];

    let app = App::new(config);
    let raw = RawTable::from_reader(fixtures::RAW_CSV.as_bytes()).unwrap();
    let population = app.population().unwrap();
    let request = app.request().unwrap();
    assert!(app.series(&raw, &population, &request).is_err());
}

#[test]
fn test_series_follows_given_request() {
    let dir = create_temp_dir();
    let mut config = config_in(dir.path());
    config.query.day_range = DayRange::new(1, None);

    let app = App::new(config);
    let raw = RawTable::from_reader(fixtures::RAW_CSV.as_bytes()).unwrap();
    let population = app.population().unwrap();
    let request = SeriesRequest::new(Indicator::Metric(Metric::Confirmed), 10.0)
        .display_mode(DisplayMode::DailyPercentageIncrease)
        .countries(["Freedonia"]);

    let series = app.series(&raw, &population, &request).unwrap();
    assert_eq!(series.len(), 1);
    let freedonia = series.get("Freedonia").unwrap();
    // Day zero on 2020-03-04 (16 confirmed), the configured range drops it
    assert_eq!(freedonia.len(), 1);
    assert_eq!(freedonia.records[0].day, 1);
    assert_eq!(freedonia.records[0].derived, Some(1.0));
    assert_eq!(
        freedonia.derived_column.as_deref(),
        Some("Confirmed daily percentage increase")
    );
}

#[test]
fn test_chart_style_and_logging_follow_config() {
    let mut config = Config::default();
    config.chart.scheme = "dark".to_string();
    config.logging.level = "debug".to_string();
    config.logging.pretty = true;
    config.logging.spans = true;

    assert_eq!(App::new(config.clone()).chart_style().scheme, ColorScheme::Dark);

    let logging = logging_config(&config);
    assert_eq!(logging.level, "debug");
    assert!(logging.pretty_format);
    assert!(logging.include_spans);
    assert!(!logging.json_format);

    config.chart.palette = vec!["#112233".to_string()];
    assert_eq!(
        App::new(config).chart_style().scheme,
        ColorScheme::Custom(vec!["#112233".to_string()])
    );
}
