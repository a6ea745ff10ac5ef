//! Integration tests for the epicurve-series crate.
//!
//! This test suite covers:
//! - Series building properties over generated raw tables
//! - Fetch, cache, build, restrict and annotate as one pipeline
//! - Downloading a datapackage from a local HTTP listener

use chrono::{Duration, NaiveDate};
use epicurve_common::test_utils::{assert_approx_eq, create_temp_dir, date, fixtures, init_test_logging};
use epicurve_common::DayRange;
use epicurve_series::*;
use proptest::prelude::*;

fn raw_table(country: &str, counts: &[(u64, u64, u64)]) -> RawTable {
    counts
        .iter()
        .enumerate()
        .map(|(offset, &(confirmed, recovered, deaths))| RawObservation {
            date: date(2020, 1, 1) + Duration::days(offset as i64),
            country: country.to_string(),
            confirmed,
            recovered,
            deaths,
        })
        .collect()
}

fn counts_strategy() -> impl Strategy<Value = Vec<(u64, u64, u64)>> {
    prop::collection::vec((0u64..10_000, 0u64..5_000, 0u64..1_000), 0..40)
}

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #[test]
        fn days_are_contiguous_and_dates_ordered(counts in counts_strategy(), min in 0.0f64..5_000.0) {
            let raw = raw_table("Ruritania", &counts);
            let population = PopulationTable::from_entries([("Ruritania", 1234.0)]);
            let request = SeriesRequest::new(Indicator::Metric(Metric::Confirmed), min)
                .countries(["Ruritania"]);

            let map = SeriesBuilder::new(&raw, &population).build(&request).unwrap();
            prop_assert_eq!(map.len(), 1);
            let series = map.get("Ruritania").unwrap();

            for (idx, record) in series.records.iter().enumerate() {
                prop_assert_eq!(record.day, idx);
            }
            prop_assert!(series.records.windows(2).all(|w| w[0].date <= w[1].date));
        }

        #[test]
        fn first_row_is_first_to_reach_threshold(counts in counts_strategy(), min in 0.0f64..5_000.0) {
            let raw = raw_table("Ruritania", &counts);
            let population = PopulationTable::from_entries([("Ruritania", 1.0)]);
            let request = SeriesRequest::new(Indicator::Metric(Metric::Confirmed), min)
                .countries(["Ruritania"]);
            let series = SeriesBuilder::new(&raw, &population)
                .build_country("Ruritania", &request)
                .unwrap();

            let first_hit = counts.iter().position(|&(confirmed, _, _)| confirmed as f64 >= min);
            match first_hit {
                Some(position) => {
                    prop_assert_eq!(series.len(), counts.len() - position);
                    prop_assert!(series.records[0].confirmed as f64 >= min);
                    prop_assert_eq!(series.day_zero, Some(date(2020, 1, 1) + Duration::days(position as i64)));
                }
                None => prop_assert!(series.is_empty()),
            }
        }

        #[test]
        fn infected_and_ratios_hold(counts in counts_strategy(), thousands in 0.5f64..100_000.0) {
            let raw = raw_table("Ruritania", &counts);
            let population = PopulationTable::from_entries([("Ruritania", thousands)]);
            let request = SeriesRequest::new(Indicator::Date, 0.0).countries(["Ruritania"]);
            let series = SeriesBuilder::new(&raw, &population)
                .build_country("Ruritania", &request)
                .unwrap();
            prop_assert_eq!(series.len(), counts.len());

            for record in &series.records {
                let expected = record.confirmed as i64 - record.recovered as i64 - record.deaths as i64;
                prop_assert_eq!(record.infected, expected);

                let people = thousands * 1000.0;
                prop_assert_eq!(record.deaths_per_population, record.deaths as f64 / people);
                prop_assert_eq!(record.infected_per_population, record.infected as f64 / people);
                if record.confirmed == 0 {
                    prop_assert!(record.deaths_per_confirmed.is_nan());
                } else {
                    prop_assert_eq!(record.deaths_per_confirmed, record.deaths as f64 / record.confirmed as f64);
                }
            }
        }

        #[test]
        fn daily_increase_is_first_difference(counts in counts_strategy()) {
            let raw = raw_table("Ruritania", &counts);
            let population = PopulationTable::from_entries([("Ruritania", 1.0)]);
            let request = SeriesRequest::new(Indicator::Date, 0.0)
                .show(Metric::Deaths)
                .display_mode(DisplayMode::DailyIncrease)
                .countries(["Ruritania"]);
            let series = SeriesBuilder::new(&raw, &population)
                .build_country("Ruritania", &request)
                .unwrap();

            if let Some(first) = series.records.first() {
                prop_assert_eq!(first.derived, None);
            }
            for pair in series.records.windows(2) {
                let expected = pair[1].deaths as f64 - pair[0].deaths as f64;
                prop_assert_eq!(pair[1].derived, Some(expected));
            }
        }
    }
}

#[test]
fn test_pipeline_from_cache_to_annotation() {
    init_test_logging();
    let dir = create_temp_dir();
    let base = format!("{}/covid_data_", dir.path().display());
    let as_of = date(2020, 3, 5);

    let fetched = RawTable::from_reader(fixtures::RAW_CSV.as_bytes()).unwrap();
    save_cached(&base, as_of, &fetched).unwrap();
    let raw = read_cached(&base, as_of).unwrap();

    let population_path = dir.path().join("population.csv");
    std::fs::write(&population_path, fixtures::POPULATION_CSV).unwrap();
    let population = PopulationTable::from_path(&population_path).unwrap();

    let request = SeriesRequest::from_names(
        "Confirmed",
        1.0,
        None,
        "daily increase",
        &["Ruritania".to_string(), "Freedonia".to_string()],
    )
    .unwrap();
    let map = SeriesBuilder::new(&raw, &population)
        .build(&request)
        .unwrap()
        .restrict(DayRange::new(1, Some(3)));

    let ruritania = map.get("Ruritania").unwrap();
    assert_eq!(ruritania.records.iter().map(|r| r.day).collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(ruritania.day_zero, Some(date(2020, 3, 3)));

    let mut overrides = std::collections::BTreeMap::new();
    overrides.insert("Ruritania".to_string(), "2020-03-05".to_string());
    overrides.insert("Freedonia".to_string(), "2020-03-01".to_string());
    let reference = QuarantineReference::builtin().with_overrides(&overrides).unwrap();

    let annotations = annotate_all(&map, &reference);
    assert_eq!(annotations[0].annotation.day(), Some(2));
    assert_eq!(
        annotations[1].annotation,
        QuarantineAnnotation::OutOfRange {
            date: date(2020, 3, 1),
            day_zero: Some(date(2020, 3, 1)),
        }
    );

    let series_path = dir.path().join("out/series.csv");
    write_series(&series_path, &map.clone().into_vec()).unwrap();
    let read = read_series(&series_path).unwrap();
    assert_eq!(read.len(), 2);
    assert_approx_eq(read[0].records[0].derived.unwrap(), 5.0, 1e-12);
    // Day zero is only recoverable from a file that contains day 0.
    assert_eq!(read[0].day_zero, None);
}

mod remote {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves `routes` over plain HTTP/1.1, one request per connection.
    async fn serve(routes: Vec<(&'static str, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let mut buffer = vec![0u8; 4096];
                let read = socket.read(&mut buffer).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buffer[..read]).to_string();
                let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                let response = match routes.iter().find(|(route, _)| *route == path) {
                    Some((_, body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_relative_resource() {
        init_test_logging();
        let base = serve(vec![
            ("/datapackage.json", fixtures::datapackage_json("data/countries.csv")),
            ("/data/countries.csv", fixtures::RAW_CSV.to_string()),
        ])
        .await;

        let source = DataSource::new(
            &format!("{base}/datapackage.json"),
            "countries-aggregated_csv",
            std::time::Duration::from_secs(5),
        )
        .unwrap();
        let table = source.fetch().await.unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table.latest_date(), Some(NaiveDate::from_ymd_opt(2020, 3, 5).unwrap()));
    }

    #[tokio::test]
    async fn test_fetch_missing_csv_is_network_error() {
        let base = serve(vec![(
            "/datapackage.json",
            fixtures::datapackage_json("data/missing.csv"),
        )])
        .await;

        let source = DataSource::new(
            &format!("{base}/datapackage.json"),
            "countries-aggregated_csv",
            std::time::Duration::from_secs(5),
        )
        .unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_unknown_resource() {
        let base = serve(vec![(
            "/datapackage.json",
            fixtures::datapackage_json("data/countries.csv"),
        )])
        .await;

        let source = DataSource::new(
            &format!("{base}/datapackage.json"),
            "reference-data_csv",
            std::time::Duration::from_secs(5),
        )
        .unwrap();
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err.lookup_kind(), Some(epicurve_common::LookupKind::Resource));
    }
}
