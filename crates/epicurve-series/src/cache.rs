//! Local CSV storage for raw tables and processed series.
//!
//! Raw tables are cached under `{base}{YYYY-MM-DD}.csv`; the same layout is
//! read back, so a cached day can stand in for a network fetch.

use crate::column::{Metric, COUNTRY_COLUMN, DATE_COLUMN, DAY_COLUMN};
use crate::model::{CountrySeries, DailyRecord, RawTable};
use chrono::NaiveDate;
use epicurve_common::{format_iso_date, parse_iso_date, EpiError, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Path of the cache file for `date`.
pub fn cache_path(base: &str, date: NaiveDate) -> PathBuf {
    PathBuf::from(format!("{}{}.csv", base, format_iso_date(date)))
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|err| EpiError::with_source(format!("Cannot open {}", path.display()), err))
}

/// Reads a raw table from a CSV file.
pub fn read_raw(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref();
    let table = RawTable::from_reader(open(path)?)?;
    debug!(path = %path.display(), rows = table.len(), "Raw table read");
    Ok(table)
}

/// Writes a raw table to a CSV file with the source column layout.
pub fn write_raw(path: impl AsRef<Path>, table: &RawTable) -> Result<()> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for row in table.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = table.len(), "Raw table written");
    Ok(())
}

/// Reads the raw table cached for `date`.
pub fn read_cached(base: &str, date: NaiveDate) -> Result<RawTable> {
    let path = cache_path(base, date);
    let table = read_raw(&path)?;
    info!(path = %path.display(), rows = table.len(), "Using cached data");
    Ok(table)
}

/// Caches a raw table for `date` and returns the file path.
pub fn save_cached(base: &str, date: NaiveDate, table: &RawTable) -> Result<PathBuf> {
    let path = cache_path(base, date);
    write_raw(&path, table)?;
    info!(path = %path.display(), rows = table.len(), "Data cached");
    Ok(path)
}

/// Headers of a processed series file.
///
/// Every series in one file must share the same derived column.
fn series_headers(derived_column: Option<&str>) -> Vec<&str> {
    let mut headers = vec![DATE_COLUMN, COUNTRY_COLUMN];
    headers.extend(Metric::ALL.iter().map(|metric| metric.name()));
    if let Some(derived) = derived_column {
        headers.push(derived);
    }
    headers.push(DAY_COLUMN);
    headers
}

fn series_row(record: &DailyRecord, with_derived: bool) -> Vec<String> {
    let mut row = vec![format_iso_date(record.date), record.country.clone()];
    row.extend([
        record.confirmed.to_string(),
        record.recovered.to_string(),
        record.deaths.to_string(),
        record.infected.to_string(),
    ]);
    row.extend(
        Metric::ALL
            .iter()
            .filter(|metric| !metric.is_raw() && **metric != Metric::Infected)
            .map(|metric| record.value(*metric).to_string()),
    );
    if with_derived {
        row.push(record.derived.map(|value| value.to_string()).unwrap_or_default());
    }
    row.push(record.day.to_string());
    row
}

/// Writes processed series to `writer`, one row per record.
///
/// Missing derived values are written as empty cells.
pub fn write_series_to<W: Write>(writer: W, series: &[CountrySeries]) -> Result<()> {
    let derived_column = series.iter().find_map(|s| s.derived_column.as_deref());
    if let Some(mismatch) = series
        .iter()
        .find(|s| s.derived_column.as_deref() != derived_column)
    {
        return Err(EpiError::csv(format!(
            "Series for {} has a different derived column",
            mismatch.country
        )));
    }

    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(series_headers(derived_column))?;
    for record in series.iter().flat_map(|s| &s.records) {
        writer.write_record(series_row(record, derived_column.is_some()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes processed series to a CSV file.
pub fn write_series(path: impl AsRef<Path>, series: &[CountrySeries]) -> Result<()> {
    let path = path.as_ref();
    create_parent_dir(path)?;
    write_series_to(File::create(path)?, series)?;
    info!(path = %path.display(), countries = series.len(), "Series written");
    Ok(())
}

fn parse_cell<T>(record: &csv::StringRecord, idx: usize, header: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = record.get(idx).unwrap_or_default();
    raw.trim().parse().map_err(|err| {
        EpiError::csv_with_source(format!("Invalid value '{raw}' in column {header}"), err)
    })
}

/// Reads processed series from `reader`, grouped by country in order of
/// first appearance.
pub fn read_series_from<R: Read>(reader: R) -> Result<Vec<CountrySeries>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let fixed = series_headers(None);
    let derived_column = match headers.len() {
        n if n == fixed.len() => None,
        n if n == fixed.len() + 1 => headers.get(n - 2).map(str::to_string),
        n => {
            return Err(EpiError::csv(format!(
                "Series file has {n} columns, expected {} or {}",
                fixed.len(),
                fixed.len() + 1
            )))
        }
    };
    let expected = series_headers(derived_column.as_deref());
    if let Some((found, wanted)) = headers
        .iter()
        .zip(expected.iter())
        .find(|(found, wanted)| found != *wanted)
    {
        return Err(EpiError::csv(format!(
            "Unexpected column '{found}', expected '{wanted}'"
        )));
    }

    let ratio_start = 6;
    let day_idx = expected.len() - 1;
    let mut series: Vec<CountrySeries> = Vec::new();

    for record in csv_reader.records() {
        let record = record?;
        let ratio = |offset: usize| parse_cell::<f64>(&record, ratio_start + offset, expected[ratio_start + offset]);
        let derived = if derived_column.is_some() {
            let cell = record.get(day_idx - 1).unwrap_or_default().trim();
            if cell.is_empty() {
                None
            } else {
                Some(parse_cell::<f64>(&record, day_idx - 1, expected[day_idx - 1])?)
            }
        } else {
            None
        };

        let row = DailyRecord {
            date: parse_iso_date(record.get(0).unwrap_or_default())?,
            country: record.get(1).unwrap_or_default().to_string(),
            confirmed: parse_cell(&record, 2, expected[2])?,
            recovered: parse_cell(&record, 3, expected[3])?,
            deaths: parse_cell(&record, 4, expected[4])?,
            infected: parse_cell(&record, 5, expected[5])?,
            recovered_per_confirmed: ratio(0)?,
            deaths_per_confirmed: ratio(1)?,
            infected_per_confirmed: ratio(2)?,
            confirmed_per_population: ratio(3)?,
            recovered_per_population: ratio(4)?,
            deaths_per_population: ratio(5)?,
            infected_per_population: ratio(6)?,
            derived,
            day: parse_cell(&record, day_idx, DAY_COLUMN)?,
        };

        match series.iter_mut().find(|s| s.country == row.country) {
            Some(existing) => existing.records.push(row),
            None => {
                let mut fresh = CountrySeries::empty(row.country.clone(), derived_column.clone());
                fresh.records.push(row);
                series.push(fresh);
            }
        }
    }

    for country_series in &mut series {
        country_series.day_zero = country_series
            .records
            .iter()
            .find(|record| record.day == 0)
            .map(|record| record.date);
    }
    Ok(series)
}

/// Reads processed series from a CSV file.
pub fn read_series(path: impl AsRef<Path>) -> Result<Vec<CountrySeries>> {
    let path = path.as_ref();
    let series = read_series_from(open(path)?)?;
    debug!(path = %path.display(), countries = series.len(), "Series read");
    Ok(series)
}
