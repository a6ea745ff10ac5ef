//! Per-country population reference.

use epicurve_common::{EpiError, LookupKind, Result};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Header of the index column.
pub const COUNTRY_HEADER: &str = "Country";
/// Header of the population column, in thousands of people.
pub const POPULATION_HEADER: &str = "Population 2020";

/// Population figures keyed by the same country names as the raw table.
///
/// Values are stored as read, in thousands of people.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulationTable {
    thousands: HashMap<String, f64>,
}

impl PopulationTable {
    /// Builds a table from `(country, thousands)` pairs.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            thousands: entries
                .into_iter()
                .map(|(country, value)| (country.into(), value))
                .collect(),
        }
    }

    /// Reads the semicolon separated reference file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|err| {
            EpiError::with_source(
                format!("Cannot open population table {}", path.display()),
                err,
            )
        })?;
        let table = Self::from_reader(file)?;
        info!(path = %path.display(), countries = table.len(), "Population table loaded");
        Ok(table)
    }

    /// Parses a semicolon separated document with `Country` and
    /// `Population 2020` columns. Other columns are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| EpiError::csv(format!("Population table has no '{name}' column")))
        };
        let country_idx = column(COUNTRY_HEADER)?;
        let population_idx = column(POPULATION_HEADER)?;

        let mut thousands = HashMap::new();
        for record in csv_reader.records() {
            let record = record?;
            let country = record.get(country_idx).unwrap_or_default();
            let raw = record.get(population_idx).unwrap_or_default();
            let value: f64 = raw.parse().map_err(|err| {
                EpiError::csv_with_source(
                    format!("Invalid population '{raw}' for {country}"),
                    err,
                )
            })?;
            debug!(country, population_thousands = value, "Population entry");
            thousands.insert(country.to_string(), value);
        }

        Ok(Self { thousands })
    }

    /// Population in thousands.
    pub fn thousands_of(&self, country: &str) -> Result<f64> {
        self.thousands
            .get(country)
            .copied()
            .ok_or_else(|| EpiError::lookup(LookupKind::Country, country))
    }

    /// Population in people, the denominator for per-capita columns.
    pub fn population_of(&self, country: &str) -> Result<f64> {
        self.thousands_of(country).map(|thousands| thousands * 1000.0)
    }

    /// Number of countries.
    pub fn len(&self) -> usize {
        self.thousands.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.thousands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicurve_common::test_utils::fixtures;

    #[test]
    fn test_parse_population_csv() {
        let table = PopulationTable::from_reader(fixtures::POPULATION_CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.thousands_of("Ruritania").unwrap(), 1000.0);
        assert_eq!(table.population_of("Freedonia").unwrap(), 2_000_500.0);
        assert_eq!(table.population_of("Grand Fenwick").unwrap(), 500.0);
    }

    #[test]
    fn test_unknown_country_is_lookup_failure() {
        let table = PopulationTable::from_entries([("Ruritania", 1.0)]);
        let err = table.population_of("Atlantis").unwrap_err();
        assert_eq!(err.lookup_kind(), Some(LookupKind::Country));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_missing_population_column() {
        let csv = "Country;Population 2019\nRuritania;1000\n";
        let err = PopulationTable::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Population 2020"));
    }

    #[test]
    fn test_invalid_population_value() {
        let csv = "Country;Population 2020\nRuritania;lots\n";
        assert!(PopulationTable::from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(PopulationTable::from_path("/no/such/population.csv").is_err());
    }
}
