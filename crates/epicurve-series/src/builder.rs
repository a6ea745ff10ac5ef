//! Series Builder: raw cumulative counts to day-zero aligned series.
//!
//! For every requested country the builder
//!
//! 1. selects that country's rows in date order,
//! 2. computes `Infected = Confirmed - Recovered - Deaths`,
//! 3. computes the per-confirmed and per-population ratio columns,
//! 4. drops every row before the first one whose threshold indicator
//!    reaches the minimum,
//! 5. optionally derives the daily increase or percentage increase of the
//!    show column, and
//! 6. numbers the remaining rows from day 0.

use crate::column::{Indicator, Metric};
use crate::display::DisplayMode;
use crate::model::{CountrySeries, DailyRecord, RawObservation, RawTable, SeriesMap};
use crate::population::PopulationTable;
use epicurve_common::Result;
use tracing::{debug, instrument};

/// What to build.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRequest {
    pub indicator: Indicator,
    pub min_indicator: f64,
    pub show: Metric,
    pub display_mode: DisplayMode,
    pub countries: Vec<String>,
}

impl SeriesRequest {
    /// A cumulative request where the show column is the indicator itself.
    ///
    /// With the date indicator the show column defaults to `Confirmed`.
    pub fn new(indicator: Indicator, min_indicator: f64) -> Self {
        Self {
            indicator,
            min_indicator,
            show: indicator.metric().unwrap_or(Metric::Confirmed),
            display_mode: DisplayMode::Cumulative,
            countries: Vec::new(),
        }
    }

    /// Builds a request from column names as found in configuration or on
    /// the command line. Unknown indicator or show names are lookup failures;
    /// an unknown display mode falls back to cumulative.
    pub fn from_names(
        indicator: &str,
        min_indicator: f64,
        show: Option<&str>,
        display_mode: &str,
        countries: &[String],
    ) -> Result<Self> {
        let mut request = Self::new(indicator.parse()?, min_indicator)
            .display_mode(DisplayMode::parse_or_default(display_mode))
            .countries(countries.iter().cloned());
        if let Some(show) = show {
            request = request.show(show.parse()?);
        }
        Ok(request)
    }

    /// Sets the show column.
    pub fn show(mut self, show: Metric) -> Self {
        self.show = show;
        self
    }

    /// Sets the display mode.
    pub fn display_mode(mut self, mode: DisplayMode) -> Self {
        self.display_mode = mode;
        self
    }

    /// Sets the countries to build.
    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Name of the column that is plotted on the y axis.
    pub fn y_column(&self) -> String {
        self.display_mode
            .derived_column(self.show)
            .unwrap_or_else(|| self.show.name().to_string())
    }

    /// Whether a processed row reaches the threshold.
    fn reaches_threshold(&self, record: &DailyRecord) -> bool {
        match self.indicator {
            Indicator::Date => true,
            Indicator::Metric(metric) => record.value(metric) >= self.min_indicator,
        }
    }
}

/// Builds processed series from shared, read-only input tables.
#[derive(Debug, Clone, Copy)]
pub struct SeriesBuilder<'a> {
    raw: &'a RawTable,
    population: &'a PopulationTable,
}

impl<'a> SeriesBuilder<'a> {
    /// Creates a builder over the raw table and population reference.
    pub fn new(raw: &'a RawTable, population: &'a PopulationTable) -> Self {
        Self { raw, population }
    }

    /// Builds one series per requested country.
    ///
    /// Fails with a country lookup error as soon as a requested country is
    /// missing from the population table. A country whose threshold is never
    /// reached yields an empty series.
    #[instrument(skip(self, request), fields(indicator = %request.indicator, show = %request.show, mode = %request.display_mode))]
    pub fn build(&self, request: &SeriesRequest) -> Result<SeriesMap> {
        let mut map = SeriesMap::new();
        for country in &request.countries {
            if map.contains(country) {
                continue;
            }
            map.insert(self.build_country(country, request)?);
        }
        Ok(map)
    }

    /// Builds the series of a single country.
    pub fn build_country(&self, country: &str, request: &SeriesRequest) -> Result<CountrySeries> {
        let population = self.population.population_of(country)?;

        let mut rows: Vec<&RawObservation> = self.raw.for_country(country).collect();
        rows.sort_by_key(|row| row.date);

        let mut records: Vec<DailyRecord> = rows
            .into_iter()
            .map(|row| derive_record(row, population))
            .collect();

        let source_rows = records.len();
        let start = records
            .iter()
            .position(|record| request.reaches_threshold(record))
            .unwrap_or(records.len());
        records.drain(..start);

        let derived_column = request.display_mode.derived_column(request.show);
        if derived_column.is_some() {
            let show: Vec<f64> = records.iter().map(|r| r.value(request.show)).collect();
            for (record, derived) in records
                .iter_mut()
                .zip(request.display_mode.derive_all(&show))
            {
                record.derived = derived;
            }
        }

        for (day, record) in records.iter_mut().enumerate() {
            record.day = day;
        }

        debug!(
            country,
            source_rows,
            kept_rows = records.len(),
            day_zero = ?records.first().map(|r| r.date),
            "Series built"
        );

        Ok(CountrySeries {
            country: country.to_string(),
            derived_column,
            day_zero: records.first().map(|record| record.date),
            records,
        })
    }
}

/// Ratio that is undefined when the denominator is zero.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
fn derive_record(row: &RawObservation, population: f64) -> DailyRecord {
    let infected = row.confirmed as i64 - row.recovered as i64 - row.deaths as i64;
    let confirmed = row.confirmed as f64;
    let recovered = row.recovered as f64;
    let deaths = row.deaths as f64;
    let infected_f = infected as f64;

    DailyRecord {
        date: row.date,
        country: row.country.clone(),
        confirmed: row.confirmed,
        recovered: row.recovered,
        deaths: row.deaths,
        infected,
        recovered_per_confirmed: ratio(recovered, confirmed),
        deaths_per_confirmed: ratio(deaths, confirmed),
        infected_per_confirmed: ratio(infected_f, confirmed),
        confirmed_per_population: confirmed / population,
        recovered_per_population: recovered / population,
        deaths_per_population: deaths / population,
        infected_per_population: infected_f / population,
        derived: None,
        day: 0,
    }
}
