//! Command execution.

use crate::args::{Cli, Command};
use crate::error::CliResult;
use chrono::{Local, NaiveDate};
use epicurve_common::LoggingConfig;
use epicurve_config::{Config, ConfigError, ConfigLoader};
use epicurve_graphs::{
    parse_color, renderer_for, ChartMode, ChartModel, ChartStyle, ChartView, ColorAssignment,
    ColorScheme, RenderBackend, RenderedChart,
};
use epicurve_series::{
    annotate_all, cache_path, read_cached, save_cached, write_series, DataSource, PopulationTable,
    QuarantineReference, RawTable, SeriesBuilder, SeriesMap, SeriesRequest,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Runs commands against one resolved configuration.
#[derive(Debug, Clone)]
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Downloads the raw table and stores it in the cache for `date`.
    #[instrument(skip(self))]
    pub async fn fetch(&self, date: NaiveDate) -> CliResult<PathBuf> {
        let table = self.download().await?;
        let path = save_cached(&self.config.data.cache_base, date, &table)?;
        info!("Saved {} rows to {}", table.len(), path.display());
        Ok(path)
    }

    /// Raw table and its data date.
    ///
    /// With an explicit cache date the cached file must exist. Otherwise
    /// today's cache is reused when present and refreshed when not.
    pub async fn load_raw(&self, cache_date: Option<NaiveDate>) -> CliResult<(RawTable, NaiveDate)> {
        let base = &self.config.data.cache_base;
        if let Some(date) = cache_date {
            return Ok((read_cached(base, date)?, date));
        }

        let today = Local::now().date_naive();
        if cache_path(base, today).exists() {
            info!("Using cached data for {}", today);
            return Ok((read_cached(base, today)?, today));
        }
        let path = self.fetch(today).await?;
        info!("Downloaded data cached at {}", path.display());
        Ok((read_cached(base, today)?, today))
    }

    async fn download(&self) -> CliResult<RawTable> {
        let data = &self.config.data;
        let source = DataSource::new(
            &data.source_url,
            &data.resource_name,
            Duration::from_secs(data.request_timeout_seconds),
        )?;
        Ok(source.fetch().await?)
    }

    pub fn population(&self) -> CliResult<PopulationTable> {
        Ok(PopulationTable::from_path(&self.config.data.population_file)?)
    }

    pub fn request(&self) -> CliResult<SeriesRequest> {
        let query = &self.config.query;
        Ok(SeriesRequest::from_names(
            &query.indicator,
            query.min_indicator,
            query.show.as_deref(),
            &query.display_mode,
            &query.countries,
        )?)
    }

    /// Builds the series for `request` and keeps the configured day range.
    pub fn series(
        &self,
        raw: &RawTable,
        population: &PopulationTable,
        request: &SeriesRequest,
    ) -> CliResult<SeriesMap> {
        let series = SeriesBuilder::new(raw, population).build(request)?;
        Ok(series.restrict(self.config.query.day_range))
    }

    pub fn chart_style(&self) -> ChartStyle {
        let chart = &self.config.chart;
        ChartStyle {
            width: chart.width,
            height: chart.height,
            background: parse_color(&chart.background),
            title_font_size: chart.title_font_size,
            show_grid: chart.show_grid,
            scheme: ColorScheme::resolve(&chart.scheme, &chart.palette),
        }
    }

    /// Builds, restricts, annotates and renders the configured chart.
    #[instrument(skip_all, fields(as_of = %as_of))]
    pub fn chart(
        &self,
        raw: &RawTable,
        population: &PopulationTable,
        as_of: NaiveDate,
    ) -> CliResult<RenderedChart> {
        let request = self.request()?;
        let series = self.series(raw, population, &request)?;
        let reference = QuarantineReference::builtin().with_overrides(&self.config.quarantine)?;
        let annotations = annotate_all(&series, &reference);

        let style = self.chart_style();
        let colors =
            ColorAssignment::from_scheme(request.countries.iter().map(String::as_str), &style.scheme);
        let view = ChartView {
            log_scale: self.config.query.log_scale,
            mode: ChartMode::parse_or_default(&self.config.chart.mode),
            as_of,
        };
        let model = ChartModel::build(&series, &annotations, &colors, &request, view);
        if model.is_empty() {
            warn!("No data to plot for {:?}", request.countries);
        }

        let renderer = renderer_for(RenderBackend::parse_or_default(&self.config.chart.backend));
        Ok(renderer.render(&model, &style)?)
    }

    pub fn write_series(&self, series: &SeriesMap, output: &Path) -> CliResult<()> {
        let series: Vec<_> = series.iter().cloned().collect();
        write_series(output, &series)?;
        info!("Wrote {} series to {}", series.len(), output.display());
        Ok(())
    }
}

/// Loads the configuration file, applies command line overrides and
/// validates the result.
pub fn resolve_config(cli: &Cli) -> CliResult<Config> {
    let mut config = match &cli.config {
        Some(path) => ConfigLoader::load_config(path)?,
        None => ConfigLoader::load()?,
    };
    cli.apply_overrides(&mut config);
    config.validate_all().map_err(ConfigError::ValidationError)?;
    Ok(config)
}

pub fn logging_config(config: &Config) -> LoggingConfig {
    LoggingConfig {
        level: config.logging.level.clone(),
        json_format: config.logging.json,
        pretty_format: config.logging.pretty,
        include_spans: config.logging.spans,
        file_path: config.logging.file.clone(),
        ..LoggingConfig::default()
    }
}

/// Executes the parsed command.
pub async fn run(cli: Cli, config: Config) -> CliResult<()> {
    let app = App::new(config);
    match &cli.command {
        Command::Fetch { date } => {
            let date = date.or(cli.cache_date).unwrap_or_else(|| Local::now().date_naive());
            app.fetch(date).await?;
        }
        Command::Series { output, .. } => {
            let (raw, _) = app.load_raw(cli.cache_date).await?;
            let population = app.population()?;
            let series = app.series(&raw, &population, &app.request()?)?;
            app.write_series(&series, output)?;
        }
        Command::Plot { output, .. } => {
            let (raw, as_of) = app.load_raw(cli.cache_date).await?;
            let population = app.population()?;
            let rendered = app.chart(&raw, &population, as_of)?;
            let output = match output.extension().and_then(|e| e.to_str()) {
                None => output.with_extension(rendered.format.extension()),
                Some(ext) => {
                    if !ext.eq_ignore_ascii_case(rendered.format.extension()) {
                        warn!(
                            "{} does not end in .{}, the backend output is written as is",
                            output.display(),
                            rendered.format.extension()
                        );
                    }
                    output.clone()
                }
            };
            rendered.write_to(&output)?;
            info!("Chart written to {}", output.display());
        }
    }
    Ok(())
}
