//! Axis labels, chart title and per-country colours.

use chrono::NaiveDate;
use epicurve_common::format_title_date;
use epicurve_series::{DisplayMode, Indicator, Metric, SeriesRequest, DATE_COLUMN};
use plotters::style::RGBColor;

use crate::types::ColorScheme;

/// Texts drawn around the plotting area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    pub title: String,
    pub x: String,
    pub y: String,
}

impl ChartLabels {
    /// Labels for a query.
    ///
    /// The y label is the show column, or the derived column name for the
    /// daily modes. `as_of` is the data date shown in the title.
    pub fn new(
        indicator: Indicator,
        min_indicator: f64,
        show: Metric,
        mode: DisplayMode,
        log_scale: bool,
        as_of: NaiveDate,
    ) -> Self {
        let y = mode
            .derived_column(show)
            .unwrap_or_else(|| show.name().to_string());
        let x = match indicator {
            Indicator::Date => DATE_COLUMN.to_string(),
            Indicator::Metric(metric) => {
                format!("Days since first day when \"{}\" >={}", metric.name(), min_indicator)
            }
        };
        let title = format!(
            "{} covid-19 on {}{}",
            y,
            format_title_date(as_of),
            if log_scale { " (log scale)" } else { "" }
        );
        Self { title, x, y }
    }

    /// Labels for a series request.
    pub fn for_request(request: &SeriesRequest, log_scale: bool, as_of: NaiveDate) -> Self {
        Self::new(
            request.indicator,
            request.min_indicator,
            request.show,
            request.display_mode,
            log_scale,
            as_of,
        )
    }
}

/// Explicit country to colour mapping, assigned in request order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAssignment {
    colors: Vec<(String, RGBColor)>,
}

impl ColorAssignment {
    /// Assigns palette colours to countries, cycling when there are more
    /// countries than colours.
    pub fn new<'a, I>(countries: I, palette: &[RGBColor]) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let fallback = ColorScheme::Default.colors();
        let palette = if palette.is_empty() { &fallback[..] } else { palette };

        let mut colors: Vec<(String, RGBColor)> = Vec::new();
        for country in countries {
            if colors.iter().any(|(assigned, _)| assigned == country) {
                continue;
            }
            let color = palette[colors.len() % palette.len()];
            colors.push((country.to_string(), color));
        }
        Self { colors }
    }

    /// Assigns colours from a scheme.
    pub fn from_scheme<'a, I>(countries: I, scheme: &ColorScheme) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(countries, &scheme.colors())
    }

    /// Colour of a country.
    pub fn get(&self, country: &str) -> Option<RGBColor> {
        self.colors
            .iter()
            .find(|(assigned, _)| assigned == country)
            .map(|(_, color)| *color)
    }

    /// Number of assigned countries.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether no country has a colour.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicurve_common::test_utils::date;

    #[test]
    fn test_cumulative_labels() {
        let labels = ChartLabels::new(
            Indicator::Metric(Metric::Confirmed),
            100.0,
            Metric::Confirmed,
            DisplayMode::Cumulative,
            true,
            date(2020, 4, 7),
        );
        assert_eq!(labels.y, "Confirmed");
        assert_eq!(labels.x, "Days since first day when \"Confirmed\" >=100");
        assert_eq!(labels.title, "Confirmed covid-19 on 07/04/2020 (log scale)");
    }

    #[test]
    fn test_derived_labels_linear() {
        let labels = ChartLabels::new(
            Indicator::Metric(Metric::DeathsPerPopulation),
            0.5,
            Metric::Deaths,
            DisplayMode::DailyIncrease,
            false,
            date(2020, 4, 7),
        );
        assert_eq!(labels.y, "Deaths daily increase");
        assert_eq!(labels.x, "Days since first day when \"Deaths/Total Population\" >=0.5");
        assert_eq!(labels.title, "Deaths daily increase covid-19 on 07/04/2020");
    }

    #[test]
    fn test_date_indicator_label() {
        let request = SeriesRequest::new(Indicator::Date, 0.0);
        let labels = ChartLabels::for_request(&request, false, date(2020, 4, 7));
        assert_eq!(labels.x, "Date");
        assert_eq!(labels.y, "Confirmed");
    }

    #[test]
    fn test_color_assignment_cycles_in_order() {
        let palette = [RGBColor(1, 1, 1), RGBColor(2, 2, 2)];
        let colors = ColorAssignment::new(["Italy", "US", "Colombia", "Italy"], &palette);
        assert_eq!(colors.len(), 3);
        assert_eq!(colors.get("Italy"), Some(RGBColor(1, 1, 1)));
        assert_eq!(colors.get("US"), Some(RGBColor(2, 2, 2)));
        assert_eq!(colors.get("Colombia"), Some(RGBColor(1, 1, 1)));
        assert_eq!(colors.get("Spain"), None);
    }

    #[test]
    fn test_empty_palette_uses_default_scheme() {
        let colors = ColorAssignment::new(["Italy"], &[]);
        assert_eq!(colors.get("Italy"), Some(RGBColor(31, 119, 180)));
    }
}
