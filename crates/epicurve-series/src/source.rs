//! Remote datapackage source.
//!
//! The source URL points at a datapackage descriptor (JSON). Its
//! `resources` list names the available files; the configured resource's
//! `path` is downloaded and parsed as the raw table.

use crate::model::RawTable;
use epicurve_common::{EpiError, LookupKind, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

/// Finds the `path` of the resource called `name` in a datapackage
/// descriptor.
pub fn resolve_resource_path(descriptor: &Value, name: &str) -> Result<String> {
    let resources = descriptor
        .get("resources")
        .and_then(Value::as_array)
        .ok_or_else(|| EpiError::csv("Datapackage descriptor has no resources list"))?;

    resources
        .iter()
        .find(|resource| resource.get("name").and_then(Value::as_str) == Some(name))
        .and_then(|resource| resource.get("path").and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| EpiError::lookup(LookupKind::Resource, name))
}

/// Downloads the raw table from a datapackage.
#[derive(Debug, Clone)]
pub struct DataSource {
    client: Client,
    descriptor_url: Url,
    resource_name: String,
}

impl DataSource {
    /// Creates a source for `resource_name` in the datapackage at
    /// `descriptor_url`.
    pub fn new(descriptor_url: &str, resource_name: impl Into<String>, timeout: Duration) -> Result<Self> {
        let descriptor_url = Url::parse(descriptor_url).map_err(|err| {
            EpiError::config_with_source(format!("Invalid source URL '{descriptor_url}'"), err)
        })?;
        let client = Client::builder()
            .user_agent(concat!("epicurve/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|err| EpiError::network_with_source("Failed to build HTTP client", err))?;

        Ok(Self {
            client,
            descriptor_url,
            resource_name: resource_name.into(),
        })
    }

    /// The descriptor URL.
    pub fn descriptor_url(&self) -> &Url {
        &self.descriptor_url
    }

    /// Downloads the descriptor, then the named CSV resource.
    #[instrument(skip(self), fields(url = %self.descriptor_url, resource = %self.resource_name))]
    pub async fn fetch(&self) -> Result<RawTable> {
        let descriptor: Value = serde_json::from_str(&self.get_text(&self.descriptor_url).await?)?;
        let path = resolve_resource_path(&descriptor, &self.resource_name)?;
        let csv_url = self.descriptor_url.join(&path).map_err(|err| {
            EpiError::network_with_source(format!("Invalid resource path '{path}'"), err)
        })?;
        debug!(%csv_url, "Resource resolved");

        let body = self.get_text(&csv_url).await?;
        let table = RawTable::from_reader(body.as_bytes())?;
        info!(rows = table.len(), latest = ?table.latest_date(), "Raw data downloaded");
        Ok(table)
    }

    async fn get_text(&self, url: &Url) -> Result<String> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EpiError::network(format!("{url} returned {status}")));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epicurve_common::test_utils::fixtures;

    #[test]
    fn test_resolve_resource_path() {
        let descriptor: Value =
            serde_json::from_str(&fixtures::datapackage_json("data/countries-aggregated.csv"))
                .unwrap();
        assert_eq!(
            resolve_resource_path(&descriptor, "countries-aggregated_csv").unwrap(),
            "data/countries-aggregated.csv"
        );
    }

    #[test]
    fn test_missing_resource() {
        let descriptor: Value =
            serde_json::from_str(&fixtures::datapackage_json("x.csv")).unwrap();
        let err = resolve_resource_path(&descriptor, "reference-data_csv").unwrap_err();
        assert_eq!(err.lookup_kind(), Some(LookupKind::Resource));
    }

    #[test]
    fn test_descriptor_without_resources() {
        let descriptor = serde_json::json!({ "name": "covid-19" });
        let err = resolve_resource_path(&descriptor, "countries-aggregated_csv").unwrap_err();
        assert_eq!(err.lookup_kind(), None);
    }

    #[test]
    fn test_invalid_source_url() {
        assert!(DataSource::new("not a url", "x", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_relative_path_resolution() {
        let source = DataSource::new(
            "https://example.invalid/core/covid-19/datapackage.json",
            "countries-aggregated_csv",
            Duration::from_secs(1),
        )
        .unwrap();
        let joined = source.descriptor_url().join("data/countries-aggregated.csv").unwrap();
        assert_eq!(
            joined.as_str(),
            "https://example.invalid/core/covid-19/data/countries-aggregated.csv"
        );
    }
}
