//! Dashboard tuning knobs, loaded from an optional JSON file.
//!
//! Every field has a default matching the stock dashboard, so a partial
//! file such as `{"catalog": {"top_items": 5}}` is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::synthetic::SAMPLE_SEED;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub catalog: CatalogConfig,
    pub sample: SampleConfig,
}

/// Truncation and binning used by the aggregation catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub top_item_types: usize,
    pub top_items: usize,
    pub top_visibility: usize,
    pub sales_histogram_bins: usize,
    pub rating_histogram_bins: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            top_item_types: 7,
            top_items: 10,
            top_visibility: 10,
            sales_histogram_bins: 30,
            rating_histogram_bins: 20,
        }
    }
}

/// Shape of the synthetic fallback dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    pub seed: u64,
    pub outlets: usize,
    pub items: usize,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: SAMPLE_SEED,
            outlets: 14,
            items: 1200,
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(text).map(Self::sanitized)
    }

    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        use anyhow::Context;

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Raise zero bin counts and an outlet-less sample to usable minimums.
    pub fn sanitized(mut self) -> Self {
        let c = &mut self.catalog;
        c.sales_histogram_bins = c.sales_histogram_bins.max(1);
        c.rating_histogram_bins = c.rating_histogram_bins.max(1);
        self.sample.outlets = self.sample.outlets.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = DashboardConfig::from_json_str(r#"{"catalog": {"top_items": 5}}"#).unwrap();
        assert_eq!(cfg.catalog.top_items, 5);
        assert_eq!(cfg.catalog.top_item_types, 7);
        assert_eq!(cfg.sample, SampleConfig::default());
    }

    #[test]
    fn zero_bins_are_raised() {
        let cfg = DashboardConfig::from_json_str(
            r#"{"catalog": {"sales_histogram_bins": 0}, "sample": {"outlets": 0}}"#,
        )
        .unwrap();
        assert_eq!(cfg.catalog.sales_histogram_bins, 1);
        assert_eq!(cfg.sample.outlets, 1);
    }

    #[test]
    fn config_file_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"sample": {"seed": 7}}"#).unwrap();

        let cfg = DashboardConfig::from_json_file(&path).unwrap();
        assert_eq!(cfg.sample.seed, 7);
        assert!(DashboardConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}
