use std::path::Path;

use crate::analytics::{aggregate_with, AggregationCatalog};
use crate::config::DashboardConfig;
use crate::data::filter::{apply, FilterOptions, FilterSelection, FilteredView};
use crate::data::loader::{load_or_sample, DataOrigin};
use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Dashboard session
// ---------------------------------------------------------------------------

/// What the presentation layer renders after each selection change.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub selection: FilterSelection,
    pub view_len: usize,
    pub catalog: AggregationCatalog,
}

/// One user's dashboard state, independent of rendering.
///
/// Holds the loaded dataset and the current selection. Nothing derived is
/// cached: every snapshot is recomputed from the dataset.
pub struct DashboardSession {
    dataset: Dataset,
    origin: DataOrigin,
    /// Non-fatal load problem to show the user.
    warning: Option<String>,
    options: FilterOptions,
    selection: FilterSelection,
    config: DashboardConfig,
}

impl DashboardSession {
    /// Start a session from `source`, falling back to sample data.
    pub fn open(source: Option<&Path>, config: DashboardConfig) -> Self {
        let outcome = load_or_sample(source, &config);
        let mut session = Self::with_dataset(outcome.dataset, config);
        session.origin = outcome.origin;
        session.warning = outcome.warning;
        session
    }

    pub fn with_dataset(dataset: Dataset, config: DashboardConfig) -> Self {
        Self {
            options: FilterOptions::from_dataset(&dataset),
            dataset,
            origin: DataOrigin::Sample,
            warning: None,
            selection: FilterSelection::all(),
            config,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn origin(&self) -> &DataOrigin {
        &self.origin
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Replace the selection; the year range is stored clamped.
    pub fn set_selection(&mut self, selection: FilterSelection) {
        self.selection = selection.clamped(&self.dataset);
    }

    /// Derive a new selection from the current one.
    pub fn update_selection(&mut self, f: impl FnOnce(FilterSelection) -> FilterSelection) {
        let next = f(self.selection.clone());
        self.set_selection(next);
    }

    /// Back to "All" everywhere.
    pub fn reset_filters(&mut self) {
        self.selection = FilterSelection::all();
    }

    /// Records passing the current selection.
    pub fn view(&self) -> FilteredView<'_> {
        apply(&self.dataset, &self.selection)
    }

    /// Recompute everything for the current selection.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let view = self.view();
        DashboardSnapshot {
            selection: self.selection.clone(),
            view_len: view.len(),
            catalog: aggregate_with(&view, &self.config.catalog),
        }
    }
}
