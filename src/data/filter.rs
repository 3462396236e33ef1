use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Dataset, FatContent, LocationType, OutletSize, Record};

// ---------------------------------------------------------------------------
// Year range
// ---------------------------------------------------------------------------

/// Inclusive range of outlet establishment years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Intersect with `bounds`; an inverted range is flipped first.
    ///
    /// A range lying wholly outside `bounds` has no intersection. It is
    /// returned flipped but otherwise untouched, so it still matches no year
    /// inside `bounds`.
    pub fn clamp_to(self, (lo, hi): (i32, i32)) -> Self {
        let (min, max) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if max < lo || min > hi {
            return Self { min, max };
        }
        Self {
            min: min.max(lo),
            max: max.min(hi),
        }
    }

    /// True when the range shares at least one year with `bounds`.
    pub fn overlaps(&self, (lo, hi): (i32, i32)) -> bool {
        self.min <= hi && lo <= self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }
}

// ---------------------------------------------------------------------------
// Filter selection: one optional equality per categorical field + year range
// ---------------------------------------------------------------------------

/// The user's sidebar choices. `None` means "All" for that field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub location_type: Option<LocationType>,
    pub outlet_size: Option<OutletSize>,
    pub item_type: Option<String>,
    pub outlet_type: Option<String>,
    pub fat_content: Option<FatContent>,
    /// `None` spans the whole dataset.
    pub years: Option<YearRange>,
}

impl FilterSelection {
    /// Selection with every field unconstrained.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_location_type(mut self, value: LocationType) -> Self {
        self.location_type = Some(value);
        self
    }

    pub fn with_outlet_size(mut self, value: OutletSize) -> Self {
        self.outlet_size = Some(value);
        self
    }

    pub fn with_item_type(mut self, value: impl Into<String>) -> Self {
        self.item_type = Some(value.into());
        self
    }

    pub fn with_outlet_type(mut self, value: impl Into<String>) -> Self {
        self.outlet_type = Some(value.into());
        self
    }

    pub fn with_fat_content(mut self, value: FatContent) -> Self {
        self.fat_content = Some(value);
        self
    }

    pub fn with_years(mut self, min: i32, max: i32) -> Self {
        self.years = Some(YearRange::new(min, max));
        self
    }

    /// Copy of this selection with the year range intersected with the
    /// dataset's year bounds. A disjoint range and an empty dataset both keep
    /// the range as given (flipped if inverted).
    pub fn clamped(&self, dataset: &Dataset) -> Self {
        let mut out = self.clone();
        if let (Some(range), Some(bounds)) = (out.years, dataset.year_bounds()) {
            out.years = Some(range.clamp_to(bounds));
        }
        out
    }

    /// Whether `record` satisfies every active constraint.
    pub fn matches(&self, record: &Record) -> bool {
        fn eq<T: PartialEq + ?Sized>(wanted: Option<&T>, actual: &T) -> bool {
            wanted.map_or(true, |w| w == actual)
        }

        eq(self.location_type.as_ref(), &record.outlet_location_type)
            && eq(self.outlet_size.as_ref(), &record.outlet_size)
            && eq(self.item_type.as_deref(), record.item_type.as_str())
            && eq(self.outlet_type.as_deref(), record.outlet_type.as_str())
            && eq(self.fat_content.as_ref(), &record.item_fat_content)
            && self
                .years
                .map_or(true, |range| range.contains(record.outlet_establishment_year))
    }

    /// Number of constrained fields, counting the year range only when set.
    pub fn active_constraints(&self) -> usize {
        [
            self.location_type.is_some(),
            self.outlet_size.is_some(),
            self.item_type.is_some(),
            self.outlet_type.is_some(),
            self.fat_content.is_some(),
            self.years.is_some(),
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records of a [`Dataset`] passing a selection, in their original order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    records: Vec<&'a Record>,
}

impl<'a> FilteredView<'a> {
    /// View over every record of `dataset`.
    pub fn unfiltered(dataset: &'a Dataset) -> Self {
        Self {
            records: dataset.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[&'a Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        self.records.iter().copied()
    }

    /// Owned copy of the view, so it can be filtered again.
    pub fn to_dataset(&self) -> Dataset {
        self.records
            .iter()
            .map(|r| (*r).clone())
            .collect::<Vec<_>>()
            .into()
    }
}

/// Return the records of `dataset` that pass `selection`.
///
/// The year range is clamped to the dataset bounds first. All constraints
/// are ANDed, so the result does not depend on the order they are checked.
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let selection = selection.clamped(dataset);
    let records: Vec<&Record> = dataset.iter().filter(|r| selection.matches(r)).collect();
    log::debug!(
        "filter kept {} of {} records ({} active constraints)",
        records.len(),
        dataset.len(),
        selection.active_constraints()
    );
    FilteredView { records }
}

// ---------------------------------------------------------------------------
// Filter options for the sidebar
// ---------------------------------------------------------------------------

/// Sorted distinct values a user can pick for each filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub location_types: Vec<LocationType>,
    pub outlet_sizes: Vec<OutletSize>,
    pub item_types: Vec<String>,
    pub outlet_types: Vec<String>,
    pub fat_contents: Vec<FatContent>,
    pub year_bounds: Option<(i32, i32)>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut locations = BTreeSet::new();
        let mut sizes = BTreeSet::new();
        let mut item_types = BTreeSet::new();
        let mut outlet_types = BTreeSet::new();
        let mut fats = BTreeSet::new();

        for r in dataset {
            locations.insert(r.outlet_location_type);
            sizes.insert(r.outlet_size);
            item_types.insert(r.item_type.clone());
            outlet_types.insert(r.outlet_type.clone());
            fats.insert(r.item_fat_content);
        }

        Self {
            location_types: locations.into_iter().collect(),
            outlet_sizes: sizes.into_iter().collect(),
            item_types: item_types.into_iter().collect(),
            outlet_types: outlet_types.into_iter().collect(),
            fat_contents: fats.into_iter().collect(),
            year_bounds: dataset.year_bounds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn dataset() -> Dataset {
        let mut a = record("A", 100.0);
        a.outlet_size = OutletSize::Small;
        a.outlet_establishment_year = 2011;
        let mut b = record("B", 50.0);
        b.outlet_size = OutletSize::Small;
        b.item_type = "Snack Foods".into();
        b.outlet_establishment_year = 2018;
        let mut c = record("C", 30.0);
        c.outlet_size = OutletSize::High;
        c.item_fat_content = FatContent::Regular;
        c.outlet_establishment_year = 2020;
        Dataset::new(vec![a, b, c])
    }

    fn ids(view: &FilteredView<'_>) -> Vec<String> {
        view.iter().map(|r| r.item_id.clone()).collect()
    }

    #[test]
    fn unconstrained_selection_keeps_everything_in_order() {
        let ds = dataset();
        let view = apply(&ds, &FilterSelection::all());
        assert_eq!(ids(&view), ["A", "B", "C"]);
    }

    #[test]
    fn equality_constraints_are_conjunctive() {
        let ds = dataset();
        let sel = FilterSelection::all()
            .with_outlet_size(OutletSize::Small)
            .with_item_type("Dairy");
        assert_eq!(ids(&apply(&ds, &sel)), ["A"]);
    }

    #[test]
    fn year_range_is_inclusive() {
        let ds = dataset();
        let sel = FilterSelection::all().with_years(2018, 2020);
        assert_eq!(ids(&apply(&ds, &sel)), ["B", "C"]);
    }

    #[test]
    fn out_of_bounds_range_is_clamped_not_rejected() {
        let ds = dataset();
        let sel = FilterSelection::all().with_years(1990, 2100);
        assert_eq!(sel.clamped(&ds).years, Some(YearRange::new(2011, 2020)));
        assert_eq!(apply(&ds, &sel).len(), 3);
    }

    #[test]
    fn inverted_range_is_flipped() {
        assert_eq!(
            YearRange::new(2020, 2012).clamp_to((2010, 2022)),
            YearRange::new(2012, 2020)
        );
    }

    #[test]
    fn range_beyond_every_year_matches_nothing() {
        let ds = dataset();
        let sel = FilterSelection::all().with_years(2021, 2030);
        let clamped = sel.clamped(&ds).years.unwrap();
        assert_eq!(clamped, YearRange::new(2021, 2030));
        assert!(!clamped.overlaps((2011, 2020)));
        assert!(apply(&ds, &sel).is_empty());
    }

    #[test]
    fn range_before_every_year_matches_nothing() {
        let ds = dataset();
        let sel = FilterSelection::all().with_years(2010, 1990);
        assert_eq!(sel.clamped(&ds).years, Some(YearRange::new(1990, 2010)));
        assert!(apply(&ds, &sel).is_empty());
    }

    #[test]
    fn partial_overlap_is_cut_to_the_bounds() {
        assert_eq!(
            YearRange::new(2005, 2015).clamp_to((2011, 2020)),
            YearRange::new(2011, 2015)
        );
        assert_eq!(
            YearRange::new(2020, 2040).clamp_to((2011, 2020)),
            YearRange::new(2020, 2020)
        );
    }

    #[test]
    fn no_match_yields_empty_view() {
        let ds = dataset();
        let sel = FilterSelection::all()
            .with_outlet_size(OutletSize::High)
            .with_fat_content(FatContent::LowFat);
        assert!(apply(&ds, &sel).is_empty());
    }

    #[test]
    fn options_list_distinct_sorted_values() {
        let opts = FilterOptions::from_dataset(&dataset());
        assert_eq!(opts.outlet_sizes, [OutletSize::Small, OutletSize::High]);
        assert_eq!(opts.item_types, ["Dairy", "Snack Foods"]);
        assert_eq!(opts.year_bounds, Some((2011, 2020)));
    }
}
