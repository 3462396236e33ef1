use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use super::histogram::Histogram;
use super::stats::{Accumulator, Grouped};
use crate::config::CatalogConfig;
use crate::data::filter::FilteredView;
use crate::data::model::{FatContent, LocationType, OutletSize, Record};

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Headline KPIs. Means are `None` over an empty view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_sales: f64,
    pub mean_sales: Option<f64>,
    pub record_count: usize,
    pub mean_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSales {
    pub year: i32,
    pub total_sales: f64,
    pub record_count: usize,
}

/// Sales summed over one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal<K> {
    pub key: K,
    pub total_sales: f64,
    pub record_count: usize,
}

/// Mean of some measure over one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean<K> {
    pub key: K,
    pub mean: Option<f64>,
    pub record_count: usize,
}

/// Dense two-way table of summed sales; absent combinations hold 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesMatrix<R, C> {
    pub rows: Vec<R>,
    pub columns: Vec<C>,
    /// `values[row][column]`
    pub values: Vec<Vec<f64>>,
}

impl<R: PartialEq, C: PartialEq> SalesMatrix<R, C> {
    pub fn get(&self, row: &R, column: &C) -> Option<f64> {
        let r = self.rows.iter().position(|x| x == row)?;
        let c = self.columns.iter().position(|x| x == column)?;
        Some(self.values[r][c])
    }

    pub fn total(&self) -> f64 {
        self.values.iter().flatten().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutletTypeRow {
    pub outlet_type: String,
    pub total_sales: f64,
    pub mean_sales: Option<f64>,
    pub record_count: usize,
    pub mean_rating: Option<f64>,
    pub mean_visibility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSales {
    pub item_id: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub sales: f64,
    pub rating: f64,
    pub item_type: String,
    pub item_weight: f64,
}

/// Everything the dashboard draws, derived from one filtered view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationCatalog {
    pub summary: Summary,
    pub sales_by_year: Vec<YearSales>,
    pub sales_by_fat_content: Vec<GroupTotal<FatContent>>,
    pub top_item_types_by_sales: Vec<GroupTotal<String>>,
    pub sales_by_outlet_size: Vec<GroupTotal<OutletSize>>,
    pub sales_by_location_type: Vec<GroupTotal<LocationType>>,
    pub sales_by_outlet_type: Vec<GroupTotal<String>>,
    pub rating_by_item_type: Vec<GroupMean<String>>,
    pub top_visibility_by_item_type: Vec<GroupMean<String>>,
    pub sales_by_item_type_and_size: SalesMatrix<String, OutletSize>,
    pub sales_by_location_and_fat: SalesMatrix<LocationType, FatContent>,
    pub outlet_type_table: Vec<OutletTypeRow>,
    pub top_items: Vec<ItemSales>,
    pub sales_histogram: Histogram,
    pub rating_histogram: Histogram,
    pub sales_rating_points: Vec<ScatterPoint>,
}

// ---------------------------------------------------------------------------
// Aggregations
// ---------------------------------------------------------------------------

/// Descending by value. NaN cannot occur: inputs are validated finite.
fn desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}

pub fn summary(view: &FilteredView<'_>) -> Summary {
    let sales: Accumulator = view.iter().map(|r| r.sales).collect();
    let rating: Accumulator = view.iter().map(|r| r.rating).collect();
    Summary {
        total_sales: sales.sum,
        mean_sales: sales.mean(),
        record_count: sales.count,
        mean_rating: rating.mean(),
    }
}

/// Sum sales per key, returned in key order.
pub fn sales_by<K, F>(view: &FilteredView<'_>, key: F) -> Vec<GroupTotal<K>>
where
    K: std::hash::Hash + Eq + Ord + Clone,
    F: Fn(&Record) -> K,
{
    let mut groups: Grouped<K, Accumulator> = Grouped::default();
    for r in view.iter() {
        groups.entry(&key(r)).push(r.sales);
    }
    groups
        .finish_sorted()
        .into_iter()
        .map(|(key, acc)| GroupTotal {
            key,
            total_sales: acc.sum,
            record_count: acc.count,
        })
        .collect()
}

pub fn sales_by_year(view: &FilteredView<'_>) -> Vec<YearSales> {
    sales_by(view, |r| r.outlet_establishment_year)
        .into_iter()
        .map(|g| YearSales {
            year: g.key,
            total_sales: g.total_sales,
            record_count: g.record_count,
        })
        .collect()
}

/// Item types by summed sales, largest first. Equal totals keep the order in
/// which the item types first appear in the view.
pub fn top_item_types_by_sales(view: &FilteredView<'_>, n: usize) -> Vec<GroupTotal<String>> {
    let mut groups: Grouped<String, Accumulator> = Grouped::default();
    for r in view.iter() {
        groups.entry(&r.item_type).push(r.sales);
    }
    let mut totals: Vec<GroupTotal<String>> = groups
        .finish()
        .into_iter()
        .map(|(key, acc)| GroupTotal {
            key,
            total_sales: acc.sum,
            record_count: acc.count,
        })
        .collect();
    // stable sort keeps first-seen order among ties
    totals.sort_by(|a, b| desc(a.total_sales, b.total_sales));
    totals.truncate(n);
    totals
}

fn mean_by_item_type<F>(view: &FilteredView<'_>, measure: F) -> Vec<GroupMean<String>>
where
    F: Fn(&Record) -> f64,
{
    let mut groups: Grouped<String, Accumulator> = Grouped::default();
    for r in view.iter() {
        groups.entry(&r.item_type).push(measure(r));
    }
    let mut means: Vec<GroupMean<String>> = groups
        .finish()
        .into_iter()
        .map(|(key, acc)| GroupMean {
            key,
            mean: acc.mean(),
            record_count: acc.count,
        })
        .collect();
    means.sort_by(|a, b| {
        desc(a.mean.unwrap_or(f64::NEG_INFINITY), b.mean.unwrap_or(f64::NEG_INFINITY))
            .then_with(|| a.key.cmp(&b.key))
    });
    means
}

/// Mean rating per item type, best rated first.
pub fn rating_by_item_type(view: &FilteredView<'_>) -> Vec<GroupMean<String>> {
    mean_by_item_type(view, |r| r.rating)
}

/// The `n` item types with the highest mean shelf visibility.
pub fn top_visibility_by_item_type(view: &FilteredView<'_>, n: usize) -> Vec<GroupMean<String>> {
    let mut means = mean_by_item_type(view, |r| r.item_visibility);
    means.truncate(n);
    means
}

/// Pivot summed sales into a dense `rows × columns` matrix. Only keys that
/// occur in the view form the axes, sorted ascending.
pub fn sales_matrix<R, C, FR, FC>(view: &FilteredView<'_>, row: FR, column: FC) -> SalesMatrix<R, C>
where
    R: Ord + Clone,
    C: Ord + Clone,
    FR: Fn(&Record) -> R,
    FC: Fn(&Record) -> C,
{
    let rows: Vec<R> = view.iter().map(&row).collect::<BTreeSet<_>>().into_iter().collect();
    let columns: Vec<C> = view.iter().map(&column).collect::<BTreeSet<_>>().into_iter().collect();

    let mut values = vec![vec![0.0; columns.len()]; rows.len()];
    for r in view.iter() {
        // keys come from the same view, so both lookups succeed
        if let (Ok(i), Ok(j)) = (rows.binary_search(&row(r)), columns.binary_search(&column(r))) {
            values[i][j] += r.sales;
        }
    }

    SalesMatrix { rows, columns, values }
}

#[derive(Default)]
struct OutletTypeAcc {
    sales: Accumulator,
    rating: Accumulator,
    visibility: Accumulator,
}

/// One comparison row per outlet type present in the view, by outlet type.
pub fn outlet_type_table(view: &FilteredView<'_>) -> Vec<OutletTypeRow> {
    let mut groups: Grouped<String, OutletTypeAcc> = Grouped::default();
    for r in view.iter() {
        let acc = groups.entry(&r.outlet_type);
        acc.sales.push(r.sales);
        acc.rating.push(r.rating);
        acc.visibility.push(r.item_visibility);
    }
    groups
        .finish_sorted()
        .into_iter()
        .map(|(outlet_type, acc)| OutletTypeRow {
            outlet_type,
            total_sales: acc.sales.sum,
            mean_sales: acc.sales.mean(),
            record_count: acc.sales.count,
            mean_rating: acc.rating.mean(),
            mean_visibility: acc.visibility.mean(),
        })
        .collect()
}

/// Best-selling item ids by summed sales; ties go to the smaller id.
pub fn top_items(view: &FilteredView<'_>, n: usize) -> Vec<ItemSales> {
    let mut items: Vec<ItemSales> = sales_by(view, |r| r.item_id.clone())
        .into_iter()
        .map(|g| ItemSales {
            item_id: g.key,
            total_sales: g.total_sales,
        })
        .collect();
    items.sort_by(|a, b| desc(a.total_sales, b.total_sales).then_with(|| a.item_id.cmp(&b.item_id)));
    items.truncate(n);
    items
}

/// Sales against rating, one point per record with a known weight.
pub fn sales_rating_points(view: &FilteredView<'_>) -> Vec<ScatterPoint> {
    view.iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                sales: r.sales,
                rating: r.rating,
                item_type: r.item_type.clone(),
                item_weight: r.item_weight?,
            })
        })
        .collect()
}

/// Compute the full catalog with the stock dashboard settings.
pub fn aggregate(view: &FilteredView<'_>) -> AggregationCatalog {
    aggregate_with(view, &CatalogConfig::default())
}

pub fn aggregate_with(view: &FilteredView<'_>, config: &CatalogConfig) -> AggregationCatalog {
    log::debug!("aggregating {} records", view.len());

    AggregationCatalog {
        summary: summary(view),
        sales_by_year: sales_by_year(view),
        sales_by_fat_content: sales_by(view, |r| r.item_fat_content),
        top_item_types_by_sales: top_item_types_by_sales(view, config.top_item_types),
        sales_by_outlet_size: sales_by(view, |r| r.outlet_size),
        sales_by_location_type: sales_by(view, |r| r.outlet_location_type),
        sales_by_outlet_type: sales_by(view, |r| r.outlet_type.clone()),
        rating_by_item_type: rating_by_item_type(view),
        top_visibility_by_item_type: top_visibility_by_item_type(view, config.top_visibility),
        sales_by_item_type_and_size: sales_matrix(view, |r| r.item_type.clone(), |r| r.outlet_size),
        sales_by_location_and_fat: sales_matrix(
            view,
            |r| r.outlet_location_type,
            |r| r.item_fat_content,
        ),
        outlet_type_table: outlet_type_table(view),
        top_items: top_items(view, config.top_items),
        sales_histogram: Histogram::from_values(view.iter().map(|r| r.sales), config.sales_histogram_bins),
        rating_histogram: Histogram::from_values(
            view.iter().map(|r| r.rating),
            config.rating_histogram_bins,
        ),
        sales_rating_points: sales_rating_points(view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterSelection};
    use crate::data::model::fixtures::record;
    use crate::data::model::Dataset;

    fn dataset() -> Dataset {
        let mut rows = Vec::new();
        let rows_in = [
            ("I1", "Dairy", OutletSize::Small, "Grocery Store", 100.0, 4.0, 0.10),
            ("I2", "Snack Foods", OutletSize::High, "Supermarket Type1", 60.0, 3.0, 0.20),
            ("I3", "Dairy", OutletSize::High, "Supermarket Type1", 40.0, 5.0, 0.05),
            ("I1", "Dairy", OutletSize::Medium, "Supermarket Type1", 20.0, 4.5, 0.15),
        ];
        for (id, item_type, size, outlet_type, sales, rating, vis) in rows_in {
            let mut r = record(id, sales);
            r.item_type = item_type.into();
            r.outlet_size = size;
            r.outlet_type = outlet_type.into();
            r.rating = rating;
            r.item_visibility = vis;
            rows.push(r);
        }
        Dataset::new(rows)
    }

    #[test]
    fn summary_over_view() {
        let ds = dataset();
        let s = summary(&FilteredView::unfiltered(&ds));
        assert_eq!(s.total_sales, 220.0);
        assert_eq!(s.record_count, 4);
        assert_eq!(s.mean_sales, Some(55.0));
        assert_eq!(s.mean_rating, Some(4.125));
    }

    #[test]
    fn grouped_sums_are_key_ordered() {
        let ds = dataset();
        let by_size = sales_by(&FilteredView::unfiltered(&ds), |r| r.outlet_size);
        let keys: Vec<OutletSize> = by_size.iter().map(|g| g.key).collect();
        assert_eq!(keys, [OutletSize::Small, OutletSize::Medium, OutletSize::High]);
        assert_eq!(by_size[2].total_sales, 100.0);
        assert_eq!(by_size[2].record_count, 2);
    }

    #[test]
    fn top_item_types_ties_keep_first_seen_order() {
        let mut a = record("A", 50.0);
        a.item_type = "Meat".into();
        let mut b = record("B", 50.0);
        b.item_type = "Breads".into();
        let mut c = record("C", 80.0);
        c.item_type = "Canned".into();
        let ds = Dataset::new(vec![a, b, c]);

        let top = top_item_types_by_sales(&FilteredView::unfiltered(&ds), 2);
        let keys: Vec<&str> = top.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, ["Canned", "Meat"]);
    }

    #[test]
    fn matrix_fills_missing_combinations_with_zero() {
        let ds = dataset();
        let m = sales_matrix(&FilteredView::unfiltered(&ds), |r| r.item_type.clone(), |r| r.outlet_size);
        assert_eq!(m.rows, ["Dairy", "Snack Foods"]);
        assert_eq!(m.columns, [OutletSize::Small, OutletSize::Medium, OutletSize::High]);
        assert_eq!(m.get(&"Snack Foods".to_string(), &OutletSize::Small), Some(0.0));
        assert_eq!(m.get(&"Dairy".to_string(), &OutletSize::High), Some(40.0));
        assert_eq!(m.total(), 220.0);
    }

    #[test]
    fn outlet_type_table_rows() {
        let ds = dataset();
        let table = outlet_type_table(&FilteredView::unfiltered(&ds));
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].outlet_type, "Grocery Store");
        let sm = &table[1];
        assert_eq!(sm.total_sales, 120.0);
        assert_eq!(sm.mean_sales, Some(40.0));
        assert_eq!(sm.record_count, 3);
        assert_eq!(sm.mean_rating, Some(12.5 / 3.0));
    }

    #[test]
    fn top_items_sum_across_outlets() {
        let ds = dataset();
        let top = top_items(&FilteredView::unfiltered(&ds), 2);
        assert_eq!(top[0], ItemSales { item_id: "I1".into(), total_sales: 120.0 });
        assert_eq!(top[1].item_id, "I2");
    }

    #[test]
    fn visibility_ranking_is_descending() {
        let ds = dataset();
        let vis = top_visibility_by_item_type(&FilteredView::unfiltered(&ds), 10);
        assert_eq!(vis[0].key, "Snack Foods");
        assert_eq!(vis[1].key, "Dairy");
        assert!((vis[1].mean.unwrap() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn scatter_skips_unknown_weights() {
        let mut ds_rows: Vec<_> = dataset().records().to_vec();
        ds_rows[0].item_weight = None;
        let ds = Dataset::new(ds_rows);
        assert_eq!(sales_rating_points(&FilteredView::unfiltered(&ds)).len(), 3);
    }

    #[test]
    fn empty_view_catalog_is_well_defined() {
        let ds = dataset();
        let view = apply(&ds, &FilterSelection::all().with_item_type("Seafood"));
        let cat = aggregate(&view);
        assert_eq!(cat.summary.record_count, 0);
        assert_eq!(cat.summary.total_sales, 0.0);
        assert_eq!(cat.summary.mean_sales, None);
        assert_eq!(cat.summary.mean_rating, None);
        assert!(cat.sales_by_year.is_empty());
        assert!(cat.top_items.is_empty());
        assert!(cat.sales_by_item_type_and_size.rows.is_empty());
        assert!(cat.sales_histogram.bins.is_empty());
    }
}
