use grocery_analytics::data::filter::{apply, FilterSelection};
use grocery_analytics::data::model::{Dataset, FatContent, LocationType, OutletSize, Record};
use grocery_analytics::data::synthetic::{generate, SAMPLE_SEED};
use grocery_analytics::{aggregate, FilteredView};

fn record(item_id: &str, size: OutletSize, sales: f64) -> Record {
    Record {
        item_id: item_id.to_string(),
        item_weight: Some(9.3),
        item_fat_content: FatContent::LowFat,
        item_visibility: 0.016,
        item_type: "Dairy".to_string(),
        sales,
        rating: 4.0,
        outlet_id: "OUT049".to_string(),
        outlet_establishment_year: 2012,
        outlet_size: size,
        outlet_location_type: LocationType::Tier1,
        outlet_type: "Supermarket Type1".to_string(),
    }
}

fn ids(view: &FilteredView<'_>) -> Vec<String> {
    view.iter().map(|r| r.item_id.clone()).collect()
}

fn selections(ds: &Dataset) -> Vec<FilterSelection> {
    let (lo, hi) = ds.year_bounds().unwrap();
    vec![
        FilterSelection::all(),
        FilterSelection::all().with_outlet_size(OutletSize::Small),
        FilterSelection::all()
            .with_location_type(LocationType::Tier2)
            .with_fat_content(FatContent::Regular),
        FilterSelection::all()
            .with_item_type("Snack Foods")
            .with_outlet_type("Supermarket Type1")
            .with_years(lo + 2, hi - 2),
        FilterSelection::all().with_years(hi, lo),
    ]
}

#[test]
fn filters_commute() {
    let ds = generate(SAMPLE_SEED);
    let full = FilterSelection::all()
        .with_location_type(LocationType::Tier3)
        .with_outlet_size(OutletSize::Medium)
        .with_years(2012, 2020);

    let at_once = ids(&apply(&ds, &full));

    // one constraint at a time, in two different orders
    let steps_a = [
        FilterSelection::all().with_years(2012, 2020),
        FilterSelection::all().with_outlet_size(OutletSize::Medium),
        FilterSelection::all().with_location_type(LocationType::Tier3),
    ];
    let mut current = ds.clone();
    for step in &steps_a {
        let next = apply(&current, step).to_dataset();
        current = next;
    }
    let in_order: Vec<String> = current.iter().map(|r| r.item_id.clone()).collect();

    let mut current = ds.clone();
    for step in steps_a.iter().rev() {
        let next = apply(&current, step).to_dataset();
        current = next;
    }
    let reversed: Vec<String> = current.iter().map(|r| r.item_id.clone()).collect();

    assert_eq!(at_once, in_order);
    assert_eq!(at_once, reversed);
}

#[test]
fn filtering_is_idempotent() {
    let ds = generate(SAMPLE_SEED);
    for sel in selections(&ds) {
        let once = apply(&ds, &sel).to_dataset();
        let twice = apply(&once, &sel).to_dataset();
        assert_eq!(once, twice, "{sel:?}");
    }
}

#[test]
fn grouped_sales_add_up_to_total() {
    let ds = generate(SAMPLE_SEED);
    for sel in selections(&ds) {
        let cat = aggregate(&apply(&ds, &sel));
        let total = cat.summary.total_sales;
        let close = |x: f64| (x - total).abs() <= 1e-6 * total.max(1.0);

        assert!(close(cat.sales_by_year.iter().map(|g| g.total_sales).sum()));
        assert!(close(cat.sales_by_fat_content.iter().map(|g| g.total_sales).sum()));
        assert!(close(cat.sales_by_outlet_size.iter().map(|g| g.total_sales).sum()));
        assert!(close(cat.sales_by_location_type.iter().map(|g| g.total_sales).sum()));
        assert!(close(cat.sales_by_outlet_type.iter().map(|g| g.total_sales).sum()));
        assert!(close(cat.outlet_type_table.iter().map(|g| g.total_sales).sum()));
        assert!(close(cat.sales_by_item_type_and_size.total()));
        assert!(close(cat.sales_by_location_and_fat.total()));

        let counted: usize = cat.sales_by_year.iter().map(|g| g.record_count).sum();
        assert_eq!(counted, cat.summary.record_count);
        assert_eq!(cat.sales_histogram.total(), cat.summary.record_count);
        assert_eq!(cat.rating_histogram.total(), cat.summary.record_count);
    }
}

#[test]
fn empty_view_aggregates_safely() {
    let ds = Dataset::new(vec![record("A", OutletSize::Small, 10.0)]);
    let view = apply(&ds, &FilterSelection::all().with_outlet_size(OutletSize::High));
    assert!(view.is_empty());

    let cat = aggregate(&view);
    assert_eq!(cat.summary.record_count, 0);
    assert_eq!(cat.summary.total_sales, 0.0);
    assert_eq!(cat.summary.mean_sales, None);
    assert_eq!(cat.summary.mean_rating, None);
    assert!(cat.outlet_type_table.is_empty());
    assert!(cat.rating_by_item_type.is_empty());
}

#[test]
fn top_items_break_ties_by_item_id() {
    let ds = Dataset::new(vec![
        record("ITM0009", OutletSize::Small, 40.0),
        record("ITM0003", OutletSize::Small, 40.0),
        record("ITM0005", OutletSize::High, 90.0),
        record("ITM0001", OutletSize::High, 10.0),
    ]);
    let cat = aggregate(&apply(&ds, &FilterSelection::all()));
    let order: Vec<&str> = cat.top_items.iter().map(|i| i.item_id.as_str()).collect();
    assert_eq!(order, ["ITM0005", "ITM0003", "ITM0009", "ITM0001"]);
}

#[test]
fn top_items_keep_ten() {
    let ds = generate(SAMPLE_SEED);
    let cat = aggregate(&apply(&ds, &FilterSelection::all()));
    assert_eq!(cat.top_items.len(), 10);
    assert!(cat
        .top_items
        .windows(2)
        .all(|w| w[0].total_sales >= w[1].total_sales));
    assert!(cat.top_item_types_by_sales.len() <= 7);
    assert!(cat.top_visibility_by_item_type.len() <= 10);
}

#[test]
fn generator_is_reproducible() {
    let a = generate(SAMPLE_SEED);
    let b = generate(SAMPLE_SEED);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(a.records()).unwrap(),
        serde_json::to_string(b.records()).unwrap()
    );
}

#[test]
fn small_outlet_scenario() {
    let ds = Dataset::new(vec![
        record("A", OutletSize::Small, 100.0),
        record("B", OutletSize::Small, 50.0),
        record("C", OutletSize::High, 30.0),
    ]);
    let view = apply(&ds, &FilterSelection::all().with_outlet_size(OutletSize::Small));
    assert_eq!(view.len(), 2);

    let cat = aggregate(&view);
    assert_eq!(cat.sales_by_outlet_size.len(), 1);
    assert_eq!(cat.sales_by_outlet_size[0].key, OutletSize::Small);
    assert_eq!(cat.sales_by_outlet_size[0].total_sales, 150.0);
    assert_eq!(cat.summary.total_sales, 150.0);
    assert_eq!(cat.summary.record_count, 2);
    assert_eq!(cat.summary.mean_sales, Some(75.0));
}

#[test]
fn year_without_outlets_gives_empty_view() {
    let mut a = record("A", OutletSize::Small, 100.0);
    a.outlet_establishment_year = 2011;
    let mut b = record("B", OutletSize::Small, 100.0);
    b.outlet_establishment_year = 2020;
    let ds = Dataset::new(vec![a, b]);

    let view = apply(&ds, &FilterSelection::all().with_years(2015, 2015));
    assert!(view.is_empty());

    let cat = aggregate(&view);
    assert_eq!(cat.summary.total_sales, 0.0);
    assert_eq!(cat.summary.mean_rating, None);
}

fn outlets_opened_in(years: &[i32]) -> Dataset {
    Dataset::new(
        years
            .iter()
            .enumerate()
            .map(|(i, &year)| {
                let mut r = record(&format!("ITM{i:04}"), OutletSize::Medium, 100.0);
                r.outlet_establishment_year = year;
                r
            })
            .collect(),
    )
}

#[test]
fn year_before_every_outlet_gives_empty_view() {
    let ds = outlets_opened_in(&[2016, 2020]);
    let view = apply(&ds, &FilterSelection::all().with_years(2015, 2015));
    assert!(view.is_empty(), "{:?}", ids(&view));

    let cat = aggregate(&view);
    assert_eq!(cat.summary.total_sales, 0.0);
    assert_eq!(cat.summary.mean_rating, None);
}

#[test]
fn year_after_every_outlet_gives_empty_view() {
    let ds = outlets_opened_in(&[2011, 2013]);
    let view = apply(&ds, &FilterSelection::all().with_years(2015, 2015));
    assert!(view.is_empty(), "{:?}", ids(&view));

    let cat = aggregate(&view);
    assert_eq!(cat.summary.total_sales, 0.0);
    assert_eq!(cat.summary.mean_rating, None);
}
