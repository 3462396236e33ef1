use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp1;

use super::model::{Dataset, FatContent, LocationType, OutletSize, Record};
use crate::config::SampleConfig;

/// Seed used when the dashboard starts without a data file.
pub const SAMPLE_SEED: u64 = 42;

pub const OUTLET_TYPES: [&str; 4] = [
    "Supermarket Type1",
    "Supermarket Type2",
    "Supermarket Type3",
    "Grocery Store",
];

pub const ITEM_TYPES: [&str; 16] = [
    "Fruits and Vegetables",
    "Snack Foods",
    "Household",
    "Frozen Foods",
    "Dairy",
    "Canned",
    "Baking Goods",
    "Health and Hygiene",
    "Meat",
    "Soft Drinks",
    "Breads",
    "Hard Drinks",
    "Others",
    "Starchy Foods",
    "Breakfast",
    "Seafood",
];

const FIRST_YEAR: i32 = 2010;
const LAST_YEAR: i32 = 2022;

#[derive(Debug, Clone)]
struct Outlet {
    id: String,
    year: i32,
    size: OutletSize,
    location: LocationType,
    kind: &'static str,
}

fn pick<T: Copy, R: Rng>(rng: &mut R, items: &[T]) -> T {
    items[rng.gen_range(0..items.len())]
}

/// Gamma(shape = 2, scale) as the sum of two exponential draws.
fn gamma2<R: Rng>(rng: &mut R, scale: f64) -> f64 {
    let a: f64 = rng.sample(Exp1);
    let b: f64 = rng.sample(Exp1);
    scale * (a + b)
}

fn outlet_multiplier(kind: &str) -> f64 {
    if kind.contains("Supermarket") {
        1.5
    } else {
        1.0
    }
}

fn item_multiplier(item_type: &str) -> f64 {
    match item_type {
        "Fruits and Vegetables" | "Snack Foods" => 1.8,
        "Household" | "Dairy" => 1.5,
        _ => 1.0,
    }
}

fn generate_outlets(rng: &mut StdRng, n: usize) -> Vec<Outlet> {
    let years: Vec<i32> = (0..n).map(|_| rng.gen_range(FIRST_YEAR..=LAST_YEAR)).collect();
    let sizes: Vec<OutletSize> = (0..n).map(|_| pick(rng, &OutletSize::ALL)).collect();
    let locations: Vec<LocationType> = (0..n).map(|_| pick(rng, &LocationType::ALL)).collect();
    let kinds: Vec<&'static str> = (0..n).map(|_| pick(rng, &OUTLET_TYPES)).collect();

    (0..n)
        .map(|i| Outlet {
            id: format!("OUT{:03}", i + 1),
            year: years[i],
            size: sizes[i],
            location: locations[i],
            kind: kinds[i],
        })
        .collect()
}

/// Generate the default synthetic dataset for `seed`.
pub fn generate(seed: u64) -> Dataset {
    generate_with(&SampleConfig {
        seed,
        ..SampleConfig::default()
    })
}

/// Generate a synthetic dataset. Same config, same records.
pub fn generate_with(config: &SampleConfig) -> Dataset {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let outlets = generate_outlets(&mut rng, config.outlets.max(1));

    let records: Vec<Record> = (1..=config.items)
        .map(|i| {
            let outlet = &outlets[rng.gen_range(0..outlets.len())];
            let item_type = pick(&mut rng, &ITEM_TYPES);
            let fat_content = pick(&mut rng, &FatContent::ALL);

            let base_sales = 100.0 + gamma2(&mut rng, 50.0);
            let sales = base_sales * outlet_multiplier(outlet.kind) * item_multiplier(item_type);
            let visibility = rng.gen_range(0.01..0.2);
            let rating = rng.gen_range(3.0..5.0);
            let weight = rng.gen_range(5.0..20.0);

            Record {
                item_id: format!("ITM{i:04}"),
                item_weight: Some(weight),
                item_fat_content: fat_content,
                item_visibility: visibility,
                item_type: item_type.to_string(),
                sales,
                rating,
                outlet_id: outlet.id.clone(),
                outlet_establishment_year: outlet.year,
                outlet_size: outlet.size,
                outlet_location_type: outlet.location,
                outlet_type: outlet.kind.to_string(),
            }
        })
        .collect();

    log::debug!(
        "generated {} sample records across {} outlets (seed {})",
        records.len(),
        outlets.len(),
        config.seed
    );
    Dataset::new(records)
}
