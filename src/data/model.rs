use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Closed categorical fields
// ---------------------------------------------------------------------------

/// Returned by the `FromStr` impls below; the loader turns it into a
/// row-level error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLabel(pub String);

impl fmt::Display for UnknownLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown label '{}'", self.0)
    }
}

impl std::error::Error for UnknownLabel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FatContent {
    #[serde(rename = "Low Fat")]
    LowFat,
    Regular,
}

impl FatContent {
    pub const ALL: [FatContent; 2] = [FatContent::LowFat, FatContent::Regular];

    pub const fn label(self) -> &'static str {
        match self {
            FatContent::LowFat => "Low Fat",
            FatContent::Regular => "Regular",
        }
    }
}

impl FromStr for FatContent {
    type Err = UnknownLabel;

    /// Raw grocery exports spell this column several ways ("LF", "low fat", "reg").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low fat" | "lowfat" | "low_fat" | "lf" => Ok(FatContent::LowFat),
            "regular" | "reg" => Ok(FatContent::Regular),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

/// Declared smallest to largest so `Ord` follows store size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OutletSize {
    Small,
    Medium,
    High,
}

impl OutletSize {
    pub const ALL: [OutletSize; 3] = [OutletSize::Small, OutletSize::Medium, OutletSize::High];

    pub const fn label(self) -> &'static str {
        match self {
            OutletSize::Small => "Small",
            OutletSize::Medium => "Medium",
            OutletSize::High => "High",
        }
    }
}

impl FromStr for OutletSize {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutletSize::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LocationType {
    #[serde(rename = "Tier 1")]
    Tier1,
    #[serde(rename = "Tier 2")]
    Tier2,
    #[serde(rename = "Tier 3")]
    Tier3,
}

impl LocationType {
    pub const ALL: [LocationType; 3] = [LocationType::Tier1, LocationType::Tier2, LocationType::Tier3];

    pub const fn label(self) -> &'static str {
        match self {
            LocationType::Tier1 => "Tier 1",
            LocationType::Tier2 => "Tier 2",
            LocationType::Tier3 => "Tier 3",
        }
    }
}

impl FromStr for LocationType {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.split_whitespace().collect::<Vec<_>>().join(" ");
        LocationType::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(&compact))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    )*};
}

display_via_label!(FatContent, OutletSize, LocationType);

// ---------------------------------------------------------------------------
// Record – one item-at-outlet observation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub item_id: String,
    /// Blank in some exports.
    pub item_weight: Option<f64>,
    pub item_fat_content: FatContent,
    /// Share of shelf display area, in [0, 1].
    pub item_visibility: f64,
    pub item_type: String,
    pub sales: f64,
    /// Customer rating, in [1, 5].
    pub rating: f64,
    pub outlet_id: String,
    pub outlet_establishment_year: i32,
    pub outlet_size: OutletSize,
    pub outlet_location_type: LocationType,
    pub outlet_type: String,
}

// ---------------------------------------------------------------------------
// Dataset – the immutable loaded table
// ---------------------------------------------------------------------------

/// Immutable table of records. Cloning shares the underlying rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Arc<[Record]>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Earliest and latest outlet establishment year, `None` when empty.
    pub fn year_bounds(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().map(|r| r.outlet_establishment_year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Dataset::new(records)
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
