//! Column names for the sales table.
//! Single source of truth for both the loaders and the sample writer.

// ── Columns ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    ItemId,
    ItemWeight,
    ItemFatContent,
    ItemVisibility,
    ItemType,
    Sales,
    Rating,
    OutletId,
    OutletEstablishmentYear,
    OutletSize,
    OutletLocationType,
    OutletType,
}

impl Column {
    pub const ALL: [Column; 12] = [
        Column::ItemId,
        Column::ItemWeight,
        Column::ItemFatContent,
        Column::ItemVisibility,
        Column::ItemType,
        Column::Sales,
        Column::Rating,
        Column::OutletId,
        Column::OutletEstablishmentYear,
        Column::OutletSize,
        Column::OutletLocationType,
        Column::OutletType,
    ];

    /// snake_case name, also the field name on [`Record`](super::model::Record).
    pub const fn canonical(self) -> &'static str {
        match self {
            Column::ItemId => "item_id",
            Column::ItemWeight => "item_weight",
            Column::ItemFatContent => "item_fat_content",
            Column::ItemVisibility => "item_visibility",
            Column::ItemType => "item_type",
            Column::Sales => "sales",
            Column::Rating => "rating",
            Column::OutletId => "outlet_id",
            Column::OutletEstablishmentYear => "outlet_establishment_year",
            Column::OutletSize => "outlet_size",
            Column::OutletLocationType => "outlet_location_type",
            Column::OutletType => "outlet_type",
        }
    }

    /// Header as it appears in exported grocery spreadsheets.
    pub const fn header(self) -> &'static str {
        match self {
            Column::ItemId => "Item Identifier",
            Column::ItemWeight => "Item Weight",
            Column::ItemFatContent => "Item Fat Content",
            Column::ItemVisibility => "Item Visibility",
            Column::ItemType => "Item Type",
            Column::Sales => "Sales",
            Column::Rating => "Rating",
            Column::OutletId => "Outlet Identifier",
            Column::OutletEstablishmentYear => "Outlet Establishment Year",
            Column::OutletSize => "Outlet Size",
            Column::OutletLocationType => "Outlet Location Type",
            Column::OutletType => "Outlet Type",
        }
    }

    /// Only the weight may be blank in a source row.
    pub const fn nullable(self) -> bool {
        matches!(self, Column::ItemWeight)
    }

    /// Resolve a source header to a column. Case, spaces, underscores and
    /// hyphens are ignored, so `Item Identifier`, `item_identifier` and
    /// `item_id` all resolve to [`Column::ItemId`].
    pub fn from_header(header: &str) -> Option<Column> {
        let key = normalize(header);
        Column::ALL.into_iter().find(|col| {
            key == normalize(col.canonical()) || key == normalize(col.header())
        })
    }
}

fn normalize(header: &str) -> String {
    header
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps each [`Column`] to its position in a source's header row.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    positions: [usize; 12],
}

impl ColumnIndex {
    /// Locate every required column; extra columns are ignored.
    pub fn resolve<'a, I>(headers: I) -> Result<Self, Column>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found: [Option<usize>; 12] = [None; 12];
        for (pos, header) in headers.into_iter().enumerate() {
            if let Some(col) = Column::from_header(header) {
                // first occurrence wins
                found[col as usize].get_or_insert(pos);
            }
        }

        let mut positions = [0usize; 12];
        for col in Column::ALL {
            positions[col as usize] = found[col as usize].ok_or(col)?;
        }
        Ok(Self { positions })
    }

    pub fn position(&self, col: Column) -> usize {
        self.positions[col as usize]
    }
}
