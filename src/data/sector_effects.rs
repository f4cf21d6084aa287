//! Sector Effects Loader
//! Cleans the "Summary of Disaster Effects by Sector" worksheet: positional
//! column naming, numeric coercion, Losses/Damage ratio and row exclusion.

use crate::config::SectorEffectsOptions;
use crate::data::loader::{Cell, DataLoader, LoaderError, RawTable};
use crate::data::processor::SectorKeyed;
use polars::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

pub const SECTOR: &str = "Sector";
pub const DAMAGE: &str = "Damage (VT millions)";
pub const LOSSES: &str = "Losses (VT millions)";
pub const TOTAL: &str = "Total (VT millions)";
pub const PRIVATE_SHARE: &str = "Private Share (%)";
pub const PUBLIC_SHARE: &str = "Public Share (%)";
pub const LOST_INCOME: &str = "Lost Personal Income (VT millions)";
pub const RATIO: &str = "Losses to Damage Ratio";

/// Value columns in worksheet order, after the sector column.
pub const VALUE_COLUMNS: [&str; 6] = [
    DAMAGE,
    LOSSES,
    TOTAL,
    PRIVATE_SHARE,
    PUBLIC_SHARE,
    LOST_INCOME,
];

const WIDTH: usize = VALUE_COLUMNS.len() + 1;

/// One cleaned sector row. Damage and Losses are always present because
/// every surviving row has a finite ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorEffectRecord {
    pub sector: String,
    pub damage: f64,
    pub losses: f64,
    pub total: Option<f64>,
    pub private_share_pct: Option<f64>,
    pub public_share_pct: Option<f64>,
    pub lost_personal_income: Option<f64>,
    pub losses_to_damage_ratio: f64,
}

impl SectorKeyed for SectorEffectRecord {
    fn sector(&self) -> &str {
        &self.sector
    }
}

/// Load and clean the sector effects worksheet at `path`.
pub fn load_sector_effects(
    path: &Path,
    options: &SectorEffectsOptions,
) -> Result<Vec<SectorEffectRecord>, LoaderError> {
    let table = DataLoader::read_first_sheet(path)?;
    let frame = raw_frame(&table, options.skip_rows)?;
    let raw_rows = frame.height();
    let cleaned = clean(frame, &options.excluded_sectors)?;
    let records = to_records(&cleaned)?;

    info!(
        path = %path.display(),
        raw_rows,
        kept = records.len(),
        "loaded sector effects"
    );
    Ok(records)
}

/// Name the worksheet columns positionally and coerce value cells to numbers.
/// Cells that do not parse become nulls.
pub fn raw_frame(table: &RawTable, skip_rows: usize) -> Result<DataFrame, LoaderError> {
    table.require_width(WIDTH)?;
    if table.has_data_beyond(WIDTH, skip_rows) {
        return Err(LoaderError::Schema {
            path: table.path.clone(),
            expected: WIDTH,
            found: table.width(),
        });
    }

    let mut sectors: Vec<Option<String>> = Vec::new();
    let mut values: [Vec<Option<f64>>; 6] = Default::default();
    let mut coerced = 0usize;

    for (_, row) in table.data_rows(skip_rows) {
        sectors.push(RawTable::cell(row, 0).as_text());
        for (i, column) in values.iter_mut().enumerate() {
            let cell = RawTable::cell(row, i + 1);
            let value = cell.to_number();
            if value.is_none() && matches!(cell, Cell::Text(_)) {
                coerced += 1;
            }
            column.push(value);
        }
    }

    if coerced > 0 {
        warn!(cells = coerced, "non-numeric sector effect values set to null");
    }

    let mut columns = vec![Column::new(SECTOR.into(), sectors)];
    columns.extend(
        VALUE_COLUMNS
            .iter()
            .zip(values)
            .map(|(name, column)| Column::new((*name).into(), column)),
    );

    Ok(DataFrame::new(columns)?)
}

/// Drop unnamed rows, add the ratio column, drop rows whose ratio is not a
/// finite number and drop excluded sector labels.
pub fn clean(frame: DataFrame, excluded_sectors: &[String]) -> Result<DataFrame, LoaderError> {
    let not_excluded = excluded_sectors.iter().fold(lit(true), |acc, label| {
        acc.and(col(SECTOR).neq(lit(label.as_str())))
    });

    let before = frame.height();
    let cleaned = frame
        .lazy()
        .filter(col(SECTOR).is_not_null())
        .with_column((col(LOSSES) / col(DAMAGE)).alias(RATIO))
        .filter(col(RATIO).is_finite())
        .filter(not_excluded)
        .collect()?;

    debug!(dropped = before - cleaned.height(), "sector effect rows removed");
    Ok(cleaned)
}

fn to_records(df: &DataFrame) -> Result<Vec<SectorEffectRecord>, LoaderError> {
    let sector = df.column(SECTOR)?.str()?;
    let damage = df.column(DAMAGE)?.f64()?;
    let losses = df.column(LOSSES)?.f64()?;
    let total = df.column(TOTAL)?.f64()?;
    let private_share = df.column(PRIVATE_SHARE)?.f64()?;
    let public_share = df.column(PUBLIC_SHARE)?.f64()?;
    let lost_income = df.column(LOST_INCOME)?.f64()?;
    let ratio = df.column(RATIO)?.f64()?;

    let records = (0..df.height())
        .filter_map(|i| {
            Some(SectorEffectRecord {
                sector: sector.get(i)?.to_string(),
                damage: damage.get(i)?,
                losses: losses.get(i)?,
                total: total.get(i),
                private_share_pct: private_share.get(i),
                public_share_pct: public_share.get(i),
                lost_personal_income: lost_income.get(i),
                losses_to_damage_ratio: ratio.get(i)?,
            })
        })
        .collect();

    Ok(records)
}
