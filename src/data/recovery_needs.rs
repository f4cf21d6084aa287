//! Recovery Needs Loader
//! Cleans the "Summary of recovery and reconstruction needs" table. The
//! source carries three trailing columns that are always discarded.

use crate::config::{NumericPolicy, RecoveryNeedsOptions};
use crate::data::loader::{Cell, DataLoader, LoaderError, RawTable};
use crate::data::processor::SectorKeyed;
use std::path::Path;
use tracing::{info, warn};

pub const SECTOR: &str = "Sector";
pub const RECOVERY: &str = "Recovery Needs (VT millions)";
pub const RECONSTRUCTION: &str = "Reconstruction Needs (VT millions)";
pub const TOTAL_NEEDS: &str = "Total Needs (VT millions)";
pub const PRIVATE_SHARE: &str = "Private Share (%)";
pub const PUBLIC_SHARE: &str = "Public Share (%)";

/// Retained columns, in source order.
pub const COLUMNS: [&str; 6] = [
    SECTOR,
    RECOVERY,
    RECONSTRUCTION,
    TOTAL_NEEDS,
    PRIVATE_SHARE,
    PUBLIC_SHARE,
];

/// Column count of the published table (six kept plus three dropped).
const SOURCE_WIDTH: usize = 9;

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryNeedRecord {
    pub sector: String,
    pub recovery_needs: Option<f64>,
    pub reconstruction_needs: Option<f64>,
    pub total_needs: Option<f64>,
    pub private_share_pct: Option<f64>,
    pub public_share_pct: Option<f64>,
}

impl SectorKeyed for RecoveryNeedRecord {
    fn sector(&self) -> &str {
        &self.sector
    }
}

/// Load and clean the recovery needs table at `path`.
pub fn load_recovery_needs(
    path: &Path,
    options: &RecoveryNeedsOptions,
) -> Result<Vec<RecoveryNeedRecord>, LoaderError> {
    let table = DataLoader::read_delimited(path)?;
    let records = clean(&table, options)?;
    info!(
        path = %path.display(),
        kept = records.len(),
        "loaded recovery needs"
    );
    Ok(records)
}

/// Name columns positionally, keep the first six and parse value cells
/// with thousands separators removed.
pub fn clean(
    table: &RawTable,
    options: &RecoveryNeedsOptions,
) -> Result<Vec<RecoveryNeedRecord>, LoaderError> {
    table.require_width(COLUMNS.len())?;
    let width = table.width();
    if width != SOURCE_WIDTH {
        warn!(
            expected = SOURCE_WIDTH,
            found = width,
            "recovery needs table has an unexpected column count; keeping the first six"
        );
    }

    let mut records = Vec::new();
    for (index, row) in table.data_rows(options.skip_rows) {
        let Some(sector) = RawTable::cell(row, 0).as_text() else {
            continue;
        };
        // 1-based line number in the source file
        let line = index + 1;
        let mut values = [None; 5];
        for (i, value) in values.iter_mut().enumerate() {
            let column = COLUMNS[i + 1];
            *value = parse_amount(RawTable::cell(row, i + 1), line, column, options.numeric_policy)?;
        }
        let [recovery, reconstruction, total, private_share, public_share] = values;
        records.push(RecoveryNeedRecord {
            sector,
            recovery_needs: recovery,
            reconstruction_needs: reconstruction,
            total_needs: total,
            private_share_pct: private_share,
            public_share_pct: public_share,
        });
    }
    Ok(records)
}

/// Parse a comma-grouped amount such as `"1,234.5"`.
fn parse_amount(
    cell: &Cell,
    line: usize,
    column: &'static str,
    policy: NumericPolicy,
) -> Result<Option<f64>, LoaderError> {
    let text = match cell {
        Cell::Empty => return Ok(None),
        Cell::Number(n) => return Ok(Some(*n)),
        Cell::Text(s) => s,
    };

    match text.replace(',', "").trim().parse::<f64>() {
        Ok(v) => Ok(Some(v)),
        Err(_) => match policy {
            NumericPolicy::Strict => Err(LoaderError::Parse {
                row: line,
                column,
                value: text.clone(),
            }),
            NumericPolicy::Coerce => {
                warn!(line, column, value = %text, "non-numeric recovery value set to null");
                Ok(None)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SOURCE: &str = "\
Sector,Recovery,Reconstruction,Total,Private,Public,Notes,Extra,More
,VT millions,VT millions,VT millions,%,%,,,
Agriculture,\"1,234.5\",200,\"1,434.5\",70,30,a,b,c
Housing,\"2,000\",\"10,000\",\"12,000\",90,10,,,
,5,5,10,50,50,,,
Education,300,\"1,500.25\",\"1,800.25\",10,90,x,y,z
";

    fn write(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("needs.csv");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_load_parses_grouped_numbers() {
        let (_dir, path) = write(SOURCE);
        let records = load_recovery_needs(&path, &RecoveryNeedsOptions::default()).unwrap();

        let sectors: Vec<&str> = records.iter().map(|r| r.sector.as_str()).collect();
        assert_eq!(sectors, vec!["Agriculture", "Housing", "Education"]);
        assert_eq!(records[0].recovery_needs, Some(1234.5));
        assert_eq!(records[1].reconstruction_needs, Some(10000.0));
        assert_eq!(records[2].reconstruction_needs, Some(1500.25));
        assert_eq!(records[2].public_share_pct, Some(90.0));
    }

    #[test]
    fn test_only_six_columns_retained_for_any_width() {
        assert_eq!(COLUMNS.len(), 6);

        let narrow = "Sector,R,C,T,Pr,Pu\nsub,,,,,\nHealth,1,2,3,4,5\n";
        let (_dir, path) = write(narrow);
        let records = load_recovery_needs(&path, &RecoveryNeedsOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].public_share_pct, Some(5.0));
    }

    #[test]
    fn test_blank_line_does_not_count_as_header_row() {
        let gapped = "Sector,R,C,T,Pr,Pu,a,b,c\n\nsub,,,,,,,,\nHealth,1,2,3,4,5,,,\n\nShort,6,7,13,8,92,,,\n";
        let (_dir, path) = write(gapped);
        let records = load_recovery_needs(&path, &RecoveryNeedsOptions::default()).unwrap();

        let sectors: Vec<&str> = records.iter().map(|r| r.sector.as_str()).collect();
        assert_eq!(sectors, vec!["Health", "Short"]);
        assert_eq!(records[1].total_needs, Some(13.0));
    }

    #[test]
    fn test_too_few_columns_is_schema_error() {
        let (_dir, path) = write("Sector,R,C\nsub,,\nHealth,1,2\n");
        let err = load_recovery_needs(&path, &RecoveryNeedsOptions::default()).unwrap_err();
        assert!(matches!(err, LoaderError::Schema { expected: 6, found: 3, .. }));
    }

    #[test]
    fn test_strict_policy_fails_on_text() {
        let bad = "Sector,R,C,T,Pr,Pu,a,b,c\nsub,,,,,,,,\nHealth,lots,2,3,4,5,,,\n";
        let (_dir, path) = write(bad);
        let err = load_recovery_needs(&path, &RecoveryNeedsOptions::default()).unwrap_err();
        match err {
            LoaderError::Parse { row, column, value } => {
                assert_eq!(row, 3);
                assert_eq!(column, RECOVERY);
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_coerce_policy_keeps_row() {
        let bad = "Sector,R,C,T,Pr,Pu,a,b,c\nsub,,,,,,,,\nHealth,lots,2,3,4,5,,,\n";
        let (_dir, path) = write(bad);
        let options = RecoveryNeedsOptions {
            numeric_policy: NumericPolicy::Coerce,
            ..Default::default()
        };
        let records = load_recovery_needs(&path, &options).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].recovery_needs, None);
        assert_eq!(records[0].reconstruction_needs, Some(2.0));
    }

    #[test]
    fn test_loading_twice_is_identical() {
        let (_dir, path) = write(SOURCE);
        let options = RecoveryNeedsOptions::default();
        let first = load_recovery_needs(&path, &options).unwrap();
        let second = load_recovery_needs(&path, &options).unwrap();
        assert_eq!(first, second);
    }
}
