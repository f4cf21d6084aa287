//! Data Processor Module
//! View-level filtering of the cleaned tables and ratio statistics.

use crate::data::sector_effects::SectorEffectRecord;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Records that belong to a named sector.
pub trait SectorKeyed {
    fn sector(&self) -> &str;
}

/// Ratio extent of a filtered set and the slider bound derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioBounds {
    pub min: f64,
    pub max: f64,
    /// `min(max, cap)`
    pub upper: f64,
}

impl RatioBounds {
    /// Default slider selection `[min, upper]`. The lower handle is clamped to
    /// `upper` when every ratio lies above the cap.
    pub fn default_range(&self) -> (f64, f64) {
        (self.min.min(self.upper), self.upper)
    }
}

/// Handles filtering and summarising of cleaned records.
pub struct DataProcessor;

impl DataProcessor {
    /// Distinct sectors in first-seen order.
    pub fn unique_sectors<R: SectorKeyed>(records: &[R]) -> Vec<String> {
        let mut seen = HashSet::new();
        records
            .iter()
            .filter(|r| seen.insert(r.sector().to_string()))
            .map(|r| r.sector().to_string())
            .collect()
    }

    /// Rows whose sector is in `selected`, in their original order.
    pub fn filter_by_sectors<'a, R: SectorKeyed>(
        records: &'a [R],
        selected: &HashSet<String>,
    ) -> Vec<&'a R> {
        records
            .iter()
            .filter(|r| selected.contains(r.sector()))
            .collect()
    }

    /// Drop rows whose ratio is not finite.
    pub fn finite_ratios<'a>(records: &[&'a SectorEffectRecord]) -> Vec<&'a SectorEffectRecord> {
        records
            .iter()
            .copied()
            .filter(|r| r.losses_to_damage_ratio.is_finite())
            .collect()
    }

    /// Min/max ratio of `records` and the capped slider bound.
    /// `None` when there is no finite ratio.
    pub fn ratio_bounds(records: &[&SectorEffectRecord], cap: f64) -> Option<RatioBounds> {
        let mut ratios = records
            .iter()
            .map(|r| r.losses_to_damage_ratio)
            .filter(|v| v.is_finite());

        let first = ratios.next()?;
        let (min, max) = ratios.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        Some(RatioBounds {
            min,
            max,
            upper: max.min(cap),
        })
    }

    /// Rows with `lo <= ratio <= hi`, sorted ascending by ratio.
    pub fn filter_by_ratio_range<'a>(
        records: &[&'a SectorEffectRecord],
        (lo, hi): (f64, f64),
    ) -> Vec<&'a SectorEffectRecord> {
        let mut kept: Vec<&SectorEffectRecord> = records
            .iter()
            .copied()
            .filter(|r| r.losses_to_damage_ratio >= lo && r.losses_to_damage_ratio <= hi)
            .collect();
        kept.sort_by(|a, b| {
            a.losses_to_damage_ratio
                .partial_cmp(&b.losses_to_damage_ratio)
                .unwrap_or(Ordering::Equal)
        });
        kept
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn effect(sector: &str, damage: f64, losses: f64) -> SectorEffectRecord {
        SectorEffectRecord {
            sector: sector.to_string(),
            damage,
            losses,
            total: Some(damage + losses),
            private_share_pct: Some(50.0),
            public_share_pct: Some(50.0),
            lost_personal_income: None,
            losses_to_damage_ratio: losses / damage,
        }
    }

    fn selection(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unique_sectors_keeps_first_seen_order() {
        let records = vec![
            effect("Housing", 10.0, 5.0),
            effect("Agriculture", 10.0, 5.0),
            effect("Housing", 20.0, 5.0),
        ];
        assert_eq!(
            DataProcessor::unique_sectors(&records),
            vec!["Housing", "Agriculture"]
        );
    }

    #[test]
    fn test_filter_by_sectors() {
        let records = vec![
            effect("Agriculture", 100.0, 50.0),
            effect("Housing", 10.0, 5.0),
        ];
        let kept = DataProcessor::filter_by_sectors(&records, &selection(&["Agriculture"]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].sector, "Agriculture");

        let none = DataProcessor::filter_by_sectors(&records, &HashSet::new());
        assert!(none.is_empty());
    }

    #[test]
    fn test_ratio_bounds_clamps_to_cap() {
        let records = vec![effect("A", 1.0, 6.0), effect("B", 1.0, 9.0)];
        let refs: Vec<&SectorEffectRecord> = records.iter().collect();
        let bounds = DataProcessor::ratio_bounds(&refs, 5.0).unwrap();
        assert_eq!(bounds.min, 6.0);
        assert_eq!(bounds.max, 9.0);
        assert_eq!(bounds.upper, 5.0);
        assert_eq!(bounds.default_range(), (5.0, 5.0));
    }

    #[test]
    fn test_ratio_bounds_below_cap() {
        let records = vec![effect("A", 4.0, 1.0), effect("B", 2.0, 3.0)];
        let refs: Vec<&SectorEffectRecord> = records.iter().collect();
        let bounds = DataProcessor::ratio_bounds(&refs, 5.0).unwrap();
        assert_eq!(bounds.upper, 1.5);
        assert_eq!(bounds.default_range(), (0.25, 1.5));
    }

    #[test]
    fn test_ratio_bounds_ignores_non_finite() {
        let mut bad = effect("Bad", 1.0, 1.0);
        bad.losses_to_damage_ratio = f64::INFINITY;
        let records = vec![bad];
        let refs: Vec<&SectorEffectRecord> = records.iter().collect();
        assert!(DataProcessor::finite_ratios(&refs).is_empty());
        assert_eq!(DataProcessor::ratio_bounds(&refs, 5.0), None);
        assert_eq!(DataProcessor::ratio_bounds(&[], 5.0), None);
    }

    #[test]
    fn test_filter_by_ratio_range_sorts_ascending() {
        let records = vec![
            effect("A", 1.0, 3.0),
            effect("B", 2.0, 1.0),
            effect("C", 1.0, 1.0),
            effect("D", 1.0, 7.0),
        ];
        let refs: Vec<&SectorEffectRecord> = records.iter().collect();
        let kept = DataProcessor::filter_by_ratio_range(&refs, (0.5, 3.0));
        let names: Vec<&str> = kept.iter().map(|r| r.sector.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
    }
}
