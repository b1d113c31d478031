use std::collections::BTreeMap;

use eframe::egui::Color32;
use thiserror::Error;

use crate::color::comparison_color;
use super::model::{Dataset, MetricKind, NeighborhoodRecord, Year, FINAL_YEAR};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Recoverable "insufficient data" conditions. The UI renders these as
/// inline messages; they are never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("{name} has incomplete data for {year}")]
    MissingData { name: String, year: Year },

    #[error("no selected neighborhood has complete data for {year}")]
    EmptySelection { year: Year },

    #[error("{name} has no year with complete data")]
    EmptyTrend { name: String },
}

// ---------------------------------------------------------------------------
// Extraction and completeness
// ---------------------------------------------------------------------------

/// Raw observation for `(year, kind)`, applying the one designated
/// fallback: business tenure has no final-year observation in the
/// source, so a final-year lookup reads the preceding year instead.
///
/// This is the single home of the rule. It is deliberately a literal
/// conditional rather than a generic "last known value" search, which
/// would silently mask genuinely missing data in the other metrics.
pub fn extract(record: &NeighborhoodRecord, year: Year, kind: MetricKind) -> Option<f64> {
    let lookup_year = if kind == MetricKind::AvgBusinessTenure && year == FINAL_YEAR {
        FINAL_YEAR - 1
    } else {
        year
    };
    record.observation(lookup_year, kind)
}

/// Whether all four metrics are observed (post-fallback) for the year.
/// The sole gating rule shared by every builder: a record/year that
/// fails this is excluded outright, never rendered with partial data.
pub fn is_complete(record: &NeighborhoodRecord, year: Year) -> bool {
    MetricKind::ALL
        .iter()
        .all(|&kind| extract(record, year, kind).is_some())
}

/// Linear rescale onto the shared radar scale. Not clamped: raw values
/// beyond the calibration divisor map above 1.0 and are shown as such.
pub fn normalize(kind: MetricKind, raw: f64) -> f64 {
    raw / kind.divisor()
}

// ---------------------------------------------------------------------------
// Single-neighborhood view
// ---------------------------------------------------------------------------

/// Normalized and raw metric vectors for one neighborhood/year, both in
/// [`MetricKind::ALL`] order.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleView {
    pub normalized: [f64; 4],
    pub raw: [f64; 4],
}

/// Build the radar vectors for one neighborhood at one year.
pub fn build_single(record: &NeighborhoodRecord, year: Year) -> Result<SingleView, MetricsError> {
    if !is_complete(record, year) {
        return Err(MetricsError::MissingData {
            name: record.name.clone(),
            year,
        });
    }

    let mut normalized = [0.0; 4];
    let mut raw = [0.0; 4];
    for (i, &kind) in MetricKind::ALL.iter().enumerate() {
        // is_complete above guarantees presence
        let value = extract(record, year, kind).unwrap_or_default();
        raw[i] = value;
        normalized[i] = normalize(kind, value);
    }
    Ok(SingleView { normalized, raw })
}

// ---------------------------------------------------------------------------
// Multi-neighborhood comparison
// ---------------------------------------------------------------------------

/// One neighborhood's normalized vector within a comparison, with its
/// assigned series color.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonEntry {
    pub name: String,
    pub values: [f64; 4],
    pub color: Color32,
}

/// Build normalized series for several neighborhoods at a fixed year.
///
/// Unknown names and names with incomplete data for `year` are dropped
/// silently (a partial comparison is still useful); only a selection
/// that resolves to nothing is an error. Output order is selection
/// order, and colors cycle the fixed palette by index within the
/// retained sequence, so identical selections always color identically.
pub fn build_comparison(
    dataset: &Dataset,
    year: Year,
    selected: &[String],
) -> Result<Vec<ComparisonEntry>, MetricsError> {
    let mut entries = Vec::new();

    for name in selected {
        let Some(record) = dataset.get(name) else {
            log::debug!("comparison: unknown neighborhood {name:?}, skipping");
            continue;
        };
        let Ok(view) = build_single(record, year) else {
            log::debug!("comparison: {name} incomplete for {year}, skipping");
            continue;
        };
        let color = comparison_color(entries.len());
        entries.push(ComparisonEntry {
            name: name.clone(),
            values: view.normalized,
            color,
        });
    }

    if entries.is_empty() {
        return Err(MetricsError::EmptySelection { year });
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Per-metric trend
// ---------------------------------------------------------------------------

/// For one neighborhood, each metric's `(year, raw value)` sequence over
/// the years with full four-metric coverage. Raw native units, never
/// normalized: trends are displayed per metric on independent axes.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendSeries {
    pub series: BTreeMap<MetricKind, Vec<(Year, f64)>>,
}

/// Build per-metric trends over `years` (ascending, deduplicated).
/// Years failing the completeness gate are dropped; if none survive,
/// the trend is empty and reported as such.
pub fn build_trend(record: &NeighborhoodRecord, years: &[Year]) -> Result<TrendSeries, MetricsError> {
    let complete_years: Vec<Year> = years
        .iter()
        .copied()
        .filter(|&year| is_complete(record, year))
        .collect();

    if complete_years.is_empty() {
        return Err(MetricsError::EmptyTrend {
            name: record.name.clone(),
        });
    }

    let mut series = BTreeMap::new();
    for &kind in &MetricKind::ALL {
        let points: Vec<(Year, f64)> = complete_years
            .iter()
            .filter_map(|&year| extract(record, year, kind).map(|v| (year, v)))
            .collect();
        series.insert(kind, points);
    }
    Ok(TrendSeries { series })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{supported_years, FIRST_YEAR};

    /// Record with all four metrics for `years`, tenure capped at 2024
    /// like the real export.
    fn full_record(name: &str, years: &[Year]) -> NeighborhoodRecord {
        let mut rec = NeighborhoodRecord::new(name);
        for &year in years {
            rec.insert(year, MetricKind::FranchiseRatio, 12.5);
            rec.insert(year, MetricKind::GroundFloorRent, 150_000.0);
            rec.insert(year, MetricKind::ClosureRate, 5.0);
            if year < FINAL_YEAR {
                rec.insert(year, MetricKind::AvgBusinessTenure, 7.5);
            }
        }
        rec
    }

    #[test]
    fn extract_returns_stored_value_outside_fallback_case() {
        let rec = full_record("A", &[2020]);
        for &kind in &MetricKind::ALL {
            assert_eq!(
                extract(&rec, 2020, kind),
                rec.observation(2020, kind),
                "{kind:?} should be the literal observation"
            );
        }
    }

    #[test]
    fn tenure_final_year_falls_back_to_preceding_year() {
        let mut rec = NeighborhoodRecord::new("A");
        rec.insert(FINAL_YEAR - 1, MetricKind::AvgBusinessTenure, 8.0);
        assert_eq!(extract(&rec, FINAL_YEAR, MetricKind::AvgBusinessTenure), Some(8.0));
        assert_eq!(
            extract(&rec, FINAL_YEAR, MetricKind::AvgBusinessTenure),
            extract(&rec, FINAL_YEAR - 1, MetricKind::AvgBusinessTenure)
        );
    }

    #[test]
    fn fallback_applies_only_to_tenure_at_final_year() {
        let mut rec = NeighborhoodRecord::new("A");
        rec.insert(FINAL_YEAR - 1, MetricKind::ClosureRate, 5.0);
        rec.insert(2019, MetricKind::AvgBusinessTenure, 6.0);
        // Other metrics never fall back
        assert_eq!(extract(&rec, FINAL_YEAR, MetricKind::ClosureRate), None);
        // Tenure doesn't fall back in non-final years
        assert_eq!(extract(&rec, 2020, MetricKind::AvgBusinessTenure), None);
    }

    #[test]
    fn is_complete_requires_all_four_post_fallback() {
        let rec = full_record("A", &[2020, FINAL_YEAR - 1, FINAL_YEAR]);
        assert!(is_complete(&rec, 2020));
        // Final year is complete purely through the tenure fallback
        assert!(is_complete(&rec, FINAL_YEAR));

        let mut partial = NeighborhoodRecord::new("B");
        partial.insert(2020, MetricKind::FranchiseRatio, 10.0);
        partial.insert(2020, MetricKind::GroundFloorRent, 100_000.0);
        partial.insert(2020, MetricKind::ClosureRate, 4.0);
        assert!(!is_complete(&partial, 2020));
    }

    #[test]
    fn normalization_example_vector() {
        let rec = full_record("A", &[2020]);
        let view = build_single(&rec, 2020).unwrap();
        assert_eq!(view.normalized, [0.5, 0.5, 0.5, 0.5]);
        assert_eq!(view.raw, [12.5, 150_000.0, 5.0, 7.5]);
    }

    #[test]
    fn normalize_is_plain_division_without_clamping() {
        assert_eq!(normalize(MetricKind::FranchiseRatio, 50.0), 2.0);
        assert_eq!(normalize(MetricKind::ClosureRate, 0.0), 0.0);
    }

    #[test]
    fn build_single_signals_missing_data() {
        let rec = full_record("A", &[2020]);
        assert_eq!(
            build_single(&rec, 2021),
            Err(MetricsError::MissingData {
                name: "A".into(),
                year: 2021
            })
        );
    }

    #[test]
    fn comparison_preserves_selection_order_and_drops_incomplete() {
        let dataset = Dataset::from_records(vec![
            full_record("A", &[2020]),
            full_record("B", &[2019]), // incomplete for 2020
            full_record("C", &[2020]),
        ]);
        let selected = vec!["C".to_string(), "B".to_string(), "A".to_string()];
        let entries = build_comparison(&dataset, 2020, &selected).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["C", "A"]);
    }

    #[test]
    fn comparison_colors_are_a_pure_function_of_order() {
        let dataset = Dataset::from_records(vec![
            full_record("A", &[2020]),
            full_record("B", &[2020]),
            full_record("C", &[2020]),
        ]);
        let abc = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let first = build_comparison(&dataset, 2020, &abc).unwrap();
        let second = build_comparison(&dataset, 2020, &abc).unwrap();
        assert_eq!(first, second);

        let cab = vec!["C".to_string(), "A".to_string(), "B".to_string()];
        let reordered = build_comparison(&dataset, 2020, &cab).unwrap();
        // Color follows position, not name
        assert_eq!(reordered[0].color, first[0].color);
        assert_eq!(reordered[0].name, "C");
    }

    #[test]
    fn comparison_cycles_palette_beyond_its_length() {
        let names: Vec<String> = (0..8).map(|i| format!("N{i}")).collect();
        let dataset = Dataset::from_records(
            names.iter().map(|n| full_record(n, &[2020])).collect(),
        );
        let entries = build_comparison(&dataset, 2020, &names).unwrap();
        assert_eq!(entries.len(), 8);
        assert_eq!(entries[6].color, entries[0].color);
        assert_eq!(entries[7].color, entries[1].color);
    }

    #[test]
    fn comparison_with_only_unknown_names_is_empty_selection() {
        let dataset = Dataset::from_records(vec![full_record("A", &[2020])]);
        let selected = vec!["X".to_string(), "Y".to_string()];
        assert_eq!(
            build_comparison(&dataset, 2020, &selected),
            Err(MetricsError::EmptySelection { year: 2020 })
        );
    }

    #[test]
    fn trend_keeps_only_complete_years_ascending() {
        let rec = full_record("A", &[2015, 2016, 2017, 2018, 2019, 2020]);
        let years: Vec<Year> = supported_years().collect();
        let trend = build_trend(&rec, &years).unwrap();

        let closure = &trend.series[&MetricKind::ClosureRate];
        let kept: Vec<Year> = closure.iter().map(|&(y, _)| y).collect();
        assert_eq!(kept, [2015, 2016, 2017, 2018, 2019, 2020]);
        assert!(closure.iter().all(|&(_, v)| v == 5.0));
        // Every metric covers the same retained years
        for &kind in &MetricKind::ALL {
            assert_eq!(trend.series[&kind].len(), 6);
        }
    }

    #[test]
    fn trend_values_are_raw_native_units() {
        let rec = full_record("A", &[FIRST_YEAR]);
        let trend = build_trend(&rec, &[FIRST_YEAR]).unwrap();
        assert_eq!(
            trend.series[&MetricKind::GroundFloorRent],
            vec![(FIRST_YEAR, 150_000.0)]
        );
    }

    #[test]
    fn trend_with_no_complete_year_is_empty_trend() {
        let mut rec = NeighborhoodRecord::new("A");
        rec.insert(2020, MetricKind::ClosureRate, 5.0);
        let years: Vec<Year> = supported_years().collect();
        assert_eq!(
            build_trend(&rec, &years),
            Err(MetricsError::EmptyTrend { name: "A".into() })
        );
    }
}
