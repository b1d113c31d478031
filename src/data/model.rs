use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Year range
// ---------------------------------------------------------------------------

/// Calendar year of an observation.
pub type Year = i32;

/// First year covered by the source table.
pub const FIRST_YEAR: Year = 2015;
/// Last year covered by the source table.
pub const FINAL_YEAR: Year = 2025;

/// All supported years, ascending.
pub fn supported_years() -> impl Iterator<Item = Year> {
    FIRST_YEAR..=FINAL_YEAR
}

// ---------------------------------------------------------------------------
// MetricKind – the four tracked indicators
// ---------------------------------------------------------------------------

/// One of the four neighborhood indicators tracked per year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKind {
    FranchiseRatio,
    GroundFloorRent,
    ClosureRate,
    AvgBusinessTenure,
}

impl MetricKind {
    /// Fixed display order; radar axes, comparison vectors and trend
    /// subplots all follow this order.
    pub const ALL: [MetricKind; 4] = [
        MetricKind::FranchiseRatio,
        MetricKind::GroundFloorRent,
        MetricKind::ClosureRate,
        MetricKind::AvgBusinessTenure,
    ];

    /// Fixed linear rescale divisor for radar display. Calibrated once
    /// against typical metric ranges, not derived from the data, so a
    /// neighborhood's chart shape stays stable across comparison sets.
    pub fn divisor(self) -> f64 {
        match self {
            MetricKind::FranchiseRatio => 25.0,
            MetricKind::GroundFloorRent => 300_000.0,
            MetricKind::ClosureRate => 10.0,
            MetricKind::AvgBusinessTenure => 15.0,
        }
    }

    /// Human-readable name used for axis and table headers.
    pub fn label(self) -> &'static str {
        match self {
            MetricKind::FranchiseRatio => "Franchise ratio",
            MetricKind::GroundFloorRent => "Ground-floor rent",
            MetricKind::ClosureRate => "Closure rate",
            MetricKind::AvgBusinessTenure => "Avg business tenure",
        }
    }

    /// Native unit suffix for raw-value display.
    pub fn unit(self) -> &'static str {
        match self {
            MetricKind::FranchiseRatio => "%",
            MetricKind::GroundFloorRent => "₩/m²",
            MetricKind::ClosureRate => "%",
            MetricKind::AvgBusinessTenure => "yr",
        }
    }

    /// Source-table column name for this metric in a given year.
    ///
    /// The export uses `{year}_{suffix}` for three of the metrics but
    /// `{year}{suffix}` (no separator) for business tenure; both real
    /// conventions are reproduced here so headers match verbatim.
    pub fn column_name(self, year: Year) -> String {
        match self {
            MetricKind::FranchiseRatio => format!("{year}_franchise_ratio"),
            MetricKind::GroundFloorRent => format!("{year}_ground_floor_rent"),
            MetricKind::ClosureRate => format!("{year}_closure_rate"),
            MetricKind::AvgBusinessTenure => format!("{year}avg_business_tenure"),
        }
    }

    /// Format a raw value with its native unit.
    pub fn format_raw(self, raw: f64) -> String {
        match self {
            MetricKind::FranchiseRatio | MetricKind::ClosureRate => {
                format!("{raw:.1}{}", self.unit())
            }
            MetricKind::GroundFloorRent => format!("{raw:.0} {}", self.unit()),
            MetricKind::AvgBusinessTenure => format!("{raw:.1} {}", self.unit()),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// NeighborhoodRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One neighborhood's full multi-year observations.
///
/// Observations live in a typed `(Year, MetricKind)` map built once at
/// load time, so presence checks are a plain map lookup rather than a
/// string-formatted column probe.
#[derive(Debug, Clone)]
pub struct NeighborhoodRecord {
    pub name: String,
    observations: BTreeMap<(Year, MetricKind), f64>,
}

impl NeighborhoodRecord {
    pub fn new(name: impl Into<String>) -> Self {
        NeighborhoodRecord {
            name: name.into(),
            observations: BTreeMap::new(),
        }
    }

    /// Record an observation. Used only during loading; records are
    /// immutable once inside a [`Dataset`].
    pub fn insert(&mut self, year: Year, kind: MetricKind, value: f64) {
        self.observations.insert((year, kind), value);
    }

    /// The literal stored observation, if any. No fallback is applied
    /// here; see [`crate::data::metrics::extract`] for that.
    pub fn observation(&self, year: Year, kind: MetricKind) -> Option<f64> {
        self.observations.get(&(year, kind)).copied()
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded dataset, one record per neighborhood. Immutable
/// after construction; queries borrow it and nothing mutates it, so
/// concurrent reads are safe by construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<NeighborhoodRecord>,
}

impl Dataset {
    /// Build the dataset from loaded records, preserving source order.
    pub fn from_records(records: Vec<NeighborhoodRecord>) -> Self {
        Dataset { records }
    }

    /// Look up a record by neighborhood name.
    pub fn get(&self, name: &str) -> Option<&NeighborhoodRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// All neighborhood names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    /// Number of neighborhoods.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
