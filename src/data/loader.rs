use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{supported_years, Dataset, MetricKind, NeighborhoodRecord, Year};

/// Column holding the aggregation-level discriminator.
const LEVEL_COLUMN: &str = "level";
/// Discriminator value for the rows this dashboard works with. The
/// source file mixes aggregation levels (district, neighborhood) in one
/// table; everything else is dropped at load time.
const NEIGHBORHOOD_LEVEL: &str = "neighborhood";
/// Column holding the neighborhood name.
const NAME_COLUMN: &str = "name";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a metrics dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – the canonical export: one row per entity, one column per
///   `{year}_{metric}` pair (see [`MetricKind::column_name`])
/// * `.json` – the same table as a records-oriented array of objects
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            parse_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Map from source column name to the (year, kind) it carries. Built
/// once per parse; headers not in this map are ignored.
fn metric_columns() -> BTreeMap<String, (Year, MetricKind)> {
    let mut map = BTreeMap::new();
    for year in supported_years() {
        for &kind in &MetricKind::ALL {
            map.insert(kind.column_name(year), (year, kind));
        }
    }
    map
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Parse the CSV table from any reader. Rows whose level discriminator
/// is not `neighborhood` are skipped; empty or non-numeric metric cells
/// become absent observations rather than errors.
pub fn parse_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let name_idx = headers
        .iter()
        .position(|h| h == NAME_COLUMN)
        .with_context(|| format!("CSV missing '{NAME_COLUMN}' column"))?;
    let level_idx = headers
        .iter()
        .position(|h| h == LEVEL_COLUMN)
        .with_context(|| format!("CSV missing '{LEVEL_COLUMN}' column"))?;

    let known = metric_columns();
    let metric_cols: Vec<(usize, Year, MetricKind)> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, h)| known.get(h).map(|&(year, kind)| (idx, year, kind)))
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        if row.get(level_idx).unwrap_or("") != NEIGHBORHOOD_LEVEL {
            continue;
        }
        let name = row.get(name_idx).unwrap_or("").trim();
        if name.is_empty() {
            bail!("CSV row {row_no}: empty '{NAME_COLUMN}' cell");
        }

        let mut record = NeighborhoodRecord::new(name);
        for &(idx, year, kind) in &metric_cols {
            let cell = row.get(idx).unwrap_or("").trim();
            if cell.is_empty() {
                continue;
            }
            match cell.parse::<f64>() {
                Ok(value) => record.insert(year, kind, value),
                Err(_) => {
                    log::debug!("row {row_no}: ignoring non-numeric cell '{cell}' for {kind} {year}");
                }
            }
        }
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "name": "Seongsu-dong",
///     "level": "neighborhood",
///     "2020_franchise_ratio": 12.5,
///     "2020_ground_floor_rent": 150000.0,
///     ...
///   },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let known = metric_columns();
    let mut records = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        if obj.get(LEVEL_COLUMN).and_then(|v| v.as_str()) != Some(NEIGHBORHOOD_LEVEL) {
            continue;
        }
        let name = obj
            .get(NAME_COLUMN)
            .and_then(|v| v.as_str())
            .with_context(|| format!("Row {i}: missing '{NAME_COLUMN}' string"))?;

        let mut record = NeighborhoodRecord::new(name);
        for (key, value) in obj {
            let Some(&(year, kind)) = known.get(key) else {
                continue;
            };
            if let Some(v) = value.as_f64() {
                record.insert(year, kind, v);
            }
        }
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
name,level,2020_franchise_ratio,2020_ground_floor_rent,2020_closure_rate,2020avg_business_tenure,2024avg_business_tenure
Seongsu-dong,neighborhood,12.5,150000,5.0,7.5,8.0
Mapo-gu,district,9.0,120000,4.0,6.0,6.5
Yeonnam-dong,neighborhood,10.0,,4.5,6.8,7.2
";

    #[test]
    fn csv_keeps_only_neighborhood_rows() {
        let dataset = parse_csv(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);
        let names: Vec<&str> = dataset.names().collect();
        assert_eq!(names, ["Seongsu-dong", "Yeonnam-dong"]);
    }

    #[test]
    fn csv_empty_cell_means_absent_observation() {
        let dataset = parse_csv(SAMPLE_CSV.as_bytes()).unwrap();
        let rec = dataset.get("Yeonnam-dong").unwrap();
        assert_eq!(rec.observation(2020, MetricKind::GroundFloorRent), None);
        assert_eq!(rec.observation(2020, MetricKind::FranchiseRatio), Some(10.0));
    }

    #[test]
    fn csv_reads_both_column_conventions() {
        let dataset = parse_csv(SAMPLE_CSV.as_bytes()).unwrap();
        let rec = dataset.get("Seongsu-dong").unwrap();
        assert_eq!(rec.observation(2020, MetricKind::AvgBusinessTenure), Some(7.5));
        assert_eq!(rec.observation(2024, MetricKind::AvgBusinessTenure), Some(8.0));
        // No 2025 tenure column exists; nothing was stored for it
        assert_eq!(rec.observation(2025, MetricKind::AvgBusinessTenure), None);
    }

    #[test]
    fn csv_missing_name_column_is_an_error() {
        let err = parse_csv("id,level\n1,neighborhood\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn json_records_round_into_dataset() {
        let text = r#"[
            {"name": "Seongsu-dong", "level": "neighborhood",
             "2020_closure_rate": 5.0, "2024avg_business_tenure": 8.0},
            {"name": "Gangnam-gu", "level": "district", "2020_closure_rate": 3.0}
        ]"#;
        let dataset = parse_json(text).unwrap();
        assert!(!dataset.is_empty());
        assert_eq!(dataset.len(), 1);
        let rec = dataset.get("Seongsu-dong").unwrap();
        assert_eq!(rec.observation(2020, MetricKind::ClosureRate), Some(5.0));
        assert_eq!(rec.observation(2024, MetricKind::AvgBusinessTenure), Some(8.0));
    }
}
