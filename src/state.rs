use crate::data::model::{Dataset, Year, FINAL_YEAR};

/// Soft cap on the comparison selection. A display concern: the radar
/// stays readable up to about this many overlaid polygons. The builders
/// themselves handle any selection size.
pub const MAX_COMPARISON: usize = 6;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Year the single and comparison views are pinned to.
    pub selected_year: Year,

    /// Neighborhood shown in the single radar, trend and table views.
    pub selected_name: Option<String>,

    /// Neighborhoods in the comparison radar, in selection order.
    pub comparison_names: Vec<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selected_year: FINAL_YEAR,
            selected_name: None,
            comparison_names: Vec::new(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and pick sensible defaults: the
    /// most recent year, the first neighborhood, and the first three
    /// neighborhoods as the comparison set.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.selected_year = FINAL_YEAR;
        self.selected_name = dataset.names().next().map(str::to_string);
        self.comparison_names = dataset.names().take(3).map(str::to_string).collect();

        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// Whether a neighborhood is part of the comparison set.
    pub fn is_compared(&self, name: &str) -> bool {
        self.comparison_names.iter().any(|n| n == name)
    }

    /// Toggle a neighborhood in the comparison set, honoring the soft
    /// cap. Selection order is preserved; it drives series colors.
    pub fn toggle_comparison(&mut self, name: &str) {
        if let Some(pos) = self.comparison_names.iter().position(|n| n == name) {
            self.comparison_names.remove(pos);
            return;
        }
        if self.comparison_names.len() >= MAX_COMPARISON {
            self.status_message = Some(format!(
                "Comparison is limited to {MAX_COMPARISON} neighborhoods"
            ));
            return;
        }
        self.comparison_names.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::NeighborhoodRecord;

    fn dataset(names: &[&str]) -> Dataset {
        Dataset::from_records(names.iter().map(|n| NeighborhoodRecord::new(*n)).collect())
    }

    #[test]
    fn set_dataset_defaults() {
        let mut state = AppState::default();
        state.set_dataset(dataset(&["A", "B", "C", "D"]));
        assert_eq!(state.selected_year, FINAL_YEAR);
        assert_eq!(state.selected_name.as_deref(), Some("A"));
        assert_eq!(state.comparison_names, ["A", "B", "C"]);
    }

    #[test]
    fn comparison_toggle_honors_cap_and_order() {
        let mut state = AppState::default();
        for i in 0..MAX_COMPARISON {
            state.toggle_comparison(&format!("N{i}"));
        }
        assert_eq!(state.comparison_names.len(), MAX_COMPARISON);

        state.toggle_comparison("overflow");
        assert_eq!(state.comparison_names.len(), MAX_COMPARISON);
        assert!(state.status_message.is_some());

        state.toggle_comparison("N0");
        assert_eq!(state.comparison_names.first().map(String::as_str), Some("N1"));
        assert_eq!(state.comparison_names.len(), MAX_COMPARISON - 1);
    }
}
