use std::path::{Path, PathBuf};

use crate::color::GroupColors;
use crate::data::filter::{filtered_indices, FilterKey, Selection};
use crate::data::loader::load_file;
use crate::data::model::{Category, StudentDataset, StudentRecord};
use crate::data::select::{sort_records, SortKey, SortOrder, DEFAULT_THRESHOLD};
use crate::report::DashboardSummary;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<StudentDataset>,

    /// File the dataset came from.
    pub data_path: Option<PathBuf>,

    /// Sidebar group / semester selection.
    pub selection: Selection,

    /// Minimum final average of a distinguished student.
    pub threshold: f64,

    /// Indices of records passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Derived views for the current selection and threshold (cached).
    pub summary: Option<DashboardSummary>,

    pub group_colors: GroupColors,

    /// Ordering of the top-performer table.
    pub sort_key: SortKey,
    pub sort_order: SortOrder,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            data_path: None,
            selection: Selection::default(),
            threshold: DEFAULT_THRESHOLD,
            visible_indices: Vec::new(),
            summary: None,
            group_colors: GroupColors::default(),
            sort_key: SortKey::default(),
            sort_order: SortOrder::default(),
            status_message: None,
        }
    }
}

impl AppState {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset with every group and semester selected.
    pub fn set_dataset(&mut self, dataset: StudentDataset, path: Option<PathBuf>) {
        self.group_colors = GroupColors::new(&dataset.groups);
        self.selection = Selection::all(&dataset);
        self.dataset = Some(dataset);
        self.data_path = path;
        self.status_message = None;
        self.refilter();
    }

    /// Narrow the selection to the given groups and semesters. An empty
    /// slice keeps that key fully selected.
    pub fn restrict(&mut self, groups: &[Category], semesters: &[Category]) {
        if let Some(ds) = &self.dataset {
            self.selection = Selection::restricted(ds, groups, semesters);
            self.refilter();
        }
    }

    /// Load `path`, replacing the current dataset. On failure the current
    /// dataset is kept and the error goes to the status line.
    pub fn load_path(&mut self, path: &Path) {
        match load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} students from {} ({} groups, {} semesters)",
                    dataset.len(),
                    path.display(),
                    dataset.groups.len(),
                    dataset.semesters.len()
                );
                self.set_dataset(dataset, Some(path.to_path_buf()));
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error loading {}: {e}", path.display()));
            }
        }
    }

    /// Recompute `visible_indices` and the summary after a filter or
    /// threshold change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.visible_indices = filtered_indices(ds, &self.selection);
            self.summary = Some(DashboardSummary::build(ds, &self.selection, self.threshold));
            log::debug!(
                "Recomputed views: {} of {} records visible, threshold {}",
                self.visible_indices.len(),
                ds.len(),
                self.threshold
            );
        }
    }

    /// Records passing the current selection.
    pub fn visible_records(&self) -> Vec<&StudentRecord> {
        match &self.dataset {
            Some(ds) => self.visible_indices.iter().map(|&i| &ds.records[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Toggle a single value of one filter key.
    pub fn toggle_filter_value(&mut self, key: FilterKey, value: &Category) {
        let selected = self.selection.values_mut(key);
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Select all values of one key.
    pub fn select_all(&mut self, key: FilterKey) {
        if let Some(ds) = &self.dataset {
            *self.selection.values_mut(key) = key.options(ds).clone();
            self.refilter();
        }
    }

    /// Deselect all values of one key.
    pub fn select_none(&mut self, key: FilterKey) {
        self.selection.values_mut(key).clear();
        self.refilter();
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
        self.refilter();
    }

    /// Clicking the active column flips the order; another column starts
    /// descending.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_key = key;
            self.sort_order = SortOrder::Descending;
        }
    }

    /// Distinguished students in the current table order.
    pub fn table_rows(&self) -> Vec<&StudentRecord> {
        let mut rows: Vec<&StudentRecord> = match &self.summary {
            Some(s) => s.distinguished.iter().collect(),
            None => Vec::new(),
        };
        sort_records(&mut rows, self.sort_key, self.sort_order);
        rows
    }
}
