use std::collections::BTreeSet;

use super::model::{Category, StudentDataset, StudentRecord};

// ---------------------------------------------------------------------------
// Selection: which groups and semesters are shown
// ---------------------------------------------------------------------------

/// The two categorical keys the sidebar filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Group,
    Semester,
}

impl FilterKey {
    pub const ALL: [FilterKey; 2] = [FilterKey::Group, FilterKey::Semester];

    pub fn label(self) -> &'static str {
        match self {
            FilterKey::Group => "Groups",
            FilterKey::Semester => "Semesters",
        }
    }

    /// Every distinct value of this key in the dataset.
    pub fn options(self, dataset: &StudentDataset) -> &BTreeSet<Category> {
        match self {
            FilterKey::Group => &dataset.groups,
            FilterKey::Semester => &dataset.semesters,
        }
    }
}

/// Sidebar selection state: the allowed groups and semesters.
///
/// An empty set means nothing is selected for that key, so nothing passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub groups: BTreeSet<Category>,
    pub semesters: BTreeSet<Category>,
}

impl Selection {
    /// Select every group and semester present in the dataset.
    pub fn all(dataset: &StudentDataset) -> Self {
        Selection {
            groups: dataset.groups.clone(),
            semesters: dataset.semesters.clone(),
        }
    }

    /// Start from [`Selection::all`] and narrow each key to the requested
    /// values. An empty request leaves that key fully selected; requested
    /// values absent from the dataset are dropped.
    pub fn restricted(dataset: &StudentDataset, groups: &[Category], semesters: &[Category]) -> Self {
        let narrow = |all: &BTreeSet<Category>, wanted: &[Category]| {
            if wanted.is_empty() {
                all.clone()
            } else {
                wanted.iter().filter(|v| all.contains(*v)).cloned().collect()
            }
        };
        Selection {
            groups: narrow(&dataset.groups, groups),
            semesters: narrow(&dataset.semesters, semesters),
        }
    }

    pub fn values(&self, key: FilterKey) -> &BTreeSet<Category> {
        match key {
            FilterKey::Group => &self.groups,
            FilterKey::Semester => &self.semesters,
        }
    }

    pub fn values_mut(&mut self, key: FilterKey) -> &mut BTreeSet<Category> {
        match key {
            FilterKey::Group => &mut self.groups,
            FilterKey::Semester => &mut self.semesters,
        }
    }

    /// Whether a record passes both membership tests.
    pub fn admits(&self, record: &StudentRecord) -> bool {
        self.groups.contains(&record.group) && self.semesters.contains(&record.semester)
    }
}

/// Return indices of records that pass the selection, in input order.
pub fn filtered_indices(dataset: &StudentDataset, selection: &Selection) -> Vec<usize> {
    if selection.groups.is_empty() || selection.semesters.is_empty() {
        return Vec::new();
    }
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| selection.admits(r))
        .map(|(i, _)| i)
        .collect()
}

/// Borrow the records that pass the selection, in input order.
pub fn filter_records<'a>(dataset: &'a StudentDataset, selection: &Selection) -> Vec<&'a StudentRecord> {
    filtered_indices(dataset, selection)
        .into_iter()
        .map(|i| &dataset.records[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::small_dataset;

    #[test]
    fn full_selection_keeps_everything() {
        let ds = small_dataset();
        let rows = filter_records(&ds, &Selection::all(&ds));
        assert_eq!(rows.len(), ds.len());
        for (kept, original) in rows.iter().zip(&ds.records) {
            assert_eq!(*kept, original);
        }
    }

    #[test]
    fn empty_group_set_yields_nothing() {
        let ds = small_dataset();
        let selection = Selection {
            groups: BTreeSet::new(),
            semesters: ds.semesters.clone(),
        };
        assert!(filter_records(&ds, &selection).is_empty());
    }

    #[test]
    fn empty_semester_set_yields_nothing() {
        let ds = small_dataset();
        let selection = Selection {
            groups: ds.groups.clone(),
            semesters: BTreeSet::new(),
        };
        assert!(filtered_indices(&ds, &selection).is_empty());
    }

    #[test]
    fn both_keys_must_match_and_order_is_kept() {
        let ds = small_dataset();
        let selection = Selection {
            groups: ["A", "C"].into_iter().map(Category::from).collect(),
            semesters: [Category::Integer(2)].into_iter().collect(),
        };
        let names: Vec<&str> = filter_records(&ds, &selection)
            .iter()
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, ["Marta", "Pablo"]);
    }

    #[test]
    fn unknown_values_match_nothing() {
        let ds = small_dataset();
        let selection = Selection {
            groups: [Category::from("Z")].into_iter().collect(),
            semesters: ds.semesters.clone(),
        };
        assert!(filtered_indices(&ds, &selection).is_empty());
    }

    #[test]
    fn restricted_narrows_only_requested_keys() {
        let ds = small_dataset();
        let selection = Selection::restricted(&ds, &[Category::from("B"), Category::from("Z")], &[]);
        assert_eq!(selection.groups.len(), 1);
        assert!(selection.groups.contains(&Category::from("B")));
        assert_eq!(selection.semesters, ds.semesters);
        assert_eq!(Selection::restricted(&ds, &[], &[]), Selection::all(&ds));
    }

    #[test]
    fn keys_address_their_own_sets() {
        let ds = small_dataset();
        let mut selection = Selection::all(&ds);
        selection.values_mut(FilterKey::Semester).clear();
        assert!(selection.values(FilterKey::Semester).is_empty());
        assert_eq!(selection.values(FilterKey::Group), FilterKey::Group.options(&ds));
    }

    #[test]
    fn empty_dataset_filters_cleanly() {
        let ds = StudentDataset::default();
        assert!(filtered_indices(&ds, &Selection::all(&ds)).is_empty());
    }
}
