//! Side-by-side comparison: the bounded college selection and per-branch
//! descriptive statistics.

use crate::record::{CollegeRecord, SelectionKey};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("You can only compare up to {limit} colleges at a time. Please uncheck a college to add another.")]
    LimitReached { limit: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Ordered set of records picked for comparison, deduplicated by
/// [`SelectionKey`] and bounded by `limit`.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSet {
    limit: usize,
    items: Vec<CollegeRecord>,
}

impl SelectionSet {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            items: Vec::with_capacity(limit),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CollegeRecord] {
        &self.items
    }

    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.items.iter().any(|c| &c.key() == key)
    }

    pub fn can_compare(&self) -> bool {
        self.items.len() >= crate::config::MIN_TO_COMPARE
    }

    /// Add the record if absent, remove it if present. Adding to a full set
    /// fails and leaves the set untouched.
    pub fn toggle(&mut self, record: &CollegeRecord) -> Result<Toggle, SelectionError> {
        let key = record.key();
        if self.remove(&key) {
            return Ok(Toggle::Removed);
        }
        if self.items.len() >= self.limit {
            return Err(SelectionError::LimitReached { limit: self.limit });
        }
        self.items.push(record.clone());
        Ok(Toggle::Added)
    }

    pub fn remove(&mut self, key: &SelectionKey) -> bool {
        let before = self.items.len();
        self.items.retain(|c| &c.key() != key);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// After the result set changes, keep only selections still present in
    /// `records`, refreshed from them, in the original selection order.
    pub fn retain_present(&mut self, records: &[CollegeRecord]) {
        let before = self.items.len();
        self.items = self
            .items
            .iter()
            .filter_map(|sel| {
                let key = sel.key();
                records.iter().find(|r| r.key() == key).cloned()
            })
            .collect();
        if self.items.len() != before {
            debug!(
                "Selection shrank from {} to {} after results changed",
                before,
                self.items.len()
            );
        }
    }
}

/// Descriptive statistics for one branch. All zeros means "no data".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchStats {
    #[serde(default)]
    pub total_colleges: usize,
    #[serde(default)]
    pub avg_package: f64,
    #[serde(default)]
    pub max_package: f64,
    #[serde(default)]
    pub min_package: f64,
}

impl BranchStats {
    /// An all-zero entry stands for a branch with no matching records.
    pub fn has_data(&self) -> bool {
        self.total_colleges > 0
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a CollegeRecord>) -> Self {
        let mut total = 0usize;
        let mut packages = Vec::new();
        for record in records {
            total += 1;
            if let Some(p) = record.average_package.filter(|p| *p > 0.0) {
                packages.push(p);
            }
        }
        if packages.is_empty() {
            return Self {
                total_colleges: total,
                ..Self::default()
            };
        }
        let sum: f64 = packages.iter().sum();
        Self {
            total_colleges: total,
            avg_package: sum / packages.len() as f64,
            max_package: packages.iter().copied().fold(f64::MIN, f64::max),
            min_package: packages.iter().copied().fold(f64::MAX, f64::min),
        }
    }
}

/// Per-branch statistics for every selected branch, keyed in selection
/// order. Branches with no matching records get an all-zero entry.
pub fn compare_branches<S: AsRef<str>>(
    selected: &[S],
    records: &[CollegeRecord],
) -> IndexMap<String, BranchStats> {
    let mut out = IndexMap::with_capacity(selected.len());
    for branch in selected {
        let branch = branch.as_ref();
        if out.contains_key(branch) {
            continue;
        }
        let stats = BranchStats::from_records(records.iter().filter(|r| r.branch == branch));
        if !stats.has_data() {
            warn!("No colleges found for branch: {}", branch);
        }
        out.insert(branch.to_string(), stats);
    }
    out
}

/// Branch names present in the data, first-seen order.
pub fn distinct_branches(records: &[CollegeRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.branch.is_empty())
        .map(|r| r.branch.clone())
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(branch: &str, avg: Option<f64>) -> CollegeRecord {
        CollegeRecord {
            instcode: format!("I{}", avg.unwrap_or(0.0)),
            branch: branch.into(),
            average_package: avg,
            ..Default::default()
        }
    }

    fn pick(code: &str, category: &str, cutoff: u32) -> CollegeRecord {
        CollegeRecord {
            instcode: code.into(),
            name: code.into(),
            branch: "CSE".into(),
            category: Some(category.into()),
            cutoff: Some(cutoff),
            ..Default::default()
        }
    }

    #[test]
    fn end_to_end_branch_comparison() {
        let records = vec![rec("CSE", Some(10.0)), rec("CSE", None), rec("ECE", Some(5.0))];
        let stats = compare_branches(&["CSE", "ECE"], &records);
        assert_eq!(
            stats["CSE"],
            BranchStats { total_colleges: 2, avg_package: 10.0, max_package: 10.0, min_package: 10.0 }
        );
        assert_eq!(
            stats["ECE"],
            BranchStats { total_colleges: 1, avg_package: 5.0, max_package: 5.0, min_package: 5.0 }
        );
        let order: Vec<&String> = stats.keys().collect();
        assert_eq!(order, vec!["CSE", "ECE"]);
    }

    #[test]
    fn branch_without_records_yields_zero_sentinel() {
        let records = vec![rec("CSE", Some(10.0))];
        let stats = compare_branches(&["Mining Engineering"], &records);
        let entry = stats["Mining Engineering"];
        assert_eq!(entry, BranchStats::default());
        assert!(!entry.has_data());
    }

    #[test]
    fn non_positive_packages_are_ignored() {
        let records = vec![rec("CSE", Some(0.0)), rec("CSE", Some(-1.0)), rec("CSE", Some(4.0)), rec("CSE", Some(8.0))];
        let stats = compare_branches(&["CSE"], &records)["CSE"];
        assert_eq!(stats.total_colleges, 4);
        assert_eq!(stats.avg_package, 6.0);
        assert_eq!(stats.max_package, 8.0);
        assert_eq!(stats.min_package, 4.0);
    }

    #[test]
    fn branch_match_is_exact() {
        let records = vec![rec("CSE (Data Science)", Some(6.0)), rec("cse", Some(3.0))];
        let stats = compare_branches(&["CSE"], &records);
        assert!(!stats["CSE"].has_data());
    }

    #[test]
    fn duplicate_selection_is_aggregated_once() {
        let records = vec![rec("CSE", Some(10.0))];
        assert_eq!(compare_branches(&["CSE", "CSE"], &records).len(), 1);
    }

    #[test]
    fn stats_serialize_camel_case() {
        let json = serde_json::to_value(BranchStats { total_colleges: 3, avg_package: 4.0, max_package: 6.0, min_package: 2.0 }).unwrap();
        assert_eq!(json["totalColleges"], 3);
        assert_eq!(json["avgPackage"], 4.0);
    }

    #[test]
    fn distinct_branches_in_first_seen_order() {
        let records = vec![rec("ECE", None), rec("CSE", None), rec("ECE", None), rec("", None)];
        assert_eq!(distinct_branches(&records), vec!["ECE".to_string(), "CSE".to_string()]);
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut set = SelectionSet::new(4);
        let a = pick("A", "oc_boys", 100);
        assert_eq!(set.toggle(&a), Ok(Toggle::Added));
        assert!(set.contains(&a.key()));
        assert_eq!(set.toggle(&a), Ok(Toggle::Removed));
        assert!(set.is_empty());
    }

    #[test]
    fn same_institution_different_category_are_distinct() {
        let mut set = SelectionSet::new(4);
        set.toggle(&pick("A", "oc_boys", 100)).unwrap();
        set.toggle(&pick("A", "sc_boys", 900)).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.can_compare());
    }

    #[test]
    fn limit_is_enforced() {
        let mut set = SelectionSet::new(2);
        set.toggle(&pick("A", "oc_boys", 1)).unwrap();
        set.toggle(&pick("B", "oc_boys", 2)).unwrap();
        let err = set.toggle(&pick("C", "oc_boys", 3)).unwrap_err();
        assert_eq!(err, SelectionError::LimitReached { limit: 2 });
        assert_eq!(set.len(), 2);
        // removing still works at capacity
        assert_eq!(set.toggle(&pick("A", "oc_boys", 1)), Ok(Toggle::Removed));
    }

    #[test]
    fn retain_present_keeps_selection_order() {
        let mut set = SelectionSet::new(4);
        let a = pick("A", "oc_boys", 1);
        let b = pick("B", "oc_boys", 2);
        let c = pick("C", "oc_boys", 3);
        set.toggle(&c).unwrap();
        set.toggle(&a).unwrap();
        set.toggle(&b).unwrap();
        set.retain_present(&[a.clone(), c.clone()]);
        let codes: Vec<&str> = set.items().iter().map(|r| r.instcode.as_str()).collect();
        assert_eq!(codes, vec!["C", "A"]);
    }
}
