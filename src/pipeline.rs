//! Result pipeline: optional placement-quality filter followed by a sort on
//! one record field.

use crate::record::CollegeRecord;
use log::debug;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Probability,
    Cutoff,
    AveragePackage,
    HighestPackage,
    PlacementDriveQuality,
}

impl SortField {
    /// Accepts both the record property names and the short keys used by
    /// the sort dropdown.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "probability" => Some(Self::Probability),
            "cutoff" => Some(Self::Cutoff),
            "averagePackage" | "avgPackage" => Some(Self::AveragePackage),
            "highestPackage" => Some(Self::HighestPackage),
            "placementDriveQuality" | "quality" => Some(Self::PlacementDriveQuality),
            _ => None,
        }
    }

    /// Sort value for a record. `None` means the record lacks the field.
    /// Placement quality is ordinal and never absent: unknown ranks as 0.
    fn value(self, record: &CollegeRecord) -> Option<f64> {
        match self {
            Self::Probability => record.probability,
            Self::Cutoff => record.cutoff.map(f64::from),
            Self::AveragePackage => record.average_package,
            Self::HighestPackage => record.highest_package,
            Self::PlacementDriveQuality => Some(f64::from(record.placement_rank())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: Direction,
}

impl SortSpec {
    /// Parse `"<field>-<asc|desc>"`. Anything other than `desc` sorts
    /// ascending; an unknown field yields `None`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (key, dir) = spec.split_once('-').unwrap_or((spec, "asc"));
        let field = SortField::parse(key)?;
        let direction = if dir == "desc" {
            Direction::Desc
        } else {
            Direction::Asc
        };
        Some(Self { field, direction })
    }

    /// Missing values order after present ones regardless of direction.
    pub fn compare(&self, a: &CollegeRecord, b: &CollegeRecord) -> Ordering {
        match (self.field.value(a), self.field.value(b)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ord = x.partial_cmp(&y).unwrap_or(Ordering::Equal);
                match self.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            }
        }
    }
}

/// Return a newly ordered copy of `records`. An unrecognized specifier
/// returns the input order unchanged.
pub fn sort_records(records: &[CollegeRecord], spec: &str) -> Vec<CollegeRecord> {
    let mut out = records.to_vec();
    match SortSpec::parse(spec) {
        Some(sort) => out.sort_by(|a, b| sort.compare(a, b)),
        None => debug!("Unknown sort specifier '{}', leaving order unchanged", spec),
    }
    out
}

/// Keep records whose placement quality is in `allowed` (case-insensitive).
/// An empty allow-set passes everything through.
pub fn filter_by_placement<S: AsRef<str>>(
    records: &[CollegeRecord],
    allowed: &[S],
) -> Vec<CollegeRecord> {
    if allowed.is_empty() {
        return records.to_vec();
    }
    let allowed: Vec<String> = allowed
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .collect();
    records
        .iter()
        .filter(|r| {
            r.placement_drive_quality
                .as_deref()
                .map(|q| allowed.contains(&q.trim().to_lowercase()))
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Filter then sort.
pub fn run<S: AsRef<str>>(records: &[CollegeRecord], allowed: &[S], spec: &str) -> Vec<CollegeRecord> {
    let filtered = filter_by_placement(records, allowed);
    let sorted = sort_records(&filtered, spec);
    debug!(
        "Pipeline: {} records in, {} after placement filter, sorted by '{}'",
        records.len(),
        sorted.len(),
        spec
    );
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn college(code: &str, prob: Option<f64>, cutoff: Option<u32>, avg: Option<f64>, hi: Option<f64>, quality: Option<&str>) -> CollegeRecord {
        CollegeRecord {
            instcode: code.into(),
            name: format!("College {code}"),
            branch: "CSE".into(),
            probability: prob,
            cutoff,
            average_package: avg,
            highest_package: hi,
            placement_drive_quality: quality.map(str::to_string),
            ..Default::default()
        }
    }

    fn codes(records: &[CollegeRecord]) -> Vec<&str> {
        records.iter().map(|r| r.instcode.as_str()).collect()
    }

    fn complete_set() -> Vec<CollegeRecord> {
        vec![
            college("A", Some(40.0), Some(9000), Some(4.5), Some(12.0), Some("Good")),
            college("B", Some(90.0), Some(2500), Some(7.0), Some(30.0), Some("Excellent")),
            college("C", Some(65.0), Some(15000), Some(3.2), Some(8.0), Some("Bad")),
            college("D", Some(12.0), Some(40000), Some(5.1), Some(18.0), Some("Very Good")),
        ]
    }

    #[test]
    fn ascending_is_reverse_of_descending_without_nulls() {
        let records = complete_set();
        for field in ["probability", "cutoff", "averagePackage", "highestPackage", "placementDriveQuality"] {
            let asc = sort_records(&records, &format!("{field}-asc"));
            let mut desc = sort_records(&records, &format!("{field}-desc"));
            desc.reverse();
            assert_eq!(codes(&asc), codes(&desc), "field {field}");
        }
    }

    #[test]
    fn cutoff_ascending_order() {
        let sorted = sort_records(&complete_set(), "cutoff-asc");
        assert_eq!(codes(&sorted), vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn quality_sorts_by_ordinal_rank() {
        let sorted = sort_records(&complete_set(), "quality-desc");
        assert_eq!(codes(&sorted), vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn missing_values_sort_last_in_both_directions() {
        let records = vec![
            college("X", None, None, None, None, None),
            college("A", Some(40.0), Some(9000), Some(4.5), Some(12.0), None),
            college("Y", None, None, None, None, None),
            college("B", Some(90.0), Some(2500), Some(7.0), Some(30.0), None),
        ];
        for field in ["probability", "cutoff", "avgPackage", "highestPackage"] {
            for dir in ["asc", "desc"] {
                let sorted = sort_records(&records, &format!("{field}-{dir}"));
                let tail: Vec<&str> = codes(&sorted)[2..].to_vec();
                assert_eq!(tail, vec!["X", "Y"], "{field}-{dir}");
            }
        }
    }

    #[test]
    fn unknown_quality_ranks_as_zero() {
        let records = vec![
            college("A", None, None, None, None, Some("Average")),
            college("B", None, None, None, None, Some("Bad")),
        ];
        let sorted = sort_records(&records, "quality-asc");
        assert_eq!(codes(&sorted), vec!["A", "B"]);
    }

    #[test]
    fn unknown_sort_key_is_a_no_op() {
        let records = complete_set();
        assert_eq!(sort_records(&records, "name-asc"), records);
        assert_eq!(sort_records(&records, ""), records);
    }

    #[test]
    fn missing_direction_defaults_to_ascending() {
        let spec = SortSpec::parse("probability").unwrap();
        assert_eq!(spec.direction, Direction::Asc);
        assert_eq!(SortSpec::parse("cutoff-sideways").unwrap().direction, Direction::Asc);
    }

    #[test]
    fn placement_filter_is_case_insensitive() {
        let filtered = filter_by_placement(&complete_set(), &["excellent", "VERY GOOD"]);
        assert_eq!(codes(&filtered), vec!["B", "D"]);
    }

    #[test]
    fn placement_filter_drops_records_without_quality() {
        let mut records = complete_set();
        records.push(college("E", None, None, None, None, None));
        let filtered = filter_by_placement(&records, &["Good"]);
        assert_eq!(codes(&filtered), vec!["A"]);
    }

    #[test]
    fn empty_filter_passes_everything() {
        let records = complete_set();
        let none: [&str; 0] = [];
        assert_eq!(filter_by_placement(&records, &none), records);
    }

    #[test]
    fn run_filters_then_sorts() {
        let out = run(&complete_set(), &["Good", "Excellent", "Bad"], "probability-desc");
        assert_eq!(codes(&out), vec!["B", "C", "A"]);
    }
}
