//! College records as returned by the prediction API, normalized into one
//! canonical shape at the API boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Record shape as it arrives on the wire. Field names drift between
/// endpoints (`branch` vs `branchCode`, `name` vs `institution_name`), so
/// everything is optional here and resolved by [`RawCollegeRecord::normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCollegeRecord {
    #[serde(default)]
    pub instcode: Option<String>,
    #[serde(default, alias = "institution_name")]
    pub name: Option<String>,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub branch_code: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub cutoff: Option<u32>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub average_package: Option<f64>,
    #[serde(default)]
    pub highest_package: Option<f64>,
    #[serde(default)]
    pub placement_drive_quality: Option<String>,
    #[serde(default)]
    pub prediction_tier: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl RawCollegeRecord {
    pub fn normalize(self) -> CollegeRecord {
        CollegeRecord {
            instcode: self.instcode.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            branch: non_empty(self.branch)
                .or_else(|| non_empty(self.branch_code))
                .unwrap_or_default(),
            category: non_empty(self.category),
            district: non_empty(self.district),
            region: non_empty(self.region),
            tier: non_empty(self.tier),
            place: non_empty(self.place),
            cutoff: self.cutoff,
            probability: self.probability,
            average_package: self.average_package,
            highest_package: self.highest_package,
            placement_drive_quality: non_empty(self.placement_drive_quality),
            prediction_tier: non_empty(self.prediction_tier),
        }
    }
}

/// Canonical college record used everywhere past the API boundary.
///
/// Serializes back to the camelCase wire shape so cached payloads can be
/// read through [`RawCollegeRecord`] again.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeRecord {
    pub instcode: String,
    pub name: String,
    pub branch: String,
    pub category: Option<String>,
    pub district: Option<String>,
    pub region: Option<String>,
    pub tier: Option<String>,
    pub place: Option<String>,
    pub cutoff: Option<u32>,
    pub probability: Option<f64>,
    pub average_package: Option<f64>,
    pub highest_package: Option<f64>,
    pub placement_drive_quality: Option<String>,
    pub prediction_tier: Option<String>,
}

impl CollegeRecord {
    /// Identity of a record for selection purposes. One institution offers
    /// many branch/category combinations, so `instcode` alone is not enough.
    pub fn key(&self) -> SelectionKey {
        SelectionKey {
            instcode: self.instcode.clone(),
            branch: self.branch.clone(),
            category: self.category.clone(),
            cutoff: self.cutoff,
        }
    }

    /// Ordinal of the placement-drive quality; 0 when absent or unrecognized.
    pub fn placement_rank(&self) -> u8 {
        self.placement_drive_quality
            .as_deref()
            .and_then(PlacementQuality::parse)
            .map(PlacementQuality::rank)
            .unwrap_or(0)
    }
}

/// Normalize a whole response body.
pub fn normalize_all(raw: Vec<RawCollegeRecord>) -> Vec<CollegeRecord> {
    raw.into_iter().map(RawCollegeRecord::normalize).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub instcode: String,
    pub branch: String,
    pub category: Option<String>,
    pub cutoff: Option<u32>,
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.instcode,
            self.branch,
            self.category.as_deref().unwrap_or(""),
            self.cutoff.map(|c| c.to_string()).unwrap_or_default()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlacementQuality {
    Bad,
    Good,
    VeryGood,
    Excellent,
}

impl PlacementQuality {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "excellent" => Some(Self::Excellent),
            "very good" => Some(Self::VeryGood),
            "good" => Some(Self::Good),
            "bad" => Some(Self::Bad),
            _ => None,
        }
    }

    pub fn rank(self) -> u8 {
        match self {
            Self::Excellent => 4,
            Self::VeryGood => 3,
            Self::Good => 2,
            Self::Bad => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Bad => "Bad",
        }
    }
}

impl fmt::Display for PlacementQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
