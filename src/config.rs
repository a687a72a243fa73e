//! Application-level configuration constants.

// Remote API
pub const API_ORIGIN: &str = "https://theeamcetcollegeprediction-2.onrender.com";

// Cache lifetimes (minutes)
pub const BRANCH_LIST_TTL_MIN: f64 = 30.0;
pub const COLLEGE_LIST_TTL_MIN: f64 = 60.0;
pub const ANALYTICS_TTL_MIN: f64 = 30.0;

// UI Behavior
pub const SEARCH_DEBOUNCE_MS: u32 = 300;
pub const SEARCH_MIN_CHARS: usize = 2;
pub const SEARCH_MAX_RESULTS: usize = 10;
pub const DEFAULT_SORT: &str = "cutoff-asc";
pub const TOP_N_CHART: usize = 10;

// Rank limits
pub const MIN_RANK: u32 = 1;
pub const MAX_RANK: u32 = 350_000;

// Comparison limits
pub const COMPARISON_LIMIT: usize = 4;
pub const MIN_TO_COMPARE: usize = 2;

// Static option lists for the prediction form

pub const BRANCHES: &[&str] = &[
    "Civil Engineering",
    "Computer Science & Engineering",
    "Electronics & Communication Engineering",
    "Electrical & Electronics Engineering",
    "Mechanical Engineering",
    "Information Technology",
    "Artificial Intelligence & Machine Learning",
    "Artificial Intelligence & Data Science",
    "CSE (Artificial Intelligence)",
    "CSE (Cyber Security)",
    "CSE (Data Science)",
    "CSE (AI & ML Specialization)",
    "Chemical Engineering",
    "Biotechnology",
    "Agricultural Engineering",
    "Mining Engineering",
    "Metallurgical Engineering",
    "Aerospace Engineering",
    "Automobile Engineering",
    "Internet of Things",
    "B.Pharm",
    "Doctor of Pharmacy (Pharm.D)",
    "Electronics & Instrumentation Engineering",
    "CSE (Business Systems)",
    "Geo-Informatics Engineering",
];

/// (value, label)
pub const QUOTAS: &[(&str, &str)] = &[
    ("oc", "OC (Open Category)"),
    ("sc", "SC (Scheduled Caste)"),
    ("st", "ST (Scheduled Tribe)"),
    ("bca", "BC-A"),
    ("bcb", "BC-B"),
    ("bcc", "BC-C"),
    ("bcd", "BC-D"),
    ("bce", "BC-E"),
    ("oc_ews", "OC (EWS Quota)"),
];

pub const GENDERS: &[(&str, &str)] = &[("boys", "Boys"), ("girls", "Girls")];

pub const REGIONS: &[(&str, &str)] = &[
    ("AU", "Andhra University Region"),
    ("SVU", "Sri Venkateswara University Region"),
    ("SW", "South-West region"),
];

pub const TIERS: &[&str] = &["Tier 1", "Tier 2", "Tier 3"];

pub const PLACEMENT_QUALITIES: &[&str] = &["Excellent", "Very Good", "Good", "Bad"];

/// Desired-probability choices offered by the reverse calculator.
pub const DESIRED_PROBABILITIES: &[f64] = &[95.0, 85.0, 70.0, 50.0, 30.0];

/// (value, label) pairs for the sort dropdown.
pub const SORT_OPTIONS: &[(&str, &str)] = &[
    ("probability-desc", "Probability (High to Low)"),
    ("probability-asc", "Probability (Low to High)"),
    ("cutoff-asc", "Cutoff Rank (Low to High)"),
    ("cutoff-desc", "Cutoff Rank (High to Low)"),
    ("avgPackage-desc", "Average Package (High to Low)"),
    ("avgPackage-asc", "Average Package (Low to High)"),
    ("highestPackage-desc", "Highest Package (High to Low)"),
    ("highestPackage-asc", "Highest Package (Low to High)"),
    ("quality-desc", "Placement Quality (Best to Worst)"),
    ("quality-asc", "Placement Quality (Worst to Best)"),
];

/// Display label for a quota code, falling back to the code itself.
pub fn quota_label(code: &str) -> &str {
    let lower = code.to_ascii_lowercase();
    let quota = lower
        .strip_suffix("_boys")
        .or_else(|| lower.strip_suffix("_girls"))
        .unwrap_or(&lower);
    QUOTAS
        .iter()
        .find(|(value, _)| *value == quota)
        .map(|(_, label)| *label)
        .unwrap_or(code)
}
