use crate::config::{MAX_RANK, MIN_RANK, SEARCH_MIN_CHARS};
use crate::record::CollegeRecord;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

// Compiled regexes for input sanitizing
static NON_DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9]").unwrap());
static NON_ALPHA_SPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z\s]").unwrap());
static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Error => "notice-error",
            Severity::Warning => "notice-warning",
            Severity::Info => "notice-info",
        }
    }
}

/// Message shown in the validation modal.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(title: &str, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            severity,
        }
    }
}

/// Input problems caught before anything reaches the network.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a valid positive rank (e.g., 15000). Rank must be greater than 0.")]
    InvalidRank,
    #[error("Please enter a rank between {} and {}.", MIN_RANK, MAX_RANK)]
    RankOutOfRange,
    #[error("Please enter your EAMCET rank or select at least one filter to get predictions.")]
    NoInput,
    #[error("Please enter only alphabetic characters and spaces.")]
    InvalidCollegeQuery,
    #[error("Please select at least {0} items to compare.")]
    TooFewToCompare(usize),
    #[error("Please select a college from the dropdown.")]
    NoCollegeSelected,
    #[error("Please make a valid selection before proceeding.")]
    InvalidSelection,
}

impl ValidationError {
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::InvalidRank | ValidationError::RankOutOfRange => "Invalid Rank",
            ValidationError::NoInput => "Input Required",
            ValidationError::InvalidCollegeQuery => "Invalid Input",
            ValidationError::TooFewToCompare(_) => "Select More",
            ValidationError::NoCollegeSelected | ValidationError::InvalidSelection => "Invalid Selection",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            ValidationError::InvalidRank | ValidationError::RankOutOfRange => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn to_notice(&self) -> Notice {
        Notice::new(self.title(), self.to_string(), self.severity())
    }
}

/// Strip everything but digits, as typed or pasted into the rank field.
pub fn sanitize_rank_input(input: &str) -> String {
    NON_DIGIT_REGEX.replace_all(input, "").into_owned()
}

/// Generic numeric input validation
pub fn validate_numeric_input<T>(
    input: &str,
    min: Option<T>,
    max: Option<T>,
    field_name: &str,
) -> Result<T, String>
where
    T: std::str::FromStr + std::fmt::Display + PartialOrd,
{
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(format!("{} cannot be empty", field_name));
    }

    match trimmed.parse::<T>() {
        Ok(val) => {
            if let Some(min_val) = min {
                if val < min_val {
                    return Err(format!("{} must be at least {}", field_name, min_val));
                }
            }
            if let Some(max_val) = max {
                if val > max_val {
                    return Err(format!("{} cannot exceed {}", field_name, max_val));
                }
            }
            Ok(val)
        }
        Err(_) => Err(format!("{} must be a valid number", field_name)),
    }
}

/// Validate the rank field. Empty means "no rank" and is allowed; the
/// caller then requires at least one filter instead.
pub fn validate_rank(input: &str) -> Result<Option<u32>, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    // Anything past u32 is certainly above the upper bound.
    if trimmed.chars().all(|c| c.is_ascii_digit()) && trimmed.parse::<u32>().is_err() {
        return Err(ValidationError::RankOutOfRange);
    }
    let rank = validate_numeric_input::<i64>(trimmed, None, None, "Rank")
        .map_err(|_| ValidationError::InvalidRank)?;
    if rank < i64::from(MIN_RANK) {
        return Err(ValidationError::InvalidRank);
    }
    if rank > i64::from(MAX_RANK) {
        return Err(ValidationError::RankOutOfRange);
    }
    Ok(Some(rank as u32))
}

/// Keep letters and whitespace only. The flag reports whether anything was
/// removed so the UI can warn.
pub fn sanitize_college_query(input: &str) -> (String, bool) {
    let cleaned = NON_ALPHA_SPACE_REGEX.replace_all(input, "").into_owned();
    let changed = cleaned.len() != input.len();
    (cleaned, changed)
}

/// College name search for the calculator dropdown: case-insensitive
/// substring match, also tried with whitespace removed, one entry per
/// institution in first-seen order.
pub fn search_colleges<'a>(records: &'a [CollegeRecord], query: &str, limit: usize) -> Vec<&'a CollegeRecord> {
    let query = query.trim().to_lowercase();
    if query.chars().count() < SEARCH_MIN_CHARS {
        return Vec::new();
    }
    let compact_query = WHITESPACE_REGEX.replace_all(&query, "").into_owned();

    let mut found: IndexMap<&str, &CollegeRecord> = IndexMap::new();
    for record in records.iter().filter(|r| !r.name.is_empty()) {
        if found.contains_key(record.instcode.as_str()) {
            continue;
        }
        let name = record.name.to_lowercase();
        let compact_name = WHITESPACE_REGEX.replace_all(&name, "");
        if name.contains(&query) || compact_name.contains(&compact_query) {
            found.insert(record.instcode.as_str(), record);
            if found.len() == limit {
                break;
            }
        }
    }
    found.into_values().collect()
}

/// Split a comma-joined multi-select value.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Indian-style thousands grouping used for ranks (e.g. `1,25,000`).
pub fn format_rank(rank: u32) -> String {
    let digits = rank.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (a, b) = rest.split_at(rest.len() - 2);
        groups.push(b);
        rest = a;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// `₹4.50` style package display; `N/A` when absent.
pub fn format_package(lakhs: Option<f64>) -> String {
    match lakhs {
        Some(v) => format!("₹{:.2}", v),
        None => "N/A".to_string(),
    }
}

/// CSS class for a probability badge.
pub fn probability_class(p: f64) -> &'static str {
    if p >= 75.0 {
        "prob-high"
    } else if p >= 30.0 {
        "prob-medium"
    } else {
        "prob-low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_boundaries() {
        assert_eq!(validate_rank(""), Ok(None));
        assert_eq!(validate_rank("   "), Ok(None));
        assert_eq!(validate_rank("1"), Ok(Some(1)));
        assert_eq!(validate_rank("350000"), Ok(Some(350_000)));
        assert_eq!(validate_rank("350001"), Err(ValidationError::RankOutOfRange));
        assert_eq!(validate_rank("99999999999"), Err(ValidationError::RankOutOfRange));
        assert_eq!(validate_rank("0"), Err(ValidationError::InvalidRank));
        assert_eq!(validate_rank("-5"), Err(ValidationError::InvalidRank));
        assert_eq!(validate_rank("abc"), Err(ValidationError::InvalidRank));
    }

    #[test]
    fn rank_input_keeps_digits_only() {
        assert_eq!(sanitize_rank_input("15,000a"), "15000");
        assert_eq!(sanitize_rank_input(" 42 "), "42");
    }

    #[test]
    fn validation_notices_carry_severity() {
        let n = ValidationError::RankOutOfRange.to_notice();
        assert_eq!(n.title, "Invalid Rank");
        assert_eq!(n.message, "Please enter a rank between 1 and 350000.");
        assert_eq!(n.severity, Severity::Error);
        assert_eq!(ValidationError::NoInput.to_notice().severity, Severity::Warning);
    }

    #[test]
    fn college_query_sanitizing() {
        assert_eq!(sanitize_college_query("Andhra Univ"), ("Andhra Univ".to_string(), false));
        assert_eq!(sanitize_college_query("JNTU-K 1"), ("JNTUK ".to_string(), true));
    }

    fn college(code: &str, name: &str) -> CollegeRecord {
        CollegeRecord {
            instcode: code.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn search_dedupes_by_institution() {
        let records = vec![
            college("GVPE", "Gayatri Vidya Parishad College of Engineering"),
            college("GVPE", "Gayatri Vidya Parishad College of Engineering"),
            college("AUCE", "Andhra University College of Engineering"),
            college("XXXX", ""),
        ];
        let hits = search_colleges(&records, "college of eng", 10);
        let codes: Vec<&str> = hits.iter().map(|r| r.instcode.as_str()).collect();
        assert_eq!(codes, vec!["GVPE", "AUCE"]);
    }

    #[test]
    fn search_matches_without_spaces() {
        let records = vec![college("SRKR", "S R K R Engineering College")];
        assert_eq!(search_colleges(&records, "srkr", 10).len(), 1);
    }

    #[test]
    fn search_needs_two_chars_and_respects_limit() {
        let records: Vec<CollegeRecord> = (0..20).map(|i| college(&format!("C{i}"), "Engineering College")).collect();
        assert!(search_colleges(&records, "e", 10).is_empty());
        assert_eq!(search_colleges(&records, "engineering", 10).len(), 10);
    }

    #[test]
    fn csv_split_skips_blanks() {
        assert_eq!(split_csv("AU, SVU,,"), vec!["AU".to_string(), "SVU".to_string()]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn rank_formatting() {
        assert_eq!(format_rank(950), "950");
        assert_eq!(format_rank(15000), "15,000");
        assert_eq!(format_rank(125000), "1,25,000");
        assert_eq!(format_rank(350000), "3,50,000");
    }

    #[test]
    fn package_and_probability_display() {
        assert_eq!(format_package(Some(4.5)), "₹4.50");
        assert_eq!(format_package(None), "N/A");
        assert_eq!(probability_class(75.0), "prob-high");
        assert_eq!(probability_class(30.0), "prob-medium");
        assert_eq!(probability_class(29.9), "prob-low");
    }
}
