//! College directory: one entry per institution, filtered by region, tier
//! and a name/place term. Also holds the links a college card points to.

use crate::api::encode_segment;
use crate::config::SEARCH_MIN_CHARS;
use crate::record::CollegeRecord;
use indexmap::IndexMap;
use log::debug;

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";
const DETAILS_VIEW: &str = "details";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryFilter {
    /// Region code; empty matches any.
    pub region: String,
    /// Empty matches any.
    pub tier: String,
    /// Case-insensitive substring of the name or place.
    pub term: String,
}

impl DirectoryFilter {
    fn matches(&self, record: &CollegeRecord, term: &str) -> bool {
        (self.region.is_empty() || record.region.as_deref() == Some(self.region.as_str()))
            && (self.tier.is_empty() || record.tier.as_deref() == Some(self.tier.as_str()))
            && (term.is_empty() || matches_term(record, term))
    }

    /// One record per institution, alphabetical by name.
    pub fn apply<'a>(&self, records: &'a [CollegeRecord]) -> Vec<&'a CollegeRecord> {
        let term = self.term.trim().to_lowercase();
        let colleges = unique_by_name(records.iter().filter(|r| self.matches(r, &term)));
        debug!("{:?} kept {} colleges", self, colleges.len());
        colleges
    }
}

fn matches_term(record: &CollegeRecord, term: &str) -> bool {
    record.name.to_lowercase().contains(term)
        || record
            .place
            .as_deref()
            .is_some_and(|place| place.to_lowercase().contains(term))
}

/// First record seen for each instcode, sorted by lowercased name.
fn unique_by_name<'a>(records: impl Iterator<Item = &'a CollegeRecord>) -> Vec<&'a CollegeRecord> {
    let mut unique: IndexMap<&str, &CollegeRecord> = IndexMap::new();
    for record in records {
        unique.entry(record.instcode.as_str()).or_insert(record);
    }
    let mut colleges: Vec<&CollegeRecord> = unique.into_values().collect();
    colleges.sort_by_cached_key(|r| r.name.to_lowercase());
    colleges
}

/// Dropdown suggestions for the directory search box.
pub fn suggest<'a>(records: &'a [CollegeRecord], query: &str, limit: usize) -> Vec<&'a CollegeRecord> {
    let term = query.trim().to_lowercase();
    if term.chars().count() < SEARCH_MIN_CHARS {
        return Vec::new();
    }
    let mut hits = unique_by_name(records.iter().filter(|r| matches_term(r, &term)));
    hits.truncate(limit);
    hits
}

/// `"<name>, <district>"` (place when the district is missing).
pub fn location_query(record: &CollegeRecord) -> String {
    let area = record
        .district
        .as_deref()
        .or(record.place.as_deref())
        .unwrap_or("");
    format!("{}, {}", record.name, area)
}

pub fn maps_url(record: &CollegeRecord) -> String {
    format!("{}{}", MAPS_SEARCH_URL, encode_segment(&location_query(record)))
}

/// Predictor link that opens every row of one institution.
pub fn details_href(instcode: &str) -> String {
    format!("index.html?instcode={}&view={}", encode_segment(instcode), DETAILS_VIEW)
}

/// Institution requested by a `?instcode=X&view=details` query string.
/// The first occurrence of each parameter wins.
pub fn details_instcode(search: &str) -> Option<String> {
    let mut instcode = None;
    let mut view = None;
    for pair in search.trim_start_matches('?').split('&') {
        match pair.split_once('=') {
            Some(("instcode", value)) => {
                instcode.get_or_insert(value);
            }
            Some(("view", value)) => {
                view.get_or_insert(value);
            }
            _ => {}
        }
    }
    match (instcode, view) {
        (Some(code), Some(DETAILS_VIEW)) if !code.is_empty() => Some(code.to_string()),
        _ => None,
    }
}

/// The server may answer an instcode query with neighbouring rows; keep
/// the requested institution only.
pub fn retain_institution(mut records: Vec<CollegeRecord>, instcode: &str) -> Vec<CollegeRecord> {
    records.retain(|r| r.instcode == instcode);
    records
}
