//! Static region → district table and the dependent district filter.

use indexmap::IndexSet;
use log::debug;

pub const REGION_DISTRICTS: &[(&str, &[&str])] = &[
    (
        "AU",
        &[
            "Visakhapatnam",
            "Vizianagaram",
            "Srikakulam",
            "East Godavari",
            "West Godavari",
            "Eluru",
            "Bapatla",
        ],
    ),
    (
        "SVU",
        &["Chittoor", "Kadapa", "Nellore", "Annamayya", "Tirupati", "YSR Kadapa"],
    ),
    (
        "SW",
        &[
            "Anantapur", "Kurnool", "Guntur", "Krishna", "Prakasam", "Nandyal", "NTR", "Palnadu",
        ],
    ),
];

/// Every district offered by the form, in display order.
pub const ALL_DISTRICTS: &[&str] = &[
    "Anantapur",
    "Annamayya",
    "Bapatla",
    "Chittoor",
    "East Godavari",
    "Eluru",
    "Guntur",
    "Kadapa",
    "Krishna",
    "Kurnool",
    "Nandyal",
    "Nellore",
    "NTR",
    "Palnadu",
    "Prakasam",
    "Srikakulam",
    "Tirupati",
    "Visakhapatnam",
    "Vizianagaram",
    "West Godavari",
    "YSR Kadapa",
];

pub fn districts_for_region(region: &str) -> Option<&'static [&'static str]> {
    REGION_DISTRICTS
        .iter()
        .find(|(code, _)| *code == region)
        .map(|(_, districts)| *districts)
}

/// Union of the selected regions' districts. No selection means every
/// district is allowed; unknown region codes contribute nothing.
pub fn allowed_districts<S: AsRef<str>>(selected_regions: &[S]) -> IndexSet<&'static str> {
    if selected_regions.is_empty() {
        return ALL_DISTRICTS.iter().copied().collect();
    }
    selected_regions
        .iter()
        .filter_map(|r| districts_for_region(r.as_ref()))
        .flat_map(|districts| districts.iter().copied())
        .collect()
}

/// Drop selected districts that are no longer allowed. Returns the kept
/// selection (order preserved) and the values that were cleared.
pub fn prune_districts(
    selected: &[String],
    allowed: &IndexSet<&'static str>,
) -> (Vec<String>, Vec<String>) {
    let (kept, removed): (Vec<String>, Vec<String>) = selected
        .iter()
        .cloned()
        .partition(|d| allowed.contains(d.as_str()));
    if !removed.is_empty() {
        debug!("Cleared districts outside selected regions: {:?}", removed);
    }
    (kept, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn au_region_allows_exactly_its_seven_districts() {
        let allowed = allowed_districts(&["AU"]);
        assert_eq!(allowed.len(), 7);
        let expected = [
            "Visakhapatnam",
            "Vizianagaram",
            "Srikakulam",
            "East Godavari",
            "West Godavari",
            "Eluru",
            "Bapatla",
        ];
        assert!(expected.iter().all(|d| allowed.contains(d)));
    }

    #[test]
    fn district_outside_region_is_cleared() {
        let allowed = allowed_districts(&["AU"]);
        let selected = vec!["Guntur".to_string(), "Eluru".to_string()];
        let (kept, removed) = prune_districts(&selected, &allowed);
        assert_eq!(kept, vec!["Eluru".to_string()]);
        assert_eq!(removed, vec!["Guntur".to_string()]);
    }

    #[test]
    fn no_region_selected_allows_every_district() {
        let none: [&str; 0] = [];
        let allowed = allowed_districts(&none);
        assert_eq!(allowed.len(), ALL_DISTRICTS.len());
    }

    #[test]
    fn union_of_regions() {
        let allowed = allowed_districts(&["SVU", "SW"]);
        assert_eq!(allowed.len(), 14);
        assert!(allowed.contains("Tirupati"));
        assert!(allowed.contains("NTR"));
        assert!(!allowed.contains("Eluru"));
    }

    #[test]
    fn unknown_region_contributes_nothing() {
        let allowed = allowed_districts(&["XYZ"]);
        assert!(allowed.is_empty());
    }

    #[test]
    fn every_region_district_is_a_known_option() {
        for (_, districts) in REGION_DISTRICTS {
            for d in *districts {
                assert!(ALL_DISTRICTS.contains(d), "{d} missing from option list");
            }
        }
    }
}
