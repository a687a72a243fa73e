//! Predictor form values and their translation into an API request.

use crate::api::{PredictRequest, ReverseCalcRequest};
use crate::config::DESIRED_PROBABILITIES;
use crate::record::CollegeRecord;
use crate::regions::{allowed_districts, prune_districts};
use crate::utils::{validate_rank, ValidationError};

/// Current values of the predictor form. Multi-selects hold the selected
/// option values in selection order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PredictForm {
    pub rank_text: String,
    pub branches: Vec<String>,
    pub quotas: Vec<String>,
    pub genders: Vec<String>,
    pub regions: Vec<String>,
    pub districts: Vec<String>,
    pub tiers: Vec<String>,
    pub qualities: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Branch,
    Quota,
    Gender,
    Region,
    District,
    Tier,
    Quality,
}

fn joined(values: &[String]) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(","))
    }
}

impl PredictForm {
    pub fn values(&self, field: FormField) -> &[String] {
        match field {
            FormField::Branch => &self.branches,
            FormField::Quota => &self.quotas,
            FormField::Gender => &self.genders,
            FormField::Region => &self.regions,
            FormField::District => &self.districts,
            FormField::Tier => &self.tiers,
            FormField::Quality => &self.qualities,
        }
    }

    /// Replace one multi-select. Changing regions also clears districts that
    /// fall outside the newly allowed set.
    pub fn set_values(&mut self, field: FormField, values: Vec<String>) {
        match field {
            FormField::Branch => self.branches = values,
            FormField::Quota => self.quotas = values,
            FormField::Gender => self.genders = values,
            FormField::Region => {
                self.regions = values;
                let allowed = allowed_districts(&self.regions);
                let (kept, _) = prune_districts(&self.districts, &allowed);
                self.districts = kept;
            }
            FormField::District => self.districts = values,
            FormField::Tier => self.tiers = values,
            FormField::Quality => self.qualities = values,
        }
    }

    pub fn has_filters(&self) -> bool {
        [
            &self.branches,
            &self.quotas,
            &self.genders,
            &self.regions,
            &self.districts,
            &self.tiers,
            &self.qualities,
        ]
        .iter()
        .any(|v| !v.is_empty())
    }

    /// Validate and build the request. Quota and gender are single-valued
    /// on the server, so only the first selection is sent.
    pub fn to_request(&self) -> Result<PredictRequest, ValidationError> {
        let rank = validate_rank(&self.rank_text)?;
        if rank.is_none() && !self.has_filters() {
            return Err(ValidationError::NoInput);
        }
        Ok(PredictRequest {
            rank,
            branch: joined(&self.branches),
            category: self.quotas.first().cloned(),
            gender: self.genders.first().cloned(),
            district: joined(&self.districts),
            region: joined(&self.regions),
            tier: joined(&self.tiers),
            placement_quality_filter: joined(&self.qualities),
            instcode: None,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Reverse calculator inputs. The college is chosen from the search
/// dropdown, the branch from that college's branch list.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorForm {
    pub college: Option<CollegeRecord>,
    pub branch: String,
    pub quota: String,
    pub gender: String,
    pub desired_probability: f64,
}

impl Default for CalculatorForm {
    fn default() -> Self {
        Self {
            college: None,
            branch: String::new(),
            quota: String::new(),
            gender: String::new(),
            desired_probability: DESIRED_PROBABILITIES[1],
        }
    }
}

impl CalculatorForm {
    /// Picking another college invalidates the branch.
    pub fn select_college(&mut self, college: CollegeRecord) {
        if self.college.as_ref().map(|c| &c.instcode) != Some(&college.instcode) {
            self.branch.clear();
        }
        self.college = Some(college);
    }

    pub fn to_request(&self) -> Result<ReverseCalcRequest, ValidationError> {
        let college = self.college.as_ref().ok_or(ValidationError::NoCollegeSelected)?;
        if self.branch.is_empty() || self.quota.is_empty() || self.gender.is_empty() {
            return Err(ValidationError::InvalidSelection);
        }
        if !DESIRED_PROBABILITIES.contains(&self.desired_probability) {
            return Err(ValidationError::InvalidSelection);
        }
        Ok(ReverseCalcRequest::new(
            &college.instcode,
            &self.branch,
            &self.quota,
            &self.gender,
            self.desired_probability,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_form_needs_input() {
        assert_eq!(PredictForm::default().to_request(), Err(ValidationError::NoInput));
    }

    #[test]
    fn filters_without_rank_are_enough() {
        let form = PredictForm {
            tiers: strings(&["Tier 1"]),
            ..Default::default()
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.rank, None);
        assert_eq!(req.tier.as_deref(), Some("Tier 1"));
    }

    #[test]
    fn invalid_rank_wins_over_filters() {
        let form = PredictForm {
            rank_text: "0".into(),
            tiers: strings(&["Tier 1"]),
            ..Default::default()
        };
        assert_eq!(form.to_request(), Err(ValidationError::InvalidRank));
    }

    #[test]
    fn request_joins_multiselects_and_takes_first_quota() {
        let form = PredictForm {
            rank_text: "15000".into(),
            branches: strings(&["Civil Engineering", "Information Technology"]),
            quotas: strings(&["bca", "sc"]),
            genders: strings(&["girls"]),
            qualities: strings(&["Excellent", "Good"]),
            ..Default::default()
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.rank, Some(15000));
        assert_eq!(req.branch.as_deref(), Some("Civil Engineering,Information Technology"));
        assert_eq!(req.category.as_deref(), Some("bca"));
        assert_eq!(req.gender.as_deref(), Some("girls"));
        assert_eq!(req.placement_quality_filter.as_deref(), Some("Excellent,Good"));
        assert_eq!(req.district, None);
    }

    #[test]
    fn selecting_region_prunes_districts() {
        let mut form = PredictForm {
            districts: strings(&["Guntur", "Visakhapatnam"]),
            ..Default::default()
        };
        form.set_values(FormField::Region, strings(&["AU"]));
        assert_eq!(form.districts, strings(&["Visakhapatnam"]));
        form.set_values(FormField::Region, Vec::new());
        assert_eq!(form.districts, strings(&["Visakhapatnam"]));
    }

    fn college(code: &str) -> CollegeRecord {
        CollegeRecord {
            instcode: code.into(),
            name: format!("{code} Engineering College"),
            ..Default::default()
        }
    }

    #[test]
    fn calculator_requires_a_college() {
        let form = CalculatorForm::default();
        assert_eq!(form.to_request(), Err(ValidationError::NoCollegeSelected));
    }

    #[test]
    fn calculator_requires_every_selection() {
        let mut form = CalculatorForm::default();
        form.select_college(college("JNTK"));
        form.quota = "bca".into();
        form.gender = "girls".into();
        assert_eq!(form.to_request(), Err(ValidationError::InvalidSelection));

        form.branch = "CSE".into();
        let req = form.to_request().unwrap();
        assert_eq!(req.instcode, "JNTK");
        assert_eq!(req.category, "bca_girls");
        assert_eq!(req.desired_probability, 85.0);
    }

    #[test]
    fn calculator_rejects_unlisted_probability() {
        let mut form = CalculatorForm {
            college: Some(college("AUCE")),
            branch: "CSE".into(),
            quota: "oc".into(),
            gender: "boys".into(),
            desired_probability: 42.0,
        };
        assert!(form.to_request().is_err());
        form.desired_probability = 70.0;
        assert!(form.to_request().is_ok());
        form.desired_probability = 42.0;
        assert_eq!(form.to_request(), Err(ValidationError::InvalidSelection));
    }

    #[test]
    fn switching_college_clears_branch() {
        let mut form = CalculatorForm::default();
        form.select_college(college("A"));
        form.branch = "CSE".into();
        form.select_college(college("A"));
        assert_eq!(form.branch, "CSE");
        form.select_college(college("B"));
        assert!(form.branch.is_empty());
    }
}
