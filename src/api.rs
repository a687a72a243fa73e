//! Typed gateway to the remote prediction API.
//!
//! Every endpoint lives on [`API_ORIGIN`]. Requests carry a `_=<epoch ms>`
//! query parameter so intermediaries never serve a stale response; caching
//! is done explicitly by [`crate::cache`].

use crate::cache::now_ms;
use crate::compare::BranchStats;
use crate::config::API_ORIGIN;
use crate::record::{normalize_all, CollegeRecord, RawCollegeRecord};
use gloo_net::http::{Request, Response};
use indexmap::IndexMap;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Could not reach the server: {0}")]
    Network(String),
    #[error("API Error: {status} {status_text}")]
    Status { status: u16, status_text: String },
    #[error("Invalid data format received from API: {0}")]
    Decode(String),
}

/// Body of `POST /api/predict-colleges`. Unset fields are omitted; an empty
/// request returns every college.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_quality_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instcode: Option<String>,
}

impl PredictRequest {
    pub fn all_colleges() -> Self {
        Self::default()
    }

    /// Every row of one institution, as opened from a directory card.
    pub fn for_institution(instcode: &str) -> Self {
        Self {
            instcode: Some(instcode.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseCalcRequest {
    pub instcode: String,
    pub branch: String,
    /// `<quota>_<gender>`, e.g. `bca_girls`
    pub category: String,
    pub desired_probability: f64,
}

impl ReverseCalcRequest {
    pub fn new(instcode: &str, branch: &str, quota: &str, gender: &str, desired_probability: f64) -> Self {
        Self {
            instcode: instcode.to_string(),
            branch: branch.to_string(),
            category: format!("{quota}_{gender}"),
            desired_probability,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseCalculation {
    #[serde(default)]
    pub required_rank: Option<u32>,
    #[serde(default)]
    pub cutoff: Option<u32>,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub college_name: String,
    #[serde(default)]
    pub branch: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanceBand {
    VeryHigh,
    Moderate,
    Ambitious,
}

impl ChanceBand {
    pub fn from_probability(p: f64) -> Self {
        if p >= 85.0 {
            Self::VeryHigh
        } else if p >= 50.0 {
            Self::Moderate
        } else {
            Self::Ambitious
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::Moderate => "Moderate",
            Self::Ambitious => "Ambitious",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total_colleges: u32,
    #[serde(default)]
    pub colleges_by_region: IndexMap<String, u64>,
    #[serde(default)]
    pub colleges_by_tier: IndexMap<String, u64>,
    #[serde(default)]
    pub colleges_by_branch: IndexMap<String, u64>,
    #[serde(default)]
    pub avg_package_overall: f64,
    #[serde(default)]
    pub avg_package_by_branch: IndexMap<String, f64>,
}

impl AnalyticsSummary {
    pub fn branch_count(&self) -> usize {
        self.colleges_by_branch.len()
    }

    /// Branches with the most colleges, descending; ties by name.
    pub fn top_branches_by_colleges(&self, n: usize) -> Vec<(String, f64)> {
        top_n(self.colleges_by_branch.iter().map(|(k, v)| (k, *v as f64)), n)
    }

    /// Branches with the highest average package, descending; ties by name.
    pub fn top_branches_by_package(&self, n: usize) -> Vec<(String, f64)> {
        top_n(self.avg_package_by_branch.iter().map(|(k, v)| (k, *v)), n)
    }
}

fn top_n<'a>(entries: impl Iterator<Item = (&'a String, f64)>, n: usize) -> Vec<(String, f64)> {
    let mut v: Vec<(String, f64)> = entries.map(|(k, val)| (k.clone(), val)).collect();
    v.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    v.truncate(n);
    v
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchStatsResponse {
    #[serde(default)]
    pub branch: String,
    #[serde(flatten)]
    pub stats: BranchStats,
}

/// Absolute URL for an API path, with the cache-busting parameter.
pub fn endpoint(path: &str, now_ms: f64) -> String {
    format!("{}/api/{}?_={}", API_ORIGIN, path.trim_start_matches('/'), now_ms as i64)
}

pub(crate) fn encode_segment(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        return Err(ApiError::Status {
            status: response.status(),
            status_text: response.status_text(),
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    let url = endpoint(path, now_ms());
    debug!("GET {}", url);
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    decode(response).await
}

async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    let url = endpoint(path, now_ms());
    debug!("POST {}", url);
    let response = Request::post(&url)
        .json(body)
        .map_err(|e| ApiError::Decode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    decode(response).await
}

/// `POST /api/predict-colleges`
pub async fn predict_colleges(request: &PredictRequest) -> Result<Vec<CollegeRecord>, ApiError> {
    let raw: Vec<RawCollegeRecord> = post_json("predict-colleges", request).await?;
    info!("Received {} college records", raw.len());
    Ok(normalize_all(raw))
}

/// Every college/branch/category row, as used by the comparison and
/// calculator pages.
pub async fn fetch_all_colleges() -> Result<Vec<CollegeRecord>, ApiError> {
    predict_colleges(&PredictRequest::all_colleges()).await
}

/// `GET /api/colleges/{instcode}/branches`
pub async fn fetch_college_branches(instcode: &str) -> Result<Vec<String>, ApiError> {
    get_json(&format!("colleges/{}/branches", encode_segment(instcode))).await
}

/// `GET /api/analytics/summary`
pub async fn fetch_analytics_summary() -> Result<AnalyticsSummary, ApiError> {
    get_json("analytics/summary").await
}

/// `GET /api/analytics/branches`
pub async fn fetch_branch_names() -> Result<Vec<String>, ApiError> {
    get_json("analytics/branches").await
}

/// `GET /api/analytics/branch-stats/{branch}`
pub async fn fetch_branch_stats(branch: &str) -> Result<BranchStatsResponse, ApiError> {
    get_json(&format!("analytics/branch-stats/{}", encode_segment(branch))).await
}

/// `POST /api/reverse-calculator`
pub async fn reverse_calculate(request: &ReverseCalcRequest) -> Result<ReverseCalculation, ApiError> {
    post_json("reverse-calculator", request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_request_omits_unset_fields() {
        let req = PredictRequest {
            rank: Some(15000),
            placement_quality_filter: Some("Excellent,Good".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"rank": 15000, "placementQualityFilter": "Excellent,Good"}));
        assert_eq!(serde_json::to_string(&PredictRequest::all_colleges()).unwrap(), "{}");
        assert_eq!(
            serde_json::to_value(PredictRequest::for_institution("SRKR")).unwrap(),
            serde_json::json!({"instcode": "SRKR"})
        );
    }

    #[test]
    fn reverse_calc_category_joins_quota_and_gender() {
        let req = ReverseCalcRequest::new("JNTK", "Civil Engineering", "bca", "girls", 85.0);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["category"], "bca_girls");
        assert_eq!(json["desiredProbability"], 85.0);
    }

    #[test]
    fn endpoint_appends_cache_buster() {
        assert_eq!(
            endpoint("/analytics/summary", 1_700_000_000_123.9),
            "https://theeamcetcollegeprediction-2.onrender.com/api/analytics/summary?_=1700000000123"
        );
    }

    #[test]
    fn chance_bands() {
        assert_eq!(ChanceBand::from_probability(85.0), ChanceBand::VeryHigh);
        assert_eq!(ChanceBand::from_probability(84.9), ChanceBand::Moderate);
        assert_eq!(ChanceBand::from_probability(50.0), ChanceBand::Moderate);
        assert_eq!(ChanceBand::from_probability(49.0).label(), "Ambitious");
    }

    #[test]
    fn analytics_summary_tolerates_missing_maps() {
        let s: AnalyticsSummary = serde_json::from_str(r#"{"totalColleges": 312}"#).unwrap();
        assert_eq!(s.total_colleges, 312);
        assert_eq!(s.branch_count(), 0);
        assert!(s.top_branches_by_package(10).is_empty());
    }

    #[test]
    fn top_branches_sorted_descending_with_name_tiebreak() {
        let s: AnalyticsSummary = serde_json::from_str(
            r#"{"collegesByBranch": {"ECE": 180, "CSE": 240, "Civil Engineering": 180, "Mining Engineering": 4}}"#,
        )
        .unwrap();
        let top = s.top_branches_by_colleges(3);
        let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["CSE", "Civil Engineering", "ECE"]);
    }

    #[test]
    fn branch_stats_response_flattens() {
        let r: BranchStatsResponse = serde_json::from_str(
            r#"{"branch":"CSE","totalColleges":5,"avgPackage":4.2,"maxPackage":9.0,"minPackage":2.1}"#,
        )
        .unwrap();
        assert_eq!(r.branch, "CSE");
        assert_eq!(r.stats.total_colleges, 5);
    }

    #[test]
    fn reverse_calculation_decodes() {
        let r: ReverseCalculation = serde_json::from_str(
            r#"{"requiredRank": 8200, "cutoff": 9100, "probability": 85.0,
                "message": "Aim for rank 8200 or better", "collegeName": "JNTU Kakinada", "branch": "CSE"}"#,
        )
        .unwrap();
        assert_eq!(r.required_rank, Some(8200));
        assert_eq!(r.college_name, "JNTU Kakinada");
    }
}
