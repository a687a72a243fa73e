//! Analytics dashboard over the server-side summary.

use super::{load_cached, Fetched};
use crate::api::{self, AnalyticsSummary, BranchStatsResponse};
use crate::cache::{Dataset, TtlCache};
use crate::chart::{render_bar_chart, render_pie_chart, Series};
use crate::components::{options_from_list, render_ranking, ErrorPanel, Loading, Select, SummaryCard};
use crate::config::TOP_N_CHART;
use log::{debug, error};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const REGION_CHART_ID: &str = "regionChart";
const TIER_CHART_ID: &str = "tierChart";
const PACKAGE_CHART_ID: &str = "branchPackageChart";

fn count_series<'a>(counts: impl Iterator<Item = (&'a String, &'a u64)>) -> Series {
    Series::from_pairs(counts.map(|(k, v)| (k.clone(), *v as f64)))
}

/// Formatted rows for the two top-N tables.
pub fn ranking_rows(summary: &AnalyticsSummary, n: usize) -> (Vec<(String, String)>, Vec<(String, String)>) {
    let by_colleges = summary
        .top_branches_by_colleges(n)
        .into_iter()
        .map(|(b, v)| (b, format!("{}", v as u64)))
        .collect();
    let by_package = summary
        .top_branches_by_package(n)
        .into_iter()
        .map(|(b, v)| (b, format!("{:.2} LPA", v)))
        .collect();
    (by_colleges, by_package)
}

#[function_component(AnalyticsPage)]
pub fn analytics_page() -> Html {
    let summary = use_state(|| None::<Rc<AnalyticsSummary>>);
    let is_loading = use_state(|| false);
    let error_message = use_state(|| None::<String>);
    let reload_token = use_state(|| 0u32);
    let detail_branch = use_state(String::new);
    let detail = use_state(|| Fetched::<BranchStatsResponse>::Idle);
    // Latest branch asked for; older responses are dropped.
    let detail_request = use_mut_ref(String::new);

    {
        let summary = summary.clone();
        let is_loading = is_loading.clone();
        let error_message = error_message.clone();
        use_effect_with(*reload_token, move |_| {
            is_loading.set(true);
            spawn_local(async move {
                match load_cached(Dataset::AnalyticsSummary, api::fetch_analytics_summary).await {
                    Ok(s) => {
                        summary.set(Some(Rc::new(s)));
                        error_message.set(None);
                    }
                    Err(e) => {
                        error!("Failed to load analytics: {}", e);
                        error_message.set(Some(e.to_string()));
                    }
                }
                is_loading.set(false);
            });
            || ()
        });
    }

    use_effect_with((*summary).clone(), move |summary| {
        if let Some(s) = summary {
            render_pie_chart(REGION_CHART_ID, &count_series(s.colleges_by_region.iter()));
            render_bar_chart(TIER_CHART_ID, &count_series(s.colleges_by_tier.iter()), "Colleges");
            render_bar_chart(
                PACKAGE_CHART_ID,
                &Series::from_pairs(s.top_branches_by_package(TOP_N_CHART)),
                "Average Package (LPA)",
            );
        }
        || ()
    });

    let on_refresh = {
        let reload_token = reload_token.clone();
        Callback::from(move |_: MouseEvent| {
            TtlCache::local().invalidate_dataset(Dataset::AnalyticsSummary);
            reload_token.set(reload_token.wrapping_add(1));
        })
    };

    // Per-branch drill-down straight from the server.
    let on_detail_branch = {
        let detail_branch = detail_branch.clone();
        let detail = detail.clone();
        let detail_request = detail_request.clone();
        Callback::from(move |branch: String| {
            detail_branch.set(branch.clone());
            detail.set(Fetched::Idle);
            *detail_request.borrow_mut() = branch.clone();
            if branch.is_empty() {
                return;
            }
            let detail_request = detail_request.clone();
            let detail = detail.clone();
            spawn_local(async move {
                let response = api::fetch_branch_stats(&branch).await;
                if *detail_request.borrow() != branch {
                    debug!("Ignoring stale stats for {}", branch);
                    return;
                }
                if let Err(e) = &response {
                    error!("Failed to load stats for {}: {}", branch, e);
                }
                detail.set(response.into());
            });
        })
    };

    let retry = {
        let reload_token = reload_token.clone();
        Callback::from(move |_: ()| reload_token.set(reload_token.wrapping_add(1)))
    };

    html! {
        <div class="container">
            <h1>{ "EAMCET Analytics" }</h1>
            <div class="controls">
                <button class="btn-secondary small" onclick={on_refresh} disabled={*is_loading}>
                    { "Refresh" }
                </button>
            </div>

            if let Some(err) = &*error_message {
                <ErrorPanel message={err.clone()} on_retry={retry} />
            }

            if *is_loading {
                <Loading message="Loading analytics..." />
            }

            if let Some(s) = &*summary {
                <div class="summary-cards">
                    <SummaryCard title="Total Colleges" value={s.total_colleges.to_string()} />
                    <SummaryCard title="Average Package" value={format!("{:.2} LPA", s.avg_package_overall)} />
                    <SummaryCard title="Branches" value={s.branch_count().to_string()} />
                    <SummaryCard title="Regions" value={s.colleges_by_region.len().to_string()} />
                </div>
                {{
                    let (by_colleges, by_package) = ranking_rows(s, TOP_N_CHART);
                    html! {
                        <div class="rankings">
                            { render_ranking("Top Branches by Colleges", "Colleges", &by_colleges) }
                            { render_ranking("Top Branches by Average Package", "Average Package", &by_package) }
                        </div>
                    }
                }}
                <div class="branch-detail">
                    <Select id="detail-branch" label="Branch details"
                        options={options_from_list(&s.colleges_by_branch.keys().cloned().collect::<Vec<_>>())}
                        value={(*detail_branch).clone()}
                        placeholder={AttrValue::Static("Select a branch")}
                        onchange={on_detail_branch} />
                    if let Some(err) = detail.error() {
                        <p class="current-error">{ err.to_string() }</p>
                    }
                    if let Some(d) = detail.ready() {
                        <div class="summary-cards">
                            <SummaryCard title="Colleges" value={d.stats.total_colleges.to_string()} />
                            <SummaryCard title="Average Package" value={format!("{:.2} LPA", d.stats.avg_package)} />
                            <SummaryCard title="Highest Package" value={format!("{:.2} LPA", d.stats.max_package)} />
                            <SummaryCard title="Lowest Package" value={format!("{:.2} LPA", d.stats.min_package)} />
                        </div>
                    }
                </div>
                <div class="charts">
                    <div class="chart-box"><canvas id={REGION_CHART_ID}></canvas></div>
                    <div class="chart-box"><canvas id={TIER_CHART_ID}></canvas></div>
                    <div class="chart-box"><canvas id={PACKAGE_CHART_ID}></canvas></div>
                </div>
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranking_rows_are_formatted() {
        let summary: AnalyticsSummary = serde_json::from_str(
            r#"{"collegesByBranch": {"CSE": 240, "ECE": 180},
                "avgPackageByBranch": {"CSE": 6.5, "ECE": 4.1}}"#,
        )
        .unwrap();
        let (by_colleges, by_package) = ranking_rows(&summary, 1);
        assert_eq!(by_colleges, vec![("CSE".to_string(), "240".to_string())]);
        assert_eq!(by_package, vec![("CSE".to_string(), "6.50 LPA".to_string())]);
    }

    #[test]
    fn count_series_preserves_server_order() {
        let summary: AnalyticsSummary =
            serde_json::from_str(r#"{"collegesByRegion": {"SW": 120, "AU": 110, "SVU": 82}}"#).unwrap();
        let s = count_series(summary.colleges_by_region.iter());
        assert_eq!(s.labels, vec!["SW", "AU", "SVU"]);
        assert_eq!(s.values, vec![120.0, 110.0, 82.0]);
    }
}
