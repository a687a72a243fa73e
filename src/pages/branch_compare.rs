//! Branch comparison dashboard: pick branches, see per-branch placement
//! statistics computed from the full college list.

use super::load_cached;
use crate::api;
use crate::cache::{Dataset, TtlCache};
use crate::chart::{render_bar_chart, Series};
use crate::compare::{compare_branches, distinct_branches, BranchStats};
use crate::components::{toggle_value, BranchStatsTable, ErrorPanel, Loading, NoticeModal, SummaryCard};
use crate::config::MIN_TO_COMPARE;
use crate::utils::{Notice, ValidationError};
use indexmap::IndexMap;
use log::{debug, error, info};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

const AVG_CHART_ID: &str = "branchAvgPackageChart";
const COUNT_CHART_ID: &str = "branchCollegeCountChart";
const NO_DATA_MESSAGE: &str = "No data available for the selected branches. Try reloading the data.";

/// Average package per branch, branches without data left out.
pub fn average_package_series(stats: &IndexMap<String, BranchStats>) -> Series {
    Series::from_pairs(
        stats
            .iter()
            .filter(|(_, s)| s.has_data())
            .map(|(branch, s)| (branch.clone(), s.avg_package)),
    )
}

pub fn college_count_series(stats: &IndexMap<String, BranchStats>) -> Series {
    Series::from_pairs(stats.iter().map(|(branch, s)| (branch.clone(), s.total_colleges as f64)))
}

/// Branch with the highest average package, if any branch has data.
pub fn best_branch(stats: &IndexMap<String, BranchStats>) -> Option<(&str, f64)> {
    stats
        .iter()
        .filter(|(_, s)| s.has_data())
        .map(|(b, s)| (b.as_str(), s.avg_package))
        .fold(None, |best, (b, avg)| match best {
            Some((_, top)) if top >= avg => best,
            _ => Some((b, avg)),
        })
}

#[function_component(BranchComparePage)]
pub fn branch_compare_page() -> Html {
    let branch_names = use_state(Vec::<String>::new);
    let selected = use_state(Vec::<String>::new);
    let stats = use_state(|| None::<Rc<IndexMap<String, BranchStats>>>);
    let is_loading_branches = use_state(|| false);
    let is_comparing = use_state(|| false);
    let branch_error = use_state(|| None::<String>);
    let compare_error = use_state(|| None::<String>);
    let notice = use_state(|| None::<Notice>);
    // Bumped to force a reload of the branch list
    let reload_token = use_state(|| 0u32);

    {
        let branch_names = branch_names.clone();
        let is_loading_branches = is_loading_branches.clone();
        let branch_error = branch_error.clone();
        use_effect_with(*reload_token, move |_| {
            is_loading_branches.set(true);
            spawn_local(async move {
                match load_cached(Dataset::BranchList, api::fetch_branch_names).await {
                    Ok(mut names) => {
                        names.sort();
                        names.dedup();
                        info!("Loaded {} branches", names.len());
                        branch_names.set(names);
                        branch_error.set(None);
                    }
                    Err(e) => {
                        error!("Failed to load branches: {}", e);
                        branch_error.set(Some(e.to_string()));
                    }
                }
                is_loading_branches.set(false);
            });
            || ()
        });
    }

    // Charts need the canvases in the DOM, so draw after render.
    {
        use_effect_with((*stats).clone(), move |stats| {
            if let Some(stats) = stats {
                render_bar_chart(AVG_CHART_ID, &average_package_series(stats), "Average Package (LPA)");
                render_bar_chart(COUNT_CHART_ID, &college_count_series(stats), "Colleges");
            }
            || ()
        });
    }

    let on_toggle_branch = |branch: String| {
        let selected = selected.clone();
        Callback::from(move |_: Event| {
            let next = toggle_value(&selected, &branch);
            selected.set(next);
        })
    };

    let run_compare = {
        let selected = selected.clone();
        let stats = stats.clone();
        let is_comparing = is_comparing.clone();
        let compare_error = compare_error.clone();
        let notice = notice.clone();
        Callback::from(move |_: ()| {
            if selected.len() < MIN_TO_COMPARE {
                notice.set(Some(ValidationError::TooFewToCompare(MIN_TO_COMPARE).to_notice()));
                return;
            }
            let branches = (*selected).clone();
            let stats = stats.clone();
            let is_comparing = is_comparing.clone();
            let compare_error = compare_error.clone();
            is_comparing.set(true);
            spawn_local(async move {
                match load_cached(Dataset::ComparisonColleges, api::fetch_all_colleges).await {
                    Ok(records) => {
                        let result = compare_branches(&branches, &records);
                        if result.values().any(BranchStats::has_data) {
                            compare_error.set(None);
                        } else {
                            debug!("Branches present in data: {:?}", distinct_branches(&records));
                            compare_error.set(Some(NO_DATA_MESSAGE.to_string()));
                        }
                        stats.set(Some(Rc::new(result)));
                    }
                    Err(e) => {
                        error!("Failed to load colleges for comparison: {}", e);
                        compare_error.set(Some(e.to_string()));
                    }
                }
                is_comparing.set(false);
            });
        })
    };

    let on_reload = {
        let reload_token = reload_token.clone();
        let stats = stats.clone();
        Callback::from(move |_: MouseEvent| {
            let cache = TtlCache::local();
            cache.invalidate_dataset(Dataset::BranchList);
            cache.invalidate_dataset(Dataset::ComparisonColleges);
            stats.set(None);
            reload_token.set(reload_token.wrapping_add(1));
        })
    };

    let on_clear = {
        let selected = selected.clone();
        let stats = stats.clone();
        Callback::from(move |_: MouseEvent| {
            selected.set(Vec::new());
            stats.set(None);
        })
    };

    let on_dismiss = {
        let notice = notice.clone();
        Callback::from(move |_: ()| notice.set(None))
    };

    let retry_branches = {
        let reload_token = reload_token.clone();
        Callback::from(move |_: ()| reload_token.set(reload_token.wrapping_add(1)))
    };

    html! {
        <div class="container">
            <h1>{ "Branch Comparison" }</h1>

            <div class="controls">
                <button class="btn-secondary small" onclick={on_reload}>{ "Reload data" }</button>
            </div>

            if let Some(err) = &*branch_error {
                <ErrorPanel message={err.clone()} on_retry={retry_branches} />
            }

            if *is_loading_branches {
                <Loading message="Loading branches..." />
            } else {
                <div class="branch-list">
                    { branch_names.iter().map(|branch| {
                        let checked = selected.contains(branch);
                        html! {
                            <label class="checkbox-option">
                                <input type="checkbox" {checked} onchange={on_toggle_branch(branch.clone())} />
                                { branch.clone() }
                            </label>
                        }
                    }).collect::<Html>() }
                </div>
            }

            <div class="form-row">
                <button class="btn-primary"
                    disabled={selected.len() < MIN_TO_COMPARE || *is_comparing}
                    onclick={run_compare.reform(|_: MouseEvent| ())}>
                    { format!("Compare {} Branches", selected.len()) }
                </button>
                <button class="btn-secondary" onclick={on_clear}>{ "Clear" }</button>
            </div>

            if *is_comparing {
                <Loading message="Crunching placement numbers..." />
            }

            if let Some(err) = &*compare_error {
                <ErrorPanel message={err.clone()} on_retry={run_compare.clone()} />
            }

            if let Some(stats) = &*stats {
                <div class="summary-cards">
                    <SummaryCard title="Branches compared" value={stats.len().to_string()} />
                    <SummaryCard title="Colleges covered"
                        value={stats.values().map(|s| s.total_colleges).sum::<usize>().to_string()} />
                    if let Some((branch, avg)) = best_branch(stats) {
                        <SummaryCard title="Best average package" value={format!("{} ({:.2} LPA)", branch, avg)} />
                    }
                </div>
                <BranchStatsTable stats={stats.clone()} />
                <div class="charts">
                    <div class="chart-box"><canvas id={AVG_CHART_ID}></canvas></div>
                    <div class="chart-box"><canvas id={COUNT_CHART_ID}></canvas></div>
                </div>
            }

            if let Some(n) = &*notice {
                <NoticeModal notice={n.clone()} on_close={on_dismiss} />
            }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CollegeRecord;

    fn rec(code: &str, branch: &str, avg: Option<f64>) -> CollegeRecord {
        CollegeRecord {
            instcode: code.into(),
            branch: branch.into(),
            average_package: avg,
            ..Default::default()
        }
    }

    #[test]
    fn series_skip_branches_without_data() {
        let records = vec![rec("A", "CSE", Some(8.0)), rec("B", "ECE", Some(4.0))];
        let stats = compare_branches(&["CSE", "ECE", "Mining Engineering"], &records);
        let avg = average_package_series(&stats);
        assert_eq!(avg.labels, vec!["CSE", "ECE"]);
        let counts = college_count_series(&stats);
        assert_eq!(counts.values, vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn best_branch_prefers_first_on_tie() {
        let records = vec![
            rec("A", "CSE", Some(6.0)),
            rec("B", "ECE", Some(6.0)),
            rec("C", "Civil Engineering", Some(3.0)),
        ];
        let stats = compare_branches(&["CSE", "ECE", "Civil Engineering"], &records);
        assert_eq!(best_branch(&stats), Some(("CSE", 6.0)));
        assert_eq!(best_branch(&compare_branches(&["X"], &records)), None);
    }
}
