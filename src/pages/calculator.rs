//! Reverse rank calculator: given a college, branch, category and a desired
//! admission probability, ask the API which rank is needed.

use super::{debounce, load_cached, Fetched};
use crate::api::{self, ChanceBand, ReverseCalculation};
use crate::cache::Dataset;
use crate::components::{options_from, options_from_list, ErrorPanel, Loading, NoticeModal, Select};
use crate::config::{DESIRED_PROBABILITIES, GENDERS, QUOTAS, SEARCH_DEBOUNCE_MS, SEARCH_MAX_RESULTS};
use crate::form::CalculatorForm;
use crate::record::CollegeRecord;
use crate::utils::{format_rank, sanitize_college_query, search_colleges, Notice, ValidationError};
use gloo_timers::callback::Timeout;
use log::{debug, error, info};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

fn probability_options() -> Vec<(String, String)> {
    DESIRED_PROBABILITIES
        .iter()
        .map(|p| (p.to_string(), format!("{}% chance", p)))
        .collect()
}

/// Headline for a calculation result.
pub fn describe_result(result: &ReverseCalculation, desired_probability: f64) -> String {
    let band = ChanceBand::from_probability(result.probability.unwrap_or(desired_probability));
    match result.required_rank {
        Some(rank) => format!(
            "You need a rank of {} or better ({} chance)",
            format_rank(rank),
            band.label()
        ),
        None => "No rank estimate is available for this combination".to_string(),
    }
}

#[function_component(CalculatorPage)]
pub fn calculator_page() -> Html {
    let colleges = use_state(|| Rc::new(Vec::<CollegeRecord>::new()));
    let colleges_loading = use_state(|| false);
    let load_error = use_state(|| None::<String>);
    let load_token = use_state(|| 0u32);

    let query = use_state(String::new);
    let suggestions = use_state(Vec::<CollegeRecord>::new);
    let search_timer = use_state(|| None::<Timeout>);

    let form = use_state(CalculatorForm::default);
    let branches = use_state(Vec::<String>::new);
    let branches_loading = use_state(|| false);
    // Institution whose branch list is wanted; older responses are ignored.
    let branch_request = use_mut_ref(String::new);

    let branch_error = use_state(|| None::<String>);

    let outcome = use_state(|| Fetched::<ReverseCalculation>::Idle);
    let calculating = use_state(|| false);
    let notice = use_state(|| None::<Notice>);

    {
        let colleges = colleges.clone();
        let colleges_loading = colleges_loading.clone();
        let load_error = load_error.clone();
        use_effect_with(*load_token, move |_| {
            colleges_loading.set(true);
            spawn_local(async move {
                match load_cached(Dataset::CalculatorColleges, api::fetch_all_colleges).await {
                    Ok(list) => {
                        info!("Calculator has {} college records", list.len());
                        colleges.set(Rc::new(list));
                        load_error.set(None);
                    }
                    Err(e) => {
                        error!("Failed to load colleges: {}", e);
                        load_error.set(Some(e.to_string()));
                    }
                }
                colleges_loading.set(false);
            });
            || ()
        });
    }

    let on_query_input = {
        let colleges = colleges.clone();
        let query = query.clone();
        let suggestions = suggestions.clone();
        let search_timer = search_timer.clone();
        let notice = notice.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let (cleaned, changed) = sanitize_college_query(&input.value());
            if changed {
                input.set_value(&cleaned);
                notice.set(Some(ValidationError::InvalidCollegeQuery.to_notice()));
            }
            query.set(cleaned.clone());

            let colleges = (*colleges).clone();
            let suggestions = suggestions.clone();
            debounce(&search_timer, SEARCH_DEBOUNCE_MS, move || {
                let hits: Vec<CollegeRecord> = search_colleges(&colleges, &cleaned, SEARCH_MAX_RESULTS)
                    .into_iter()
                    .cloned()
                    .collect();
                debug!("{} colleges match '{}'", hits.len(), cleaned);
                suggestions.set(hits);
            });
        })
    };

    let on_pick_college = {
        let query = query.clone();
        let suggestions = suggestions.clone();
        let form = form.clone();
        let branches = branches.clone();
        let branches_loading = branches_loading.clone();
        let branch_request = branch_request.clone();
        let branch_error = branch_error.clone();
        let outcome = outcome.clone();
        Callback::from(move |college: CollegeRecord| {
            query.set(college.name.clone());
            suggestions.set(Vec::new());
            outcome.set(Fetched::Idle);
            branch_error.set(None);

            let instcode = college.instcode.clone();
            let mut next = (*form).clone();
            next.select_college(college);
            form.set(next);

            *branch_request.borrow_mut() = instcode.clone();
            branches.set(Vec::new());
            branches_loading.set(true);

            let branches = branches.clone();
            let branches_loading = branches_loading.clone();
            let branch_request = branch_request.clone();
            let branch_error = branch_error.clone();
            spawn_local(async move {
                let response = api::fetch_college_branches(&instcode).await;
                if *branch_request.borrow() != instcode {
                    debug!("Ignoring branch list for {}", instcode);
                    return;
                }
                match response {
                    Ok(list) => branches.set(list),
                    Err(e) => {
                        error!("Failed to load branches for {}: {}", instcode, e);
                        branch_error.set(Some(e.to_string()));
                    }
                }
                branches_loading.set(false);
            });
        })
    };

    let update_form = |apply: fn(&mut CalculatorForm, String)| {
        let form = form.clone();
        let outcome = outcome.clone();
        Callback::from(move |value: String| {
            let mut next = (*form).clone();
            apply(&mut next, value);
            form.set(next);
            outcome.set(Fetched::Idle);
        })
    };

    let on_calculate = {
        let form = form.clone();
        let outcome = outcome.clone();
        let calculating = calculating.clone();
        let notice = notice.clone();
        Callback::from(move |_: ()| {
            let request = match form.to_request() {
                Ok(request) => request,
                Err(e) => {
                    notice.set(Some(e.to_notice()));
                    return;
                }
            };
            let outcome = outcome.clone();
            let calculating = calculating.clone();
            calculating.set(true);
            outcome.set(Fetched::Idle);
            spawn_local(async move {
                let response = api::reverse_calculate(&request).await;
                if let Err(e) = &response {
                    error!("Reverse calculation failed: {}", e);
                }
                outcome.set(response.into());
                calculating.set(false);
            });
        })
    };

    let retry_load = {
        let load_token = load_token.clone();
        Callback::from(move |_: ()| load_token.set(load_token.wrapping_add(1)))
    };

    let on_dismiss = {
        let notice = notice.clone();
        Callback::from(move |_: ()| notice.set(None))
    };

    let branch_placeholder = if form.college.is_none() {
        "Select a college first"
    } else if *branches_loading {
        "Loading branches..."
    } else {
        "Select branch"
    };

    html! {
        <div class="container">
            <h1>{ "Reverse Rank Calculator" }</h1>

            if let Some(err) = &*load_error {
                <ErrorPanel message={err.clone()} on_retry={retry_load} />
            }

            if *colleges_loading {
                <Loading message="Loading colleges..." />
            }

            <form class="calculator-form" onsubmit={on_calculate.reform(|e: SubmitEvent| { e.prevent_default(); })}>
                <div class="form-group search">
                    <label for="college-search">{ "College" }</label>
                    <input
                        type="text"
                        id="college-search"
                        autocomplete="off"
                        placeholder="Type at least 2 letters"
                        value={(*query).clone()}
                        oninput={on_query_input}
                        disabled={*colleges_loading}
                    />
                    if !suggestions.is_empty() {
                        <ul class="suggestions">
                            { suggestions.iter().map(|college| {
                                let pick = {
                                    let college = college.clone();
                                    on_pick_college.reform(move |_: MouseEvent| college.clone())
                                };
                                html! {
                                    <li onclick={pick}>
                                        { format!("{} ({})", college.name, college.instcode) }
                                    </li>
                                }
                            }).collect::<Html>() }
                        </ul>
                    }
                </div>

                <Select id="branch" label="Branch"
                    options={options_from_list(branches.as_slice())}
                    value={form.branch.clone()}
                    placeholder={AttrValue::Static(branch_placeholder)}
                    disabled={form.college.is_none() || *branches_loading}
                    onchange={update_form(|f, v| f.branch = v)} />
                if let Some(err) = &*branch_error {
                    <p class="current-error">{ err.clone() }</p>
                }
                <Select id="quota" label="Category"
                    options={options_from(QUOTAS)}
                    value={form.quota.clone()}
                    placeholder={AttrValue::Static("Select category")}
                    onchange={update_form(|f, v| f.quota = v)} />
                <Select id="gender" label="Gender"
                    options={options_from(GENDERS)}
                    value={form.gender.clone()}
                    placeholder={AttrValue::Static("Select gender")}
                    onchange={update_form(|f, v| f.gender = v)} />
                <Select id="probability" label="Desired admission chance"
                    options={probability_options()}
                    value={form.desired_probability.to_string()}
                    onchange={update_form(|f, v| {
                        if let Ok(p) = v.parse() {
                            f.desired_probability = p;
                        }
                    })} />

                <button type="submit" class="btn-primary" disabled={*calculating}>
                    { "Calculate Required Rank" }
                </button>
            </form>

            if *calculating {
                <Loading message="Calculating..." />
            }

            if let Some(err) = outcome.error() {
                <ErrorPanel message={err.to_string()} on_retry={on_calculate.clone()} />
            }

            if let Some(r) = outcome.ready() {
                <div class="calculator-result">
                    <h3>{ describe_result(r, form.desired_probability) }</h3>
                    <p>{ format!("{} · {}", r.college_name, r.branch) }</p>
                    if let Some(cutoff) = r.cutoff {
                        <p>{ format!("Last cutoff: {}", format_rank(cutoff)) }</p>
                    }
                    if !r.message.is_empty() {
                        <p class="result-message">{ r.message.clone() }</p>
                    }
                </div>
            }

            if let Some(n) = &*notice {
                <NoticeModal notice={n.clone()} on_close={on_dismiss} />
            }
        </div>
    }
}
