//! College directory: browse institutions by region, tier or name, then
//! open one in the predictor.

use super::{debounce, load_cached};
use crate::api;
use crate::cache::{Dataset, TtlCache};
use crate::components::{options_from, options_from_list, DirectoryCard, ErrorPanel, Loading, Select};
use crate::config::{REGIONS, SEARCH_DEBOUNCE_MS, SEARCH_MAX_RESULTS, TIERS};
use crate::directory::{suggest, DirectoryFilter};
use crate::record::CollegeRecord;
use gloo_timers::callback::Timeout;
use log::{debug, error, info};
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(DirectoryPage)]
pub fn directory_page() -> Html {
    let colleges = use_state(|| Rc::new(Vec::<CollegeRecord>::new()));
    let is_loading = use_state(|| false);
    let load_error = use_state(|| None::<String>);
    let reload_token = use_state(|| 0u32);

    let filter = use_state(DirectoryFilter::default);
    let suggestions = use_state(Vec::<CollegeRecord>::new);
    let search_timer = use_state(|| None::<Timeout>);
    // College chosen from the dropdown; shown alone until the filters change.
    let picked = use_state(|| None::<CollegeRecord>);

    {
        let colleges = colleges.clone();
        let is_loading = is_loading.clone();
        let load_error = load_error.clone();
        use_effect_with(*reload_token, move |_| {
            is_loading.set(true);
            spawn_local(async move {
                match load_cached(Dataset::DirectoryColleges, api::fetch_all_colleges).await {
                    Ok(list) => {
                        info!("Directory has {} college records", list.len());
                        colleges.set(Rc::new(list));
                        load_error.set(None);
                    }
                    Err(e) => {
                        error!("Failed to load colleges: {}", e);
                        load_error.set(Some(e.to_string()));
                    }
                }
                is_loading.set(false);
            });
            || ()
        });
    }

    let update_filter = |apply: fn(&mut DirectoryFilter, String)| {
        let filter = filter.clone();
        let picked = picked.clone();
        Callback::from(move |value: String| {
            let mut next = (*filter).clone();
            apply(&mut next, value);
            filter.set(next);
            picked.set(None);
        })
    };

    let on_term_input = {
        let colleges = colleges.clone();
        let filter = filter.clone();
        let picked = picked.clone();
        let suggestions = suggestions.clone();
        let search_timer = search_timer.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let term = input.value();
            filter.set(DirectoryFilter {
                term: term.clone(),
                ..(*filter).clone()
            });
            picked.set(None);

            let colleges = (*colleges).clone();
            let suggestions = suggestions.clone();
            debounce(&search_timer, SEARCH_DEBOUNCE_MS, move || {
                let hits: Vec<CollegeRecord> = suggest(&colleges, &term, SEARCH_MAX_RESULTS)
                    .into_iter()
                    .cloned()
                    .collect();
                debug!("{} directory suggestions for '{}'", hits.len(), term);
                suggestions.set(hits);
            });
        })
    };

    let on_pick = {
        let filter = filter.clone();
        let picked = picked.clone();
        let suggestions = suggestions.clone();
        Callback::from(move |college: CollegeRecord| {
            filter.set(DirectoryFilter {
                term: college.name.clone(),
                ..(*filter).clone()
            });
            suggestions.set(Vec::new());
            picked.set(Some(college));
        })
    };

    let on_reset = {
        let filter = filter.clone();
        let picked = picked.clone();
        let suggestions = suggestions.clone();
        Callback::from(move |_: MouseEvent| {
            filter.set(DirectoryFilter::default());
            picked.set(None);
            suggestions.set(Vec::new());
        })
    };

    let on_refresh = {
        let reload_token = reload_token.clone();
        Callback::from(move |_: MouseEvent| {
            TtlCache::local().invalidate_dataset(Dataset::DirectoryColleges);
            reload_token.set(reload_token.wrapping_add(1));
        })
    };

    let retry = {
        let reload_token = reload_token.clone();
        Callback::from(move |_: ()| reload_token.set(reload_token.wrapping_add(1)))
    };

    let shown: Vec<&CollegeRecord> = match &*picked {
        Some(college) => vec![college],
        None => filter.apply(&colleges),
    };

    html! {
        <div class="container">
            <h1>{ "College Directory" }</h1>

            <div class="controls directory-filters">
                <Select id="region" label="Region"
                    options={options_from(REGIONS)}
                    value={filter.region.clone()}
                    placeholder={AttrValue::Static("All regions")}
                    onchange={update_filter(|f, v| f.region = v)} />
                <Select id="tier" label="Tier"
                    options={options_from_list(TIERS)}
                    value={filter.tier.clone()}
                    placeholder={AttrValue::Static("All tiers")}
                    onchange={update_filter(|f, v| f.tier = v)} />
                <div class="form-group search">
                    <label for="directory-search">{ "Name or place" }</label>
                    <input
                        type="text"
                        id="directory-search"
                        autocomplete="off"
                        placeholder="Type at least 2 letters"
                        value={filter.term.clone()}
                        oninput={on_term_input}
                        disabled={*is_loading}
                    />
                    if !suggestions.is_empty() {
                        <ul class="suggestions">
                            { suggestions.iter().map(|college| {
                                let pick = {
                                    let college = college.clone();
                                    on_pick.reform(move |_: MouseEvent| college.clone())
                                };
                                html! {
                                    <li onclick={pick}>
                                        <strong>{ college.name.clone() }</strong>
                                        <small>
                                            { format!(" {} | {}",
                                                      college.place.as_deref().unwrap_or("N/A"),
                                                      college.district.as_deref().unwrap_or("N/A")) }
                                        </small>
                                    </li>
                                }
                            }).collect::<Html>() }
                        </ul>
                    }
                </div>
                <button class="btn-secondary" onclick={on_reset}>{ "Reset" }</button>
                <button class="btn-secondary small" onclick={on_refresh} disabled={*is_loading}>
                    { "Refresh" }
                </button>
            </div>

            if let Some(err) = &*load_error {
                <ErrorPanel message={err.clone()} on_retry={retry} />
            }

            if *is_loading {
                <Loading message="Loading colleges..." />
            } else {
                <h3>{ format!("All Colleges ({})", shown.len()) }</h3>
                if shown.is_empty() {
                    <div class="no-results-message">
                        <p>{ "No colleges match these filters." }</p>
                    </div>
                }
                <div class="college-grid">
                    { shown.iter().map(|record| html! {
                        <DirectoryCard record={(*record).clone()} />
                    }).collect::<Html>() }
                </div>
            }
        </div>
    }
}
