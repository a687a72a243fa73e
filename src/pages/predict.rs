//! Rank-based college predictor page.

use crate::api::{self, PredictRequest};
use crate::components::{
    options_from, options_from_list, CollegeCard, ComparisonTable, ComparisonTray, ErrorPanel,
    Loading, MultiSelect, NoticeModal, Select,
};
use crate::config::{
    BRANCHES, GENDERS, MAX_RANK, MIN_RANK, PLACEMENT_QUALITIES, QUOTAS, REGIONS, SORT_OPTIONS, TIERS,
};
use crate::directory::{details_instcode, retain_institution};
use crate::form::FormField;
use crate::record::{CollegeRecord, SelectionKey};
use crate::regions::{allowed_districts, ALL_DISTRICTS};
use crate::state::{PredictorAction, PredictorState, Status};
use log::{error, info, warn};
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(PredictorPage)]
pub fn predictor_page() -> Html {
    let state = use_reducer(PredictorState::default);
    // Monotonic across renders; the reducer only accepts the latest one.
    let request_counter = use_mut_ref(|| 0u64);
    let last_request = use_mut_ref(|| None::<PredictRequest>);

    let send = {
        let state = state.clone();
        let request_counter = request_counter.clone();
        let last_request = last_request.clone();
        Callback::from(move |request: PredictRequest| {
            let generation = {
                let mut counter = request_counter.borrow_mut();
                *counter += 1;
                *counter
            };
            *last_request.borrow_mut() = Some(request.clone());
            state.dispatch(PredictorAction::Started(generation));

            let state = state.clone();
            spawn_local(async move {
                match api::predict_colleges(&request).await {
                    Ok(records) => {
                        let records = match &request.instcode {
                            Some(instcode) => retain_institution(records, instcode),
                            None => records,
                        };
                        state.dispatch(PredictorAction::Loaded { generation, records });
                    }
                    Err(e) => {
                        error!("Prediction request failed: {}", e);
                        state.dispatch(PredictorAction::Failed {
                            generation,
                            error: e.to_string(),
                        });
                    }
                }
            });
        })
    };

    let submit = {
        let state = state.clone();
        let send = send.clone();
        Callback::from(move |_: ()| match state.form.to_request() {
            Ok(request) => send.emit(request),
            Err(e) => state.dispatch(PredictorAction::Invalid(e)),
        })
    };

    let retry = {
        let send = send.clone();
        let last_request = last_request.clone();
        Callback::from(move |_: ()| {
            let request = last_request.borrow().clone();
            if let Some(request) = request {
                send.emit(request);
            }
        })
    };

    // `?instcode=X&view=details` opens one institution straight away.
    {
        let send = send.clone();
        use_effect_with((), move |_| {
            let window = gloo_utils::window();
            let location = window.location();
            if let Some(instcode) = location.search().ok().as_deref().and_then(details_instcode) {
                info!("Opening details for {}", instcode);
                send.emit(PredictRequest::for_institution(&instcode));
                let cleared = location.pathname().and_then(|path| {
                    window
                        .history()?
                        .replace_state_with_url(&JsValue::NULL, "", Some(&path))
                });
                if cleared.is_err() {
                    warn!("Could not clear the details query from the address bar");
                }
            }
            || ()
        });
    }

    let onsubmit = submit.reform(|e: SubmitEvent| {
        e.prevent_default();
    });

    let on_rank_input = {
        let state = state.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            state.dispatch(PredictorAction::SetRankText(input.value()));
        })
    };

    let field_callback = |field: FormField| {
        let state = state.clone();
        Callback::from(move |values: Vec<String>| state.dispatch(PredictorAction::SetField(field, values)))
    };

    let on_clear_form = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| state.dispatch(PredictorAction::ClearForm))
    };

    let on_sort = {
        let state = state.clone();
        Callback::from(move |spec: String| state.dispatch(PredictorAction::SetSort(spec)))
    };

    let on_toggle = {
        let state = state.clone();
        Callback::from(move |record: CollegeRecord| state.dispatch(PredictorAction::ToggleCompare(record)))
    };

    let on_remove = {
        let state = state.clone();
        Callback::from(move |key: SelectionKey| state.dispatch(PredictorAction::RemoveCompare(key)))
    };

    let on_compare = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(PredictorAction::OpenComparison))
    };

    let on_clear_comparison = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(PredictorAction::ClearComparison))
    };

    let on_close_comparison = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(PredictorAction::CloseComparison))
    };

    let on_dismiss = {
        let state = state.clone();
        Callback::from(move |_: ()| state.dispatch(PredictorAction::DismissNotice))
    };

    // District options follow the selected regions.
    let district_options = {
        let allowed = allowed_districts(&state.form.regions);
        let visible: Vec<&str> = ALL_DISTRICTS
            .iter()
            .copied()
            .filter(|d| allowed.contains(d))
            .collect();
        options_from_list(visible.as_slice())
    };

    let results = match &state.status {
        Status::Idle => html! {
            <div class="no-results-message">
                <p>{ "Enter your rank or choose filters, then press Predict." }</p>
            </div>
        },
        Status::Loading => html! { <Loading message="Finding colleges for you..." /> },
        Status::Failed(message) => html! {
            <ErrorPanel message={message.clone()} on_retry={retry.clone()} />
        },
        Status::Loaded if state.view.is_empty() => html! {
            <div class="no-results-message">
                <p>{ "No colleges found matching your criteria." }</p>
            </div>
        },
        Status::Loaded => html! {
            <>
                <div class="results-toolbar">
                    <span>{ format!("{} colleges found", state.view.len()) }</span>
                    <Select id="sort" label="Sort by"
                        options={options_from(SORT_OPTIONS)}
                        value={state.sort.clone()}
                        onchange={on_sort} />
                </div>
                <div class="college-grid">
                    { state.view.iter().map(|record| html! {
                        <CollegeCard
                            record={record.clone()}
                            selected={state.selection.contains(&record.key())}
                            on_toggle={on_toggle.clone()} />
                    }).collect::<Html>() }
                </div>
            </>
        },
    };

    html! {
        <div class="container">
            <h1>{ "EAMCET College Predictor" }</h1>
            <form class="predict-form" {onsubmit}>
                <div class="form-group">
                    <label for="rank">{ "EAMCET Rank" }</label>
                    <input
                        type="text"
                        id="rank"
                        inputmode="numeric"
                        placeholder={format!("{} - {}", MIN_RANK, MAX_RANK)}
                        value={state.form.rank_text.clone()}
                        oninput={on_rank_input}
                    />
                </div>
                <MultiSelect id="branch" label="Branch"
                    options={options_from_list(BRANCHES)}
                    selected={state.form.branches.clone()}
                    onchange={field_callback(FormField::Branch)} />
                <MultiSelect id="quota" label="Category"
                    options={options_from(QUOTAS)}
                    selected={state.form.quotas.clone()}
                    onchange={field_callback(FormField::Quota)} />
                <MultiSelect id="gender" label="Gender"
                    options={options_from(GENDERS)}
                    selected={state.form.genders.clone()}
                    onchange={field_callback(FormField::Gender)} />
                <MultiSelect id="region" label="Region"
                    options={options_from(REGIONS)}
                    selected={state.form.regions.clone()}
                    onchange={field_callback(FormField::Region)} />
                <MultiSelect id="district" label="District"
                    options={district_options}
                    selected={state.form.districts.clone()}
                    onchange={field_callback(FormField::District)} />
                <MultiSelect id="tier" label="Tier"
                    options={options_from_list(TIERS)}
                    selected={state.form.tiers.clone()}
                    onchange={field_callback(FormField::Tier)} />
                <MultiSelect id="quality" label="Placement Quality"
                    options={options_from_list(PLACEMENT_QUALITIES)}
                    selected={state.form.qualities.clone()}
                    onchange={field_callback(FormField::Quality)} />
                <div class="form-row">
                    <button type="submit" class="btn-primary" disabled={state.is_loading()}>
                        { "Predict Colleges" }
                    </button>
                    <button type="button" class="btn-secondary" onclick={on_clear_form}>
                        { "Clear" }
                    </button>
                </div>
            </form>

            <div class="results-area">{ results }</div>

            <ComparisonTray
                count={state.selection.len()}
                limit={state.selection.limit()}
                can_compare={state.selection.can_compare()}
                {on_compare}
                on_clear={on_clear_comparison} />

            if state.comparison_open {
                <ComparisonTable
                    items={state.selection.items().to_vec()}
                    {on_remove}
                    on_close={on_close_comparison} />
            }

            if let Some(notice) = &state.notice {
                <NoticeModal notice={notice.clone()} on_close={on_dismiss} />
            }
        </div>
    }
}
