//! Pure Yew view components shared by the predictor pages.
//!
//! This module contains stateless components that render based on props;
//! all state lives in the page components.

use crate::compare::BranchStats;
use crate::config::quota_label;
use crate::directory::{details_href, maps_url};
use crate::record::{CollegeRecord, SelectionKey};
use crate::utils::{format_package, format_rank, probability_class, Notice};
use indexmap::IndexMap;
use std::rc::Rc;
use yew::prelude::*;

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or("N/A").to_string()
}

fn format_probability(p: Option<f64>) -> String {
    p.map(|p| format!("{:.1}%", p)).unwrap_or_else(|| "N/A".to_string())
}

fn format_cutoff(cutoff: Option<u32>) -> String {
    cutoff.map(format_rank).unwrap_or_else(|| "N/A".to_string())
}

/// `(value, label)` option pairs from a config table.
pub fn options_from(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(v, l)| (v.to_string(), l.to_string())).collect()
}

/// Options whose value doubles as label.
pub fn options_from_list<S: AsRef<str>>(values: &[S]) -> Vec<(String, String)> {
    values
        .iter()
        .map(|v| (v.as_ref().to_string(), v.as_ref().to_string()))
        .collect()
}

/// Flip `value` in a multi-select selection. New values go to the end.
pub fn toggle_value(selected: &[String], value: &str) -> Vec<String> {
    if selected.iter().any(|s| s == value) {
        selected.iter().filter(|s| s.as_str() != value).cloned().collect()
    } else {
        let mut next = selected.to_vec();
        next.push(value.to_string());
        next
    }
}

/// Checkbox-list multi-select.
#[derive(Properties, PartialEq)]
pub struct MultiSelectProps {
    pub id: AttrValue,
    pub label: AttrValue,
    /// `(value, label)` pairs
    pub options: Vec<(String, String)>,
    pub selected: Vec<String>,
    pub onchange: Callback<Vec<String>>,
}

#[function_component(MultiSelect)]
pub fn multi_select(props: &MultiSelectProps) -> Html {
    html! {
        <fieldset class="form-group multi-select" id={props.id.clone()}>
            <legend>{ props.label.clone() }</legend>
            { props.options.iter().map(|(value, label)| {
                let checked = props.selected.contains(value);
                let onchange = {
                    let selected = props.selected.clone();
                    let value = value.clone();
                    props.onchange.reform(move |_: Event| toggle_value(&selected, &value))
                };
                html! {
                    <label class="checkbox-option">
                        <input type="checkbox" value={value.clone()} {checked} {onchange} />
                        { label.clone() }
                    </label>
                }
            }).collect::<Html>() }
        </fieldset>
    }
}

/// Single-choice dropdown.
#[derive(Properties, PartialEq)]
pub struct SelectProps {
    pub id: AttrValue,
    pub label: AttrValue,
    pub options: Vec<(String, String)>,
    pub value: AttrValue,
    #[prop_or_default]
    pub placeholder: Option<AttrValue>,
    #[prop_or_default]
    pub disabled: bool,
    pub onchange: Callback<String>,
}

#[function_component(Select)]
pub fn select(props: &SelectProps) -> Html {
    let onchange = props.onchange.reform(|e: Event| {
        let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
        select.value()
    });
    html! {
        <div class="form-group">
            <label for={props.id.clone()}>{ props.label.clone() }</label>
            <select id={props.id.clone()} {onchange} disabled={props.disabled}>
                if let Some(placeholder) = &props.placeholder {
                    <option value="" selected={props.value.is_empty()}>{ placeholder.clone() }</option>
                }
                { props.options.iter().map(|(value, label)| html! {
                    <option value={value.clone()} selected={value.as_str() == props.value.as_str()}>
                        { label.clone() }
                    </option>
                }).collect::<Html>() }
            </select>
        </div>
    }
}

/// Validation modal.
#[derive(Properties, PartialEq)]
pub struct NoticeModalProps {
    pub notice: Notice,
    pub on_close: Callback<()>,
}

#[function_component(NoticeModal)]
pub fn notice_modal(props: &NoticeModalProps) -> Html {
    html! {
        <div class="modal-overlay" role="dialog">
            <div class={classes!("modal", props.notice.severity.css_class())}>
                <h3>{ props.notice.title.clone() }</h3>
                <p>{ props.notice.message.clone() }</p>
                <button class="btn-primary" onclick={props.on_close.reform(|_: MouseEvent| ())}>
                    { "OK" }
                </button>
            </div>
        </div>
    }
}

/// Inline error with a retry button.
#[derive(Properties, PartialEq)]
pub struct ErrorPanelProps {
    pub message: AttrValue,
    pub on_retry: Callback<()>,
}

#[function_component(ErrorPanel)]
pub fn error_panel(props: &ErrorPanelProps) -> Html {
    html! {
        <div class="current-error">
            <p>{ props.message.clone() }</p>
            <button class="btn-secondary" onclick={props.on_retry.reform(|_: MouseEvent| ())}>
                { "Retry" }
            </button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    #[prop_or(AttrValue::Static("Loading..."))]
    pub message: AttrValue,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="loading">
            <div class="spinner"></div>
            <p>{ props.message.clone() }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SummaryCardProps {
    pub title: AttrValue,
    pub value: AttrValue,
}

#[function_component(SummaryCard)]
pub fn summary_card(props: &SummaryCardProps) -> Html {
    html! {
        <div class="summary-card">
            <div class="summary-value">{ props.value.clone() }</div>
            <div class="summary-title">{ props.title.clone() }</div>
        </div>
    }
}

/// One prediction result with its compare checkbox.
#[derive(Properties, PartialEq)]
pub struct CollegeCardProps {
    pub record: CollegeRecord,
    pub selected: bool,
    pub on_toggle: Callback<CollegeRecord>,
}

#[function_component(CollegeCard)]
pub fn college_card(props: &CollegeCardProps) -> Html {
    let r = &props.record;
    let onchange = {
        let record = r.clone();
        props.on_toggle.reform(move |_: Event| record.clone())
    };
    let badge = r
        .probability
        .map(|p| classes!("probability-badge", probability_class(p)));

    html! {
        <div class={classes!("college-card", props.selected.then_some("selected"))}>
            <div class="college-card-header">
                <h3>{ r.name.clone() }</h3>
                <span class="instcode">{ r.instcode.clone() }</span>
            </div>
            <div class="college-card-body">
                <p><strong>{ "Branch: " }</strong>{ r.branch.clone() }</p>
                <p><strong>{ "Category: " }</strong>{ category_label(r) }</p>
                <p><strong>{ "Cutoff Rank: " }</strong>{ format_cutoff(r.cutoff) }</p>
                if let Some(class) = badge {
                    <p><span class={class}>{ format!("Chance: {}", format_probability(r.probability)) }</span></p>
                }
                <p><strong>{ "Average Package: " }</strong>{ format!("{} LPA", format_package(r.average_package)) }</p>
                <p><strong>{ "Highest Package: " }</strong>{ format!("{} LPA", format_package(r.highest_package)) }</p>
                <p><strong>{ "Placement Quality: " }</strong>{ or_na(r.placement_drive_quality.as_deref()) }</p>
                <p class="location">
                    <a href={maps_url(r)} target="_blank" rel="noopener" title="View on Google Maps">
                        { format!("{} · {} · {}",
                                  or_na(r.district.as_deref()),
                                  or_na(r.region.as_deref()),
                                  or_na(r.tier.as_deref())) }
                    </a>
                </p>
            </div>
            <label class="compare-toggle">
                <input type="checkbox" checked={props.selected} {onchange} />
                { "Compare" }
            </label>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct DirectoryCardProps {
    pub record: CollegeRecord,
}

/// One institution in the college directory.
#[function_component(DirectoryCard)]
pub fn directory_card(props: &DirectoryCardProps) -> Html {
    let r = &props.record;
    html! {
        <div class="college-card directory-card">
            <a class="card-location-link" href={maps_url(r)} target="_blank" rel="noopener"
                title="View on Google Maps">
                { "Location" }
            </a>
            <h4>{ r.name.clone() }</h4>
            <p>{ format!("{} ({})", or_na(r.district.as_deref()), or_na(r.region.as_deref())) }</p>
            <p>{ or_na(r.tier.as_deref()) }</p>
            <p class="instcode">{ r.instcode.clone() }</p>
            <a class="btn-primary" href={details_href(&r.instcode)}>{ "View Details" }</a>
        </div>
    }
}

/// Floating selection summary for the predictor.
#[derive(Properties, PartialEq)]
pub struct ComparisonTrayProps {
    pub count: usize,
    pub limit: usize,
    pub can_compare: bool,
    pub on_compare: Callback<()>,
    pub on_clear: Callback<()>,
}

#[function_component(ComparisonTray)]
pub fn comparison_tray(props: &ComparisonTrayProps) -> Html {
    if props.count == 0 {
        return html! {};
    }
    html! {
        <div class="comparison-tray">
            <span>{ format!("{} of {} colleges selected", props.count, props.limit) }</span>
            <button class="btn-primary"
                disabled={!props.can_compare}
                onclick={props.on_compare.reform(|_: MouseEvent| ())}>
                { "Compare Now" }
            </button>
            <button class="btn-secondary" onclick={props.on_clear.reform(|_: MouseEvent| ())}>
                { "Clear" }
            </button>
        </div>
    }
}

fn attribute_row(
    title: &'static str,
    items: &[CollegeRecord],
    value: impl Fn(&CollegeRecord) -> String,
) -> (&'static str, Vec<String>) {
    (title, items.iter().map(value).collect())
}

fn category_label(r: &CollegeRecord) -> String {
    r.category.as_deref().map(quota_label).unwrap_or("N/A").to_string()
}

/// Attribute rows of the comparison table, one value per selected college.
pub fn comparison_rows(items: &[CollegeRecord]) -> Vec<(&'static str, Vec<String>)> {
    vec![
        attribute_row("Code", items, |r| r.instcode.clone()),
        attribute_row("Branch", items, |r| r.branch.clone()),
        attribute_row("Category", items, category_label),
        attribute_row("Cutoff Rank", items, |r| format_cutoff(r.cutoff)),
        attribute_row("Probability", items, |r| format_probability(r.probability)),
        attribute_row("Average Package (LPA)", items, |r| format_package(r.average_package)),
        attribute_row("Highest Package (LPA)", items, |r| format_package(r.highest_package)),
        attribute_row("Placement Quality", items, |r| or_na(r.placement_drive_quality.as_deref())),
        attribute_row("District", items, |r| or_na(r.district.as_deref())),
        attribute_row("Region", items, |r| or_na(r.region.as_deref())),
        attribute_row("Tier", items, |r| or_na(r.tier.as_deref())),
    ]
}

/// Side-by-side comparison modal.
#[derive(Properties, PartialEq)]
pub struct ComparisonTableProps {
    pub items: Vec<CollegeRecord>,
    pub on_remove: Callback<SelectionKey>,
    pub on_close: Callback<()>,
}

#[function_component(ComparisonTable)]
pub fn comparison_table(props: &ComparisonTableProps) -> Html {
    html! {
        <div class="modal-overlay" role="dialog">
            <div class="modal comparison-modal">
                <div class="modal-header">
                    <h3>{ "College Comparison" }</h3>
                    <button class="btn-close" onclick={props.on_close.reform(|_: MouseEvent| ())}>{ "×" }</button>
                </div>
                <div class="comparison-table-container">
                    <table class="comparison-table">
                        <thead>
                            <tr>
                                <th>{ "Institution" }</th>
                                { props.items.iter().map(|r| {
                                    let key = r.key();
                                    html! {
                                        <th>
                                            { r.name.clone() }
                                            <button class="btn-remove"
                                                onclick={props.on_remove.reform(move |_: MouseEvent| key.clone())}>
                                                { "Remove" }
                                            </button>
                                        </th>
                                    }
                                }).collect::<Html>() }
                            </tr>
                        </thead>
                        <tbody>
                            { comparison_rows(&props.items).into_iter().map(|(title, values)| html! {
                                <tr>
                                    <th>{ title }</th>
                                    { values.into_iter().map(|v| html! { <td>{ v }</td> }).collect::<Html>() }
                                </tr>
                            }).collect::<Html>() }
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

/// Per-branch statistics table for the branch comparison page.
#[derive(Properties, PartialEq)]
pub struct BranchStatsTableProps {
    pub stats: Rc<IndexMap<String, BranchStats>>,
}

#[function_component(BranchStatsTable)]
pub fn branch_stats_table(props: &BranchStatsTableProps) -> Html {
    html! {
        <table class="stats-table">
            <thead>
                <tr>
                    <th>{ "Branch" }</th>
                    <th>{ "Colleges" }</th>
                    <th>{ "Avg Package (LPA)" }</th>
                    <th>{ "Max Package (LPA)" }</th>
                    <th>{ "Min Package (LPA)" }</th>
                </tr>
            </thead>
            <tbody>
                { props.stats.iter().map(|(branch, s)| {
                    if s.has_data() {
                        html! {
                            <tr>
                                <td>{ branch.clone() }</td>
                                <td>{ s.total_colleges }</td>
                                <td>{ format!("{:.2}", s.avg_package) }</td>
                                <td>{ format!("{:.2}", s.max_package) }</td>
                                <td>{ format!("{:.2}", s.min_package) }</td>
                            </tr>
                        }
                    } else {
                        html! {
                            <tr class="no-data">
                                <td>{ branch.clone() }</td>
                                <td colspan="4">{ "No data available" }</td>
                            </tr>
                        }
                    }
                }).collect::<Html>() }
            </tbody>
        </table>
    }
}

/// Two-column ranking table: name and an already formatted value.
pub fn render_ranking(title: &str, value_header: &str, rows: &[(String, String)]) -> Html {
    if rows.is_empty() {
        return html! {
            <div class="ranking">
                <h3>{ title }</h3>
                <p class="no-results-message">{ "No data to display" }</p>
            </div>
        };
    }
    html! {
        <div class="ranking">
            <h3>{ title }</h3>
            <table class="stats-table">
                <thead>
                    <tr>
                        <th>{ "#" }</th>
                        <th>{ "Branch" }</th>
                        <th>{ value_header }</th>
                    </tr>
                </thead>
                <tbody>
                    { rows.iter().enumerate().map(|(idx, (name, value))| html! {
                        <tr>
                            <td>{ idx + 1 }</td>
                            <td>{ name.clone() }</td>
                            <td>{ value.clone() }</td>
                        </tr>
                    }).collect::<Html>() }
                </tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn toggle_value_appends_and_removes() {
        let sel = toggle_value(&strings(&["AU"]), "SW");
        assert_eq!(sel, strings(&["AU", "SW"]));
        assert_eq!(toggle_value(&sel, "AU"), strings(&["SW"]));
    }

    #[test]
    fn comparison_rows_have_one_value_per_college() {
        let items = vec![
            CollegeRecord {
                instcode: "A".into(),
                category: Some("bca_girls".into()),
                cutoff: Some(12500),
                average_package: Some(4.5),
                ..Default::default()
            },
            CollegeRecord {
                instcode: "B".into(),
                ..Default::default()
            },
        ];
        let rows = comparison_rows(&items);
        assert!(rows.iter().all(|(_, values)| values.len() == 2));
        let get = |title: &str| rows.iter().find(|(t, _)| *t == title).map(|(_, v)| v.clone()).unwrap();
        assert_eq!(get("Category"), strings(&["BC-A", "N/A"]));
        assert_eq!(get("Cutoff Rank"), strings(&["12,500", "N/A"]));
        assert_eq!(get("Average Package (LPA)"), strings(&["₹4.50", "N/A"]));
    }

    #[test]
    fn option_helpers() {
        assert_eq!(options_from(&[("oc", "OC")]), vec![("oc".to_string(), "OC".to_string())]);
        assert_eq!(options_from_list(&["Tier 1"])[0].1, "Tier 1");
    }
}
