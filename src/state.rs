//! Predictor page state.
//!
//! All writes go through [`PredictorAction`]; the component only reads.
//! Every submission carries a generation number. A response is applied only
//! while its generation is the pending one; a newer submission or a Clear
//! makes it stale and it is dropped.

use crate::compare::{SelectionError, SelectionSet, Toggle};
use crate::config::{COMPARISON_LIMIT, DEFAULT_SORT};
use crate::form::{FormField, PredictForm};
use crate::pipeline;
use crate::record::{CollegeRecord, SelectionKey};
use crate::utils::{sanitize_rank_input, Notice, Severity, ValidationError};
use log::{debug, info, warn};
use std::rc::Rc;
use yew::Reducible;

#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictorState {
    pub form: PredictForm,
    /// Records as returned by the last accepted response.
    pub raw: Vec<CollegeRecord>,
    /// `raw` after the placement filter and current sort.
    pub view: Vec<CollegeRecord>,
    pub sort: String,
    pub selection: SelectionSet,
    pub status: Status,
    pub notice: Option<Notice>,
    pub comparison_open: bool,
    /// Generation of the request still awaiting a response.
    pub pending: Option<u64>,
}

impl Default for PredictorState {
    fn default() -> Self {
        Self {
            form: PredictForm::default(),
            raw: Vec::new(),
            view: Vec::new(),
            sort: DEFAULT_SORT.to_string(),
            selection: SelectionSet::new(COMPARISON_LIMIT),
            status: Status::Idle,
            notice: None,
            comparison_open: false,
            pending: None,
        }
    }
}

pub enum PredictorAction {
    SetRankText(String),
    SetField(FormField, Vec<String>),
    ClearForm,
    Invalid(ValidationError),
    /// A request with this generation was sent.
    Started(u64),
    Loaded {
        generation: u64,
        records: Vec<CollegeRecord>,
    },
    Failed {
        generation: u64,
        error: String,
    },
    SetSort(String),
    ToggleCompare(CollegeRecord),
    RemoveCompare(SelectionKey),
    ClearComparison,
    OpenComparison,
    CloseComparison,
    DismissNotice,
}

impl PredictorState {
    /// Recompute the visible list and drop selections that vanished from it.
    fn refresh_view(&mut self) {
        self.view = pipeline::run(&self.raw, &self.form.qualities, &self.sort);
        self.selection.retain_present(&self.view);
        if self.selection.len() < crate::config::MIN_TO_COMPARE {
            self.comparison_open = false;
        }
    }

    fn reset_results(&mut self) {
        self.raw.clear();
        self.view.clear();
        self.selection.clear();
        self.comparison_open = false;
        self.sort = DEFAULT_SORT.to_string();
    }

    pub fn is_loading(&self) -> bool {
        self.status == Status::Loading
    }
}

impl Reducible for PredictorState {
    type Action = PredictorAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            PredictorAction::SetRankText(text) => {
                next.form.rank_text = sanitize_rank_input(&text);
            }
            PredictorAction::SetField(field, values) => {
                next.form.set_values(field, values);
                if field == FormField::Quality && !next.raw.is_empty() {
                    next.refresh_view();
                }
            }
            PredictorAction::ClearForm => {
                if let Some(generation) = next.pending.take() {
                    debug!("Abandoning request generation {}", generation);
                }
                next.form.clear();
                next.reset_results();
                next.status = Status::Idle;
            }
            PredictorAction::Invalid(err) => {
                next.notice = Some(err.to_notice());
            }
            PredictorAction::Started(generation) => {
                next.pending = Some(generation);
                next.reset_results();
                next.status = Status::Loading;
            }
            PredictorAction::Loaded { generation, records } => {
                if self.pending != Some(generation) {
                    debug!(
                        "Dropping stale response (generation {}, pending {:?})",
                        generation, self.pending
                    );
                    return self;
                }
                info!("Loaded {} colleges", records.len());
                next.pending = None;
                next.raw = records;
                next.status = Status::Loaded;
                next.refresh_view();
            }
            PredictorAction::Failed { generation, error } => {
                if self.pending != Some(generation) {
                    debug!("Dropping stale failure (generation {})", generation);
                    return self;
                }
                next.pending = None;
                warn!("Prediction failed: {}", error);
                next.status = Status::Failed(error);
            }
            PredictorAction::SetSort(spec) => {
                next.sort = spec;
                next.refresh_view();
            }
            PredictorAction::ToggleCompare(record) => match next.selection.toggle(&record) {
                Ok(Toggle::Added) => debug!("Added {} to comparison", record.key()),
                Ok(Toggle::Removed) => {
                    if !next.selection.can_compare() {
                        next.comparison_open = false;
                    }
                }
                Err(err @ SelectionError::LimitReached { .. }) => {
                    next.notice = Some(Notice::new(
                        "Comparison Limit Reached",
                        err.to_string(),
                        Severity::Warning,
                    ));
                }
            },
            PredictorAction::RemoveCompare(key) => {
                next.selection.remove(&key);
                if !next.selection.can_compare() {
                    next.comparison_open = false;
                }
            }
            PredictorAction::ClearComparison => {
                next.selection.clear();
                next.comparison_open = false;
            }
            PredictorAction::OpenComparison => {
                if next.selection.can_compare() {
                    next.comparison_open = true;
                } else {
                    next.notice = Some(Notice::new(
                        "Select Colleges",
                        "Please select at least 2 colleges to compare. Check the comparison boxes on college cards.",
                        Severity::Warning,
                    ));
                }
            }
            PredictorAction::CloseComparison => {
                next.comparison_open = false;
            }
            PredictorAction::DismissNotice => {
                next.notice = None;
            }
        }
        Rc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn college(code: &str, cutoff: u32, quality: &str) -> CollegeRecord {
        CollegeRecord {
            instcode: code.into(),
            name: code.into(),
            branch: "CSE".into(),
            category: Some("oc_boys".into()),
            cutoff: Some(cutoff),
            placement_drive_quality: Some(quality.into()),
            ..Default::default()
        }
    }

    fn apply(state: Rc<PredictorState>, actions: Vec<PredictorAction>) -> Rc<PredictorState> {
        actions.into_iter().fold(state, |s, a| s.reduce(a))
    }

    fn codes(state: &PredictorState) -> Vec<&str> {
        state.view.iter().map(|r| r.instcode.as_str()).collect()
    }

    #[test]
    fn loaded_results_use_default_sort() {
        let state = apply(
            Rc::new(PredictorState::default()),
            vec![
                PredictorAction::Started(1),
                PredictorAction::Loaded {
                    generation: 1,
                    records: vec![college("B", 900, "Good"), college("A", 100, "Bad")],
                },
            ],
        );
        assert_eq!(state.status, Status::Loaded);
        assert_eq!(codes(&state), vec!["A", "B"]);
    }

    #[test]
    fn stale_response_is_ignored() {
        let state = apply(
            Rc::new(PredictorState::default()),
            vec![
                PredictorAction::Started(1),
                PredictorAction::Started(2),
                PredictorAction::Loaded {
                    generation: 2,
                    records: vec![college("NEW", 10, "Good")],
                },
                PredictorAction::Loaded {
                    generation: 1,
                    records: vec![college("OLD", 10, "Good")],
                },
                PredictorAction::Failed {
                    generation: 1,
                    error: "timeout".into(),
                },
            ],
        );
        assert_eq!(codes(&state), vec!["NEW"]);
        assert_eq!(state.status, Status::Loaded);
    }

    #[test]
    fn clear_abandons_request_in_flight() {
        let state = apply(
            Rc::new(PredictorState::default()),
            vec![
                PredictorAction::Started(1),
                PredictorAction::ClearForm,
                PredictorAction::Loaded {
                    generation: 1,
                    records: vec![college("LATE", 10, "Good")],
                },
                PredictorAction::Failed {
                    generation: 1,
                    error: "timeout".into(),
                },
            ],
        );
        assert_eq!(state.status, Status::Idle);
        assert!(state.view.is_empty());
        assert_eq!(state.pending, None);
    }

    #[test]
    fn new_submission_clears_selection() {
        let a = college("A", 100, "Good");
        let state = apply(
            Rc::new(PredictorState::default()),
            vec![
                PredictorAction::Started(1),
                PredictorAction::Loaded { generation: 1, records: vec![a.clone()] },
                PredictorAction::ToggleCompare(a),
                PredictorAction::Started(2),
            ],
        );
        assert!(state.selection.is_empty());
        assert!(state.is_loading());
    }

    #[test]
    fn sort_change_keeps_selection() {
        let a = college("A", 100, "Good");
        let b = college("B", 900, "Excellent");
        let state = apply(
            Rc::new(PredictorState::default()),
            vec![
                PredictorAction::Started(1),
                PredictorAction::Loaded { generation: 1, records: vec![a.clone(), b.clone()] },
                PredictorAction::ToggleCompare(b.clone()),
                PredictorAction::ToggleCompare(a.clone()),
                PredictorAction::SetSort("quality-desc".into()),
            ],
        );
        assert_eq!(codes(&state), vec!["B", "A"]);
        assert_eq!(state.selection.len(), 2);
    }

    #[test]
    fn quality_filter_applies_to_loaded_results() {
        let state = apply(
            Rc::new(PredictorState::default()),
            vec![
                PredictorAction::Started(1),
                PredictorAction::Loaded {
                    generation: 1,
                    records: vec![college("A", 100, "Good"), college("B", 200, "Excellent")],
                },
                PredictorAction::SetField(FormField::Quality, vec!["excellent".into()]),
            ],
        );
        assert_eq!(codes(&state), vec!["B"]);
    }

    #[test]
    fn limit_reached_raises_notice() {
        let mut actions: Vec<PredictorAction> = (0..=COMPARISON_LIMIT as u32)
            .map(|i| PredictorAction::ToggleCompare(college(&format!("C{i}"), i, "Good")))
            .collect();
        actions.insert(0, PredictorAction::Started(1));
        let state = apply(Rc::new(PredictorState::default()), actions);
        assert_eq!(state.selection.len(), COMPARISON_LIMIT);
        let notice = state.notice.as_ref().unwrap();
        assert_eq!(notice.title, "Comparison Limit Reached");
        assert_eq!(notice.severity, Severity::Warning);
    }

    #[test]
    fn comparison_needs_two_colleges() {
        let a = college("A", 100, "Good");
        let b = college("B", 200, "Good");
        let state = apply(
            Rc::new(PredictorState::default()),
            vec![PredictorAction::ToggleCompare(a.clone()), PredictorAction::OpenComparison],
        );
        assert!(!state.comparison_open);
        assert!(state.notice.is_some());

        let state = apply(
            state,
            vec![
                PredictorAction::DismissNotice,
                PredictorAction::ToggleCompare(b),
                PredictorAction::OpenComparison,
            ],
        );
        assert!(state.comparison_open);

        let state = apply(state, vec![PredictorAction::RemoveCompare(a.key())]);
        assert!(!state.comparison_open);
    }

    #[test]
    fn rank_text_is_sanitized() {
        let state = apply(
            Rc::new(PredictorState::default()),
            vec![PredictorAction::SetRankText("12a34".into())],
        );
        assert_eq!(state.form.rank_text, "1234");
    }
}
