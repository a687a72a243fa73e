//! Page components. Each binary mounts exactly one of these.

pub mod analytics;
pub mod branch_compare;
pub mod calculator;
pub mod directory;
pub mod predict;

pub use analytics::AnalyticsPage;
pub use branch_compare::BranchComparePage;
pub use calculator::CalculatorPage;
pub use directory::DirectoryPage;
pub use predict::PredictorPage;

use crate::api::ApiError;
use crate::cache::{now_ms, Dataset, TtlCache};
use gloo_timers::callback::Timeout;
use log::info;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use yew::UseStateHandle;

/// Outcome of an on-demand request. Result and error share one slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Idle,
    Ready(T),
    Failed(String),
}

impl<T> Fetched<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for Fetched<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Cache-first load: a fresh cached copy wins, otherwise fetch and write
/// the result through.
pub(crate) async fn load_cached<T, F, Fut>(dataset: Dataset, fetch: F) -> Result<T, ApiError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, ApiError>>,
{
    let cache = TtlCache::local();
    if let Some(hit) = cache.load_dataset(dataset, now_ms()) {
        return Ok(hit);
    }
    info!("No fresh '{}' in cache, fetching", dataset.key());
    let fresh = fetch().await?;
    cache.store_dataset(dataset, &fresh, now_ms());
    Ok(fresh)
}

/// Run `f` after `delay_ms`, cancelling any previous pending call.
pub(crate) fn debounce<F: FnOnce() + 'static>(
    timer_handle: &UseStateHandle<Option<Timeout>>,
    delay_ms: u32,
    f: F,
) {
    // Dropping the old Timeout cancels it
    timer_handle.set(None);
    let handle = Timeout::new(delay_ms, f);
    timer_handle.set(Some(handle));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetched_holds_either_result_or_error() {
        let failed: Fetched<u32> = Err::<u32, ApiError>(ApiError::Network("offline".into())).into();
        assert_eq!(failed.error(), Some("Could not reach the server: offline"));
        assert_eq!(failed.ready(), None);

        let ready: Fetched<u32> = Ok::<u32, ApiError>(7).into();
        assert_eq!(ready.ready(), Some(&7));
        assert_eq!(ready.error(), None);

        let reset: Fetched<u32> = Fetched::Idle;
        assert_eq!((reset.ready(), reset.error()), (None, None));
    }
}
