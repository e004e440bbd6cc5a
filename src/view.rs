// 🖥️ View state - what a page shows for the latest fetch
//
// Precedence: loading masks everything, then error, then empty, then data.
// A failed fetch keeps the previous snapshot; a stale response never
// overwrites a newer one.

use crate::error::PlanBoardError;
use crate::plan::{Plan, PlanSnapshot};
use tracing::debug;

pub const COMMUNITY_NOT_FOUND: &str = "Community not found";
pub const COMPANY_NOT_FOUND: &str = "Company not found";

// ============================================================================
// ROUTE
// ============================================================================

/// Detail-page route parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Community(String),
    Company(String),
}

impl Route {
    /// Detail route from an optional path parameter
    pub fn community(name: Option<&str>) -> std::result::Result<Route, PlanBoardError> {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(Route::Community(name.to_string())),
            _ => Err(PlanBoardError::NotFound(COMMUNITY_NOT_FOUND.to_string())),
        }
    }

    pub fn company(name: Option<&str>) -> std::result::Result<Route, PlanBoardError> {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => Ok(Route::Company(name.to_string())),
            _ => Err(PlanBoardError::NotFound(COMPANY_NOT_FOUND.to_string())),
        }
    }

    /// Community or company name of the route
    pub fn name(&self) -> &str {
        match self {
            Route::Community(name) | Route::Company(name) => name,
        }
    }
}

// ============================================================================
// VIEW STATE
// ============================================================================

/// What to render right now
#[derive(Debug, Clone, PartialEq)]
pub enum Screen<'a> {
    Loading,
    Error(&'a str),
    /// Fetch succeeded with no rows; distinct from an error
    Empty,
    Ready(&'a [Plan]),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    snapshot: Option<PlanSnapshot>,
    loading: bool,
    error: Option<String>,
    /// Sequence of the newest response applied so far
    applied_seq: Option<u64>,
    next_seq: u64,
}

impl ViewState {
    /// Fresh state; the first fetch is already in flight
    pub fn new() -> Self {
        ViewState {
            loading: true,
            ..Default::default()
        }
    }

    /// Mark a request as started and hand out its sequence number
    pub fn begin_fetch(&mut self) -> u64 {
        self.loading = true;
        self.error = None;
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Apply a response. Returns false when it was older than what is shown.
    pub fn complete(
        &mut self,
        seq: u64,
        result: std::result::Result<Vec<Plan>, PlanBoardError>,
    ) -> bool {
        if self.applied_seq.is_some_and(|applied| seq < applied) {
            debug!(seq, applied = ?self.applied_seq, "dropping out-of-order response");
            return false;
        }
        self.applied_seq = Some(seq);

        match result {
            Ok(plans) => {
                self.snapshot = Some(PlanSnapshot::new(plans));
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.to_string());
            }
        }

        // Later requests may still be in flight
        if seq + 1 >= self.next_seq {
            self.loading = false;
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Latest successful snapshot, possibly stale
    pub fn snapshot(&self) -> Option<&PlanSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn plans(&self) -> &[Plan] {
        self.snapshot.as_ref().map(|s| s.plans()).unwrap_or(&[])
    }

    pub fn display(&self) -> Screen<'_> {
        if self.loading {
            return Screen::Loading;
        }
        if let Some(error) = &self.error {
            return Screen::Error(error);
        }
        match &self.snapshot {
            Some(snapshot) if !snapshot.is_empty() => Screen::Ready(snapshot.plans()),
            _ => Screen::Empty,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::PlanType;

    fn one_plan(name: &str) -> Vec<Plan> {
        vec![Plan {
            plan_name: name.to_string(),
            price: 1.0,
            sqft: 1.0,
            stories: String::new(),
            price_per_sqft: 0.0,
            last_updated: String::new(),
            price_changed_recently: false,
            company: "Redfin".to_string(),
            community: "Walden".to_string(),
            plan_type: PlanType::Now,
            address: None,
        }]
    }

    #[test]
    fn test_loading_masks_data_and_error() {
        let mut state = ViewState::new();
        assert_eq!(state.display(), Screen::Loading);

        let seq = state.begin_fetch();
        state.complete(seq, Err(PlanBoardError::Status { status: 502 }));
        state.begin_fetch();
        assert_eq!(state.display(), Screen::Loading);
    }

    #[test]
    fn test_success_then_failure_keeps_snapshot() {
        let mut state = ViewState::new();
        let first = state.begin_fetch();
        assert!(state.complete(first, Ok(one_plan("a"))));
        assert!(matches!(state.display(), Screen::Ready(plans) if plans.len() == 1));

        let second = state.begin_fetch();
        state.complete(second, Err(PlanBoardError::Status { status: 503 }));
        assert_eq!(state.display(), Screen::Error("Failed to fetch plans (HTTP 503)"));
        // Stale data retained alongside the error
        assert_eq!(state.plans()[0].plan_name, "a");
    }

    #[test]
    fn test_empty_is_not_error() {
        let mut state = ViewState::new();
        let seq = state.begin_fetch();
        state.complete(seq, Ok(Vec::new()));
        assert_eq!(state.display(), Screen::Empty);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_begin_fetch_clears_error() {
        let mut state = ViewState::new();
        let seq = state.begin_fetch();
        state.complete(seq, Err(PlanBoardError::Status { status: 500 }));
        assert!(state.error().is_some());

        state.begin_fetch();
        assert!(state.error().is_none());
    }

    #[test]
    fn test_out_of_order_response_dropped() {
        let mut state = ViewState::new();
        let older = state.begin_fetch();
        let newer = state.begin_fetch();

        assert!(state.complete(newer, Ok(one_plan("new"))));
        assert!(!state.complete(older, Ok(one_plan("old"))));

        assert_eq!(state.plans()[0].plan_name, "new");
        assert!(!state.is_loading());
    }

    #[test]
    fn test_loading_until_latest_request_lands() {
        let mut state = ViewState::new();
        let older = state.begin_fetch();
        let newer = state.begin_fetch();

        state.complete(older, Ok(one_plan("old")));
        assert!(state.is_loading());

        state.complete(newer, Ok(one_plan("new")));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_route_requires_parameter() {
        assert_eq!(
            Route::community(Some("Elevon")).unwrap(),
            Route::Community("Elevon".to_string())
        );
        assert_eq!(Route::community(Some(" Elevon ")).unwrap().name(), "Elevon");
        assert_eq!(Route::company(Some("Perry Homes")).unwrap().name(), "Perry Homes");
        assert_eq!(
            Route::community(None).unwrap_err().to_string(),
            COMMUNITY_NOT_FOUND
        );
        assert_eq!(
            Route::company(Some("  ")).unwrap_err().to_string(),
            COMPANY_NOT_FOUND
        );
    }
}
