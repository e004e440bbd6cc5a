// ⏱️ Poller - refetch the plan list on a fixed interval
//
// The first fetch fires immediately. Each fetch runs in its own task and
// reports through the ViewState sequence guard, so a slow response never
// replaces a faster, newer one.

use crate::client::PlanSource;
use crate::view::ViewState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub struct Poller;

impl Poller {
    /// Start polling `source`; the returned handle stops the timer when dropped
    pub fn spawn<S: PlanSource>(source: Arc<S>, interval: Duration) -> PollHandle {
        let (tx, rx) = watch::channel(ViewState::new());
        let tx = Arc::new(tx);

        let timer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                fetch_once(Arc::clone(&source), Arc::clone(&tx));
            }
        });

        PollHandle {
            timer: Some(timer),
            state: rx,
        }
    }
}

fn fetch_once<S: PlanSource>(source: Arc<S>, tx: Arc<watch::Sender<ViewState>>) {
    let mut seq = 0;
    tx.send_modify(|state| seq = state.begin_fetch());
    debug!(seq, "poll tick");

    tokio::spawn(async move {
        let result = source.fetch_plans().await;
        if let Err(e) = &result {
            warn!(seq, error = %e, "poll fetch failed");
        }
        tx.send_modify(|state| {
            state.complete(seq, result);
        });
    });
}

// ============================================================================
// HANDLE
// ============================================================================

pub struct PollHandle {
    timer: Option<JoinHandle<()>>,
    state: watch::Receiver<ViewState>,
}

impl PollHandle {
    /// A fresh receiver for view state updates
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Current view state
    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Stop the timer. Fetches already in flight still report.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("poller cancelled");
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.timer.is_none()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// TESTS
// ============================================================================
