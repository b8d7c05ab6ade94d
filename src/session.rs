//! Poll session lifecycle
//!
//! A [`PollSession`] owns the repeating timer of every task and the abort
//! handle of every request in flight. Hiding the tab pauses it, showing the
//! tab starts it again; teardown closes it for good. Several sessions can
//! live side by side since nothing here is global.

use futures_util::future::{AbortHandle, AbortRegistration};
use std::collections::HashMap;
use std::time::Duration;

use crate::config::PollingConfig;
use crate::poller::PollTask;

/// Source of repeating timers.
///
/// Dropping a returned handle must cancel its timer.
pub trait Scheduler {
    type Handle;

    fn schedule_every(&self, task: PollTask, period: Duration) -> Self::Handle;
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Paused,
    Closed,
}

/// Identifies one in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(u64);

pub struct PollSession<S: Scheduler> {
    scheduler: S,
    polling: PollingConfig,
    timers: HashMap<PollTask, S::Handle>,
    in_flight: HashMap<RequestId, AbortHandle>,
    next_request: u64,
    state: SessionState,
}

impl<S: Scheduler> PollSession<S> {
    pub fn new(scheduler: S, polling: PollingConfig) -> Self {
        Self {
            scheduler,
            polling,
            timers: HashMap::new(),
            in_flight: HashMap::new(),
            next_request: 0,
            state: SessionState::Idle,
        }
    }

    /// Start (or restart) every repeating timer.
    ///
    /// Existing timers are cancelled first, so repeated starts leave exactly
    /// one timer per task. Returns the tasks to poll immediately; the caller
    /// dispatches them once it no longer borrows the session.
    pub fn start(&mut self) -> Vec<PollTask> {
        if self.state == SessionState::Closed {
            tracing::warn!("Ignoring start on a closed session");
            return Vec::new();
        }

        self.timers.clear();
        for task in PollTask::ALL {
            if let Some(period) = self.polling.period(task) {
                let handle = self.scheduler.schedule_every(task, period);
                self.timers.insert(task, handle);
            }
        }
        self.state = SessionState::Running;
        tracing::debug!(timers = self.timers.len(), "Poll session started");

        PollTask::ALL.to_vec()
    }

    /// Cancel timers and abort outstanding requests
    pub fn pause(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        self.timers.clear();
        self.abort_all();
        self.state = SessionState::Paused;
        tracing::debug!("Poll session paused");
    }

    /// Stop for good; later starts are ignored
    pub fn teardown(&mut self) {
        self.pause();
        self.state = SessionState::Closed;
        tracing::debug!("Poll session closed");
    }

    /// Page is being hidden for navigation.
    ///
    /// A page kept in the back/forward cache may be shown again, so it is
    /// only paused; otherwise the session closes.
    pub fn leave_page(&mut self, persisted: bool) {
        if persisted {
            self.pause();
        } else {
            self.teardown();
        }
    }

    /// Register a request about to be sent.
    ///
    /// Returns `None` unless the session is running.
    pub fn begin_request(&mut self) -> Option<(RequestId, AbortRegistration)> {
        if self.state != SessionState::Running {
            return None;
        }
        let (handle, registration) = AbortHandle::new_pair();
        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.in_flight.insert(id, handle);
        Some((id, registration))
    }

    /// Forget a completed request
    pub fn finish_request(&mut self, id: RequestId) {
        self.in_flight.remove(&id);
    }

    /// Abort every request still in flight
    pub fn abort_all(&mut self) {
        for (_, handle) in self.in_flight.drain() {
            handle.abort();
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::testing::FakeBackend;
    use crate::poller::{fetch, PollOutcome};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Live = Rc<RefCell<HashMap<PollTask, usize>>>;

    /// Counts live timers per task; a handle decrements on drop
    #[derive(Default)]
    struct FakeScheduler {
        live: Live,
        periods: RefCell<Vec<(PollTask, Duration)>>,
    }

    struct FakeTimer {
        live: Live,
        task: PollTask,
    }

    impl Drop for FakeTimer {
        fn drop(&mut self) {
            if let Some(count) = self.live.borrow_mut().get_mut(&self.task) {
                *count -= 1;
            }
        }
    }

    impl Scheduler for FakeScheduler {
        type Handle = FakeTimer;

        fn schedule_every(&self, task: PollTask, period: Duration) -> FakeTimer {
            *self.live.borrow_mut().entry(task).or_insert(0) += 1;
            self.periods.borrow_mut().push((task, period));
            FakeTimer {
                live: self.live.clone(),
                task,
            }
        }
    }

    fn session() -> (PollSession<FakeScheduler>, Live) {
        let scheduler = FakeScheduler::default();
        let live = scheduler.live.clone();
        (PollSession::new(scheduler, PollingConfig::default()), live)
    }

    fn live_count(live: &Live, task: PollTask) -> usize {
        live.borrow().get(&task).copied().unwrap_or(0)
    }

    #[test]
    fn test_start_schedules_periodic_tasks() {
        let (mut session, live) = session();
        let due = session.start();

        assert_eq!(due, PollTask::ALL.to_vec());
        assert_eq!(session.timer_count(), 5);
        assert_eq!(live_count(&live, PollTask::Prediction), 0);

        let periods = session.scheduler.periods.borrow();
        assert!(periods.contains(&(PollTask::Realtime, Duration::from_millis(3000))));
        assert!(periods.contains(&(PollTask::Daily, Duration::from_millis(6000))));
        assert!(periods.contains(&(PollTask::Pie, Duration::from_millis(60_000))));
    }

    #[test]
    fn test_hidden_visible_sequence_keeps_one_timer_per_task() {
        let (mut session, live) = session();
        session.start();
        session.pause();
        for task in PollTask::ALL {
            assert_eq!(live_count(&live, task), 0);
        }

        session.start();
        session.start();
        session.pause();
        session.start();

        assert!(session.is_running());
        for task in PollTask::ALL {
            let expected = usize::from(task != PollTask::Prediction);
            assert_eq!(live_count(&live, task), expected, "{}", task);
        }
    }

    #[test]
    fn test_prediction_interval_when_configured() {
        let polling = PollingConfig {
            prediction_ms: Some(60_000),
            ..PollingConfig::default()
        };
        let mut session = PollSession::new(FakeScheduler::default(), polling);
        session.start();
        assert_eq!(session.timer_count(), 6);
    }

    #[test]
    fn test_requests_only_while_running() {
        let (mut session, _) = session();
        assert!(session.begin_request().is_none());

        session.start();
        let (first, _) = session.begin_request().unwrap();
        let (second, _) = session.begin_request().unwrap();
        assert_ne!(first, second);
        assert_eq!(session.in_flight_count(), 2);

        session.finish_request(first);
        assert_eq!(session.in_flight_count(), 1);

        session.pause();
        assert_eq!(session.in_flight_count(), 0);
        assert!(session.begin_request().is_none());
    }

    #[test]
    fn test_teardown_is_final() {
        let (mut session, live) = session();
        session.start();
        session.teardown();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.start().is_empty());
        assert_eq!(live_count(&live, PollTask::Realtime), 0);

        session.pause();
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn test_cached_page_resumes_when_shown_again() {
        let (mut session, live) = session();
        session.start();
        session.begin_request().unwrap();

        session.leave_page(true);
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.in_flight_count(), 0);
        assert!(!session.is_running());
        assert!(session.begin_request().is_none());

        assert_eq!(session.start(), PollTask::ALL.to_vec());
        assert!(session.is_running());
        assert_eq!(live_count(&live, PollTask::Realtime), 1);
    }

    #[test]
    fn test_unloaded_page_closes_session() {
        let (mut session, live) = session();
        session.start();
        session.leave_page(false);

        assert_eq!(session.state(), SessionState::Closed);
        assert!(!session.is_running());
        assert!(session.start().is_empty());
        assert_eq!(live_count(&live, PollTask::Realtime), 0);
    }

    #[tokio::test]
    async fn test_pause_cancels_in_flight_request() {
        let (mut session, _) = session();
        session.start();
        let (_, registration) = session.begin_request().unwrap();
        session.pause();

        let backend = FakeBackend::default().with("/realtime", Ok(json!({"departments": []})));
        let outcome = fetch(&backend, PollTask::Realtime, registration).await;
        assert_eq!(outcome, PollOutcome::Cancelled(PollTask::Realtime));
    }

    #[test]
    fn test_sessions_are_independent() {
        let (mut first, first_live) = session();
        let (mut second, second_live) = session();
        first.start();
        second.start();
        first.teardown();

        assert_eq!(live_count(&first_live, PollTask::Realtime), 0);
        assert_eq!(live_count(&second_live, PollTask::Realtime), 1);
        assert!(second.is_running());
    }
}
