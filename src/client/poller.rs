//! Fixed-interval polling of homework review statuses

use compact_str::{CompactString, format_compact};
use tokio::{sync::broadcast, time::sleep};
use tracing::{debug, error, info, instrument};

use super::{api::HomeworkSource, config::PollingConfig};
use crate::{
    cursor::Cursor,
    domain::{check_response, current_date, parse_status},
    notifier::Notify,
    result::Result,
};

/// What a successful cycle did
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    Notified(CompactString),
    NoUpdates,
}

/// Polls one subject, one cycle at a time, forwarding changes to the notifier
///
/// The cursor is only advanced by a fully successful cycle, so a failed or
/// incomplete response is re-requested over the same window next time.
#[derive(Debug)]
pub struct HomeworkPoller<S, N> {
    source: S,
    notifier: N,
    config: PollingConfig,
    cursor: Cursor,
    shutdown_tx: broadcast::Sender<()>,
}

impl<S: HomeworkSource, N: Notify> HomeworkPoller<S, N> {
    /// Create a poller whose window starts now
    pub fn new(source: S, notifier: N, config: PollingConfig) -> Self {
        Self::with_cursor(source, notifier, config, Cursor::now())
    }

    pub fn with_cursor(source: S, notifier: N, config: PollingConfig, cursor: Cursor) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Self { source, notifier, config, cursor, shutdown_tx }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[cfg(test)]
    fn notifier(&self) -> &N {
        &self.notifier
    }

    #[cfg(test)]
    fn source(&self) -> &S {
        &self.source
    }

    /// Get a shutdown sender for external shutdown control
    pub fn shutdown_sender(&self) -> broadcast::Sender<()> {
        self.shutdown_tx.clone()
    }

    /// Poll until a shutdown signal arrives
    ///
    /// Every cycle is followed by the same fixed delay, whatever its outcome.
    /// The shutdown signal is only observed while sleeping between cycles.
    #[instrument(skip(self), fields(interval = ?self.config.retry_interval))]
    pub async fn run(&mut self) {
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        info!(cursor = %self.cursor, "Starting homework poller");

        loop {
            self.tick().await;

            tokio::select! {
                _ = sleep(self.config.retry_interval) => {}
                _ = shutdown_rx.recv() => {
                    info!("Homework poller received shutdown signal");
                    break;
                }
            }
        }

        debug!("Homework polling loop ended");
    }

    /// Run one cycle, reporting any failure instead of returning it
    pub async fn tick(&mut self) -> Option<CycleOutcome> {
        match self.run_cycle().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                let message = format_compact!("Program failure: {e}");
                if e.is_fatal() {
                    error!(error = %e, cursor = %self.cursor, "Fatal transport failure, cycle aborted");
                } else {
                    error!(error = %e, cursor = %self.cursor, "Poll cycle failed");
                }
                self.notifier.notify(&message).await;
                None
            },
        }
    }

    /// Fetch, validate, notify and advance the cursor
    #[instrument(skip(self), fields(cursor = %self.cursor))]
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let response = self.source.fetch(self.cursor).await?;

        let homeworks = check_response(&response)?;

        let outcome = match homeworks.first() {
            Some(latest) => {
                let message = parse_status(latest)?;
                self.notifier.notify(&message).await;
                CycleOutcome::Notified(message)
            },
            None => {
                debug!("No new homework statuses");
                CycleOutcome::NoUpdates
            },
        };

        if let Some(next) = current_date(&response) {
            debug!(from = %self.cursor, to = %next, "Advancing cursor");
            self.cursor = next;
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        collections::VecDeque,
        time::Duration,
    };

    use serde_json::{Value, json};

    use super::*;
    use crate::{domain::HomeworkStatus, result::WatchError};

    /// Replays canned responses and remembers the cursors it was asked for
    #[derive(Default)]
    struct ScriptedSource {
        responses: RefCell<VecDeque<Result<Value>>>,
        cursors: RefCell<Vec<Cursor>>,
    }

    impl ScriptedSource {
        fn new(responses: impl IntoIterator<Item = Result<Value>>) -> Self {
            Self { responses: RefCell::new(responses.into_iter().collect()), ..Default::default() }
        }
    }

    impl HomeworkSource for ScriptedSource {
        async fn fetch(&self, cursor: Cursor) -> Result<Value> {
            self.cursors.borrow_mut().push(cursor);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(json!({"homeworks": []})))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: RefCell<Vec<String>>,
        calls: Cell<usize>,
    }

    impl Notify for RecordingNotifier {
        async fn notify(&self, message: &str) {
            self.calls.set(self.calls.get() + 1);
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    fn poller(
        responses: impl IntoIterator<Item = Result<Value>>,
    ) -> HomeworkPoller<ScriptedSource, RecordingNotifier> {
        HomeworkPoller::with_cursor(
            ScriptedSource::new(responses),
            RecordingNotifier::default(),
            PollingConfig { retry_interval: Duration::from_secs(600) },
            Cursor::from_secs(1_000),
        )
    }

    fn transport_error() -> WatchError {
        WatchError::Transport("error sending request: connection refused".into())
    }

    fn decode_error() -> WatchError {
        WatchError::Decode {
            endpoint: "/api/user_api/homework_statuses/".into(),
            message: "expected value at line 1 column 1".into(),
        }
    }

    #[tokio::test]
    async fn approved_record_is_forwarded_and_cursor_advances() {
        let mut poller = poller([Ok(json!({
            "homeworks": [{"homework_name": "lab1", "status": "approved"}],
            "current_date": 1700000000
        }))]);

        let outcome = poller.tick().await;

        let expected = format!(
            "Changed review status of \"lab1\". {}",
            HomeworkStatus::Approved.verdict()
        );
        assert_eq!(outcome, Some(CycleOutcome::Notified(expected.as_str().into())));
        assert_eq!(*poller.notifier().messages.borrow(), vec![expected]);
        assert_eq!(poller.cursor(), Cursor::from_secs(1_700_000_000));
    }

    #[tokio::test]
    async fn only_first_record_is_reported() {
        let mut poller = poller([Ok(json!({
            "homeworks": [
                {"homework_name": "lab2", "status": "reviewing"},
                {"homework_name": "lab1", "status": "rejected"}
            ]
        }))]);

        poller.tick().await;

        let messages = poller.notifier().messages.borrow();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("lab2"));
    }

    #[tokio::test]
    async fn empty_list_sends_nothing() {
        let mut poller = poller([Ok(json!({"homeworks": [], "current_date": 2_000}))]);

        assert_eq!(poller.tick().await, Some(CycleOutcome::NoUpdates));
        assert_eq!(poller.notifier().calls.get(), 0);
        assert_eq!(poller.cursor(), Cursor::from_secs(2_000));
    }

    #[tokio::test]
    async fn cursor_moves_only_when_current_date_is_present() {
        let mut poller = poller([
            Ok(json!({"homeworks": [], "current_date": 1_500})),
            Ok(json!({"homeworks": []})),
            Ok(json!({"homeworks": []})),
        ]);

        poller.tick().await;
        assert_eq!(poller.cursor(), Cursor::from_secs(1_500));
        poller.tick().await;
        assert_eq!(poller.cursor(), Cursor::from_secs(1_500));
        poller.tick().await;

        assert_eq!(
            *poller.source().cursors.borrow(),
            vec![Cursor::from_secs(1_000), Cursor::from_secs(1_500), Cursor::from_secs(1_500)]
        );
    }

    #[tokio::test]
    async fn unknown_status_reports_failure_and_keeps_cursor() {
        let mut poller = poller([Ok(json!({
            "homeworks": [{"homework_name": "lab1", "status": "archived"}],
            "current_date": 1700000000
        }))]);

        assert_eq!(
            poller.run_cycle().await,
            Err(WatchError::UnknownStatus("archived".into()))
        );
        assert_eq!(poller.cursor(), Cursor::from_secs(1_000));
    }

    #[tokio::test]
    async fn failed_cycle_sends_failure_notification() {
        let mut poller = poller([Ok(json!({
            "homeworks": [{"homework_name": "lab1", "status": "archived"}],
            "current_date": 1700000000
        }))]);

        assert_eq!(poller.tick().await, None);

        let messages = poller.notifier().messages.borrow();
        assert_eq!(
            *messages,
            vec!["Program failure: Undocumented homework status: archived".to_string()]
        );
        assert_eq!(poller.cursor(), Cursor::from_secs(1_000));
    }

    #[tokio::test]
    async fn shape_and_decode_failures_are_reported() {
        let mut poller = poller([Ok(json!({"homeworks": "x"})), Err(decode_error())]);

        assert_eq!(poller.tick().await, None);
        assert_eq!(poller.tick().await, None);

        let messages = poller.notifier().messages.borrow();
        assert!(messages[0].contains("is not a list"));
        assert!(messages[1].starts_with("Program failure: Failed to decode JSON"));
    }

    #[tokio::test(start_paused = true)]
    async fn loop_keeps_polling_after_failures_until_shutdown() {
        let interval = Duration::from_secs(600);
        let mut poller = HomeworkPoller::with_cursor(
            ScriptedSource::new([Err(transport_error()), Ok(json!({}))]),
            RecordingNotifier::default(),
            PollingConfig { retry_interval: interval },
            Cursor::from_secs(1_000),
        );
        let shutdown = poller.shutdown_sender();

        let stopper = async {
            sleep(interval * 2 + Duration::from_secs(1)).await;
            shutdown.send(()).unwrap();
        };
        tokio::join!(poller.run(), stopper);

        // t=0 transport failure, t=600 missing key, t=1200 empty list
        assert_eq!(poller.source().cursors.borrow().len(), 3);
        let messages = poller.notifier().messages.borrow();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Program failure: Review API is unreachable"));
    }
}
