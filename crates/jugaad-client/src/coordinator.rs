//! Dependent-fetch coordination.
//!
//! A consumer (item list, item detail) declares its prerequisites; the
//! coordinator issues the fetch exactly once when the full prerequisite
//! snapshot first appears, re-fetches only when the snapshot value actually
//! changes, and keeps at most one fetch in flight. Snapshot changes that
//! arrive while a fetch is running coalesce into a single follow-up fetch:
//! the `tokio::sync::watch` channel between publisher and coordinator only
//! ever retains the newest value.
//!
//! Fetch failures are recorded and reported on a notice channel; the
//! previous successful result stays in view state so a transient error never
//! blanks the UI.

use futures::future::BoxFuture;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::ApiError;

/// What a consumer renders: the last good data, the last error (if the most
/// recent fetch failed), and whether a fetch is currently running.
#[derive(Debug, Clone)]
pub struct ViewState<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub in_flight: bool,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            in_flight: false,
        }
    }
}

/// Non-blocking failure report, the library-level equivalent of a toast.
#[derive(Debug, Clone)]
pub struct FetchNotice {
    pub consumer: &'static str,
    pub message: String,
}

/// Publisher for a consumer with a single gating prerequisite.
///
/// Publishes `Some(value)` once set, suppressing value-equal republishes so
/// irrelevant churn never wakes the coordinator.
pub struct Prerequisite<A> {
    tx: watch::Sender<Option<A>>,
}

impl<A: Clone + PartialEq> Prerequisite<A> {
    #[must_use]
    pub fn channel() -> (Self, watch::Receiver<Option<A>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }

    pub fn set(&self, value: A) {
        let next = Some(value);
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Publisher for a consumer gated on both identity and location.
///
/// Nothing is published until every slot has been filled at least once;
/// after that, each slot update publishes a fresh complete snapshot (again
/// suppressing value-equal republishes).
pub struct Prerequisites<I, L> {
    identity: Option<I>,
    location: Option<L>,
    tx: watch::Sender<Option<(I, L)>>,
}

impl<I, L> Prerequisites<I, L>
where
    I: Clone + PartialEq,
    L: Clone + PartialEq,
{
    #[must_use]
    pub fn channel() -> (Self, watch::Receiver<Option<(I, L)>>) {
        let (tx, rx) = watch::channel(None);
        (
            Self {
                identity: None,
                location: None,
                tx,
            },
            rx,
        )
    }

    pub fn set_identity(&mut self, identity: I) {
        self.identity = Some(identity);
        self.publish();
    }

    pub fn set_location(&mut self, location: L) {
        self.location = Some(location);
        self.publish();
    }

    fn publish(&self) {
        let (Some(identity), Some(location)) = (&self.identity, &self.location) else {
            return;
        };
        let next = Some((identity.clone(), location.clone()));
        self.tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Owns the background fetch task for one consumer and exposes its view
/// state and failure notices.
///
/// Dropping the coordinator aborts the task, so a response arriving after
/// view teardown can never write into dead state.
pub struct FetchCoordinator<T> {
    state: watch::Receiver<ViewState<T>>,
    notices: mpsc::UnboundedReceiver<FetchNotice>,
    task: JoinHandle<()>,
}

impl<T> Drop for FetchCoordinator<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T> FetchCoordinator<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawns the fetch loop for one logical consumer.
    ///
    /// `prereqs` holds `None` until every gating prerequisite has resolved;
    /// the loop never fetches while it is `None`. The loop exits when the
    /// publisher side is dropped.
    pub fn spawn<A, F>(
        consumer: &'static str,
        mut prereqs: watch::Receiver<Option<A>>,
        mut fetch: F,
    ) -> Self
    where
        A: Clone + PartialEq + Send + Sync + 'static,
        F: FnMut(A) -> BoxFuture<'static, Result<T, ApiError>> + Send + 'static,
    {
        let (state_tx, state_rx) = watch::channel(ViewState::default());
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(async move {
            let mut last_fetched: Option<A> = None;
            loop {
                // Wait for a complete snapshot that differs from the one the
                // previous fetch used. Updates that arrived while a fetch was
                // in flight are sitting in the channel as one coalesced
                // newest value, so at most one follow-up fetch results.
                let args = loop {
                    let snapshot = prereqs.borrow_and_update().clone();
                    match snapshot {
                        Some(args) if last_fetched.as_ref() != Some(&args) => break args,
                        _ => {
                            if prereqs.changed().await.is_err() {
                                // Publisher dropped: the view is gone.
                                return;
                            }
                        }
                    }
                };

                state_tx.send_modify(|state| state.in_flight = true);
                let result = fetch(args.clone()).await;
                last_fetched = Some(args);

                match result {
                    Ok(data) => {
                        state_tx.send_modify(|state| {
                            state.data = Some(data);
                            state.error = None;
                            state.in_flight = false;
                        });
                    }
                    Err(err) => {
                        tracing::warn!(
                            consumer,
                            error = %err,
                            "dependent fetch failed; keeping previous data"
                        );
                        let _ = notice_tx.send(FetchNotice {
                            consumer,
                            message: format!("Could not refresh {consumer}: {err}"),
                        });
                        state_tx.send_modify(|state| {
                            state.error = Some(err.to_string());
                            state.in_flight = false;
                        });
                    }
                }
            }
        });

        Self {
            state: state_rx,
            notices: notice_rx,
            task,
        }
    }

    /// Snapshot of the current view state.
    #[must_use]
    pub fn state(&self) -> ViewState<T> {
        self.state.borrow().clone()
    }

    /// Waits for the next view-state change. Returns `false` once the fetch
    /// task has exited.
    pub async fn state_changed(&mut self) -> bool {
        self.state.changed().await.is_ok()
    }

    /// A receiver for rendering the state reactively.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewState<T>> {
        self.state.clone()
    }

    /// Next failure notice, if one is queued.
    pub fn try_notice(&mut self) -> Option<FetchNotice> {
        self.notices.try_recv().ok()
    }

    /// Waits for the next failure notice.
    pub async fn next_notice(&mut self) -> Option<FetchNotice> {
        self.notices.recv().await
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
