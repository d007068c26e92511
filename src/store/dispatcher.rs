//! Serialized runner for a store shared by many writers
//!
//! User input, system callbacks and background timers all hold a
//! [`Dispatcher`]. Their actions queue up on one channel and a single task
//! owns the [`Store`], so the reducer never sees two concurrent writers.

use std::fmt::Debug;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use super::engine::{DispatchError, Store};

struct Envelope<A> {
    action: A,
    reply: Option<oneshot::Sender<Result<(), DispatchError>>>,
}

/// Cloneable entry point into a running store.
pub struct Dispatcher<A> {
    tx: mpsc::UnboundedSender<Envelope<A>>,
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

/// Dispatcher that does not keep the store alive. Effects that feed events back
/// into their own store hold one of these.
pub struct WeakDispatcher<A> {
    tx: mpsc::WeakUnboundedSender<Envelope<A>>,
}

impl<A> Clone for WeakDispatcher<A> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

/// Receiving half, consumed by [`Store::spawn`].
pub struct Inbox<A> {
    rx: mpsc::UnboundedReceiver<Envelope<A>>,
}

pub fn channel<A>() -> (Dispatcher<A>, Inbox<A>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Dispatcher { tx }, Inbox { rx })
}

impl<A: Debug> Dispatcher<A> {
    /// Queue `action` without waiting for it to be reduced. Chain failures are
    /// logged by the store task.
    pub fn dispatch(&self, action: A) {
        if let Err(rejected) = self.tx.send(Envelope { action, reply: None }) {
            tracing::warn!(action = ?rejected.0.action, "Dispatch after store shut down");
        }
    }

    /// Queue `action` and wait for the chain outcome.
    pub async fn dispatch_and_wait(&self, action: A) -> Result<(), DispatchError> {
        let (reply, outcome) = oneshot::channel();
        self.tx
            .send(Envelope { action, reply: Some(reply) })
            .map_err(|_| DispatchError::Closed)?;
        outcome.await.map_err(|_| DispatchError::Closed)?
    }

    pub fn downgrade(&self) -> WeakDispatcher<A> {
        WeakDispatcher { tx: self.tx.downgrade() }
    }
}

impl<A: Debug> WeakDispatcher<A> {
    /// Queue `action` if the store is still running. Returns `false` once every
    /// strong dispatcher is gone.
    pub fn dispatch(&self, action: A) -> bool {
        match self.tx.upgrade() {
            Some(tx) => tx.send(Envelope { action, reply: None }).is_ok(),
            None => {
                tracing::trace!(?action, "Dropping action for stopped store");
                false
            }
        }
    }
}

impl<S, A> Store<S, A>
where
    S: Clone + PartialEq + Send + Sync + 'static,
    A: Debug + Send + 'static,
{
    /// Move the store onto its own task. Returns the state accessor, notified
    /// only when a dispatch actually changes the committed state.
    ///
    /// The task ends once every strong [`Dispatcher`] has been dropped.
    pub fn spawn(mut self, mut inbox: Inbox<A>) -> (watch::Receiver<S>, JoinHandle<()>) {
        let (state_tx, state_rx) = watch::channel(self.state().clone());

        let handle = tokio::spawn(async move {
            while let Some(Envelope { action, reply }) = inbox.rx.recv().await {
                let label = format!("{action:?}");
                let outcome = match self.dispatch(action) {
                    Ok(latest) => {
                        let latest = latest.clone();
                        state_tx.send_if_modified(|current| {
                            if *current == latest {
                                false
                            } else {
                                *current = latest;
                                true
                            }
                        });
                        Ok(())
                    }
                    Err(e) => {
                        tracing::error!(action = %label, error = %e, "Dispatch failed, state unchanged");
                        Err(e)
                    }
                };

                if let Some(reply) = reply {
                    let _ = reply.send(outcome);
                }
            }
            tracing::debug!("Store task finished");
        });

        (state_rx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{middleware, pre_reducer};

    fn add(state: &i64, n: i64) -> i64 {
        state + n
    }

    #[tokio::test]
    async fn dispatch_and_wait_publishes_committed_state() {
        let (dispatcher, inbox) = channel();
        let (state, _task) = Store::new(0, add, Vec::new()).spawn(inbox);

        dispatcher.dispatch_and_wait(4).await.unwrap();
        dispatcher.dispatch_and_wait(-1).await.unwrap();

        assert_eq!(*state.borrow(), 3);
    }

    #[tokio::test]
    async fn chain_failure_reaches_the_waiting_caller() {
        let (dispatcher, inbox) = channel();
        let reject_negative = middleware(|_: &i64, n: i64, next| {
            if n < 0 {
                return Err(anyhow::anyhow!("negative step {n}").into());
            }
            next(n)
        });
        let (state, _task) = Store::new(10, add, vec![reject_negative]).spawn(inbox);

        let err = dispatcher.dispatch_and_wait(-3).await.unwrap_err();

        assert!(matches!(err, DispatchError::Middleware(_)));
        assert_eq!(*state.borrow(), 10);
    }

    #[tokio::test]
    async fn unchanged_state_does_not_notify_observers() {
        let (dispatcher, inbox) = channel();
        let (mut state, _task) = Store::new(5, add, Vec::new()).spawn(inbox);
        state.mark_unchanged();

        dispatcher.dispatch_and_wait(0).await.unwrap();

        assert!(!state.has_changed().unwrap());
    }

    #[tokio::test]
    async fn dispatch_from_inside_the_chain_is_queued_not_reentrant() {
        let (dispatcher, inbox) = channel();
        let weak = dispatcher.downgrade();
        let echo = pre_reducer(move |_: &i64, n: &i64| {
            if *n == 1 {
                weak.dispatch(100);
            }
        });
        let (mut state, _task) = Store::new(0, add, vec![echo]).spawn(inbox);

        dispatcher.dispatch_and_wait(1).await.unwrap();
        let settled = state.wait_for(|value| *value == 101).await.unwrap();

        assert_eq!(*settled, 101);
    }

    #[tokio::test]
    async fn store_stops_when_only_weak_dispatchers_remain() {
        let (dispatcher, inbox) = channel::<i64>();
        let weak = dispatcher.downgrade();
        let (_state, task) = Store::new(0, add, Vec::new()).spawn(inbox);

        drop(dispatcher);
        task.await.unwrap();

        assert!(!weak.dispatch(1));
    }

    #[tokio::test]
    async fn dispatch_to_a_finished_store_reports_closed() {
        let (dispatcher, inbox) = channel::<i64>();
        drop(inbox);

        let err = dispatcher.dispatch_and_wait(1).await.unwrap_err();

        assert!(matches!(err, DispatchError::Closed));
    }
}
