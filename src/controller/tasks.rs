//! Cancellable background tasks scoped to session lifecycle

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Slot holding at most one running task.
///
/// Cancelling is idempotent, and dropping the slot cancels whatever it holds,
/// so a task never outlives the owner it belongs to.
pub struct ScheduledTask {
    name: &'static str,
    handle: Option<JoinHandle<()>>,
}

impl ScheduledTask {
    pub fn new(name: &'static str) -> Self {
        Self { name, handle: None }
    }

    /// Replace the current task, cancelling the previous one.
    pub fn replace(&mut self, handle: JoinHandle<()>) {
        self.cancel();
        tracing::trace!(task = self.name, "Task scheduled");
        self.handle = Some(handle);
    }

    /// Abort the task if one is held. Returns whether anything was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                handle.abort();
                tracing::trace!(task = self.name, "Task cancelled");
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Run `tick` every `period`, starting one period from now, until it returns
/// `false`.
pub fn every<F>(period: Duration, mut tick: F) -> JoinHandle<()>
where
    F: FnMut() -> bool + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if !tick() {
                break;
            }
        }
    })
}

/// Run `action` once after `delay`.
pub fn after<F>(delay: Duration, action: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        action();
    })
}

/// Run `future` to completion and hand its output to `deliver`.
pub fn resolve<Fut, F>(future: Fut, deliver: F) -> JoinHandle<()>
where
    Fut: Future + Send + 'static,
    Fut::Output: Send,
    F: FnOnce(Fut::Output) + Send + 'static,
{
    tokio::spawn(async move {
        let output = future.await;
        deliver(output);
    })
}
