//! Liveness poller

use super::environment::{PageEnvironment, PageSignals, Visibility};
use crate::config::PollingConfig;
use crate::utils::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
enum Trigger {
    Interval,
    BecameVisible,
    BackOnline,
    Focus,
}

/// Periodic refresh adapting its cadence to page visibility and connectivity
#[derive(Debug, Clone, Copy)]
pub struct LivenessPoller {
    visible_interval: Duration,
    hidden_interval: Duration,
}

impl LivenessPoller {
    pub fn new(config: &PollingConfig) -> Self {
        Self::with_intervals(config.visible_interval(), config.hidden_interval())
    }

    pub fn with_intervals(visible_interval: Duration, hidden_interval: Duration) -> Self {
        Self {
            visible_interval,
            hidden_interval,
        }
    }

    fn interval(&self, visible: bool) -> Duration {
        if visible {
            self.visible_interval
        } else {
            self.hidden_interval
        }
    }

    /// Subscribe to `environment` and start refreshing. Dropping the handle stops everything.
    pub fn start<F, Fut>(&self, environment: &PageEnvironment, refresh: F) -> PollerHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let (shutdown, shutdown_rx) = oneshot::channel();
        let signals = environment.signals();
        let poller = *self;

        let task = tokio::spawn(async move {
            poller.run(signals, refresh, shutdown_rx).await;
        });

        PollerHandle {
            shutdown: Some(shutdown),
            task: Some(task),
        }
    }

    async fn run<F, Fut>(
        self,
        mut signals: PageSignals,
        refresh: F,
        mut shutdown: oneshot::Receiver<()>,
    ) where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let mut visible = *signals.visibility.borrow_and_update() == Visibility::Visible;
        let mut online = *signals.online.borrow_and_update();
        let mut deadline = Instant::now() + self.interval(visible);
        debug!(
            "Poller started ({:?} visible / {:?} hidden)",
            self.visible_interval, self.hidden_interval
        );

        loop {
            let trigger = tokio::select! {
                _ = &mut shutdown => break,
                _ = sleep_until(deadline) => {
                    deadline = Instant::now() + self.interval(visible);
                    Trigger::Interval
                }
                changed = signals.visibility.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let now_visible = *signals.visibility.borrow_and_update() == Visibility::Visible;
                    if now_visible == visible {
                        continue;
                    }
                    visible = now_visible;
                    deadline = Instant::now() + self.interval(visible);
                    if !visible {
                        continue;
                    }
                    Trigger::BecameVisible
                }
                changed = signals.online.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let was_online = online;
                    online = *signals.online.borrow_and_update();
                    if was_online || !online {
                        continue;
                    }
                    Trigger::BackOnline
                }
                event = signals.focus.recv() => match event {
                    Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => Trigger::Focus,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            if !(online && visible) {
                debug!("Skipping {:?} refresh (online: {}, visible: {})", trigger, online, visible);
                continue;
            }

            debug!("Refreshing on {:?}", trigger);
            let result = tokio::select! {
                _ = &mut shutdown => break,
                result = refresh() => result,
            };
            match result {
                Ok(()) => {}
                Err(e) if e.is_retryable() => {
                    debug!("Transient refresh failure, retrying next cycle: {}", e);
                }
                Err(e) => warn!("Refresh failed: {}", e),
            }
        }

        debug!("Poller stopped");
    }
}

/// Owns the poller task and its listeners
#[derive(Debug)]
pub struct PollerHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop and wait for the task to wind down
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
