//! Bandwidth polling loop.
//!
//! [`spawn_poller`] starts a background task that fetches a reading from a
//! [`BandwidthSource`] every interval, keeps a bounded history and publishes
//! a fresh [`DashboardView`] after every change.

mod driver;
pub mod http;
pub mod source;
pub mod state;
pub mod wire;

pub use http::HttpSource;
pub use source::BandwidthSource;
pub use state::{Applied, FetchTicket, PollerState};

use bwmon_core::{DashboardView, MonitorError, PollCommand, PollMode, PollTarget, Result, DEFAULT_CAPACITY};
use driver::PollLoop;
use futures::stream::FuturesUnordered;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default time between fetches.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5_000);

/// Start-up parameters for the polling loop.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub target:   PollTarget,
    pub interval: Duration,
    /// Samples kept in the history buffer.
    pub history:  usize,
    pub paused:   bool,
}

impl PollSettings {
    pub fn new(target: PollTarget) -> Self {
        Self {
            target,
            interval: DEFAULT_INTERVAL,
            history: DEFAULT_CAPACITY,
            paused: false,
        }
    }
}

/// Control handle for a running poller.
///
/// Dropping the handle and every sender obtained from [`PollerHandle::sender`]
/// tears the poller down.
#[derive(Debug)]
pub struct PollerHandle {
    tx:   mpsc::Sender<PollCommand>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Queue a command for the poller.
    pub async fn send(&self, command: PollCommand) -> Result<()> {
        self.tx
            .send(command)
            .await
            .map_err(|_| MonitorError::Poller("poller has stopped".into()))
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(PollCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<()> {
        self.send(PollCommand::Resume).await
    }

    pub async fn reconfigure(&self, target: PollTarget) -> Result<()> {
        self.send(PollCommand::Reconfigure(target)).await
    }

    /// A sender other tasks can use to drive the poller.
    pub fn sender(&self) -> mpsc::Sender<PollCommand> {
        self.tx.clone()
    }

    /// Stop the poller and wait for its task to finish.
    pub async fn shutdown(self) -> Result<()> {
        // A closed channel means the loop already exited.
        let _ = self.tx.send(PollCommand::Shutdown).await;
        self.task
            .await
            .map_err(|e| MonitorError::Poller(format!("poller task failed: {e}")))
    }
}

/// Spawn the polling loop on the current Tokio runtime.
///
/// Returns the control handle and a receiver that always holds the latest
/// [`DashboardView`].
pub fn spawn_poller<S: BandwidthSource>(
    source: S,
    settings: PollSettings,
) -> (PollerHandle, watch::Receiver<DashboardView>) {
    let mode = if settings.paused {
        PollMode::Paused
    } else {
        PollMode::Running
    };
    let state = PollerState::new(settings.target, mode, settings.history);
    let (views, view_rx) = watch::channel(state.view());
    let (tx, commands) = mpsc::channel(16);

    let poll_loop = PollLoop {
        source: Arc::new(source),
        state,
        interval: settings.interval,
        timer: None,
        in_flight: FuturesUnordered::new(),
        commands,
        views,
    };
    let task = tokio::spawn(poll_loop.run());

    (PollerHandle { tx, task }, view_rx)
}
