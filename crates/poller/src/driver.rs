use crate::source::BandwidthSource;
use crate::state::{Applied, FetchTicket, PollerState};
use bwmon_core::{DashboardView, FetchError, PollCommand, PollMode, Sample};
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

type InFlight = BoxFuture<'static, (FetchTicket, Result<Sample, FetchError>)>;

/// The polling actor: owns the state, the timer and every outstanding fetch.
pub(crate) struct PollLoop<S> {
    pub(crate) source:   Arc<S>,
    pub(crate) state:    PollerState,
    pub(crate) interval: Duration,
    pub(crate) timer:    Option<Interval>,
    pub(crate) in_flight: FuturesUnordered<InFlight>,
    pub(crate) commands: mpsc::Receiver<PollCommand>,
    pub(crate) views:    watch::Sender<DashboardView>,
}

impl<S: BandwidthSource> PollLoop<S> {
    pub(crate) async fn run(mut self) {
        info!(target_router = %self.state.target(), "Poller started");

        if self.state.mode() == PollMode::Running {
            self.fetch_now();
            self.arm();
        }

        loop {
            tokio::select! {
                command = self.commands.recv() => {
                    // Every handle dropped counts as teardown.
                    let Some(command) = command else { break };
                    if self.handle(command).is_break() {
                        break;
                    }
                }
                _ = next_tick(&mut self.timer) => self.fetch_now(),
                Some((ticket, outcome)) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    self.complete(ticket, outcome);
                }
            }
        }

        self.disarm();
        info!(outstanding = self.in_flight.len(), "Poller stopped");
    }

    fn handle(&mut self, command: PollCommand) -> ControlFlow<()> {
        match command {
            PollCommand::Pause => {
                if self.state.pause() {
                    self.disarm();
                    info!("Polling paused");
                }
            }
            PollCommand::Resume => {
                if self.state.resume() {
                    info!("Polling resumed");
                    self.fetch_now();
                    self.arm();
                }
            }
            PollCommand::Reconfigure(target) => {
                if self.state.retarget(target) {
                    info!(target_router = %self.state.target(), "Target changed; history cleared");
                    if self.state.mode() == PollMode::Running {
                        self.disarm();
                        self.fetch_now();
                        self.arm();
                    }
                }
            }
            PollCommand::Shutdown => return ControlFlow::Break(()),
        }
        self.publish();
        ControlFlow::Continue(())
    }

    fn fetch_now(&mut self) {
        let ticket = self.state.issue();
        debug!(seq = ticket.seq, generation = ticket.generation, "Fetching {}", ticket.target);

        let source = Arc::clone(&self.source);
        self.in_flight.push(Box::pin(async move {
            let outcome = source.fetch(&ticket.target).await;
            (ticket, outcome)
        }));
    }

    fn complete(&mut self, ticket: FetchTicket, outcome: Result<Sample, FetchError>) {
        match self.state.apply(&ticket, outcome) {
            Applied::Appended(sample) => {
                debug!(
                    rx = sample.rx_mbps,
                    tx = sample.tx_mbps,
                    buffered = self.state.buffer().len(),
                    "Sample recorded"
                );
            }
            Applied::Failed(e) => warn!("Fetch from {} failed: {e}", ticket.target),
            Applied::Stale => {
                debug!(seq = ticket.seq, generation = ticket.generation, "Discarded stale response");
                return;
            }
        }
        self.publish();
    }

    fn arm(&mut self) {
        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.timer = Some(ticker);
    }

    fn disarm(&mut self) {
        self.timer = None;
    }

    fn publish(&self) {
        self.views.send_replace(self.state.view());
    }
}

/// Resolves on the next timer tick; never resolves while disarmed.
async fn next_tick(timer: &mut Option<Interval>) {
    match timer {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
