//! Poller state, kept free of timers and I/O so every transition can be
//! driven directly.

use bwmon_core::{
    AxisScale, ConnectionStatus, DashboardView, FetchError, PollMode, PollTarget, Sample,
    SampleBuffer,
};

/// Identifies one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Target generation the fetch was issued under.
    pub generation: u64,
    /// Monotonic issue number across the poller's lifetime.
    pub seq: u64,
    pub target: PollTarget,
}

/// What applying a fetch outcome did to the state.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// Sample stored, status now `Connected`.
    Appended(Sample),
    /// Nothing stored, status now `Disconnected`.
    Failed(FetchError),
    /// Outcome belonged to an old target or was superseded by a newer fetch.
    Stale,
}

/// Everything the polling loop owns apart from its timer and in-flight requests.
#[derive(Debug, Clone)]
pub struct PollerState {
    target:       PollTarget,
    mode:         PollMode,
    buffer:       SampleBuffer,
    status:       ConnectionStatus,
    last_reading: Option<i64>,
    generation:   u64,
    last_issued:  u64,
}

impl PollerState {
    pub fn new(target: PollTarget, mode: PollMode, capacity: usize) -> Self {
        Self {
            target,
            mode,
            buffer: SampleBuffer::with_capacity(capacity),
            status: ConnectionStatus::Disconnected,
            last_reading: None,
            generation: 0,
            last_issued: 0,
        }
    }

    /// Record a new fetch against the current target.
    pub fn issue(&mut self) -> FetchTicket {
        self.last_issued += 1;
        FetchTicket {
            generation: self.generation,
            seq: self.last_issued,
            target: self.target.clone(),
        }
    }

    /// Whether an outcome for `ticket` would still be accepted.
    #[must_use]
    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && ticket.seq == self.last_issued
    }

    /// Fold a fetch outcome into the state.
    pub fn apply(&mut self, ticket: &FetchTicket, outcome: Result<Sample, FetchError>) -> Applied {
        if !self.is_current(ticket) {
            return Applied::Stale;
        }
        match outcome {
            Ok(sample) => {
                self.buffer.append(sample);
                self.status = ConnectionStatus::Connected;
                self.last_reading = Some(sample.timestamp);
                Applied::Appended(sample)
            }
            Err(e) => {
                self.status = ConnectionStatus::Disconnected;
                Applied::Failed(e)
            }
        }
    }

    /// Returns `false` if already paused.
    pub fn pause(&mut self) -> bool {
        let changed = self.mode == PollMode::Running;
        self.mode = PollMode::Paused;
        changed
    }

    /// Returns `false` if already running.
    pub fn resume(&mut self) -> bool {
        let changed = self.mode == PollMode::Paused;
        self.mode = PollMode::Running;
        changed
    }

    /// Switch to `target`, dropping history and invalidating every
    /// outstanding fetch. Returns `false` if the target is unchanged.
    pub fn retarget(&mut self, target: PollTarget) -> bool {
        if target == self.target {
            return false;
        }
        self.target = target;
        self.buffer.clear();
        self.generation += 1;
        true
    }

    /// Read-only snapshot for the presentation layer.
    pub fn view(&self) -> DashboardView {
        DashboardView {
            samples: self.buffer.snapshot(),
            status: self.status,
            last_reading: self.last_reading,
            axis: AxisScale::for_buffer(&self.buffer),
            mode: self.mode,
            target: self.target.clone(),
        }
    }

    pub fn target(&self) -> &PollTarget {
        &self.target
    }

    pub fn mode(&self) -> PollMode {
        self.mode
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn last_reading(&self) -> Option<i64> {
        self.last_reading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
