use crate::state::PollTarget;

/// Commands accepted by the polling loop.
///
/// Sources:
/// - stdin command reader → `Pause`, `Resume`, `Reconfigure`, `Shutdown`
/// - Config watcher task  → `Reconfigure`, `Pause`, `Resume`
/// - Ctrl-C handler       → `Shutdown`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollCommand {
    /// Stop scheduling fetches. In-flight fetches still land.
    Pause,
    /// Fetch immediately, then resume the periodic schedule.
    Resume,
    /// Point the loop at a different router or interface; clears history.
    Reconfigure(PollTarget),
    /// Tear the loop down. Terminal.
    Shutdown,
}
