use bwmon_core::{FetchError, PollTarget, Sample};
use std::future::Future;

/// Anything that can produce one bandwidth reading for a target.
///
/// The HTTP backend client is the production implementation; tests plug in
/// scripted sources.
pub trait BandwidthSource: Send + Sync + 'static {
    /// Fetch the current rx/tx throughput for `target`.
    fn fetch(&self, target: &PollTarget) -> impl Future<Output = Result<Sample, FetchError>> + Send;
}
