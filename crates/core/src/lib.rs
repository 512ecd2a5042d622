pub mod buffer;
pub mod error;
pub mod event;
pub mod state;
pub mod ticks;

pub use buffer::{SampleBuffer, DEFAULT_CAPACITY};
pub use error::{FetchError, MonitorError, Result};
pub use event::PollCommand;
pub use state::{ConnectionStatus, DashboardView, PollMode, PollTarget, Sample};
pub use ticks::{compute_ticks, AxisScale};
