//! Turning a reloaded config file into poller commands.

use crate::schema::MonitorConfig;
use bwmon_core::PollCommand;

/// Commands that move a poller running `old` onto `new`.
///
/// When polling is being paused the pause goes first, so the reconfigure
/// does not trigger a fetch. When it is being resumed the reconfigure goes
/// first, so the resume fetch hits the new target.
pub fn commands_for_reload(old: &MonitorConfig, new: &MonitorConfig) -> Vec<PollCommand> {
    let retarget = (old.poll_target() != new.poll_target())
        .then(|| PollCommand::Reconfigure(new.poll_target()));

    let toggle = match (old.poll.paused, new.poll.paused) {
        (false, true) => Some(PollCommand::Pause),
        (true, false) => Some(PollCommand::Resume),
        _ => None,
    };

    if new.poll.paused {
        toggle.into_iter().chain(retarget).collect()
    } else {
        retarget.into_iter().chain(toggle).collect()
    }
}

/// Settings that only take effect after a restart.
pub fn restart_required(old: &MonitorConfig, new: &MonitorConfig) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if old.poll.endpoint != new.poll.endpoint {
        fields.push("poll.endpoint");
    }
    if old.poll.interval_ms != new.poll.interval_ms {
        fields.push("poll.interval_ms");
    }
    if old.poll.request_timeout_ms != new.poll.request_timeout_ms {
        fields.push("poll.request_timeout_ms");
    }
    if old.poll.history != new.poll.history {
        fields.push("poll.history");
    }
    fields
}
