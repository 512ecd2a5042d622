//! Wires the background tasks together:
//! - bandwidth poller (HTTP backend, 5 s cadence)
//! - config file watcher (live retarget / pause on change)
//! - stdin command reader
//! - terminal renderer

use crate::input::{self, Input};
use anyhow::Result;
use bwmon_config::{commands_for_reload, restart_required, ConfigWatcher, MonitorConfig, TargetConfig};
use bwmon_core::{DashboardView, PollCommand, PollMode, PollTarget};
use bwmon_poller::{spawn_poller, HttpSource, PollSettings, PollerHandle};
use std::io::{self, IsTerminal, Write};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What a stdin command asks the app to do.
#[derive(Debug, Clone, PartialEq)]
enum Action {
    Send(PollCommand),
    Quit,
}

/// Run until Ctrl-C, `quit`, a closed stdout, or the poller exits.
pub async fn run(config_path: PathBuf) -> Result<()> {
    let mut config = bwmon_config::load(&config_path)?;
    info!(
        endpoint = %config.poll.endpoint,
        interval_ms = config.poll.interval_ms,
        "Polling {}",
        config.poll_target()
    );

    let source = HttpSource::new(config.poll.endpoint.clone(), config.poll.request_timeout())?;
    let settings = PollSettings {
        target:   config.poll_target(),
        interval: config.poll.interval(),
        history:  config.poll.history,
        paused:   config.poll.paused,
    };
    let (poller, mut views) = spawn_poller(source, settings);

    let (_watcher, mut reloads) = ConfigWatcher::spawn(&config_path);
    let mut lines = input::spawn_reader();
    let mut stdin_open = true;

    let mut frames = Frames::new(io::stdout().is_terminal());
    let mut drawing = frames.present(&mut io::stdout().lock(), &views.borrow_and_update());

    while drawing.is_continue() {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    warn!("Poller exited");
                    break;
                }
                drawing = frames.present(&mut io::stdout().lock(), &views.borrow_and_update());
            }
            Some(()) = reloads.recv() => {
                reload(&config_path, &mut config, &poller).await?;
            }
            line = lines.recv(), if stdin_open => {
                let Some(line) = line else {
                    stdin_open = false;
                    continue;
                };
                let parsed = input::parse_line(&line).and_then(|typed| {
                    typed
                        .map(|i| action_for(i, &views.borrow(), &config.target))
                        .transpose()
                });
                match parsed {
                    Ok(Some(Action::Send(command))) => poller.send(command).await?,
                    Ok(Some(Action::Quit)) => break,
                    Ok(None) => {}
                    Err(e) => warn!("{e}"),
                }
            }
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!("Failed to listen for Ctrl-C: {e}");
                }
                info!("Shutting down");
                break;
            }
        }
    }

    poller.shutdown().await?;
    Ok(())
}

/// Translate a stdin command into a poller command against the current view.
fn action_for(input: Input, view: &DashboardView, targets: &TargetConfig) -> Result<Action, String> {
    let command = match input {
        Input::Quit   => return Ok(Action::Quit),
        Input::Pause  => PollCommand::Pause,
        Input::Resume => PollCommand::Resume,
        Input::Toggle => match view.mode {
            PollMode::Running => PollCommand::Pause,
            PollMode::Paused  => PollCommand::Resume,
        },
        Input::Address(address) => {
            PollCommand::Reconfigure(PollTarget::new(address, view.target.interface.clone()))
        }
        Input::Interface(interface) => {
            targets.check_interface(&interface).map_err(|e| e.to_string())?;
            PollCommand::Reconfigure(PollTarget::new(view.target.address.clone(), interface))
        }
    };
    Ok(Action::Send(command))
}

/// Re-read the config file and push the differences into the poller.
/// A broken file keeps the running configuration.
async fn reload(path: &Path, config: &mut MonitorConfig, poller: &PollerHandle) -> Result<()> {
    let fresh = match bwmon_config::load(path) {
        Ok(fresh) => fresh,
        Err(e) => {
            warn!("Config reload failed: {e}");
            return Ok(());
        }
    };

    let pending = restart_required(config, &fresh);
    if !pending.is_empty() {
        warn!("Restart required to apply: {}", pending.join(", "));
    }
    for command in commands_for_reload(config, &fresh) {
        poller.send(command).await?;
    }

    *config = fresh;
    info!("Config reloaded");
    Ok(())
}

/// Writes dashboard frames and notices when nobody is reading them any more.
#[derive(Debug)]
struct Frames {
    /// Clear the screen before each frame.
    clear:  bool,
    failed: bool,
}

impl Frames {
    fn new(clear: bool) -> Self {
        Self { clear, failed: false }
    }

    /// Draw one frame. Breaks once stdout is closed; other write errors are
    /// logged once and the next frame tries again.
    fn present(&mut self, out: &mut impl Write, view: &DashboardView) -> ControlFlow<()> {
        match self.draw(out, view) {
            Ok(()) => {
                self.failed = false;
                ControlFlow::Continue(())
            }
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                info!("stdout closed, stopping");
                ControlFlow::Break(())
            }
            Err(e) => {
                if !self.failed {
                    debug!("Failed to draw frame: {e}");
                }
                self.failed = true;
                ControlFlow::Continue(())
            }
        }
    }

    fn draw(&self, out: &mut impl Write, view: &DashboardView) -> io::Result<()> {
        if self.clear {
            // Clear screen, cursor home.
            write!(out, "\x1b[2J\x1b[H")?;
        }
        write!(out, "{}", bwmon_renderer::render(view))?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bwmon_core::{AxisScale, ConnectionStatus};

    fn view(mode: PollMode) -> DashboardView {
        DashboardView {
            samples: Vec::new(),
            status: ConnectionStatus::Disconnected,
            last_reading: None,
            axis: AxisScale::default(),
            mode,
            target: PollTarget::new("192.168.1.166", "ether1"),
        }
    }

    #[test]
    fn toggle_follows_mode() {
        let targets = TargetConfig::default();
        assert_eq!(
            action_for(Input::Toggle, &view(PollMode::Running), &targets),
            Ok(Action::Send(PollCommand::Pause))
        );
        assert_eq!(
            action_for(Input::Toggle, &view(PollMode::Paused), &targets),
            Ok(Action::Send(PollCommand::Resume))
        );
    }

    #[test]
    fn address_keeps_interface() {
        let action = action_for(
            Input::Address("10.0.0.9".into()),
            &view(PollMode::Running),
            &TargetConfig::default(),
        );
        assert_eq!(
            action,
            Ok(Action::Send(PollCommand::Reconfigure(PollTarget::new("10.0.0.9", "ether1"))))
        );
    }

    #[test]
    fn interface_must_be_selectable() {
        let targets = TargetConfig::default();
        let ok = action_for(Input::Interface("ether2".into()), &view(PollMode::Paused), &targets);
        assert_eq!(
            ok,
            Ok(Action::Send(PollCommand::Reconfigure(PollTarget::new("192.168.1.166", "ether2"))))
        );
        assert!(action_for(Input::Interface("wlan0".into()), &view(PollMode::Paused), &targets).is_err());
    }

    #[test]
    fn quit_is_local() {
        assert_eq!(
            action_for(Input::Quit, &view(PollMode::Running), &TargetConfig::default()),
            Ok(Action::Quit)
        );
    }

    /// Writer whose every write fails with the given kind.
    struct Failing(io::ErrorKind);

    impl Write for Failing {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(self.0.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn frame_goes_to_writer() {
        let mut out = Vec::new();
        assert!(Frames::new(false).present(&mut out, &view(PollMode::Running)).is_continue());
        assert!(String::from_utf8_lossy(&out).starts_with("Status: Disconnected"));

        let mut out = Vec::new();
        assert!(Frames::new(true).present(&mut out, &view(PollMode::Running)).is_continue());
        assert!(out.starts_with(b"\x1b[2J\x1b[H"));
    }

    #[test]
    fn closed_stdout_stops_drawing() {
        let mut frames = Frames::new(false);
        let flow = frames.present(&mut Failing(io::ErrorKind::BrokenPipe), &view(PollMode::Running));
        assert_eq!(flow, ControlFlow::Break(()));
    }

    #[test]
    fn other_write_errors_are_retried() {
        let mut frames = Frames::new(false);
        let flow = frames.present(&mut Failing(io::ErrorKind::WouldBlock), &view(PollMode::Running));
        assert_eq!(flow, ControlFlow::Continue(()));
        assert!(frames.failed);

        assert!(frames.present(&mut Vec::new(), &view(PollMode::Running)).is_continue());
        assert!(!frames.failed);
    }
}
