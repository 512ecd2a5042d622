//! Line commands typed on stdin.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::warn;

/// A parsed stdin command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Pause,
    Resume,
    /// Pause when running, resume when paused.
    Toggle,
    Address(String),
    Interface(String),
    Quit,
}

/// Parse one line. Blank lines yield `Ok(None)`.
///
/// Format: `command [argument]`, e.g. `address 10.0.0.1` or `interface ether2`.
pub fn parse_line(line: &str) -> Result<Option<Input>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None         => (line, ""),
    };

    let input = match (command.to_ascii_lowercase().as_str(), arg) {
        ("pause", "")                 => Input::Pause,
        ("resume", "")                => Input::Resume,
        ("toggle" | "p", "")          => Input::Toggle,
        ("quit" | "exit" | "q", "")   => Input::Quit,
        ("address" | "ip", a) if !a.is_empty()  => Input::Address(a.to_string()),
        ("interface" | "if", a) if !a.is_empty() => Input::Interface(a.to_string()),
        ("address" | "ip" | "interface" | "if", _) => {
            return Err(format!("'{command}' needs an argument"));
        }
        _ => return Err(format!("unknown command: {line}")),
    };
    Ok(Some(input))
}

/// Spawn a task forwarding stdin lines. The channel closes at end of input.
pub fn spawn_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(8);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break; // receiver dropped
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Cannot read stdin: {e}");
                    break;
                }
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands() {
        assert_eq!(parse_line("pause"), Ok(Some(Input::Pause)));
        assert_eq!(parse_line("  Resume \n"), Ok(Some(Input::Resume)));
        assert_eq!(parse_line("p"), Ok(Some(Input::Toggle)));
        assert_eq!(parse_line("quit"), Ok(Some(Input::Quit)));
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            parse_line("address 192.168.88.1"),
            Ok(Some(Input::Address("192.168.88.1".into())))
        );
        assert_eq!(
            parse_line("if   ether2"),
            Ok(Some(Input::Interface("ether2".into())))
        );
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(parse_line("address").is_err());
        assert!(parse_line("pause now").is_err());
        assert!(parse_line("reboot").is_err());
    }
}
