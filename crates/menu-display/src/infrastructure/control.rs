//! Line-based control channel on stdin.
//!
//! Kiosk setups forward touch input and maintenance commands to the engine
//! as plain text lines:
//!
//! ```text
//! reload              reload the menu now
//! online | offline    inject a connectivity reading
//! tap <index>         a card was tapped
//! swipe <x0> <x1>     horizontal swipe from x0 to x1
//! pull <px> [top]     downward pull; "top" when the page was scrolled to the top
//! quit                stop the engine
//! ```
//!
//! Unknown or malformed lines are logged and ignored.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::application::display_service::DisplayEvent;

/// Parses one control line.
pub fn parse_command(line: &str) -> Option<DisplayEvent> {
    let mut words = line.split_whitespace();
    let command = words.next()?.to_ascii_lowercase();
    let event = match command.as_str() {
        "reload" => DisplayEvent::Reload,
        "online" => DisplayEvent::Connectivity(true),
        "offline" => DisplayEvent::Connectivity(false),
        "tap" => DisplayEvent::CardTapped(words.next()?.parse().ok()?),
        "swipe" => DisplayEvent::Swipe {
            start_x: words.next()?.parse().ok()?,
            end_x: words.next()?.parse().ok()?,
        },
        "pull" => DisplayEvent::Pull {
            distance: words.next()?.parse().ok()?,
            at_top: words.next() == Some("top"),
        },
        "quit" | "exit" => DisplayEvent::Shutdown,
        _ => return None,
    };
    Some(event)
}

/// Reads control lines from `input` until EOF, forwarding parsed events.
pub fn spawn_control_reader<R>(input: R, events: mpsc::Sender<DisplayEvent>) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(input).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match parse_command(&line) {
                    Some(event) => {
                        if events.send(event).await.is_err() {
                            break;
                        }
                    }
                    None => warn!("unrecognised control command: {line:?}"),
                },
                Ok(None) => {
                    debug!("control input closed");
                    break;
                }
                Err(e) => {
                    warn!("control input error: {e}");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_simple_words() {
        assert_eq!(parse_command("reload"), Some(DisplayEvent::Reload));
        assert_eq!(parse_command("  ONLINE "), Some(DisplayEvent::Connectivity(true)));
        assert_eq!(parse_command("offline"), Some(DisplayEvent::Connectivity(false)));
        assert_eq!(parse_command("quit"), Some(DisplayEvent::Shutdown));
    }

    #[test]
    fn test_parse_command_with_arguments() {
        assert_eq!(parse_command("tap 3"), Some(DisplayEvent::CardTapped(3)));
        assert_eq!(
            parse_command("swipe 300 120.5"),
            Some(DisplayEvent::Swipe { start_x: 300.0, end_x: 120.5 })
        );
        assert_eq!(
            parse_command("pull 140 top"),
            Some(DisplayEvent::Pull { distance: 140.0, at_top: true })
        );
        assert_eq!(
            parse_command("pull 140"),
            Some(DisplayEvent::Pull { distance: 140.0, at_top: false })
        );
    }

    #[test]
    fn test_parse_command_rejects_malformed_lines() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("tap"), None);
        assert_eq!(parse_command("tap two"), None);
        assert_eq!(parse_command("dance"), None);
    }

    #[tokio::test]
    async fn test_control_reader_forwards_until_eof() {
        // Arrange
        let input: &[u8] = b"reload\nbogus\n\ntap 1\n";
        let (tx, mut rx) = mpsc::channel(8);

        // Act
        spawn_control_reader(input, tx).await.unwrap();

        // Assert
        assert_eq!(rx.recv().await, Some(DisplayEvent::Reload));
        assert_eq!(rx.recv().await, Some(DisplayEvent::CardTapped(1)));
        assert_eq!(rx.recv().await, None);
    }
}
