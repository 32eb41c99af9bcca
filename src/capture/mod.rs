//! Clipboard capture of commands to explain.
//!
//! [`ClipboardCapturer`] reads the system clipboard on demand and reports
//! whether the content is a new command, the same command again, or text
//! that should be ignored. Polling is driven by the caller.

mod heuristic;

use chrono::{DateTime, Local};
use tracing::{debug, warn};

pub use heuristic::looks_like_command;

/// A command picked up from a capture source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureEvent {
    pub content: String,
    /// Name of the capturer that produced the event, e.g. `clipboard`.
    pub source: &'static str,
    pub timestamp: DateTime<Local>,
}

/// Result of one capture attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured(CaptureEvent),
    /// Same command as the previous capture.
    Duplicate(String),
    /// Text that does not look like a command.
    NotCommand(String),
    /// Clipboard empty, blank, non-text or unreadable.
    Empty,
}

/// Where clipboard text comes from.
pub trait ClipboardSource {
    fn read_text(&mut self) -> anyhow::Result<Option<String>>;
}

/// The system clipboard via `arboard`.
pub struct SystemClipboard {
    clipboard: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            clipboard: arboard::Clipboard::new()?,
        })
    }
}

impl ClipboardSource for SystemClipboard {
    fn read_text(&mut self) -> anyhow::Result<Option<String>> {
        match self.clipboard.get_text() {
            Ok(text) => Ok(Some(text)),
            Err(arboard::Error::ContentNotAvailable) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

pub struct ClipboardCapturer<S = SystemClipboard> {
    source: S,
    last_content: Option<String>,
}

impl ClipboardCapturer<SystemClipboard> {
    /// Capturer over the system clipboard.
    pub fn system() -> anyhow::Result<Self> {
        Ok(Self::new(SystemClipboard::new()?))
    }
}

impl<S: ClipboardSource> ClipboardCapturer<S> {
    pub const NAME: &'static str = "clipboard";

    pub fn new(source: S) -> Self {
        Self {
            source,
            last_content: None,
        }
    }

    /// Trimmed clipboard text, or `None` when there is nothing usable.
    /// Read errors are logged and treated as no content.
    pub fn content(&mut self) -> Option<String> {
        match self.source.read_text() {
            Ok(text) => text
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read clipboard");
                None
            }
        }
    }

    /// Read the clipboard once and classify what is there.
    pub fn capture(&mut self) -> CaptureOutcome {
        let Some(content) = self.content() else {
            return CaptureOutcome::Empty;
        };

        if !looks_like_command(&content) {
            debug!(len = content.len(), "clipboard content is not a command");
            return CaptureOutcome::NotCommand(content);
        }

        if self.last_content.as_deref() == Some(content.as_str()) {
            return CaptureOutcome::Duplicate(content);
        }

        self.last_content = Some(content.clone());
        CaptureOutcome::Captured(CaptureEvent {
            content,
            source: Self::NAME,
            timestamp: Local::now(),
        })
    }

    /// Forget the last captured command so it can be captured again.
    pub fn reset(&mut self) {
        self.last_content = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;

    struct FakeClipboard(VecDeque<anyhow::Result<Option<String>>>);

    impl FakeClipboard {
        fn with(items: Vec<anyhow::Result<Option<String>>>) -> Self {
            Self(items.into())
        }
    }

    impl ClipboardSource for FakeClipboard {
        fn read_text(&mut self) -> anyhow::Result<Option<String>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    fn text(s: &str) -> anyhow::Result<Option<String>> {
        Ok(Some(s.to_string()))
    }

    #[test]
    fn test_capture_new_command() {
        let mut capturer = ClipboardCapturer::new(FakeClipboard::with(vec![text("  ls -la \n")]));
        match capturer.capture() {
            CaptureOutcome::Captured(event) => {
                assert_eq!(event.content, "ls -la");
                assert_eq!(event.source, "clipboard");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_and_reset() {
        let mut capturer = ClipboardCapturer::new(FakeClipboard::with(vec![
            text("git status"),
            text("git status"),
            text("git status"),
        ]));
        assert!(matches!(capturer.capture(), CaptureOutcome::Captured(_)));
        assert_eq!(
            capturer.capture(),
            CaptureOutcome::Duplicate("git status".to_string())
        );
        capturer.reset();
        assert!(matches!(capturer.capture(), CaptureOutcome::Captured(_)));
    }

    #[test]
    fn test_non_command_does_not_update_last() {
        let mut capturer = ClipboardCapturer::new(FakeClipboard::with(vec![
            text("git status"),
            text("hello world"),
            text("git status"),
        ]));
        assert!(matches!(capturer.capture(), CaptureOutcome::Captured(_)));
        assert_eq!(
            capturer.capture(),
            CaptureOutcome::NotCommand("hello world".to_string())
        );
        assert!(matches!(capturer.capture(), CaptureOutcome::Duplicate(_)));
    }

    #[test]
    fn test_empty_and_errors() {
        let mut capturer = ClipboardCapturer::new(FakeClipboard::with(vec![
            Ok(None),
            text("   "),
            Err(anyhow::anyhow!("clipboard locked")),
        ]));
        assert_eq!(capturer.capture(), CaptureOutcome::Empty);
        assert_eq!(capturer.capture(), CaptureOutcome::Empty);
        assert_eq!(capturer.capture(), CaptureOutcome::Empty);
        assert_eq!(capturer.capture(), CaptureOutcome::Empty);
    }
}
