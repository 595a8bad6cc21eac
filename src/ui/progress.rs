use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Single live status line for the TX/RX loops.
pub struct StatusLine {
    pb: ProgressBar,
}

impl StatusLine {
    /// Create a spinner status line
    /// - `template`: one of [`templates`]
    /// - `message`: initial message
    pub fn new(template: &str, message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template(template)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(120));
        Self { pb }
    }

    /// A status line that draws nothing.
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.pb.set_message(message.into());
    }

    /// Finish and clear the status line
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

pub mod templates {
    pub const TRANSMIT: &str = "{spinner:.cyan} [TX] {elapsed_precise} {msg}";
    pub const RECEIVE: &str = "{spinner:.blue} [RX] {elapsed_precise} {msg}";
}
