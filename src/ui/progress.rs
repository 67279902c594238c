//! Request spinner, rendered via `indicatif`.

use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::ui::icons::{CHECK, CROSS};

/// Spinner shown while one API request is in flight.
///
/// Drawn on stderr so piped stdout (e.g. `folio list --json`) stays clean.
/// With `quiet` set nothing is drawn at all.
pub struct RequestSpinner {
    bar: ProgressBar,
}

impl RequestSpinner {
    pub fn start(message: impl Into<String>, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(message.into());
        Self { bar }
    }

    pub fn set_message(&self, message: impl Into<String>) {
        self.bar.set_message(message.into());
    }

    pub fn success(self, message: impl std::fmt::Display) {
        self.bar
            .finish_with_message(format!("{}{}", CHECK, style(message).green()));
    }

    pub fn fail(self, message: impl std::fmt::Display) {
        self.bar
            .finish_with_message(format!("{}{}", CROSS, style(message).red()));
    }

    /// Remove the spinner without leaving a line behind.
    pub fn clear(self) {
        self.bar.finish_and_clear();
    }
}
