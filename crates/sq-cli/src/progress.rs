use std::io::IsTerminal;
use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::GlobalFlags;

static ENABLED: OnceLock<bool> = OnceLock::new();

/// Progress output goes to stderr: only on a terminal and never when quiet.
pub fn init(flags: &GlobalFlags) {
    let enabled = std::io::stderr().is_terminal() && !flags.quiet;
    let _ = ENABLED.set(enabled);
}

fn enabled() -> bool {
    ENABLED.get().copied().unwrap_or(false)
}

pub struct Progress {
    bar: Option<ProgressBar>,
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        if !enabled() {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}
