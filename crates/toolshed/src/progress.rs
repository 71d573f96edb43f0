//! Terminal progress bars for artifact downloads

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::Mutex;
use toolshed_artifact::Progress;

const BAR_TEMPLATE: &str = "{msg} [{bar:30}] {bytes}/{total_bytes} ({eta})";
const SPINNER_TEMPLATE: &str = "{spinner} {msg} {bytes}";

/// Byte progress bar on stderr, silent when stderr is not a terminal
///
/// Falls back to a spinner when the server sends no content length.
pub struct BarProgress {
    enabled: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl BarProgress {
    pub fn new() -> Self {
        Self {
            enabled: std::io::stderr().is_terminal(),
            bar: Mutex::new(None),
        }
    }
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress for BarProgress {
    fn begin(&self, total: Option<u64>) {
        if !self.enabled {
            return;
        }

        let bar = match total {
            Some(len) => {
                let bar = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
                    bar.set_style(style.progress_chars("=> "));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::with_template(SPINNER_TEMPLATE) {
                    bar.set_style(style);
                }
                bar
            }
        };
        bar.set_message("downloading");

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn advance(&self, downloaded: u64) {
        if let Ok(slot) = self.bar.lock()
            && let Some(bar) = slot.as_ref()
        {
            bar.set_position(downloaded);
        }
    }

    fn finish(&self) {
        if let Ok(mut slot) = self.bar.lock()
            && let Some(bar) = slot.take()
        {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_progress_ignores_events() {
        let progress = BarProgress {
            enabled: false,
            bar: Mutex::new(None),
        };
        progress.begin(Some(10));
        progress.advance(5);
        progress.finish();
        assert!(progress.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_enabled_progress_tracks_position() {
        let progress = BarProgress {
            enabled: true,
            bar: Mutex::new(None),
        };
        progress.begin(Some(10));
        progress.advance(7);
        let position = progress.bar.lock().unwrap().as_ref().map(|b| b.position());
        assert_eq!(position, Some(7));

        progress.finish();
        assert!(progress.bar.lock().unwrap().is_none());
    }

    #[test]
    fn test_templates_parse() {
        assert!(ProgressStyle::with_template(BAR_TEMPLATE).is_ok());
        assert!(ProgressStyle::with_template(SPINNER_TEMPLATE).is_ok());
    }
}
