//! Spinner shown while a request is in flight.

use std::future::Future;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Start a ticking spinner with `msg`. Hidden when `quiet` is set.
pub(crate) fn spinner(quiet: bool, msg: impl Into<String>) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("/-\\|"));
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Await `fut` behind a spinner, clearing it whatever the outcome.
pub(crate) async fn with_spinner<F, T>(quiet: bool, msg: impl Into<String>, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = spinner(quiet, msg);
    let out = fut.await;
    pb.finish_and_clear();
    out
}
