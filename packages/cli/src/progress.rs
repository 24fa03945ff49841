//! Logger setup and spinners for long-running remote calls.
//!
//! Log output is routed through [`MultiProgress`] via
//! `indicatif-log-bridge` so log lines never tear a spinner.

use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Initializes `pretty_env_logger` (filtered by `RUST_LOG`) behind an
/// `indicatif` bridge and returns the shared [`MultiProgress`].
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    // Ignore the error if a logger is already installed.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

/// Awaits `future` while a spinner with `message` is shown.
pub async fn spin<F: Future>(multi: &MultiProgress, message: &str, future: F) -> F::Output {
    let bar = multi.add(ProgressBar::new_spinner());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    bar.set_message(message.to_string());

    let output = future.await;

    bar.finish_and_clear();
    multi.remove(&bar);
    output
}
