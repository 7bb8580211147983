//! Logging setup for the Echo Talk binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Every crate in `crates` and the binary itself log at `default_log_level`.
/// Each target appears once, in first-seen order.
pub fn default_filter(binary_name: &str, crates: &[&str], default_log_level: &str) -> String {
    let mut targets: Vec<String> = Vec::with_capacity(crates.len() + 1);
    for target in crates.iter().copied().chain(std::iter::once(binary_name)) {
        let target = target.replace('-', "_");
        if !targets.contains(&target) {
            targets.push(target);
        }
    }

    targets
        .iter()
        .map(|target| format!("{}={}", target, default_log_level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize the tracing subscriber.
///
/// The filter can be overridden with the `RUST_LOG` environment variable.
///
/// # Examples
///
/// ```no_run
/// use echotalk_shared::logger::setup_logger;
///
/// setup_logger("echotalk-server", &["tower-http"], "debug");
/// ```
pub fn setup_logger(binary_name: &str, crates: &[&str], default_log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(binary_name, crates, default_log_level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
