pub use tracing;

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)+) => ($crate::logging::tracing::error!($($arg)+))
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)+) => ($crate::logging::tracing::trace!($($arg)+))
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)+) => ($crate::logging::tracing::info!($($arg)+))
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)+) => ($crate::logging::tracing::debug!($($arg)+))
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)+) => ($crate::logging::tracing::warn!($($arg)+))
}

/// Suffix of the environment variable that switches the output to an indented tree.
#[cfg(feature = "subscriber")]
pub const TREE_ENV_SUFFIX: &str = "_LOG_TREE";

/// Installs the global subscriber.
/// The filter is read from `{env_prefix}_LOG` (e.g. `BVXLATE_LOG=debug`) and the
/// output always goes to stderr, leaving stdout to the translated formula.
#[cfg(feature = "subscriber")]
pub fn init_logging(env_prefix: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::builder()
        .with_env_var(format!("{env_prefix}_LOG"))
        .from_env_lossy()
        // The solver library is chatty on its own targets.
        .add_directive("z3=off".parse().expect("Static directive is valid"));

    let registry = tracing_subscriber::registry().with(env_filter);
    if std::env::var_os(format!("{env_prefix}{TREE_ENV_SUFFIX}")).is_some() {
        registry
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_writer(std::io::stderr)
                    .with_targets(true),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    log_debug!("Logging initialized");
}
