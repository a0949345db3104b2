//! Logging setup and structured log lines for the dictionary core

use log::{debug, error, info, warn};
use std::fmt::Display;
use std::io::Write;
use std::sync::Once;
use std::time::{Duration, Instant};

static INIT: Once = Once::new();

const CRATE_TARGET: &str = "herbarium_lib";
const MODULES_PREFIX: &str = "herbarium_lib::modules::";

/// Storage calls at or above this are reported at warn
pub const SLOW_STORAGE_CALL: Duration = Duration::from_millis(250);

/// Start env_logger once; `RUST_LOG` overrides the defaults.
///
/// Lines read `<secs> [LEVEL] [scope] message`, where scope is the bounded
/// context (`dictionary`) or the shared area (`shared`) that logged.
pub fn init_logger() {
    INIT.call_once(|| {
        let installed = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .filter_module(CRATE_TARGET, log::LevelFilter::Debug)
            .filter_module("diesel", log::LevelFilter::Warn)
            .filter_module("r2d2", log::LevelFilter::Warn)
            .parse_env("RUST_LOG")
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{} [{}] [{}] {}",
                    buf.timestamp_seconds(),
                    record.level(),
                    scope_of(record.target()),
                    record.args()
                )
            })
            .try_init()
            .is_ok();

        if installed {
            info!("Logging initialized");
        }
    });
}

/// `herbarium_lib::modules::dictionary::application::service` -> `dictionary`
fn scope_of(target: &str) -> &str {
    if let Some(rest) = target.strip_prefix(MODULES_PREFIX) {
        return rest.split("::").next().unwrap_or(rest);
    }
    match target.strip_prefix(CRATE_TARGET) {
        Some(rest) => rest
            .trim_start_matches("::")
            .split("::")
            .next()
            .filter(|scope| !scope.is_empty())
            .unwrap_or("core"),
        None => target,
    }
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// Log lines shared by the service and the storage adapters
pub struct LogContext;

impl LogContext {
    /// One line per search a caller ran, after any category filter
    pub fn term_search(query: &str, category: Option<&str>, results: usize) {
        match category {
            Some(category) => info!(
                "Search '{}' in {} matched {} terms",
                query, category, results
            ),
            None => info!("Search '{}' matched {} terms", query, results),
        }
    }

    /// Edge rows written or removed between two terms
    pub fn edge_change(action: &str, a: impl Display, b: impl Display, rows: usize) {
        debug!("Edges {} {} <-> {} ({} rows)", action, a, b, rows);
    }

    pub fn storage_failure(error: &dyn std::error::Error, context: &str) {
        error!("{}: {}", context, error);
    }

    pub fn slow_pool_checkout(waited: Duration) {
        warn!("Waited {}ms for a database connection", waited.as_millis());
    }
}

/// Times one storage call
pub struct TimedOperation {
    start: Instant,
    operation: &'static str,
}

impl TimedOperation {
    pub fn start(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// `rows` counts the terms or edges the call returned or touched
    pub fn finish(self, rows: usize) -> Duration {
        let elapsed = self.start.elapsed();
        if elapsed >= SLOW_STORAGE_CALL {
            warn!(
                "Slow storage call {} took {}ms ({} rows)",
                self.operation,
                elapsed.as_millis(),
                rows
            );
        } else {
            debug!(
                "{} took {}ms ({} rows)",
                self.operation,
                elapsed.as_millis(),
                rows
            );
        }
        elapsed
    }
}
