//! Diagnostic logging setup

use std::sync::Once;

use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const QUIET_DIRECTIVE: &str = "expense_tracker=warn";
const VERBOSE_DIRECTIVE: &str = "expense_tracker=debug";

/// Installs the global tracing subscriber, writing to stderr.
///
/// A non-empty `RUST_LOG` decides what is logged; otherwise this crate logs
/// at `warn`. `verbose` always turns this crate up to `debug`. Only the
/// first call has any effect.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = build_filter(rust_log.as_deref(), verbose);

        // A host application may already own the global subscriber
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn build_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let filter = match rust_log.map(str::trim).filter(|s| !s.is_empty()) {
        Some(spec) => EnvFilter::try_new(spec).unwrap_or_else(|e| {
            eprintln!("Ignoring invalid {}: {}", EnvFilter::DEFAULT_ENV, e);
            EnvFilter::new(QUIET_DIRECTIVE)
        }),
        None => EnvFilter::new(QUIET_DIRECTIVE),
    };

    if !verbose {
        return filter;
    }
    match VERBOSE_DIRECTIVE.parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_tracing(false);
        init_tracing(true);
        tracing::debug!("still alive");
    }

    #[test]
    fn test_default_filter_is_quiet() {
        let filter = build_filter(None, false).to_string();
        assert!(filter.contains(QUIET_DIRECTIVE));

        let filter = build_filter(Some("  "), false).to_string();
        assert!(filter.contains(QUIET_DIRECTIVE));
    }

    #[test]
    fn test_rust_log_is_kept() {
        let filter = build_filter(Some("expense_tracker=trace"), false).to_string();
        assert!(filter.contains("expense_tracker=trace"));
        assert!(!filter.contains(QUIET_DIRECTIVE));
    }

    #[test]
    fn test_verbose_adds_debug() {
        let filter = build_filter(None, true).to_string();
        assert!(filter.contains(VERBOSE_DIRECTIVE));

        let filter = build_filter(Some("info"), true).to_string();
        assert!(filter.contains("info"));
        assert!(filter.contains(VERBOSE_DIRECTIVE));
    }
}
