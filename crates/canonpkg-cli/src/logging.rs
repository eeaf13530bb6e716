//! Tracing setup.
//!
//! Off unless `CANONPKG_LOG` holds an `EnvFilter` directive, e.g.
//! `CANONPKG_LOG=canonpkg_lib::registry=debug`. `CANONPKG_LOG_STYLE=full`
//! adds timestamps. Everything goes to stderr.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{FmtSpan, Writer};
use tracing_subscriber::fmt::time::FormatTime;

const LOG_ENV: &str = "CANONPKG_LOG";
const STYLE_ENV: &str = "CANONPKG_LOG_STYLE";

/// Timer that prints nothing; span close events still carry timings.
struct NoTimestamp;

impl FormatTime for NoTimestamp {
    fn format_time(&self, _w: &mut Writer<'_>) -> std::fmt::Result {
        Ok(())
    }
}

pub fn init() {
    let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) else {
        return;
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    if std::env::var(STYLE_ENV).is_ok_and(|style| style == "full") {
        builder.init();
    } else {
        builder.with_timer(NoTimestamp).init();
    }
    tracing::debug!("tracing initialized");
}
