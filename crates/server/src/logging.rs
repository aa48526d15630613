use patroneos_core::config::LoggingSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 3] = ["patroneos_core", "server", "patroneos"];

/// Filter directive for the gateway's crates at `level`, everything else at `warn`.
#[must_use]
pub fn default_directive(level: &str) -> String {
    let mut directive = String::from("warn");
    for krate in CRATES {
        directive.push_str(&format!(",{krate}={level}"));
    }
    directive
}

/// Installs the global subscriber.
///
/// `RUST_LOG=debug` and `RUST_LOG=trace` are shorthands that raise only the gateway's crates;
/// any other `RUST_LOG` value is used as a full filter. Without `RUST_LOG` the configured level
/// applies.
pub fn init_logging(settings: &LoggingSettings) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(level) if level == "debug" || level == "trace" => {
            EnvFilter::new(default_directive(&level))
        }
        Ok(_) => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(&settings.level))),
        Err(_) => EnvFilter::new(default_directive(&settings.level)),
    };

    let registry = tracing_subscriber::registry().with(filter);

    if settings.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        registry.with(fmt_layer).init();
    }
}
