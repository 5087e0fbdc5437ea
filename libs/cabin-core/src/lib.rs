mod name;
mod ty;

pub use name::*;
pub use ty::*;

use std::str::FromStr;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::filter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the default log level (`trace`, `debug`, `info`, ...).
pub const LOG_ENV: &str = "CABIN_LOG";

static START: Once = Once::new();

/// Installs the global tracing subscriber. Safe to call more than once, only the first call counts.
pub fn init() {
	START.call_once(|| {
		let level = std::env::var(LOG_ENV)
			.ok()
			.and_then(|value| Level::from_str(&value).ok())
			.unwrap_or(Level::INFO);

		let filter = filter::Targets::new()
			.with_default(level)
			.with_target("cabin_reader", Level::INFO);
		let layered = tracing_subscriber::registry()
			.with(tracing_subscriber::fmt::layer())
			.with(filter);

		// A subscriber installed by the host (tests, embedders) wins.
		let _ = layered.try_init();
	});
}
