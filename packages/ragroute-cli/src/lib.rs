//! Command-line plumbing shared by the `ragroute-*` binaries.

use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};
use tracing_subscriber::EnvFilter;

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

/// Installs the global `fmt` subscriber. `RUST_LOG` wins over the configured level; an
/// unparsable directive degrades to `info`.
pub fn init_tracing(log_level: &str) {
	tracing_subscriber::fmt().with_env_filter(env_filter(log_level)).with_target(false).init();
}

/// Like [`init_tracing`] but logs to stderr, keeping stdout for interactive output.
pub fn init_tracing_stderr(log_level: &str) {
	tracing_subscriber::fmt()
		.with_env_filter(env_filter(log_level))
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();
}

fn env_filter(log_level: &str) -> EnvFilter {
	EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(log_level))
		.unwrap_or_else(|_| EnvFilter::new("info"))
}
