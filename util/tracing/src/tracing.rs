use crate::{Config, LogFormat};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, Layer, Registry};

/// The scope guard object for the background writer of the tracing subsystem.
///
/// This object needs to be kept alive for the duration of the program.
#[must_use = "should be dropped at the end of the program scope"]
#[derive(Debug)]
pub struct ScopeGuard(#[allow(dead_code)] Option<WorkerGuard>);

fn env_filter() -> EnvFilter {
	EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy()
}

/// Sets up the tracing subscribers for a prediction client process. This
/// should be called at the beginning of a process' `main` function.
///
/// If successful, returns a guard object that should be dropped at the end
/// of the process' `main` function scope.
pub fn init_tracing_subscriber(
	service_name: &'static str,
	config: &Config,
) -> Result<ScopeGuard, anyhow::Error> {
	let stderr_layer = match config.format {
		LogFormat::Pretty => fmt::layer().with_writer(std::io::stderr).boxed(),
		LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
	}
	.with_filter(env_filter());

	let (file_layer, guard) = match &config.log_dir {
		Some(dir) => {
			let appender = tracing_appender::rolling::daily(dir, format!("{service_name}.log"));
			let (writer, guard) = tracing_appender::non_blocking(appender);
			let layer =
				fmt::layer().json().with_ansi(false).with_writer(writer).with_filter(env_filter());
			(Some(layer), Some(guard))
		}
		None => (None, None),
	};

	Registry::default().with(stderr_layer).with(file_layer).try_init()?;
	tracing::debug!(service_name, "tracing initialized");
	Ok(ScopeGuard(guard))
}
