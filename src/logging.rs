//! tracing subscriber setup: stderr fmt layer plus an optional append-only
//! log file. `RUST_LOG` takes precedence over the configured level.

use std::fs::OpenOptions;
use std::sync::Arc;

use tracing::Subscriber;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::LogConfig;
use crate::errors::{AppError, AppResult};

pub fn init(config: &LogConfig) -> AppResult<()> {
    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let directives = ["h2=warn", "hyper=warn", "rustls=warn", "actix_server=info"];

    for directive in directives {
        if let Ok(parsed) = directive.parse::<Directive>() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    let stderr_layer = default_layer().with_writer(std::io::stderr);

    let result = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let file_layer = default_layer()
                .with_writer(Arc::new(file))
                .with_ansi(false);

            Registry::default()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .try_init()
        }
        None => Registry::default()
            .with(env_filter)
            .with(stderr_layer)
            .try_init(),
    };

    result.map_err(|e| AppError::Config(format!("logging init failed: {e}")))
}

fn default_layer<S>() -> tracing_subscriber::fmt::Layer<S>
where
    S: Subscriber,
{
    tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
}
