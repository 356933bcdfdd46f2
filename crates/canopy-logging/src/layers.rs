// ABOUTME: Output layer constructors for console, rolling file and JSON sinks
// ABOUTME: Layers are boxed and generic over the subscriber they are stacked on

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs;
use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, fmt::format::FmtSpan};

use crate::config::{FileConfig, LoggingConfig, OutputConfig};

pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Flush guards for non-blocking file writers, held for the process lifetime
static FILE_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());

/// Console layer on stderr, or `None` when console output is disabled.
///
/// Stdout is left to the application's own output.
pub fn create_console_layer<S>(config: &OutputConfig) -> Option<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if !config.console || config.json {
        return None;
    }

    let base = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let layer = if config.pretty_console {
        base.with_span_events(FmtSpan::CLOSE).pretty().boxed()
    } else {
        base.compact().boxed()
    };

    Some(layer)
}

/// JSON layer on stderr, or `None` when JSON output is disabled.
pub fn create_json_layer<S>(config: &OutputConfig) -> Option<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if !config.json {
        return None;
    }

    let layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .boxed();

    Some(layer)
}

/// Daily rolling file layer writing through a non-blocking appender.
pub fn create_file_layer<S>(config: &FileConfig) -> Result<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let directory = config
        .path
        .parent()
        .context("Log file path has no parent directory")?;
    let file_name = config
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Invalid log file path")?;

    fs::create_dir_all(directory).with_context(|| {
        format!("Failed to create log directory: {}", directory.display())
    })?;

    // Rotation is daily; max_size_mb and max_files are advisory for now
    let (writer, guard) = non_blocking(rolling::daily(directory, file_name));
    FILE_GUARDS.lock().push(guard);

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .boxed();

    Ok(layer)
}

/// Collect every enabled output layer for the configuration.
pub fn create_output_layers<S>(config: &LoggingConfig) -> Result<Vec<BoxedLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let mut layers = Vec::new();
    layers.extend(create_console_layer(&config.output));
    layers.extend(create_json_layer(&config.output));
    if config.output.file {
        layers.push(create_file_layer(&config.file)?);
    }
    Ok(layers)
}

/// Build the level filter from the global level plus module overrides.
pub fn create_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let mut filter = EnvFilter::new(config.level.0.as_str().to_lowercase());

    for (module, level) in &config.module_levels {
        let directive = format!("{}={}", module, level.0.as_str().to_lowercase())
            .parse()
            .with_context(|| format!("Invalid filter directive for module '{module}'"))?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}
