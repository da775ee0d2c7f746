use std::path::Path;
use std::sync::OnceLock;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where console log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleOutput {
    /// Info and more verbose to stdout, warnings and errors to stderr.
    #[default]
    Split,
    /// Everything to stderr, leaving stdout for program output.
    Stderr,
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` overrides `base_level`. Console lines are routed per `console`;
/// each line is written to exactly one stream. When `log_dir` is given, a
/// daily rolled plain-text log is written there as well.
pub fn setup_logging(base_level: &str, log_dir: Option<&Path>, console: ConsoleOutput) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(base_level))
        .unwrap_or_else(|e| panic!("Invalid log filter: {}", e));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(true)
        .with_writer(console_writer(console, std::io::stdout, std::io::stderr));

    let file_layer = log_dir.map(|dir| {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("Failed to create log directory {}: {}", dir.display(), e));

        let file_appender = tracing_appender::rolling::Builder::new()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("tconvolve")
            .filename_suffix("log")
            .max_log_files(5)
            .build(dir)
            .unwrap_or_else(|e| panic!("Failed to create log file appender: {}", e));

        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        LOG_GUARD.set(guard).expect("Logging already initialized");

        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false)
            .with_writer(file_writer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .unwrap_or_else(|e| panic!("Logger initialization failed: {}", e));
}

/// Console writer routing events between `out` and `err` by level.
///
/// `with_min_level(INFO)` admits INFO, DEBUG and TRACE; `with_max_level(WARN)`
/// admits WARN and ERROR.
fn console_writer<O, E>(console: ConsoleOutput, out: O, err: E) -> BoxMakeWriter
where
    O: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    E: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    match console {
        ConsoleOutput::Split => {
            BoxMakeWriter::new(out.with_min_level(Level::INFO).and(err.with_max_level(Level::WARN)))
        }
        ConsoleOutput::Stderr => BoxMakeWriter::new(err),
    }
}
