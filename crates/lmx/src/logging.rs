use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

/// Stderr diagnostic format.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Compact single-line text for terminals.
    Text,
    /// One JSON object per event, for log collectors.
    Json,
}

/// Stderr diagnostic verbosity.
///
/// The decoder reports corrupt frames at `warn`, discarded headers at
/// `debug` and frame recognition at `trace`; `quiet` installs no subscriber
/// at all, keeping stderr silent for raw-output pipelines.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum Verbosity {
    Quiet,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    fn filter(self) -> Option<LevelFilter> {
        match self {
            Verbosity::Quiet => None,
            Verbosity::Warn => Some(LevelFilter::WARN),
            Verbosity::Info => Some(LevelFilter::INFO),
            Verbosity::Debug => Some(LevelFilter::DEBUG),
            Verbosity::Trace => Some(LevelFilter::TRACE),
        }
    }
}

pub fn init_logging(format: LogFormat, verbosity: Verbosity) {
    let Some(filter) = verbosity.filter() else {
        return;
    };

    let base = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(filter)
        .with_ansi(false)
        .with_target(false);

    let _ = match format {
        LogFormat::Text => base.compact().try_init(),
        LogFormat::Json => base.json().try_init(),
    };
}
