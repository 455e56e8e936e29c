use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use chrono::Local;
use tracing::{level_filters::LevelFilter, Event, Subscriber};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::Targets,
    fmt::{
        self,
        format::{FmtSpan, Writer},
        FmtContext, FormatEvent, FormatFields, MakeWriter,
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

use crate::cli::args::{LogLevel, Options};

use super::constants::{APP_TARGET, GQL_TARGET, LOG_PATH, LOG_TIMESTAMP_FORMAT, WEBSOCKET_TARGET};

/// Level third-party events are let through at when they aren't discarded.
const ROOT_LEVEL: LevelFilter = LevelFilter::WARN;

/// Process-wide logging policy, derived once from the invocation options.
///
/// Loggers are tracing targets: [APP_TARGET] is the application logger, [WEBSOCKET_TARGET] and
/// [GQL_TARGET] are its children, and everything else falls back to the root rule. A child
/// without a level of its own inherits the application level through prefix matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Drop every event that doesn't belong to the application.
    pub discard_root: bool,
    pub app_level: LogLevel,
    pub websocket_level: Option<LogLevel>,
    pub gql_level: Option<LogLevel>,
    /// Additional sink for the application logger.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn from_options(options: &Options) -> Self {
        let app_level = options.logging_level();
        Self {
            // Decided on the main level alone. Subsystem overrides never bring the root back.
            discard_root: app_level > LogLevel::Debug,
            app_level,
            websocket_level: options.debug_ws_level(),
            gql_level: options.debug_gql_level(),
            file: options.log().then(|| PathBuf::from(LOG_PATH)),
        }
    }

    /// Filter of the application logger and its children. Nothing outside of them is enabled.
    pub fn app_targets(&self) -> Targets {
        let targets = Targets::new().with_target(APP_TARGET, LevelFilter::from(self.app_level));
        let targets = match self.websocket_level {
            Some(level) => targets.with_target(WEBSOCKET_TARGET, LevelFilter::from(level)),
            None => targets,
        };
        match self.gql_level {
            Some(level) => targets.with_target(GQL_TARGET, LevelFilter::from(level)),
            None => targets,
        }
    }

    /// Filter of the whole hierarchy, root rule included.
    pub fn targets(&self) -> Targets {
        let root = if self.discard_root {
            LevelFilter::OFF
        } else {
            ROOT_LEVEL
        };
        self.app_targets().with_default(root)
    }

    /// Builds a subscriber for this configuration without installing it. The returned guard owns
    /// the file writer and has to outlive every event that should reach the file.
    pub fn build(&self) -> Result<(impl Subscriber + Send + Sync + 'static, LoggingGuard)> {
        self.build_with_console(std::io::stderr)
    }

    /// Same as [LoggingConfig::build] with the default console sink writing into `console`.
    pub fn build_with_console<W>(
        &self,
        console: W,
    ) -> Result<(impl Subscriber + Send + Sync + 'static, LoggingGuard)>
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let console = fmt::layer()
            .with_writer(console)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(self.targets());

        let (file, file_guard) = match &self.file {
            Some(path) => {
                let (writer, guard) = tracing_appender::non_blocking(file_appender(path)?);
                let layer = fmt::layer()
                    .event_format(FileFormat)
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(self.app_targets());
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        let subscriber = tracing_subscriber::registry().with(console).with(file);
        Ok((subscriber, LoggingGuard { _file: file_guard }))
    }
}

/// Opens `path` for appending, creating the file when needed.
fn file_appender(path: &Path) -> Result<RollingFileAppender> {
    let directory = path
        .parent()
        .filter(|v| !v.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("Log path {path:?} doesn't name a file"))?;

    Ok(tracing_appender::rolling::Builder::new()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(directory)?)
}

/// Keeps logging sinks alive. Dropping it flushes and closes the log file.
#[derive(Debug, Default)]
#[must_use]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Layout of the log file: `2024-01-31 18:02:11.042:\tWARNING:\tmessage`.
pub struct FileFormat;

impl<S, N> FormatEvent<S, N> for FileFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{}:\t{}:\t",
            Local::now().format(LOG_TIMESTAMP_FORMAT),
            LogLevel::from(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Applies a [LoggingConfig] to the process.
#[cfg_attr(test, mockall::automock)]
pub trait LoggingSetup {
    fn configure(&mut self, config: &LoggingConfig) -> Result<LoggingGuard>;
}

/// Installs the configuration as the global dispatcher. Records of the `log` crate are routed
/// into it too. Can succeed only once per process.
pub struct GlobalLogging;

impl LoggingSetup for GlobalLogging {
    fn configure(&mut self, config: &LoggingConfig) -> Result<LoggingGuard> {
        let (subscriber, guard) = config.build()?;
        subscriber.try_init()?;
        Ok(guard)
    }
}

#[cfg(test)]
pub static TEST_LOGGING: std::sync::LazyLock<()> = std::sync::LazyLock::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::TRACE)
        .with_test_writer()
        .pretty()
        .init()
});
