use std::fs::{File, OpenOptions};

use anyhow::anyhow;
use slog::{b, o, Drain, Logger};

use postbox::Result;
use postbox_conf::logging::Log;
use postbox_conf::Settings;

/// Installs the slog pipeline behind the `log` facade. Called once at
/// startup, before anything logs.
pub fn logger_init() -> Result<()> {
    let cfg = &Settings::instance().log;
    let logger = build_logger(cfg)?;
    log::set_boxed_logger(Box::new(LoggerEx(logger))).map_err(|e| anyhow!(e))?;
    log::set_max_level(slog_to_log_level(cfg.level).to_level_filter());
    Ok(())
}

fn build_logger(cfg: &Log) -> Result<Logger> {
    if cfg.to.off() {
        return Ok(Logger::root(slog::Discard, o!()));
    }

    let drain: Box<dyn Drain<Ok = (), Err = slog::Never> + Send> =
        match (cfg.to.console(), cfg.to.file()) {
            (true, true) => Box::new(
                slog::Duplicate::new(console_drain(), file_drain(&cfg.filename())?).ignore_res(),
            ),
            (false, true) => Box::new(file_drain(&cfg.filename())?),
            _ => Box::new(console_drain()),
        };

    let drain = slog::LevelFilter::new(drain, cfg.level).ignore_res();
    let drain = slog_async::Async::new(drain)
        .chan_size(4096 * 4)
        .overflow_strategy(slog_async::OverflowStrategy::DropAndReport)
        .build()
        .fuse();

    Ok(Logger::root(drain, o!()))
}

fn console_drain() -> impl Drain<Ok = (), Err = slog::Never> + Send {
    let decorator = slog_term::TermDecorator::new().build();
    slog_term::FullFormat::new(decorator).build().fuse()
}

fn file_drain(filename: &str) -> Result<impl Drain<Ok = (), Err = slog::Never> + Send> {
    let decorator = slog_term::PlainDecorator::new(open_file(filename)?);
    Ok(slog_term::FullFormat::new(decorator).build().fuse())
}

fn open_file(filename: &str) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(filename)
        .map_err(|e| anyhow!("logger file config error, filename: {}, {:?}", filename, e))
}

/// Adapts `log` records onto the slog logger.
struct LoggerEx(Logger);

impl log::Log for LoggerEx {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, r: &log::Record) {
        let level = log_to_slog_level(r.metadata().level());
        let location = &record_as_location(r);
        let s = slog::RecordStatic { location, level, tag: r.target() };
        self.0.log(&slog::Record::new(&s, r.args(), b!()))
    }

    fn flush(&self) {}
}

fn log_to_slog_level(level: log::Level) -> slog::Level {
    match level {
        log::Level::Trace => slog::Level::Trace,
        log::Level::Debug => slog::Level::Debug,
        log::Level::Info => slog::Level::Info,
        log::Level::Warn => slog::Level::Warning,
        log::Level::Error => slog::Level::Error,
    }
}

fn slog_to_log_level(level: slog::Level) -> log::Level {
    match level {
        slog::Level::Trace => log::Level::Trace,
        slog::Level::Debug => log::Level::Debug,
        slog::Level::Info => log::Level::Info,
        slog::Level::Warning => log::Level::Warn,
        slog::Level::Error | slog::Level::Critical => log::Level::Error,
    }
}

fn record_as_location(r: &log::Record) -> slog::RecordLocation {
    let module = r.module_path_static().unwrap_or("<unknown>");
    let file = r.file_static().unwrap_or("<unknown>");
    let line = r.line().unwrap_or_default();
    slog::RecordLocation { file, line, column: 0, function: "", module }
}
