use std::{fs::File, io::Write};

use env_logger::{Builder, Target, WriteStyle, fmt::Formatter};
use log::{Level, Record};

use crate::{
    Error, Result,
    options::{CycleOptions, LogFormat},
};

pub fn init_logger(options: &CycleOptions) -> Result<()> {
    let format = options.log_format;
    let timestamp = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf, record| write_record(buf, record, format, timestamp))
        .target(log_target(options)?);

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn log_target(options: &CycleOptions) -> Result<Target> {
    let Some(path) = options.log_output_path() else {
        return Ok(Target::Stderr);
    };
    let file = File::create(path).map_err(|e| {
        Error::other(format!(
            "failed to create log output file {}: {e}",
            path.display()
        ))
    })?;
    Ok(Target::Pipe(Box::new(file)))
}

fn write_record(
    buf: &mut Formatter,
    record: &Record<'_>,
    format: LogFormat,
    timestamp: bool,
) -> std::io::Result<()> {
    if timestamp {
        write!(buf, "{} ", buf.timestamp_millis())?;
    }
    match format {
        LogFormat::Compact => writeln!(buf, "{} {}", level_tag(record.level()), record.args()),
        LogFormat::Pretty => writeln!(
            buf,
            "{} [{}] {}",
            level_tag(record.level()),
            record.target(),
            record.args()
        ),
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
