use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

const LOG_ENV: &str = "KERNEL_LOG";

struct StdoutLogger;

static LOGGER: StdoutLogger = StdoutLogger;

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let target = record.target().strip_prefix("paging_kernel_emulator::").unwrap_or(record.target());
        println!("[{:<5}] {}: {}", record.level(), target, record.args());
    }

    fn flush(&self) {}
}

/// Installs the stdout logger. `KERNEL_LOG` overrides the requested level.
pub(crate) fn init(verbose: bool) -> Result<(), SetLoggerError> {
    let default = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| parse_level(&value))
        .unwrap_or(default);

    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().parse::<Level>() {
        Ok(level) => Some(level.to_level_filter()),
        Err(_) if value.trim().eq_ignore_ascii_case("off") => Some(LevelFilter::Off),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Context;

    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Some(LevelFilter::Debug));
        assert_eq!(parse_level(" WARN "), Some(LevelFilter::Warn));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("chatty"), None);
    }

    #[test]
    fn test_logger_second_init_fails_with_context() {
        let _ = init(false);

        let err = init(false).context("failed to install logger").unwrap_err();
        assert_eq!(err.to_string(), "failed to install logger");
        assert_eq!(err.chain().count(), 2);
    }
}
