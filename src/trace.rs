use chrono::{Local, SecondsFormat};
use tracing_subscriber::{
    filter::Targets,
    fmt::{self, time},
    prelude::*,
};

use crate::{Error, config::Log};

/// Installs the global subscriber. Logs go to stderr so stdout stays JSON.
pub fn init(log: &Log) -> Result<(), Error> {
    let is_color = log.style.is_color();
    if !is_color {
        yansi::disable();
    }
    let filter = parse_filter(&log.level)?;
    let format = fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime)
        .with_ansi(is_color);

    tracing_subscriber::registry()
        .with(format)
        .with(filter)
        .init();
    Ok(())
}

fn parse_filter(level: &str) -> Result<Targets, Error> {
    level.parse::<Targets>().map_err(|err| Error::LogFilter {
        filter: level.to_owned(),
        reason: err.to_string(),
    })
}

struct LocalTime;

impl time::FormatTime for LocalTime {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            Local::now().to_rfc3339_opts(SecondsFormat::Millis, false)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_parses() {
        assert!(parse_filter(&Log::default().level).is_ok());
        assert!(parse_filter("ipmonster=debug,isahc=warn").is_ok());
    }

    #[test]
    fn bad_level_is_an_error() {
        let err = parse_filter("ipmonster=loud").unwrap_err();
        assert_eq!(err.code(), "log_filter_error");
        assert!(err.to_string().contains("ipmonster=loud"));
    }
}
