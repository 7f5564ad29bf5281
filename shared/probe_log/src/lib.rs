//! Stderr logger for the host tools.
//!
//! One line per record: a coloured level column followed by the message.
//! Stdout stays free for anything a batch script wants to capture.

use std::env;
use std::fmt::Display;
use std::io::{self, Write};

use log::{Level, LevelFilter, Log};
use owo_colors::OwoColorize;

/// Environment variable that overrides the level picked on the command line.
pub const LEVEL_ENV: &str = "READPROBE_LOG";

fn write_with_color(out: &mut impl Write, color: Color, string: impl Display) {
    let string: &dyn Display = match color {
        Color::Default => &string,
        Color::BrightRed => &string.bright_red(),
        Color::BrightYellow => &string.bright_yellow(),
        Color::BrightBlue => &string.bright_blue(),
        Color::BrightCyan => &string.bright_cyan(),
        Color::BrightMagenta => &string.bright_magenta(),
    };
    // Nowhere left to report a failing stderr.
    let _ = write!(out, "{string}");
}

struct ProbeLogger;

static LOGGER: ProbeLogger = ProbeLogger;

impl Log for ProbeLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // Holding the lock keeps a record on one line when several threads log.
        let mut out = io::stderr().lock();
        let level = record.level();
        write_with_color(&mut out, level_color(level), format_args!("{level:5} "));
        write_with_color(&mut out, Color::Default, record.args());
        write_with_color(&mut out, Color::Default, "\n");
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

fn level_color(level: Level) -> Color {
    match level {
        Level::Error => Color::BrightRed,
        Level::Warn => Color::BrightYellow,
        Level::Info => Color::BrightBlue,
        Level::Debug => Color::BrightCyan,
        Level::Trace => Color::BrightMagenta,
    }
}

/// Map `-v`/`-q` counts to a level: info by default, one step per flag.
pub fn level_from_flags(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Warn;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Parse a `READPROBE_LOG` value. Unknown names yield `None`.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.trim().parse().ok()
}

/// Install the logger. `READPROBE_LOG`, when set to a valid level, wins over `default`.
pub fn init(default: LevelFilter) -> Result<(), log::SetLoggerError> {
    let level = env::var(LEVEL_ENV)
        .ok()
        .and_then(|v| parse_level(&v))
        .unwrap_or(default);
    log::set_max_level(level);
    log::set_logger(&LOGGER)
}

enum Color {
    Default,
    BrightRed,
    BrightYellow,
    BrightBlue,
    BrightCyan,
    BrightMagenta,
}
