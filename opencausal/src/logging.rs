use std::env;
use std::fmt::Arguments;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Verbosity selected by `OPENCAUSAL_TRACE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Verbosity {
    Off,
    Basic,
    Full,
}

/// Severity of one log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Trace,
    Warning,
    Error,
    Critical,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Level::Trace => "34",
            Level::Warning => "33",
            Level::Error => "91",
            Level::Critical => "31",
        }
    }

    /// Lowest verbosity at which this level is printed.
    fn threshold(self) -> Verbosity {
        match self {
            Level::Warning => Verbosity::Full,
            Level::Trace | Level::Error => Verbosity::Basic,
            Level::Critical => Verbosity::Off,
        }
    }
}

static VERBOSITY: OnceLock<Verbosity> = OnceLock::new();

/// `1` or `basic` traces plates and loop phases; `full` adds warnings about
/// suspicious but legal input.
fn parse_verbosity(value: &str) -> Verbosity {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "basic" => Verbosity::Basic,
        "full" => Verbosity::Full,
        _ => Verbosity::Off,
    }
}

fn verbosity() -> Verbosity {
    *VERBOSITY.get_or_init(|| {
        env::var("OPENCAUSAL_TRACE")
            .map(|value| parse_verbosity(&value))
            .unwrap_or(Verbosity::Off)
    })
}

pub fn enabled(level: Level) -> bool {
    verbosity() >= level.threshold()
}

fn timestamp_hms() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        % 86_400;
    format!("{:02}:{:02}:{:02}", secs / 3_600, (secs % 3_600) / 60, secs % 60)
}

/// Write one line to stderr, tagged with the emitting module.
pub fn log(level: Level, target: &str, args: Arguments) {
    if !enabled(level) {
        return;
    }
    let target = target.strip_prefix("opencausal::").unwrap_or(target);
    eprintln!(
        "{} [\u{001b}[{}m{}\u{001b}[0m] {} -- {}",
        timestamp_hms(),
        level.color(),
        level.tag(),
        target,
        args
    );
}

#[macro_export]
macro_rules! warning {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::Level::Warning, module_path!(), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::Level::Error, module_path!(), format_args!($($arg)*))
    };
}

/// Printed regardless of `OPENCAUSAL_TRACE`.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::Level::Critical, module_path!(), format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        $crate::logging::log($crate::logging::Level::Trace, module_path!(), format_args!($($arg)*))
    };
}
