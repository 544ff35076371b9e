use colored::Colorize;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

// Uses 'log' to allow for logging
// Used for debugging the compiler more quickly
// The error level for specific modules can be specified
// Logging is done by logging the level, target and the given arguments to stderr
struct SimpleLogger;

impl log::Log for SimpleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level()
            <= match metadata.target() {
                "hinac_lib::lexer" => Level::Debug,
                "hinac_lib::backend::ir::builder" => Level::Debug,
                _ => Level::Trace,
            }
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let output = format!(
                "{} - {} - {}",
                record.level(),
                record.target(),
                record.args()
            );

            match record.level() {
                Level::Error => eprintln!("{}", output.red()),
                Level::Warn => eprintln!("{}", output.purple()),
                Level::Info => eprintln!("{}", output.blue()),
                _ => eprintln!("{}", output),
            }
        }
    }

    fn flush(&self) {}
}

// Only warnings and errors are shown, unless verbose output is requested
pub fn level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    }
}

// Initializes 'log' with the custom logger
pub fn init(verbose: bool) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level(verbose)))
}
static LOGGER: SimpleLogger = SimpleLogger;
