use log::{LevelFilter, debug};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

pub fn init_logging(log_level: LevelFilter) {
    // Integration tests run several commands in one process, and only the first one installs the logger.
    if TermLogger::init(
        log_level,
        Default::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .is_err()
    {
        debug!("Logger was already initialised");
    }
}
