use crate::{Cli, LogMode};

pub mod logger;

/// Wire up logging from the CLI flags before any command runs.
pub fn start(cli: &Cli) -> anyhow::Result<()> {
    let mode = match cli.log_mode.unwrap_or_default() {
        LogMode::Full => logger::LoggingMode::Full,
        LogMode::Json => logger::LoggingMode::Json,
        LogMode::Compact => logger::LoggingMode::Compact,
    };
    logger::log(cli.debug.into(), mode, cli.log_file.as_ref())
}
