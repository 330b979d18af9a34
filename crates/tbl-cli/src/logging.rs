use std::io::IsTerminal;
use std::str::FromStr;

use crate::Cli;
use tracing_subscriber::EnvFilter;

pub fn init_logging(cli: &Cli) -> tbl_core::Result<()> {
    let filter = EnvFilter::from_str(&cli.log_level)
        .map_err(|e| tbl_core::Error::Logging(e.to_string()))?;

    let builder = tracing_subscriber::fmt::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(use_ansi(cli.log_no_ansi, std::io::stderr().is_terminal()));

    if cli.log_json {
        builder.json().init();
    } else {
        builder.compact().without_time().init();
    }

    Ok(())
}

/// Colour only when stderr is a terminal and colour was not turned off
fn use_ansi(no_ansi: bool, stderr_is_terminal: bool) -> bool {
    !no_ansi && stderr_is_terminal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_colour_when_redirected() {
        assert!(!use_ansi(false, false));
        assert!(!use_ansi(true, false));
    }

    #[test]
    fn test_flag_overrides_terminal() {
        assert!(use_ansi(false, true));
        assert!(!use_ansi(true, true));
    }
}
