use std::path::Path;

use alto_logger::{FileLogger, MultiLogger, Options, StyleConfig, TermLogger, TimeConfig};
use anyhow::Context as _;

fn options() -> Options {
    Options::default()
        .with_time(TimeConfig::relative_now())
        .with_style(StyleConfig::SingleLine)
}

/// Logs to the terminal and appends to `log_file`
pub fn init(log_file: &Path) -> anyhow::Result<()> {
    if let Some(dir) = log_file.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("cannot create the log directory: {}", dir.display()))?;
    }

    let logger = MultiLogger::new()
        .with(TermLogger::new(options())?)
        .with(FileLogger::append(options(), log_file)?);
    alto_logger::init(logger)?;

    log::debug!("appending logs to {}", log_file.display());
    Ok(())
}
