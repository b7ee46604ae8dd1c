use color_eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{self, LOG_ENV, LOG_FILE};

/// Log to `<data_dir>/scribe.log`; the terminal belongs to the UI.
///
/// The filter comes from `RUST_LOG`, then `SCRIBE_LOG_LEVEL`, then `info` for
/// the scribe crates.
pub fn init() -> Result<()> {
    let directory = config::get_data_dir();
    std::fs::create_dir_all(directory.clone())?;
    let log_path = directory.join(LOG_FILE.clone());
    let log_file = std::fs::File::create(log_path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV.clone()))
        .or_else(|_| EnvFilter::try_new(default_directives()))?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);
    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}

fn default_directives() -> String {
    ["scribe", "form_api", "form_engine"]
        .map(|target| format!("{target}=info"))
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert_eq!(default_directives(), "scribe=info,form_api=info,form_engine=info");
        assert!(EnvFilter::try_new(default_directives()).is_ok());
    }
}
