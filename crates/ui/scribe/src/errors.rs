//! Error and panic reporting for the terminal client.
use std::sync::OnceLock;

use color_eyre::{Result, config::HookBuilder};
use tracing::error;

static HOOKS_INSTALLED: OnceLock<()> = OnceLock::new();

/// Install the eyre and panic hooks once per process.
///
/// On panic the terminal is restored first, then the report goes to the log
/// file. Release builds also write a human-panic dump; debug builds print a
/// full backtrace instead.
pub fn init() -> Result<()> {
    if HOOKS_INSTALLED.get().is_some() {
        return Ok(());
    }

    let (panic_hook, eyre_hook) = HookBuilder::default()
        .panic_section(format!(
            "{} crashed. Your answers were not submitted; please log in again.",
            env!("CARGO_PKG_NAME")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .try_into_hooks()?;
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |info| {
        restore_terminal();

        let report = panic_hook.panic_report(info).to_string();
        error!(report = %strip_ansi_escapes::strip_str(&report), "panic");

        #[cfg(not(debug_assertions))]
        {
            let meta = human_panic::metadata!();
            let dump = human_panic::handle_dump(&meta, info);
            // stderr may already be gone
            let _ = human_panic::print_msg(dump, &meta);
            eprintln!("{report}");
        }

        #[cfg(debug_assertions)]
        {
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(info);
        }

        std::process::exit(libc::EXIT_FAILURE);
    }));

    let _ = HOOKS_INSTALLED.set(());
    Ok(())
}

/// Leave raw mode and the alternate screen so the report is readable.
fn restore_terminal() {
    match crate::tui::Tui::new() {
        Ok(mut tui) => {
            if let Err(e) = tui.exit() {
                error!("failed to restore terminal: {e:?}");
            }
        }
        Err(e) => error!("failed to reach terminal: {e:?}"),
    }
}
