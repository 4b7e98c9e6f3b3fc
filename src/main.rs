use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;

mod app;
mod config;
mod constants;
mod domain;
mod help;
mod loader;
mod platform;

#[cfg(test)]
mod test_utils;

use crate::{
    app::{App, Outcome, report_failure},
    config::AppConfig,
    constants::VERSION,
    domain::AppError,
};

/// pathclip - copy a cleaned-up list of file paths to the clipboard
#[derive(Parser)]
#[command(version = VERSION, about, long_about = None, disable_version_flag = true, disable_help_flag = true)]
struct Cli {
    /// Text file with one file path per line
    #[arg(allow_hyphen_values = true)]
    input: Option<PathBuf>,

    /// Arguments after the input file, ignored
    #[arg(hide = true, trailing_var_arg = true, allow_hyphen_values = true)]
    ignored: Vec<OsString>,
}

/// Application entry point
fn main() -> Result<ExitCode> {
    // Initialize logger FIRST
    env_logger::init();
    install_hooks()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return Ok(ExitCode::FAILURE);
        }
    };
    if !cli.ignored.is_empty() {
        tracing::debug!("Ignoring extra arguments: {:?}", cli.ignored);
    }

    let Some(input) = cli.input else {
        help::show(&mut io::stdout(), help::wait_for_acknowledgment);
        return Ok(ExitCode::SUCCESS);
    };

    // Current-thread runtime: the pipeline runs on one blocking thread while
    // the runtime only watches for Ctrl+C.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let code = runtime.block_on(run_pipeline(input));
    // Don't wait on a pipeline abandoned by Ctrl+C.
    runtime.shutdown_background();

    Ok(ExitCode::from(code))
}

/// Installs color-eyre's error report hook.
///
/// Panic reports only reach the debug log: the pipeline turns panics into an
/// "Unexpected error" line on its own.
fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install()?;
    std::panic::set_hook(Box::new(move |info| {
        tracing::debug!("{}", panic_hook.panic_report(info));
    }));
    Ok(())
}

/// Runs the pipeline, racing it against an interrupt.
async fn run_pipeline(input: PathBuf) -> u8 {
    let config = AppConfig::load();
    tracing::debug!("Using configuration: {config:?}");

    let pipeline = tokio::task::spawn_blocking(move || {
        let app = App::from_config(&config);
        let outcome = app.process(&input, &mut io::stdout());
        match &outcome {
            Outcome::Copied { count } | Outcome::ConsoleFallback { count } => {
                tracing::info!("Handled {count} path(s) from {}", input.display());
            }
            Outcome::NothingFound => tracing::info!("No paths in {}", input.display()),
            Outcome::Failed(err) => tracing::debug!("Run failed for {}: {err}", input.display()),
        }
        outcome.exit_code()
    });

    tokio::select! {
        joined = pipeline => match joined {
            Ok(code) => code,
            Err(err) => {
                let outcome = Outcome::Failed(AppError::unexpected(err.to_string()));
                let _ = report_failure(&mut io::stdout(), &outcome);
                outcome.exit_code()
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            println!("\n\nOperation cancelled");
            0
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[test]
    fn test_no_arguments_means_help() {
        let cli = Cli::try_parse_from(["pathclip"]).unwrap();
        assert_eq!(cli.input, None);
        assert!(cli.ignored.is_empty());
    }

    #[rstest]
    #[case::plain(vec!["pathclip", "a.txt"], "a.txt")]
    #[case::leading_hyphen(vec!["pathclip", "-x.txt"], "-x.txt")]
    #[case::double_hyphen(vec!["pathclip", "--list.txt"], "--list.txt")]
    fn test_input_is_taken_verbatim(#[case] args: Vec<&str>, #[case] expected: &str) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from(expected)));
    }

    #[rstest]
    #[case::word(vec!["pathclip", "a.txt", "extra"], 1)]
    #[case::flags(vec!["pathclip", "a.txt", "-v", "--more", "b"], 3)]
    fn test_extra_arguments_are_ignored(#[case] args: Vec<&str>, #[case] ignored: usize) {
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("a.txt")));
        assert_eq!(cli.ignored.len(), ignored);
    }

    #[test]
    fn test_panic_hook_keeps_unwinding() {
        install_hooks().unwrap();

        let caught = std::panic::catch_unwind(|| -> u8 { panic!("quiet") });
        // Back to the default hook for the rest of the test binary.
        let _ = std::panic::take_hook();

        assert!(caught.is_err());
    }
}
