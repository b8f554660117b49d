mod args;
mod commands;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use ytexport_core::ExportError;

use args::{Cli, Commands};

const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let filter = match (cli.quiet, cli.verbose) {
        (true, _) => "yt_playlist_export=warn,ytexport=warn",
        (false, 0) => "yt_playlist_export=info,ytexport=info",
        (false, 1) => "yt_playlist_export=debug,ytexport=debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    // Nothing to export: show help rather than fail
    if shows_help(&cli) {
        use clap::CommandFactory;
        if let Err(e) = Cli::command().print_help() {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
        println!();
        return ExitCode::SUCCESS;
    }

    let work = async {
        match cli.command {
            Some(Commands::Doctor) => commands::doctor::run(cli.config.as_deref()).await,
            Some(Commands::Config) => commands::config::run(cli.config.as_deref()).await,
            None => commands::export::run(&cli).await,
        }
    };

    let result = tokio::select! {
        result = work => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("\nAborted by user.\n");
            return ExitCode::from(EXIT_INTERRUPTED);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn shows_help(cli: &Cli) -> bool {
    cli.command.is_none() && !cli.has_input() && cli.export != args::ExportType::NewpipeSubs
}

/// Status for a failed run; export failures pick their own, anything else is 1.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<ExportError>()
        .map(ExportError::exit_code)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use std::path::PathBuf;

    fn failed(err: ExportError) -> anyhow::Error {
        Err::<(), _>(err).context("Export failed").unwrap_err()
    }

    #[test]
    fn test_exit_code_survives_context() {
        assert_eq!(exit_code(&failed(ExportError::NoSubscriptions)), 2);
        assert_eq!(exit_code(&failed(ExportError::Usage("no input".to_string()))), 2);
        assert_eq!(exit_code(&failed(ExportError::NoValidIds(PathBuf::from("ids.txt")))), 1);
    }

    #[test]
    fn test_other_errors_exit_one() {
        assert_eq!(exit_code(&anyhow::anyhow!("yt-dlp not found in PATH")), 1);
        assert_eq!(EXIT_INTERRUPTED, 130);
    }

    #[test]
    fn test_help_only_without_input() {
        let bare = Cli::try_parse_from(["yt-playlist-export"]).unwrap();
        assert!(shows_help(&bare));

        let subs = Cli::try_parse_from(["yt-playlist-export", "-e", "newpipe-subs"]).unwrap();
        assert!(!shows_help(&subs));

        let urls = Cli::try_parse_from(["yt-playlist-export", "https://www.youtube.com/playlist?list=PL1"]).unwrap();
        assert!(!shows_help(&urls));

        let doctor = Cli::try_parse_from(["yt-playlist-export", "doctor"]).unwrap();
        assert!(!shows_help(&doctor));
    }
}
