//! relay-log: send log records through the configured sinks from a shell.
//!
//! ```text
//! relay-log send --level info [--config opts.toml] [--prefix P] [--suffix S] MSG...
//! relay-log pipe --level info [--config opts.toml] [--watch]     (one record per stdin line)
//! ```
//!
//! Sinks come from the process environment (REMOTE_HOST, CHAT_WEBHOOK_URL, ...)
//! and the optional options file. Diagnostics go to stderr, filtered by RUST_LOG.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use relay_logger::config::loader::load_options;
use relay_logger::config::watcher::OptionsWatcher;
use relay_logger::observability::logging::{init_diagnostics, DiagnosticFormat};
use relay_logger::{LogError, LogOptions, Logger, PackageInfo};

#[derive(Parser)]
#[command(name = "relay-log")]
#[command(about = "Send log records to local and remote sinks", long_about = None)]
struct Cli {
    /// Emit diagnostics as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Common {
    /// Severity level (error, warn, info, verbose, debug, silly)
    #[arg(short, long, default_value = "info")]
    level: String,

    /// TOML options file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one record built from the arguments
    Send {
        #[command(flatten)]
        common: Common,

        #[arg(long)]
        prefix: Option<String>,

        #[arg(long)]
        suffix: Option<String>,

        /// Message fragments
        #[arg(required = true)]
        message: Vec<String>,
    },
    /// Log every line read from stdin
    Pipe {
        #[command(flatten)]
        common: Common,

        /// Reload the options file when it changes
        #[arg(short, long, requires = "config")]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let format = if cli.json {
        DiagnosticFormat::Json
    } else {
        DiagnosticFormat::Pretty
    };
    init_diagnostics(format, "relay_logger=info,relay_log=info");

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Send {
            common,
            prefix,
            suffix,
            message,
        } => {
            let mut options = file_options(common.config.as_deref())?;
            if let Some(prefix) = prefix {
                options = options.prefix(prefix);
            }
            if let Some(suffix) = suffix {
                options = options.suffix(suffix);
            }

            let logger = logger(options);
            let outcome = logger.log(&common.level, message).await?;
            tracing::debug!(remote = outcome.remote(), sinks = outcome.sinks.len(), "record sent");
        }
        Commands::Pipe { common, watch } => {
            let logger = Arc::new(logger(file_options(common.config.as_deref())?));

            // Keep the watcher alive for the whole pipe.
            let _watcher = match (watch, common.config.as_deref()) {
                (true, Some(path)) => {
                    let (watcher, updates) = OptionsWatcher::new(path);
                    let handle = watcher.run()?;
                    logger.follow(updates);
                    Some(handle)
                }
                _ => None,
            };

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut count = 0usize;
            while let Some(line) = lines.next_line().await? {
                if line.is_empty() {
                    continue;
                }
                match logger.log(&common.level, line).await {
                    Ok(_) => count += 1,
                    Err(e @ LogError::InvalidLevel(_)) => return Err(e.into()),
                    Err(e) => tracing::warn!(error = %e, "record not fully delivered"),
                }
            }
            tracing::info!(records = count, "stdin closed");
        }
    }
    Ok(())
}

fn file_options(path: Option<&Path>) -> Result<LogOptions, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let options = load_options(path)?;
            tracing::info!(path = ?path, "options loaded");
            Ok(options)
        }
        None => Ok(LogOptions::default()),
    }
}

fn logger(options: LogOptions) -> Logger {
    Logger::builder()
        .package(relay_logger::package_info!())
        .options(options)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_send() {
        let cli = Cli::try_parse_from(["relay-log", "send", "-l", "warn", "--prefix", "P", "a", "b"]).unwrap();
        match cli.command {
            Commands::Send {
                common,
                prefix,
                message,
                ..
            } => {
                assert_eq!(common.level, "warn");
                assert_eq!(prefix.as_deref(), Some("P"));
                assert_eq!(message, vec!["a", "b"]);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_watch_requires_config() {
        assert!(Cli::try_parse_from(["relay-log", "pipe", "--watch"]).is_err());
    }

    #[test]
    fn test_package_descriptor() {
        let package: PackageInfo = relay_logger::package_info!();
        assert_eq!(package.name, "relay-logger");
    }
}
