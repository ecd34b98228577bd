//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for `run` results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown table, narrative summary and timing footer
    Markdown,
    /// The aggregated artifact as JSON
    Json,
}

impl From<OutputFormat> for swarm_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Markdown => swarm_domain::OutputFormat::Markdown,
            OutputFormat::Json => swarm_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for browser-swarm
#[derive(Parser, Debug)]
#[command(name = "browser-swarm")]
#[command(author, version, about = "Parallel browser agents that research companies")]
#[command(long_about = r#"
Browser Swarm turns one natural-language command into parallel research
tasks, runs each on its own browser agent, and merges the answers into a
single table with a narrative summary.

Configuration files are loaded from (in priority order):
1. SWARM_<SECTION>__<KEY>  Environment variables
2. --config <path>         Explicit config file
3. ./swarm.toml            Project-level config
4. ~/.config/browser-swarm/config.toml   Global config

Example:
  browser-swarm serve
  browser-swarm run "look up 3 fintech companies valuation"
  browser-swarm run --output json "research Stripe and Brex funding"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the REST and WebSocket interface
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Execute one command and print the result
    Run {
        /// The command, e.g. "look up 5 companies valuation"
        command: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "markdown")]
        output: OutputFormat,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "browser-swarm",
            "-vv",
            "run",
            "--output",
            "json",
            "look up 2 companies",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::Run {
                command: "look up 2 companies".into(),
                output: OutputFormat::Json,
            })
        );
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::try_parse_from(["browser-swarm", "serve", "--port", "9000", "-q"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(
            cli.command,
            Some(Command::Serve {
                host: None,
                port: Some(9000),
            })
        );
    }

    #[test]
    fn test_show_config_without_subcommand() {
        let cli = Cli::try_parse_from(["browser-swarm", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_output_format_conversion() {
        assert_eq!(
            swarm_domain::OutputFormat::from(OutputFormat::Json),
            swarm_domain::OutputFormat::Json
        );
    }
}
