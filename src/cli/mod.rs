//! CLI parser and command dispatch.

mod check;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use folio::config::{load_settings, LoadOptions};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Portfolio site server")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the portfolio site (default)
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT
        #[arg(short, long)]
        bind: Option<String>,

        /// Site directory holding the portfolio document and assets
        #[arg(short, long)]
        site: Option<PathBuf>,
    },

    /// Check the portfolio document against the project catalog
    Check {
        /// Site directory holding the portfolio document
        #[arg(short, long)]
        site: Option<PathBuf>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let mut settings = load_settings(&options).await?;

    match cli.command {
        None => serve::cmd_serve(&mut settings, None).await,
        Some(Commands::Serve { bind, site }) => {
            if let Some(site) = site {
                settings.site_dir = site;
            }
            serve::cmd_serve(&mut settings, bind.as_deref()).await
        }
        Some(Commands::Check { site }) => {
            if let Some(site) = site {
                settings.site_dir = site;
            }
            check::cmd_check(&settings).await
        }
    }
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
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["folio"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_serve_flags() {
        let cli =
            Cli::try_parse_from(["folio", "serve", "--bind", "8080", "--site", "public", "-v"])
                .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(Commands::Serve { bind, site }) => {
                assert_eq!(bind.as_deref(), Some("8080"));
                assert_eq!(site, Some(PathBuf::from("public")));
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_check_accepts_global_config() {
        let cli = Cli::try_parse_from(["folio", "check", "--config", "site.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
        assert!(matches!(cli.command, Some(Commands::Check { site: None })));
    }
}
