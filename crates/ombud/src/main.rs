// SPDX-FileCopyrightText: 2026 Ombud Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ombud - intake-and-routing bot for a nonprofit team.
//!
//! This is the binary entry point.

use clap::{Parser, Subcommand};

/// Ombud - intake-and-routing bot.
#[derive(Parser, Debug)]
#[command(name = "ombud", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ombud_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            ombud_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = ombud::serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            let mut printable = config.clone();
            // Never print the credential itself.
            if printable.bot.token.is_some() {
                printable.bot.token = Some("<set>".to_string());
            }
            match toml::to_string_pretty(&printable) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => {
                    eprintln!("error: failed to render config: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("ombud: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify config loads with defaults (no config file needed).
        let config = ombud_config::load_and_validate().expect("default config should be valid");
        assert_eq!(config.hours.timezone, "+00:00");
    }
}
