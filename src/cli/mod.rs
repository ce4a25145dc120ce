//! CLI module for the restaurant API
//!
//! Provides subcommands:
//! - `serve`: run the HTTP API (default)
//! - `migrate`: prepare the document store schema and exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Restaurant management API - menus, food, tables, orders, invoices and notes
#[derive(Parser)]
#[command(name = "restaurant-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP API server (default)
    Serve,

    /// Create the document table and its indexes, then exit
    Migrate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["restaurant-api", "migrate"]).unwrap();
        assert_eq!(cli.command, Some(Command::Migrate));

        let cli = Cli::try_parse_from(["restaurant-api", "serve"]).unwrap();
        assert_eq!(cli.command, Some(Command::Serve));
    }

    #[test]
    fn test_serve_is_optional() {
        let cli = Cli::try_parse_from(["restaurant-api"]).unwrap();
        assert_eq!(cli.command, None);
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(Cli::try_parse_from(["restaurant-api", "ui"]).is_err());
    }
}
