// ABOUTME: Command line arguments for the canopy binary
// ABOUTME: Global config and log level flags plus the tree, search and replay subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "canopy")]
#[command(version, about = "Navigate bot projects from the command line")]
pub struct Args {
    /// Navigator settings (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Also write logs to the rolling log file
    #[arg(long, global = true, default_value_t = false)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the project tree
    Tree {
        /// Solution file: a JSON array of bot projects
        solution: PathBuf,

        /// Node ids to show collapsed
        #[arg(long = "collapse", value_name = "ID")]
        collapsed: Vec<String>,
    },

    /// Run a quick search query; a leading `>` searches commands
    Search {
        solution: PathBuf,
        query: String,
    },

    /// Apply a script of session commands and print the session after each
    Replay {
        solution: PathBuf,
        script: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "canopy",
            "search",
            "bots.json",
            "greet",
            "--log-level",
            "debug",
            "--config",
            "canopy.toml",
        ])
        .unwrap();

        assert_eq!(args.log_level, "debug");
        assert_eq!(args.config, Some(PathBuf::from("canopy.toml")));
        match args.command {
            Command::Search { query, .. } => assert_eq!(query, "greet"),
            other => panic!("Expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_repeated_collapse_flags() {
        let args = Args::try_parse_from([
            "canopy",
            "tree",
            "bots.json",
            "--collapse",
            "lgGroup:main",
            "--collapse",
            "luGroup:main",
        ])
        .unwrap();

        match args.command {
            Command::Tree { collapsed, .. } => assert_eq!(collapsed.len(), 2),
            other => panic!("Expected tree, got {other:?}"),
        }
    }
}
