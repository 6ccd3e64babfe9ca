//! Command-line interface definitions for astrojournal

use astrojournal::profiles::Profile;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// CLI structure for the astrojournal application
#[derive(Parser)]
#[command(name = "astrojournal")]
#[command(version)]
#[command(about = "Turn tab-separated observation logs into astronomy journals", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands for astrojournal
#[derive(Subcommand)]
pub enum Commands {
    /// Generate the journals from the raw reports
    Generate {
        /// Journal directory (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Report profile, overriding journal.toml
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,

        /// Write the LaTeX sources without compiling them
        #[arg(long)]
        no_compile: bool,

        /// Typesetting command, overriding journal.toml
        #[arg(long, value_name = "CMD")]
        compiler: Option<String>,

        /// Compiler timeout in seconds, 0 for none
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Print the compiler's output
        #[arg(long)]
        show_compiler_output: bool,
    },

    /// Parse the raw reports and list problems without writing anything
    Validate {
        /// Journal directory (defaults to current directory)
        #[arg(value_name = "PATH", default_value = ".")]
        input: PathBuf,

        /// Report profile, overriding journal.toml
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,
    },

    /// Create a new journal with default templates and a sample report
    Init {
        /// Directory to initialize (defaults to current directory)
        path: Option<PathBuf>,

        /// Report profile of the new journal
        #[arg(short, long, value_enum, default_value = "extended")]
        profile: Profile,

        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// List available report profiles
    ListProfiles,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "astrojournal",
            "-vv",
            "generate",
            "journal",
            "--profile",
            "basic",
            "--timeout",
            "0",
            "--no-compile",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate {
                input,
                profile,
                no_compile,
                timeout,
                ..
            } => {
                assert_eq!(input, PathBuf::from("journal"));
                assert_eq!(profile, Some(Profile::Basic));
                assert!(no_compile);
                assert_eq!(timeout, Some(0));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_profile_alias() {
        let cli = Cli::parse_from(["astrojournal", "init", "--profile", "ext"]);
        assert!(matches!(
            cli.command,
            Commands::Init {
                profile: Profile::Extended,
                ..
            }
        ));
    }
}
