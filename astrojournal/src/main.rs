//! astrojournal - astronomy observation journals
//!
//! A CLI tool that turns tab-separated observation logs into LaTeX journals
//! by date, by target and by constellation.

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(missing_docs))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

mod cli;

use anyhow::{Context, Result};
use astrojournal::journal_config::JournalConfig;
use astrojournal::pipeline::{self, GenerationSummary};
use astrojournal::profiles::{get_all_profiles, Profile};
use astrojournal::templates;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::{Path, PathBuf};

/// Main entry point for the astrojournal CLI application
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    }
}

/// Run the CLI application
fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Generate {
            input,
            profile,
            no_compile,
            compiler,
            timeout,
            show_compiler_output,
        } => {
            handle_generate_command(
                &input,
                profile,
                no_compile,
                compiler,
                timeout,
                show_compiler_output,
            )?;
        }

        Commands::Validate { input, profile } => {
            handle_validate_command(&input, profile)?;
        }

        Commands::Init {
            path,
            profile,
            force,
        } => {
            handle_init_command(path, profile, force)?;
        }

        Commands::ListProfiles => {
            handle_list_profiles_command();
        }
    }

    Ok(())
}

/// Initialise env_logger; `RUST_LOG` still applies on top of the flags
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Warn,
        (false, 1) => log::LevelFilter::Info,
        (false, _) => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Load journal.toml and apply a profile override
fn load_config(input: &Path, profile: Option<Profile>) -> Result<JournalConfig> {
    let mut config = JournalConfig::load_from_dir(input)
        .with_context(|| format!("Failed to load configuration from {}", input.display()))?;
    if let Some(profile) = profile {
        config.profile = profile;
    }
    Ok(config)
}

/// Handle the generate command
fn handle_generate_command(
    input: &Path,
    profile: Option<Profile>,
    no_compile: bool,
    compiler: Option<String>,
    timeout: Option<u64>,
    show_compiler_output: bool,
) -> Result<()> {
    let mut config = load_config(input, profile)?;
    if no_compile {
        config.compiler.enabled = false;
    }
    if let Some(command) = compiler {
        config.compiler.command = command;
    }
    if let Some(secs) = timeout {
        config.compiler.timeout_secs = secs;
    }
    config.compiler.show_output |= show_compiler_output;

    println!("Generating journals...");
    println!("Journal: {}", input.display());
    println!("Profile: {}", config.profile);

    let summary = pipeline::generate(input, &config)
        .with_context(|| format!("Failed to generate journals in {}", input.display()))?;

    print_summary(&summary);

    if !summary.is_success() {
        anyhow::bail!("Some journals were not generated completely");
    }
    Ok(())
}

/// Print what a generation run produced
fn print_summary(summary: &GenerationSummary) {
    println!(
        "\n✓ Imported {} reports from {} files ({} warnings)",
        summary.reports, summary.files, summary.warnings
    );
    for failure in &summary.import_failures {
        println!("✗ {failure}");
    }

    for pass in &summary.passes {
        match &pass.result {
            Ok(report) if report.is_complete() => println!(
                "✓ {}: {} ({} fragments)",
                pass.output.name(),
                report.document.display(),
                report.fragments
            ),
            Ok(report) => println!(
                "✗ {}: {} ({} fragments, {} failed)",
                pass.output.name(),
                report.document.display(),
                report.fragments,
                report.failures.len()
            ),
            Err(e) => println!("✗ {}: {e}", pass.output.name()),
        }
    }

    for compilation in &summary.compilations {
        match &compilation.result {
            Ok(report) => println!("✓ Compiled {}", report.pdf.display()),
            Err(e) => println!("✗ {}: {e}", compilation.document.display()),
        }
    }
}

/// Handle the validate command
fn handle_validate_command(input: &Path, profile: Option<Profile>) -> Result<()> {
    let config = load_config(input, profile)?;

    println!("Validating raw reports...");
    println!("Journal: {}", input.display());
    println!("Profile: {}", config.profile);

    let journal = pipeline::import(input, &config)
        .with_context(|| format!("Failed to import reports from {}", input.display()))?;

    for file in &journal.files {
        println!("\n{}: {} reports", file.path.display(), file.report_count);
        for warning in &file.warnings {
            println!("  ! {warning}");
        }
    }
    for failure in &journal.failures {
        println!("\n✗ {failure}");
    }

    let warnings = journal.warning_count();
    println!(
        "\n{} reports, {} targets, {} warnings",
        journal.reports.len(),
        journal
            .reports
            .iter()
            .map(|report| report.items.len())
            .sum::<usize>(),
        warnings
    );

    if !journal.failures.is_empty() {
        anyhow::bail!("{} raw files could not be read", journal.failures.len());
    }
    if warnings == 0 {
        println!("✓ No problems found");
    }
    Ok(())
}

/// Handle the init command
fn handle_init_command(path: Option<PathBuf>, profile: Profile, force: bool) -> Result<()> {
    let target_path = path.unwrap_or_else(|| PathBuf::from("."));

    println!("Initializing {profile} journal");
    println!("Target path: {}", target_path.display());

    // Create the target directory if it doesn't exist
    if !target_path.exists() {
        std::fs::create_dir_all(&target_path)
            .with_context(|| format!("Failed to create directory {}", target_path.display()))?;
    }

    // Check if directory is empty (unless force flag is set)
    if !force {
        check_directory_empty(&target_path)?;
    }

    let config = JournalConfig {
        profile,
        ..JournalConfig::default()
    };
    let files = templates::write_journal_skeleton(&target_path, &config)
        .with_context(|| format!("Failed to write journal files in {}", target_path.display()))?;

    println!("\n✓ Successfully created {} files", files.len());
    println!("\nNext steps:");
    println!(
        "  1. Add your observation logs to {}/",
        config.raw_reports_folder
    );
    println!("  2. Adjust the LaTeX headers in {}/", config.header_footer_folder);
    println!("  3. Run 'astrojournal generate' to build the journals");

    Ok(())
}

/// Handle the list-profiles command
fn handle_list_profiles_command() {
    println!("Available report profiles:\n");

    for profile in get_all_profiles() {
        println!("  {} - {}", profile.name(), profile.description());
        println!("    Aliases: {}", profile.aliases().join(", "));
        println!("    Columns: {}", profile.schema().item_header_line().replace('\t', ", "));
        println!();
    }

    println!("Usage: astrojournal init [path] --profile <profile>");
}

/// Check if a directory is empty
fn check_directory_empty(path: &Path) -> Result<()> {
    if let Ok(entries) = std::fs::read_dir(path) {
        if entries.count() > 0 {
            anyhow::bail!("Target directory is not empty. Use --force to overwrite existing files");
        }
    }
    Ok(())
}
