use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use onoma::{
    config::Config,
    extractor::DocumentExtractor,
    models::FormatTag,
    pipeline::{apply_plans, BatchSummary, FileReport, Mode, Outcome, Pipeline},
    providers::{build_provider, Provider},
    scratch::RetentionPolicy,
    utils::{collect_files, display_name, format_size, total_size},
};

fn build_cli() -> Command {
    Command::new("onoma")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rename files after their content using an LLM")
        .arg(
            Arg::new("patterns")
                .help("Files or glob patterns to rename")
                .num_args(1..)
                .required_unless_present("save-config"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("Show what would be renamed without touching any file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("interactive")
                .short('i')
                .long("interactive")
                .help("After a dry run, ask whether to apply the planned renames")
                .requires("dry-run")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .help("Treat every file as this format instead of detecting it")
                .value_parser(FormatTag::FORCEABLE),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Configuration file (default: ~/.onomarc)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("save-config")
                .long("save-config")
                .help("Write the default configuration and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .help("Keep temporary files and print where they are")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log provider requests and responses")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool) {
    let default = if verbose { "warn,onoma=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    if let Err(e) = run(&matches).await {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(matches: &ArgMatches) -> Result<()> {
    let config_path = matches.get_one::<PathBuf>("config");

    if matches.get_flag("save-config") {
        let path = match config_path {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        Config::default().save(&path)?;
        println!(
            "{} {}",
            "✅ Default configuration written to".green(),
            path.display().to_string().yellow()
        );
        return Ok(());
    }

    let config = Config::load(config_path.map(PathBuf::as_path))?;
    let provider = build_provider(&config)?;

    let patterns: Vec<String> = matches
        .get_many::<String>("patterns")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let forced = matches
        .get_one::<String>("format")
        .and_then(|tag| FormatTag::from_forced(tag));

    let files = collect_files(&patterns, forced);
    if files.is_empty() {
        println!("{}", "No files to rename.".yellow());
        return Ok(());
    }

    let dry_run = matches.get_flag("dry-run");
    let debug = matches.get_flag("debug");
    let mode = if dry_run { Mode::DryRun } else { Mode::Execute };
    let retention = if debug {
        RetentionPolicy::Retain
    } else {
        RetentionPolicy::Release
    };

    let extractor = DocumentExtractor::new();
    let pipeline = Pipeline::new(&config, provider.as_ref(), &extractor, retention)?;

    println!(
        "Found {} files ({})",
        files.len().to_string().green(),
        format_size(total_size(&files))
    );
    println!(
        "Using: {} with model {}, {} convention\n",
        Provider::from_config(&config)?.to_string().cyan(),
        config.llm_model.yellow(),
        pipeline.rules().convention.to_string().yellow()
    );

    let progress_bar = ProgressBar::new(files.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut reports = Vec::with_capacity(files.len());
    for file in &files {
        progress_bar.set_message(format!("Naming: {}", file.file_name()));
        let report = pipeline.process(file, mode).await;
        print_report(&progress_bar, &report, debug);
        reports.push(report);
        progress_bar.inc(1);
    }
    progress_bar.finish_and_clear();

    if matches.get_flag("interactive") {
        confirm_and_apply(&mut reports)?;
    }

    print_summary(&BatchSummary::from_reports(&reports));
    Ok(())
}

fn describe(report: &FileReport) -> String {
    match &report.outcome {
        Outcome::Renamed(target) => format!(
            "{} {} --> {}",
            "✓".green(),
            report.source.display(),
            display_name(target).green()
        ),
        Outcome::Planned(plan) => format!(
            "{} --> {}",
            report.source.display(),
            plan.target_name.to_string_lossy().cyan()
        ),
        Outcome::Skipped(e) => format!(
            "{} {} [{}]: {}",
            "Skipped".yellow(),
            report.source.display(),
            e.kind(),
            e
        ),
    }
}

fn print_report(progress_bar: &ProgressBar, report: &FileReport, debug: bool) {
    progress_bar.println(describe(report));

    if debug {
        if let Some(path) = &report.retained {
            progress_bar.println(format!("[DEBUG] Temporary files kept at {}", path.display()));
        }
    }
}

/// Ask once, then execute the plans the dry run produced.
fn confirm_and_apply(reports: &mut [FileReport]) -> Result<()> {
    let planned: Vec<usize> = reports
        .iter()
        .enumerate()
        .filter(|(_, r)| matches!(r.outcome, Outcome::Planned(_)))
        .map(|(i, _)| i)
        .collect();
    if planned.is_empty() {
        return Ok(());
    }

    let confirmed = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Apply {} planned renames?", planned.len()))
        .default(false)
        .interact()?;
    if !confirmed {
        println!("No files were renamed.");
        return Ok(());
    }

    apply_plans(reports);
    for index in planned {
        println!("{}", describe(&reports[index]));
    }

    Ok(())
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "\n{} renamed, {} planned, {} skipped",
        summary.renamed.to_string().green(),
        summary.planned.to_string().cyan(),
        summary.skipped.to_string().yellow()
    );
}
