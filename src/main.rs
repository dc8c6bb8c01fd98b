use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use gorewrite::file::{ApplyOptions, FileError, FileReport, ModifierStatus};
use gorewrite::plan::{load_all, run_plan, RunError};
use gorewrite::write::WriteResult;
use gorewrite::{GoFile, ModifyError, ProjectGuard};
use similar::{ChangeTag, TextDiff};
use std::env;
use std::path::{Path, PathBuf};

mod logging;

#[derive(Parser)]
#[command(name = "gorewrite")]
#[command(about = "Structural, idempotent rewriting of generated Go files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a plan (or every plan in a directory) to a Go project
    Apply {
        /// Plan file or directory of plan files
        #[arg(short, long)]
        plan: PathBuf,

        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Show what would change without writing files
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show a unified diff of each changed file
        #[arg(short, long)]
        diff: bool,

        /// Downgrade modifier failures to warnings and keep going
        #[arg(short, long)]
        force: bool,
    },

    /// Report which files a plan would change; never writes
    Check {
        /// Plan file or directory of plan files
        #[arg(short, long)]
        plan: PathBuf,

        /// Project root (defaults to the current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Parse and reprint a Go file (round-trip check)
    Print {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.global.verbose, cli.global.quiet, cli.global.no_color)?;

    match cli.command {
        Commands::Apply {
            plan,
            root,
            dry_run,
            diff,
            force,
        } => cmd_apply(&plan, root, dry_run, diff, force),
        Commands::Check { plan, root } => cmd_check(&plan, root),
        Commands::Print { file } => cmd_print(&file),
    }
}

fn resolve_root(root: Option<PathBuf>) -> Result<PathBuf> {
    let root = match root {
        Some(root) => root,
        None => env::current_dir()?,
    };
    root.canonicalize()
        .with_context(|| format!("project root {} does not exist", root.display()))
}

/// Show unified diff between original and rewritten content
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!("\n{}", format!("--- {} (original)", file.display()).dimmed());
    println!("{}", format!("+++ {} (rewritten)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);
    for change in diff.iter_all_changes() {
        let line = match change.tag() {
            ChangeTag::Delete => format!("-{change}").red(),
            ChangeTag::Insert => format!("+{change}").green(),
            ChangeTag::Equal => format!(" {change}").normal(),
        };
        print!("{line}");
    }
}

#[derive(Default)]
struct Totals {
    applied: usize,
    skipped: usize,
    failed: usize,
    changed_files: usize,
}

fn report_file(path: &Path, report: &FileReport, dry_run: bool, totals: &mut Totals) {
    for modifier in &report.modifiers {
        match &modifier.status {
            ModifierStatus::Applied => {
                let verb = if dry_run { "Would apply" } else { "Applied" };
                println!("{} {}: {}", "✓".green(), verb, modifier.label);
                totals.applied += 1;
            }
            ModifierStatus::Skipped(reason) => {
                println!("{} {} ({})", "⊙".yellow(), modifier.label, reason);
                totals.skipped += 1;
            }
            ModifierStatus::Failed(reason) => {
                eprintln!("{} {}: {}", "✗".red(), modifier.label, reason);
                totals.failed += 1;
            }
        }
    }
    if report.changed() {
        totals.changed_files += 1;
    }
    match &report.write {
        Some(WriteResult::Written { bytes, .. }) => {
            println!("  {}", format!("wrote {} ({bytes} bytes)", path.display()).dimmed());
        }
        Some(WriteResult::Unchanged { .. }) | None => {}
    }
}

fn report_error(path: &Path, error: &RunError, totals: &mut Totals) {
    eprintln!("{} {}: {}", "✗".red(), path.display(), error);
    if let RunError::File(FileError::Modify {
        source: ModifyError::ChainMatch(chain),
        ..
    }) = error
    {
        eprintln!(
            "  {}",
            format!(
                "CONFLICT: expected code shape not found ({} of {} matchers unmatched)",
                chain.remaining, chain.total
            )
            .red()
        );
        eprintln!("  Possible causes:");
        eprintln!("    - the file was edited by hand and no longer has the generated layout");
        eprintln!("    - the package this plan depends on is not installed");
    }
    totals.failed += 1;
}

fn cmd_apply(
    plan_path: &Path,
    root: Option<PathBuf>,
    dry_run: bool,
    show_diff: bool,
    force: bool,
) -> Result<()> {
    let root = resolve_root(root)?;
    let plans = load_all(plan_path)?;
    let options = ApplyOptions {
        force,
        dry_run,
        guard: Some(ProjectGuard::new(&root)?),
    };

    println!("Project: {}", root.display());
    if dry_run {
        println!("{}", "[DRY RUN - no files will be written]".cyan());
    }
    println!();

    let mut totals = Totals::default();
    for (plan_file, plan) in &plans {
        println!("Loading plan from {}...", plan_file.display());
        for (path, result) in run_plan(plan, &root, &options) {
            match result {
                Ok(report) => {
                    report_file(&path, &report, dry_run, &mut totals);
                    if show_diff && report.changed() {
                        display_diff(&path, &report.original, &report.printed);
                    }
                }
                Err(error) => report_error(&path, &error, &mut totals),
            }
        }
        println!();
    }

    println!("{}", "Summary:".bold());
    println!("  {} applied", totals.applied.to_string().green());
    println!("  {} skipped", totals.skipped.to_string().yellow());
    println!("  {} failed", totals.failed.to_string().red());
    println!("  {} files changed", totals.changed_files);

    if totals.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_check(plan_path: &Path, root: Option<PathBuf>) -> Result<()> {
    let root = resolve_root(root)?;
    let plans = load_all(plan_path)?;
    let options = ApplyOptions {
        force: true,
        dry_run: true,
        guard: Some(ProjectGuard::new(&root)?),
    };

    println!("{}", "Plan Status Report".bold());
    println!("Project: {}", root.display());
    println!();

    let mut pending = Vec::new();
    let mut failed = Vec::new();
    let mut up_to_date = 0;
    for (_, plan) in &plans {
        for (path, result) in run_plan(plan, &root, &options) {
            match result {
                Ok(report) => {
                    for modifier in &report.modifiers {
                        match &modifier.status {
                            ModifierStatus::Applied => {
                                pending.push(format!("{} ({})", modifier.label, path.display()))
                            }
                            ModifierStatus::Skipped(_) => up_to_date += 1,
                            ModifierStatus::Failed(reason) => {
                                failed.push(format!("{}: {reason}", modifier.label))
                            }
                        }
                    }
                }
                Err(error) => failed.push(format!("{}: {error}", path.display())),
            }
        }
    }

    println!("{} {} modifications up to date", "✓".green(), up_to_date);
    if !pending.is_empty() {
        println!("{} {} ({})", "⊙".yellow(), "PENDING".yellow().bold(), pending.len());
        for entry in &pending {
            println!("  - {entry}");
        }
    }
    if !failed.is_empty() {
        println!("{} {} ({})", "✗".red(), "FAILED".red().bold(), failed.len());
        for entry in &failed {
            println!("  - {}", entry.dimmed());
        }
    }

    if !pending.is_empty() || !failed.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_print(file: &Path) -> Result<()> {
    let parsed = GoFile::open(file)?;
    print!("{}", parsed.print());
    Ok(())
}
