use super::{find_tree_files, project_catalog, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use rulecraft_editor::Document;
use rulecraft_linter::{Diagnostic, DiagnosticLevel};
use rulecraft_model::FieldCatalog;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Rule tree file or directory to lint
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// List clean files too
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Field catalog file (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Default, PartialEq)]
struct Totals {
    files: usize,
    diagnostics: usize,
    errors: usize,
    warnings: usize,
}

pub fn lint(args: LintArgs, cwd: &Path) -> Result<bool> {
    let mut config = Config::load(cwd)?;
    if let Some(catalog) = &args.catalog {
        config.catalog = resolve(cwd, catalog).display().to_string();
    }
    let catalog = project_catalog(&config, cwd)?;
    let input = resolve(cwd, &args.input);

    let text = args.format == OutputFormat::Text;
    if text {
        println!("🔍 {} Rulecraft Linter", "Starting".green().bold());
        println!("   Input: {}", input.display());
        println!();
    }

    let files = find_tree_files(&input, &config, cwd)?;
    let mut totals = Totals::default();

    for file in &files {
        let diagnostics = lint_file(file, &catalog, &config)?;
        totals.files += 1;
        totals.diagnostics += diagnostics.len();
        totals.errors += diagnostics.iter().filter(|d| d.is_error()).count();
        totals.warnings += diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
            .count();

        match args.format {
            OutputFormat::Json => {
                let report = serde_json::json!({
                    "file": file.display().to_string(),
                    "diagnostics": diagnostics,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => print_diagnostics(file, &diagnostics, args.verbose),
        }
    }

    if text {
        print_summary(&totals);
    }

    Ok(totals.errors == 0)
}

fn lint_file(file: &Path, catalog: &FieldCatalog, config: &Config) -> Result<Vec<Diagnostic>> {
    let document = Document::load(file, catalog.clone(), config.document_options())
        .map_err(|err| anyhow::anyhow!("Failed to load {}: {}", file.display(), err))?
        .with_lint_options(config.lint_options());
    Ok(document.diagnostics().to_vec())
}

fn print_diagnostics(file: &Path, diagnostics: &[Diagnostic], verbose: bool) {
    if diagnostics.is_empty() {
        if verbose {
            println!("{} {}", "✓".green(), file.display());
        }
        return;
    }

    println!("{}", file.display());

    for diagnostic in diagnostics {
        let level_str = match diagnostic.level {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Warning => "warning".yellow().bold(),
        };

        println!(
            "  {} [{}] {} {}",
            level_str,
            diagnostic.rule,
            diagnostic.message,
            format!("({})", diagnostic.path.join(" › ")).dimmed()
        );

        if let Some(suggestion) = &diagnostic.suggestion {
            println!("    {} {}", "💡".dimmed(), suggestion.dimmed());
        }
    }

    println!();
}

fn print_summary(totals: &Totals) {
    println!();
    println!(
        "✨ {} Linting complete!",
        if totals.errors > 0 {
            "Done".red().bold()
        } else {
            "Done".green().bold()
        }
    );
    println!("   Files checked: {}", totals.files);
    println!("   Total diagnostics: {}", totals.diagnostics);

    if totals.errors > 0 {
        println!("   {} {}", "Errors:".red(), totals.errors);
    }
    if totals.warnings > 0 {
        println!("   {} {}", "Warnings:".yellow(), totals.warnings);
    }

    if totals.errors == 0 && totals.warnings == 0 {
        println!("   {} No issues found!", "✓".green());
    }
}
