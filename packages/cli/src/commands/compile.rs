use super::{find_tree_files, project_catalog, resolve};
use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use rulecraft_editor::Document;
use rulecraft_export::{can_export_to_format, ExportFormat, ExportOptions};
use rulecraft_model::FieldCatalog;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Rule tree file or directory (defaults to the project directory)
    #[arg(default_value = ".")]
    pub input: PathBuf,

    /// Target formats (readable, sql, mongo, json); overrides config `emit`
    #[arg(short, long)]
    pub target: Vec<ExportFormat>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output directory (overrides config)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Field catalog file (overrides config)
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

pub fn compile(args: CompileArgs, cwd: &Path) -> Result<bool> {
    let mut config = Config::load(cwd)?;
    if let Some(catalog) = &args.catalog {
        config.catalog = resolve(cwd, catalog).display().to_string();
    }
    let catalog = project_catalog(&config, cwd)?;
    let targets = if args.target.is_empty() {
        config.emit.clone()
    } else {
        args.target.clone()
    };

    let input = resolve(cwd, &args.input);
    let files = find_tree_files(&input, &config, cwd)?;

    if !args.stdout {
        println!("{}", "🔨 Compiling rule trees...".bright_blue().bold());
    }
    if files.is_empty() {
        println!("{}", "⚠️  No rule tree files found".yellow());
        return Ok(true);
    }

    let out_dir = match (&args.out_dir, &config.out_dir) {
        (Some(dir), _) => resolve(cwd, dir),
        (None, Some(dir)) => cwd.join(dir),
        (None, None) => cwd.join("dist"),
    };
    let options = config.export_options();

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = relative_to(file, &input);
        let job = CompileJob {
            file,
            relative_path: &relative_path,
            catalog: &catalog,
            config: &config,
            options: &options,
            targets: &targets,
            out_dir: (!args.stdout).then_some(out_dir.as_path()),
        };

        match job.run() {
            Ok(written) => {
                success_count += 1;
                for path in written {
                    println!(
                        "  {} {} → {}",
                        "✓".green(),
                        relative_path.display(),
                        path.display()
                    );
                }
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    format!("{:#}", e).red()
                );
            }
        }
    }

    if !args.stdout {
        println!();
        if error_count == 0 {
            println!("{} Compiled {} files successfully", "✅".green(), success_count);
        } else {
            println!(
                "{} Compiled {} files, {} errors",
                "⚠️".yellow(),
                success_count,
                error_count
            );
        }
    }

    Ok(error_count == 0)
}

struct CompileJob<'a> {
    file: &'a Path,
    relative_path: &'a Path,
    catalog: &'a FieldCatalog,
    config: &'a Config,
    options: &'a ExportOptions,
    targets: &'a [ExportFormat],
    /// None prints to stdout
    out_dir: Option<&'a Path>,
}

impl CompileJob<'_> {
    /// Compile one file to every target; returns the files written
    fn run(&self) -> Result<Vec<PathBuf>> {
        let document = Document::load(self.file, self.catalog.clone(), self.config.document_options())?
            .with_lint_options(self.config.lint_options());

        for diagnostic in document.diagnostics().iter().filter(|d| d.is_error()) {
            tracing::warn!(
                file = %self.relative_path.display(),
                rule = %diagnostic.rule,
                node = %diagnostic.node_id,
                "{}",
                diagnostic.message
            );
        }

        let mut written = Vec::new();
        for &format in self.targets {
            if format != ExportFormat::Json && !can_export_to_format(document.tree(), format) {
                tracing::info!(file = %self.relative_path.display(), %format, "Tree has no conditions, skipping");
                continue;
            }

            let output = document.export(format, self.options)?.to_pretty_string()?;

            match self.out_dir {
                None => {
                    println!("{}", output);
                }
                Some(out_dir) => {
                    let output_file = out_dir.join(self.relative_path).with_extension(format.extension());
                    if let Some(parent) = output_file.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&output_file, output)?;
                    written.push(output_file);
                }
            }
        }

        Ok(written)
    }
}

fn relative_to(file: &Path, input: &Path) -> PathBuf {
    match file.strip_prefix(input) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => file.file_name().map(PathBuf::from).unwrap_or_else(|| file.to_path_buf()),
    }
}
