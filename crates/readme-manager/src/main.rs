//! README manager
//!
//! Regenerates curated Markdown READMEs from TOML manifests and edits the
//! tables of existing documents in place.

use anyhow::{Context, Result};
use clap::Parser;
use readme_manager::catalog::Catalog;
use readme_manager::cli::{Cli, Commands, ConfigCommands};
use readme_manager::config::{ConfigLoader, Settings, DIRECTORY_CONFIG};
use readme_manager::errors::{ActionableError, ReadmeError};
use readme_manager::link::{create_image_link, create_link};
use readme_manager::logging;
use readme_manager::manager::{InitMode, ReadmeManager};
use readme_manager::output::{ExitCode, OutputContext};
use readme_manager::storage::{BackupPolicy, FileStorage};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    let exit_code = match run() {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            report(&e);
            ExitCode::from_error(&e)
        }
    };

    if exit_code != ExitCode::Success {
        std::process::exit(exit_code.code());
    }
}

/// Print an error, with causes and remedies when it is one of ours.
fn report(error: &anyhow::Error) {
    match error.chain().find_map(|c| c.downcast_ref::<ReadmeError>()) {
        Some(err) => {
            let context: Vec<String> = error
                .chain()
                .take_while(|c| c.downcast_ref::<ReadmeError>().is_none())
                .map(|c| c.to_string())
                .collect();
            for line in context {
                eprintln!("{}", line);
            }
            eprint!("{}", ActionableError::from(err));
        }
        None => eprintln!("Error: {:#}", error),
    }
}

#[derive(Serialize)]
struct TablesReport<'a> {
    file: &'a Path,
    tables: Vec<TableReport>,
}

#[derive(Serialize)]
struct TableReport {
    start: usize,
    end: usize,
    rows: usize,
    header: String,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let out = OutputContext::new(cli.quiet);

    let current_dir = env::current_dir()?;
    let mut loader = ConfigLoader::new().with_standard_layers(&current_dir);
    if let Some(path) = &cli.config {
        loader = loader.with_custom(path);
    }
    let config = loader.load().context("Failed to load configuration")?;
    logging::init(&config.settings.logging()?)?;
    config.log();
    let settings = config.settings;

    match cli.command {
        Commands::Build {
            manifest,
            output,
            preserve,
            no_backup,
        } => {
            let catalog = Catalog::load(&manifest)
                .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
            let path = resolve_document(&settings, output.or_else(|| catalog.output.clone()))?;

            let mut policy = BackupPolicy::from_settings(&settings.file_settings()?);
            if no_backup {
                policy.enabled = false;
            }

            let mut readme = ReadmeManager::builder(FileStorage::new(&path))
                .preserve_existing(preserve)
                .backup(policy)
                .build()?;
            catalog.render(&mut readme)?;
            readme.save()?;

            out.print_info(format!(
                "Wrote {} ({} sections, {} entries)",
                path.display(),
                catalog.sections.len(),
                catalog.entry_count()
            ))?;
        }

        Commands::Tables { file, json } => {
            let readme = open_existing(&settings, file)?;
            let regions = readme.find_table_regions();
            let lines = readme.lines();

            if json {
                let report = TablesReport {
                    file: readme.path(),
                    tables: regions
                        .iter()
                        .map(|r| TableReport {
                            start: r.start,
                            end: r.end,
                            rows: r.row_count(),
                            header: lines[r.start].clone(),
                        })
                        .collect(),
                };
                out.print_data(serde_json::to_string_pretty(&report)?)?;
            } else if regions.is_empty() {
                out.print_info(format!("No tables found in {}", readme.path().display()))?;
            } else {
                for (i, region) in regions.iter().enumerate() {
                    out.print_data(format!(
                        "Table {}: lines {}-{} ({} rows) {}",
                        i + 1,
                        region.start + 1,
                        region.end,
                        region.row_count(),
                        lines[region.start]
                    ))?;
                }
            }
        }

        Commands::AddColumn {
            header,
            values,
            file,
        } => {
            let mut readme = open_existing(&settings, file)?;
            let values = (!values.is_empty()).then_some(values);
            readme
                .add_column(&header, values.as_deref())
                .with_context(|| format!("Failed to add column '{}'", header))?;
            readme.save()?;

            out.print_info(format!(
                "Added column '{}' to {}",
                header.trim(),
                readme.path().display()
            ))?;
        }

        Commands::Link { text, url } => {
            out.print_data(create_link(&text, &url))?;
        }

        Commands::Image { alt, src, href } => {
            out.print_data(create_image_link(&alt, &src, href.as_deref()))?;
        }

        Commands::Config(ConfigCommands::Show) => {
            out.print_data(settings.to_toml()?.trim_end())?;
        }

        Commands::Config(ConfigCommands::Init { path }) => {
            let path = path.unwrap_or_else(|| current_dir.join(DIRECTORY_CONFIG));
            settings.save(&path)?;
            out.print_info(format!("Wrote configuration to {}", path.display()))?;
        }
    }

    Ok(())
}

fn resolve_document(settings: &Settings, explicit: Option<PathBuf>) -> Result<PathBuf> {
    match explicit {
        Some(path) => Ok(path),
        None => Ok(settings.file_settings()?.default_file),
    }
}

/// Load a document for reading or in-place editing.
fn open_existing(settings: &Settings, file: Option<PathBuf>) -> Result<ReadmeManager> {
    let path = resolve_document(settings, file)?;
    let readme =
        ReadmeManager::<FileStorage>::from_settings(settings, Some(&path), InitMode::Preserve)?;
    Ok(readme)
}
