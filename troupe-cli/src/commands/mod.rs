//! Subcommand implementations and the project loading they share.

pub mod build;
pub mod diff;
pub mod init;
pub mod list;
pub mod show;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use troupe_core::{
    config::{self, CONFIG_FILE_NAME},
    types::{TroupeKey, TroupeRecord},
    ProjectConfig,
};
use troupe_publish::{pipeline, BuildOptions, Workbook};
use troupe_renderer::{RenderConfig, Renderer, TemplateSet};

/// Arguments shared by every command that reads the workbook.
#[derive(Args, Debug, Clone)]
pub struct SheetArgs {
    /// ODS / XLSX workbook holding the applications.
    pub workbook: PathBuf,

    /// Project config file. Missing file means built-in defaults.
    #[arg(long, short = 'c', default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// Worksheet name (overrides `sheet` in the config).
    #[arg(long)]
    pub sheet: Option<String>,

    /// Year treated as "still running" (overrides `current_year`).
    #[arg(long, value_name = "YEAR")]
    pub current_year: Option<i32>,

    /// Output directory (overrides `output_dir`).
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Config, collated records and a ready renderer.
pub struct LoadedProject {
    pub config: ProjectConfig,
    pub out_dir: PathBuf,
    pub renderer: Renderer,
    pub records: BTreeMap<TroupeKey, TroupeRecord>,
}

impl LoadedProject {
    pub fn build_options(&self, dry_run: bool) -> BuildOptions {
        BuildOptions {
            out_dir: self.out_dir.clone(),
            extension: self.config.extension.clone(),
            extant: self.config.extant.clone(),
            dry_run,
        }
    }
}

impl SheetArgs {
    /// Load the config, apply overrides, read + collate the sheet.
    pub fn load(&self) -> Result<LoadedProject> {
        let mut project = config::load_or_default(&self.config)
            .with_context(|| format!("failed to load {}", self.config.display()))?;
        if let Some(sheet) = &self.sheet {
            project.sheet = sheet.clone();
        }
        if let Some(year) = self.current_year {
            project.current_year = Some(year);
        }

        let base = config_base(&self.config);
        let out_dir = match &self.out {
            Some(out) => out.clone(),
            None => ProjectConfig::resolve(&base, &project.output_dir),
        };
        let templates_dir = project
            .templates_dir
            .as_ref()
            .map(|dir| ProjectConfig::resolve(&base, dir));

        let render_config = match project.current_year {
            Some(year) => RenderConfig::new(year),
            None => RenderConfig::this_year(),
        };
        let templates = TemplateSet::load(templates_dir.as_deref())
            .context("failed to load templates")?;
        let renderer = Renderer::with_templates(templates, render_config);

        let workbook = Workbook::new(&self.workbook, project.sheet.clone());
        let records = pipeline::collect_records(&workbook, &project.columns)
            .with_context(|| format!("failed to collate {}", self.workbook.display()))?;
        tracing::info!(
            "collated {} troupes from {}",
            records.len(),
            self.workbook.display()
        );

        Ok(LoadedProject {
            config: project,
            out_dir,
            renderer,
            records,
        })
    }
}

/// Directory relative config paths are resolved against.
fn config_base(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
