//! `troupes init [--config troupes.yaml]`

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use troupe_core::config::{self, CONFIG_FILE_NAME};

/// Write a default project config. Existing files are left alone.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to write the config.
    #[arg(long, short = 'c', default_value = CONFIG_FILE_NAME)]
    pub config: PathBuf,
}

impl InitArgs {
    pub fn run(self) -> Result<()> {
        let existed = self.config.exists();
        let project = config::init_at(&self.config)
            .with_context(|| format!("failed to init '{}'", self.config.display()))?;

        if existed {
            println!("✓ '{}' already exists, left unchanged", self.config.display());
        } else {
            println!("✓ Wrote '{}'", self.config.display());
        }
        println!(
            "  sheet: {}  output: {}  columns: name={} year={}",
            project.sheet,
            project.output_dir.display(),
            project.columns.name,
            project.columns.year,
        );
        Ok(())
    }
}
