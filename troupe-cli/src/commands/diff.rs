//! `troupes diff <workbook>`: show unified diffs for what build would write.

use anyhow::{Context, Result};
use clap::Args;

use troupe_publish::diff_pages;

use super::SheetArgs;

/// Arguments for `troupes diff`.
#[derive(Args, Debug)]
pub struct DiffArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,
}

impl DiffArgs {
    pub fn run(self) -> Result<()> {
        let project = self.sheet.load()?;
        let options = project.build_options(true);

        let diffs = diff_pages(&project.records, &project.renderer, &options)
            .with_context(|| format!("diff failed for '{}'", options.out_dir.display()))?;

        if diffs.is_empty() {
            println!("No differences in '{}'.", options.out_dir.display());
            return Ok(());
        }

        for diff in diffs {
            print!("{}", diff.unified_diff);
            if !diff.unified_diff.ends_with('\n') {
                println!();
            }
        }
        Ok(())
    }
}
