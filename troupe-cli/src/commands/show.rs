//! `troupes show <workbook> <troupe>`: print one rendered page.

use anyhow::{bail, Result};
use clap::Args;

use troupe_core::TroupeKey;

use super::SheetArgs;

/// Arguments for `troupes show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Troupe name exactly as entered in the sheet.
    pub troupe: String,
}

impl ShowArgs {
    pub fn run(self) -> Result<()> {
        let project = self.sheet.load()?;
        let key = TroupeKey::from(self.troupe.as_str());
        let Some(record) = project.records.get(&key) else {
            bail!("no troupe named '{}' in {}", self.troupe, self.sheet.workbook.display());
        };
        let doc = project.renderer.render(&key, record)?;
        print!("{}", doc.content);
        if !doc.content.ends_with('\n') {
            println!();
        }
        Ok(())
    }
}
