//! `troupes build <workbook>`: collate, render and write every page.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use troupe_publish::{
    classify::allocate_stems, download_photos, pipeline, BuildReport, HttpFetcher, OutputGroup,
    PhotoResult, WriteResult,
};

use super::SheetArgs;

/// Arguments for `troupes build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Show what would be written without touching the output directory.
    #[arg(long)]
    pub dry_run: bool,

    /// Also download each troupe's photo into `<out>/photos`.
    #[arg(long)]
    pub photos: bool,
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let project = self.sheet.load()?;
        let options = project.build_options(self.dry_run);

        let report = pipeline::build(&project.records, &project.renderer, &options)
            .with_context(|| format!("build failed for '{}'", options.out_dir.display()))?;
        print_report(&report, self.dry_run);

        if self.photos {
            let fetcher =
                HttpFetcher::new(Duration::from_secs(project.config.photo_timeout_secs));
            let photos_dir = project.out_dir.join("photos");
            let stems = allocate_stems(&project.records);
            let results = download_photos(
                &project.records,
                &stems,
                &fetcher,
                &photos_dir,
                self.dry_run,
            );
            print_photos(&results, self.dry_run);
        }
        Ok(())
    }
}

fn print_report(report: &BuildReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let changed = report.pages.iter().filter(|p| p.result.is_change()).count();
    let unchanged = report.pages.len() - changed;

    if report.pages.is_empty() && report.removed.is_empty() {
        println!("{prefix}✓ nothing to do");
        return;
    }

    let groups: Vec<String> = OutputGroup::all()
        .iter()
        .map(|g| format!("{} {g}", report.count(*g)))
        .collect();
    println!(
        "{prefix}✓ {} pages ({}): {changed} written, {unchanged} unchanged, {} removed",
        report.pages.len(),
        groups.join(", "),
        report.removed.len(),
    );

    for page in &report.pages {
        print_write(&page.result);
    }
    for removed in &report.removed {
        print_write(removed);
    }
}

fn print_write(result: &WriteResult) {
    match result {
        WriteResult::Written { path } => println!("  ✎  {}", path.display()),
        WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
        WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        WriteResult::Removed { path } => println!("  ✗  {}", path.display()),
        WriteResult::WouldRemove { path } => println!("  -  {}", path.display()),
    }
}

fn print_photos(results: &[PhotoResult], dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let failed = results
        .iter()
        .filter(|r| matches!(r, PhotoResult::Failed { .. }))
        .count();
    println!("{prefix}✓ {} photos ({failed} failed)", results.len());
    for result in results {
        match result {
            PhotoResult::Saved { path, .. } => println!("  ✎  {}", path.display()),
            PhotoResult::Existing { path, .. } => println!("  ·  {}", path.display()),
            PhotoResult::WouldFetch { key, url } => println!("  ~  {key}: {url}"),
            PhotoResult::Failed { key, url, reason } => {
                println!("  !  {key}: {url} ({reason})")
            }
        }
    }
}
