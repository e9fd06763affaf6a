//! `troupes list <workbook>`: one line per collated troupe.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use troupe_publish::{pipeline, OutputGroup};

use super::{LoadedProject, SheetArgs};

/// Arguments for `troupes list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub sheet: SheetArgs,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let project = self.sheet.load()?;
        let rows = build_rows(&project)?;
        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&rows).context("failed to serialize list JSON")?
            );
            return Ok(());
        }
        print_table(rows);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct TroupeSummary {
    name: String,
    years: String,
    group: OutputGroup,
    rows: usize,
    cast: usize,
    videos: usize,
    active: bool,
}

#[derive(Tabled)]
struct ListTableRow {
    #[tabled(rename = "troupe")]
    name: String,
    #[tabled(rename = "years")]
    years: String,
    #[tabled(rename = "group")]
    group: String,
    #[tabled(rename = "rows")]
    rows: usize,
    #[tabled(rename = "cast")]
    cast: usize,
    #[tabled(rename = "videos")]
    videos: usize,
}

fn build_rows(project: &LoadedProject) -> Result<Vec<TroupeSummary>> {
    let options = project.build_options(true);
    let planned = pipeline::plan(&project.records, &project.renderer, &options)
        .context("failed to render troupes")?;

    let mut rows = Vec::with_capacity(planned.len());
    for page in planned {
        let Some(record) = project.records.get(&page.key) else {
            continue;
        };
        let view = project.renderer.page(&page.key, record);
        rows.push(TroupeSummary {
            name: page.key.0.clone(),
            years: view.years,
            group: page.group,
            rows: record.row_count,
            cast: record.cast.len(),
            videos: record.videos.len(),
            active: view.active,
        });
    }
    Ok(rows)
}

fn print_table(rows: Vec<TroupeSummary>) {
    let active = rows.iter().filter(|r| r.active).count();
    println!(
        "Troupes v{} | {} troupes | {} active",
        env!("CARGO_PKG_VERSION"),
        rows.len(),
        active,
    );
    if rows.is_empty() {
        println!("No troupes found.");
        return;
    }

    let table_rows: Vec<ListTableRow> = rows
        .into_iter()
        .map(|row| ListTableRow {
            name: row.name,
            years: row.years,
            group: group_label(&row.group),
            rows: row.rows,
            cast: row.cast,
            videos: row.videos,
        })
        .collect();
    let mut table = Table::new(table_rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn group_label(group: &OutputGroup) -> String {
    match group {
        OutputGroup::Extant => "extant".bright_black().to_string(),
        OutputGroup::NeverPerformed => "never performed".yellow().to_string(),
        OutputGroup::New => "new".green().bold().to_string(),
    }
}
