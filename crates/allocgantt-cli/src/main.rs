//! allocgantt CLI - Allocation Gantt pivot engine
//!
//! Command-line interface for loading an allocation base, building the
//! per-person daily pivot and rendering it as an HTML grid or a colorized
//! Excel workbook.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use allocgantt_core::{
    DateWindow, Filters, PersonFilter, PivotTable, Renderer, RoleFilter, TimeScale,
};
use allocgantt_io::load_source_table;
use allocgantt_pivot::build_pivot;
use allocgantt_render::{ExcelExporter, HtmlGridRenderer};

#[derive(Parser)]
#[command(name = "allocgantt")]
#[command(author, version, about = "Per-person daily allocation Gantt grid", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the allocation grid as a standalone HTML page
    Render {
        /// Input .xlsx base
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Bucket column width hint in pixels (40-200)
        #[arg(long, default_value_t = 80)]
        zoom: u32,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Export the allocation grid as a colorized Excel workbook
    Export {
        /// Input .xlsx base
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output file path
        #[arg(short, long, default_value = "Gantt_Alocacao.xlsx")]
        output: PathBuf,
    },

    /// Print the built pivot (debugging / CI surface)
    Pivot {
        /// Input .xlsx base
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        filters: FilterArgs,

        /// Output format
        #[arg(long, value_enum, default_value_t = PivotFormat::Table)]
        format: PivotFormat,
    },
}

/// Filter parameters shared by every subcommand
#[derive(Args)]
struct FilterArgs {
    /// Time-axis granularity
    #[arg(long, value_enum, default_value_t = ScaleArg::Daily, env = "ALLOCGANTT_SCALE")]
    scale: ScaleArg,

    /// Person-type restriction
    #[arg(long, value_enum, default_value_t = RoleArg::All, env = "ALLOCGANTT_ROLE")]
    role: RoleArg,

    /// Window start date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    from: NaiveDate,

    /// Window end date (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    to: NaiveDate,

    /// Restrict to a person (repeatable; omit to keep everyone)
    #[arg(long = "person", value_name = "NAME")]
    people: Vec<String>,
}

impl FilterArgs {
    fn to_filters(&self) -> Result<Filters> {
        if self.from > self.to {
            bail!("--from ({}) is after --to ({})", self.from, self.to);
        }
        let people = if self.people.is_empty() {
            PersonFilter::All
        } else {
            PersonFilter::Only(self.people.clone())
        };
        Ok(Filters {
            scale: self.scale.into(),
            role: self.role.into(),
            window: DateWindow::new(self.from, self.to),
            people,
        })
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ScaleArg {
    Daily,
    Fortnightly,
}

impl From<ScaleArg> for TimeScale {
    fn from(arg: ScaleArg) -> Self {
        match arg {
            ScaleArg::Daily => TimeScale::Daily,
            ScaleArg::Fortnightly => TimeScale::Fortnightly,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    All,
    Head,
    Analyst,
}

impl From<RoleArg> for RoleFilter {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::All => RoleFilter::All,
            RoleArg::Head => RoleFilter::Head,
            RoleArg::Analyst => RoleFilter::Analyst,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PivotFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            file,
            filters,
            zoom,
            output,
        } => {
            let pivot = load_and_pivot(&file, &filters)?;
            let html = HtmlGridRenderer::new()
                .zoom(zoom)
                .render(&pivot)
                .context("failed to render the HTML grid")?;
            std::fs::write(&output, html)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("wrote {}", output.display());
        }
        Commands::Export {
            file,
            filters,
            output,
        } => {
            let pivot = load_and_pivot(&file, &filters)?;
            let xlsx = ExcelExporter::new()
                .render(&pivot)
                .context("failed to build the Excel export")?;
            std::fs::write(&output, xlsx)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("wrote {}", output.display());
        }
        Commands::Pivot {
            file,
            filters,
            format,
        } => {
            let pivot = load_and_pivot(&file, &filters)?;
            match format {
                PivotFormat::Table => print_table(&pivot),
                PivotFormat::Json => {
                    let json = serde_json::to_string_pretty(&pivot)
                        .context("failed to serialize the pivot")?;
                    println!("{json}");
                }
            }
        }
    }

    Ok(())
}

/// Load the base and run the pipeline. The two terminal pipeline conditions
/// are user-recoverable: warn and stop without partial output.
fn load_and_pivot(file: &Path, filters: &FilterArgs) -> Result<PivotTable> {
    let filters = filters.to_filters()?;
    let table = load_source_table(file)
        .with_context(|| format!("failed to load {}", file.display()))?;
    tracing::debug!(rows = table.len(), "loaded source table");

    match build_pivot(&table, &filters) {
        Ok(pivot) => Ok(pivot),
        Err(err) => {
            tracing::warn!("{err}");
            eprintln!("warning: {err}");
            std::process::exit(1);
        }
    }
}

fn print_table(pivot: &PivotTable) {
    println!("{}", pivot.columns().join("\t"));
    for row in &pivot.rows {
        let cells: Vec<String> = row.cells.iter().map(|c| c.to_string()).collect();
        println!(
            "{}\t{}\t{}\t{}",
            row.person,
            row.process,
            row.stage.label(),
            cells.join("\t")
        );
    }
}
