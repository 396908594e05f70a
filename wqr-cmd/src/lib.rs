//! Command implementations for the WQR CLI.
//!
//! Provides subcommands for generating outorga compliance reports and
//! compliance summaries from measurement CSV exports.

use clap::Subcommand;

pub mod report;
pub mod sources;
pub mod summary;

#[derive(Subcommand)]
pub enum Command {
    /// Generate the full compliance report as a standalone HTML document
    Report {
        /// Path to the measurement export CSV
        #[arg(short = 'm', long)]
        measurements_csv: String,

        /// Path to the outorga permits CSV (point_id,limit_m3)
        #[arg(short = 'p', long)]
        permits_csv: Option<String>,

        /// Client name printed on the report cover
        #[arg(long, default_value = "")]
        client_name: String,

        /// Client address printed on the report cover
        #[arg(long, default_value = "")]
        client_address: String,

        /// Client tax id printed on the report cover
        #[arg(long, default_value = "")]
        client_tax_id: String,

        /// First day of the reporting period (YYYY-MM-DD)
        #[arg(short = 's', long)]
        start: String,

        /// Last day of the reporting period (YYYY-MM-DD)
        #[arg(short = 'e', long)]
        end: String,

        /// Output path for the report HTML
        #[arg(short = 'o', long)]
        out: String,
    },

    /// Print the compliance summary for a period as JSON
    Summary {
        /// Path to the measurement export CSV
        #[arg(short = 'm', long)]
        measurements_csv: String,

        /// First day of the reporting period (YYYY-MM-DD)
        #[arg(short = 's', long)]
        start: String,

        /// Last day of the reporting period (YYYY-MM-DD)
        #[arg(short = 'e', long)]
        end: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Report {
            measurements_csv,
            permits_csv,
            client_name,
            client_address,
            client_tax_id,
            start,
            end,
            out,
        } => report::run_report(&report::ReportArgs {
            measurements_csv,
            permits_csv,
            client_name,
            client_address,
            client_tax_id,
            start,
            end,
            out,
        }),
        Command::Summary {
            measurements_csv,
            start,
            end,
        } => summary::run_summary(&measurements_csv, &start, &end),
    }
}
