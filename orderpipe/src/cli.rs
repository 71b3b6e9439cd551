// orderpipe/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "orderpipe")]
#[command(about = "Batch ETL for raw orders: clean, validate and load a DuckDB star schema", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🚀 Runs the pipeline (Load -> Transform -> Validate -> Warehouse)
    Run {
        /// Project directory (holds orderpipe.yaml and the relative data paths)
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Stop after validation: no processed file, no warehouse writes
        #[arg(long)]
        dry_run: bool,
    },

    /// 📊 Writes the revenue reports from the warehouse
    Report {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Number of products in the top-products report (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// 🔍 Inspects a warehouse table (schema + sample rows)
    Inspect {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Table name to inspect
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_cli_parse_run_defaults() -> Result<()> {
        let args = Cli::parse_from(["orderpipe", "run"]);
        match args.command {
            Commands::Run {
                project_dir,
                dry_run,
            } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
                assert!(!dry_run);
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_run_dry_run() -> Result<()> {
        let args = Cli::parse_from(["orderpipe", "run", "--dry-run", "--project-dir", "/tmp"]);
        match args.command {
            Commands::Run {
                project_dir,
                dry_run,
            } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
                assert!(dry_run);
                Ok(())
            }
            _ => bail!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_report() -> Result<()> {
        let args = Cli::parse_from(["orderpipe", "report", "--limit", "3"]);
        match args.command {
            Commands::Report { limit, .. } => {
                assert_eq!(limit, Some(3));
                Ok(())
            }
            _ => bail!("Expected Report command"),
        }
    }

    #[test]
    fn test_cli_parse_inspect() -> Result<()> {
        let args = Cli::parse_from(["orderpipe", "inspect", "--table", "fact_orders"]);
        match args.command {
            Commands::Inspect { table, limit, .. } => {
                assert_eq!(table, "fact_orders");
                assert_eq!(limit, 5);
                Ok(())
            }
            _ => bail!("Expected Inspect command"),
        }
    }

    #[test]
    fn test_cli_inspect_requires_table() {
        assert!(Cli::try_parse_from(["orderpipe", "inspect"]).is_err());
    }
}
