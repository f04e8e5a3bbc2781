mod export;
mod filters;
mod remote;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use portfolio_core::{load_catalog, load_governance_config, ActionStatus, AppConfig, Catalog};
use portfolio_pipeline::{
    normalize_products, ExportFormat, GroupKey, SortDirection, SortKey, WhatIfAdjustment,
};
use tracing_subscriber::EnvFilter;

use crate::filters::FilterArgs;

#[derive(Debug, Parser)]
#[command(name = "portfolio-cli")]
#[command(about = "Product portfolio dashboard command line interface")]
struct Cli {
    /// Catalog snapshot to read (defaults to PORTFOLIO_CATALOG_PATH)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Summary tiles and chart series for the filtered portfolio
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// List filtered products, sorted and optionally grouped
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Sort key: name, readiness, revenue, stage or risk
        #[arg(long, default_value = "name")]
        sort: SortKey,
        /// Sort direction: asc or desc
        #[arg(long, default_value = "asc")]
        direction: SortDirection,
        /// Group by: type, region, stage, risk or tier
        #[arg(long)]
        group_by: Option<GroupKey>,
        #[arg(long)]
        json: bool,
    },
    /// Export the filtered products as CSV or XLSX
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// csv or xlsx
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Output file (defaults to a timestamped file in PORTFOLIO_EXPORT_DIR)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Evaluate governance rules against the filtered products
    Governance {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Data-contract completeness of the filtered products
    Health {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Feedback sentiment and themes
    Feedback {
        /// Limit to one product id
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Project a product's outlook under readiness and revenue changes
    WhatIf {
        /// Product id
        product: String,
        /// Readiness change in score points
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        readiness_delta: f64,
        /// Revenue target change in percent
        #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
        revenue_change_pct: f64,
        #[arg(long)]
        json: bool,
    },
    /// Download a catalog snapshot from the service
    Fetch {
        /// Snapshot file to write (defaults to the catalog path)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Product follow-up actions
    Actions {
        #[command(subcommand)]
        command: ActionCommands,
    },
    /// Upload a supporting document for AI retrieval
    Upload {
        /// File to upload
        path: PathBuf,
        /// Product the document belongs to
        #[arg(long)]
        product: Option<String>,
        /// Return once the upload is queued instead of waiting for ingestion
        #[arg(long)]
        no_wait: bool,
    },
    /// Ask the AI service a question about the portfolio
    Ask {
        question: String,
        /// Restrict retrieval to one product's documents
        #[arg(long)]
        product: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum ActionCommands {
    /// List actions from the snapshot, or from the service with --remote
    List {
        #[arg(long)]
        product: Option<String>,
        #[arg(long)]
        remote: bool,
    },
    /// Move an action forward: in_progress or completed
    Advance { id: String, status: ActionStatus },
    /// Save a note on an action (an empty note clears it)
    Note { id: String, note: String },
}

fn load_snapshot(cli_path: Option<&PathBuf>, config: &AppConfig) -> anyhow::Result<Catalog> {
    let path = cli_path.unwrap_or(&config.catalog_path);
    let catalog = load_catalog(path)?;
    tracing::debug!(
        path = %path.display(),
        products = catalog.products.len(),
        feedback = catalog.feedback.len(),
        actions = catalog.actions.len(),
        "catalog snapshot loaded"
    );
    Ok(catalog)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("portfolio-cli ready; run with --help to list commands");
        return Ok(());
    };

    let config = portfolio_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let catalog_path = cli.catalog.as_ref();
    match command {
        Commands::Summary { filters, json } => {
            let catalog = load_snapshot(catalog_path, &config)?;
            let products = normalize_products(catalog.products);
            report::run_summary(&products, &filters.to_filter_state()?, json)?;
        }
        Commands::List {
            filters,
            sort,
            direction,
            group_by,
            json,
        } => {
            let catalog = load_snapshot(catalog_path, &config)?;
            let products = normalize_products(catalog.products);
            report::run_list(
                &products,
                &filters.to_filter_state()?,
                sort,
                direction,
                group_by,
                json,
            )?;
        }
        Commands::Export {
            filters,
            format,
            output,
        } => {
            let catalog = load_snapshot(catalog_path, &config)?;
            let products = normalize_products(catalog.products);
            let path = export::run_export(
                &products,
                &filters.to_filter_state()?,
                format,
                output.as_deref(),
                &config.export_dir,
            )?;
            println!("exported to {}", path.display());
        }
        Commands::Governance { filters, json } => {
            let governance = load_governance_config(&config.governance_path)?;
            let catalog = load_snapshot(catalog_path, &config)?;
            let products = normalize_products(catalog.products);
            report::run_governance(&products, &filters.to_filter_state()?, &governance, json)?;
        }
        Commands::Health { filters, json } => {
            let catalog = load_snapshot(catalog_path, &config)?;
            let products = normalize_products(catalog.products);
            report::run_health(&products, &filters.to_filter_state()?, json)?;
        }
        Commands::Feedback { product, json } => {
            let catalog = load_snapshot(catalog_path, &config)?;
            report::run_feedback(&catalog.feedback, product.as_deref(), json)?;
        }
        Commands::WhatIf {
            product,
            readiness_delta,
            revenue_change_pct,
            json,
        } => {
            let catalog = load_snapshot(catalog_path, &config)?;
            let products = normalize_products(catalog.products);
            let adjustment = WhatIfAdjustment {
                readiness_delta,
                revenue_change_pct,
            };
            report::run_what_if(&products, &product, adjustment, json)?;
        }
        Commands::Fetch { output } => {
            let target = output
                .or_else(|| cli.catalog.clone())
                .unwrap_or_else(|| config.catalog_path.clone());
            remote::run_fetch(&config, &target).await?;
        }
        Commands::Actions { command } => match command {
            ActionCommands::List { product, remote } => {
                if remote {
                    remote::run_actions_list_remote(&config, product.as_deref()).await?;
                } else {
                    let catalog = load_snapshot(catalog_path, &config)?;
                    let actions: Vec<_> = catalog
                        .actions
                        .into_iter()
                        .filter(|a| product.as_deref().map_or(true, |id| a.product_id == id))
                        .collect();
                    remote::print_actions(&actions);
                }
            }
            ActionCommands::Advance { id, status } => {
                remote::run_actions_advance(&config, &id, status).await?;
            }
            ActionCommands::Note { id, note } => {
                remote::run_actions_note(&config, &id, &note).await?;
            }
        },
        Commands::Upload {
            path,
            product,
            no_wait,
        } => {
            remote::run_upload(&config, &path, product.as_deref(), !no_wait).await?;
        }
        Commands::Ask { question, product } => {
            remote::run_ask(&config, &question, product.as_deref()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
