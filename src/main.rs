use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use boamp_dash::{
    Config, Dashboard, NoticeFilters, NoticeSummary, SqliteStore, Urgency,
};

#[derive(Parser)]
#[command(name = "boamp-dash")]
#[command(about = "Deadline-aware dashboard over BOAMP procurement notices")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file
    #[arg(long, default_value = "boamp-dash.yml")]
    config: PathBuf,

    /// Override the database path from the config
    #[arg(long)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List notices as JSON, with optional filters
    Notices {
        /// Match against objet or keywords_used
        #[arg(long)]
        keyword: Option<String>,

        /// Match against code_departement
        #[arg(long)]
        department: Option<String>,

        /// Match against nature
        #[arg(long)]
        nature: Option<String>,

        /// Exact match on visite_obligatoire (e.g. "yes")
        #[arg(long)]
        visite: Option<String>,

        /// Keep only urgent or overdue notices
        #[arg(long, value_enum)]
        urgency: Option<Urgency>,
    },

    /// Show one notice in full, by idweb or id
    Show {
        notice_id: String,
    },

    /// Dashboard statistics
    Stats,

    /// Distinct values available for the department and nature filters
    Filters,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("boamp_dash=info".parse()?))
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)?;
    if let Some(db) = cli.db {
        config.database.path = db;
    }

    let store = SqliteStore::connect(&config.database_url()).await?;
    let dashboard = Dashboard::new(store);

    // The only clock read; everything below is deterministic given today
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Notices {
            keyword,
            department,
            nature,
            visite,
            urgency,
        } => {
            let filters = NoticeFilters {
                keyword,
                department,
                nature,
                visite_obligatoire: visite,
                urgency,
            };

            let notices = dashboard.list_notices(&filters, today).await?;
            let summaries: Vec<NoticeSummary> = notices.iter().map(NoticeSummary::from).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
        }

        Commands::Show { notice_id } => {
            let detail = dashboard
                .get_notice(&notice_id, today)
                .await?
                .with_context(|| format!("Notice not found: {notice_id}"))?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }

        Commands::Stats => {
            let stats = dashboard.stats(today).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }

        Commands::Filters => {
            let options = dashboard.filter_options(config.filters.max_options).await?;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
    }

    Ok(())
}
