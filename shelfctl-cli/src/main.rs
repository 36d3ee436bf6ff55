//! shelfctl - interactive library management CLI
//!
//! A menu-driven tool for managing a library catalog: books, borrowers,
//! and the loans between them, backed by SQLite.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
mod flows;
mod menu;
mod prompt;
mod render;

#[derive(Parser)]
#[command(
    name = "shelfctl",
    author,
    version,
    about = "Interactive library management: books, borrowers, and loans"
)]
struct Cli {
    /// Which database to operate on
    #[arg(long = "db", value_enum, default_value_t)]
    target: config::DbTarget,

    /// Connection URL override, e.g. sqlite://library.db
    #[arg(long)]
    database_url: Option<String>,
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init tracing: {e}"))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().ok();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let database_url = config::resolve_database_url(cli.target, cli.database_url);

    let pool = shelfctl_db::pool::create_pool(&database_url)
        .await
        .context("can't connect to database")?;
    shelfctl_db::migrations::run(&pool)
        .await
        .context("can't prepare database schema")?;

    menu::run(&pool, &mut prompt::InquirePrompter).await
}
