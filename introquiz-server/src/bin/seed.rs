//! introquiz-seed - load the song catalog
//!
//! Replaces the whole `music` table with the built-in sample list, or with
//! the rows of a CSV file (`title,composer,audio_file,difficulty[,hint]`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use introquiz_common::config::{database_path, resolve_root_folder, ROOT_FOLDER_ENV};
use introquiz_common::db::init_database;
use introquiz_common::db::seed::{load_csv, replace_catalog, sample_catalog};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "introquiz-seed")]
#[command(about = "Replace the intro quiz song catalog")]
#[command(version)]
struct Args {
    /// Folder holding introquiz.db
    #[arg(short, long, env = "INTROQUIZ_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// CSV file to load instead of the built-in sample songs
    #[arg(long)]
    csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "introquiz_common=info,introquiz_seed=info".into()),
        )
        .init();

    let args = Args::parse();

    let songs = match &args.csv {
        Some(path) => load_csv(path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => sample_catalog(),
    };

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV);
    let db_path = database_path(&root_folder);
    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open {}", db_path.display()))?;

    let inserted = replace_catalog(&pool, &songs)
        .await
        .context("Failed to replace music catalog")?;

    info!("Seeded {} songs into {}", inserted, db_path.display());
    Ok(())
}
