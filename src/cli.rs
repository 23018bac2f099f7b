use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod commands;

use commands::{init_database, serve};

#[derive(Parser)]
#[command(name = "mainstage")]
#[command(about = "Festival management backend with CLI tools and web server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Database URL
        ///
        /// For SQLite databases, use:
        ///   - sqlite://mainstage.db?mode=rwc (created if absent)
        ///   - sqlite:///absolute/path/to/database.sqlite (absolute path)
        #[arg(
            short,
            long,
            env = "DATABASE_URL",
            default_value = "sqlite://mainstage.db?mode=rwc"
        )]
        database_url: String,

        /// Address to bind the HTTP server to
        #[arg(short, long, env = "BIND_ADDRESS", default_value = "0.0.0.0:3000")]
        bind_address: String,
    },
    /// Initialize the database using migrations
    ///
    /// The server also applies pending migrations at startup; this command
    /// exists for provisioning a database ahead of time.
    InitDb {
        /// Database URL
        #[arg(short, long, env = "DATABASE_URL")]
        database_url: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Serve {
                database_url,
                bind_address,
            } => {
                serve(&database_url, &bind_address).await?;
            }
            Commands::InitDb { database_url } => {
                init_database(&database_url).await?;
            }
        }
        Ok(())
    }
}
