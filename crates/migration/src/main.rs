mod cli;

use clap::Parser;
use cli::Cli;
use common::{config::Config, logging};
use migration::{cli::run_migrate, sea_orm::Database};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let config = Config::new(cli.config)?;

    logging::init(&config);

    let Some(database_config) = config.database.as_ref() else {
        return Err(anyhow::Error::msg("unable to load database config"));
    };

    info!("connecting to database");
    let db = Database::connect(&database_config.url).await?;
    info!("database connection established");

    run_migrate(migration::Migrator, &db, cli.command, false)
        .await
        .map_err(|err| anyhow::Error::msg(err.to_string()))?;

    Ok(())
}
